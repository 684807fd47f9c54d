// src/services/collection_service.rs
// DOCUMENTATION: Field-addressed operations over lists of POIs and POI categories
// PURPOSE: Build derived views (compacted, filtered, sorted, joined) without per-field code

use std::cmp::Ordering;

use crate::models::{FieldKind, FieldValue, KeyedRecord, Poi, PoiCategory};

/// Keyed collection operations
/// DOCUMENTATION: Pure, synchronous transformations working in place on lists
/// the caller owns. A value whose kind differs from the field's kind is not an
/// error: it matches nothing.
pub struct CollectionService;

impl CollectionService {
    /// Keep records that have an `objectId` and a value for `key`
    /// Flag fields are always present, so only the `objectId` is required for them.
    pub fn compact<R: KeyedRecord>(list: &mut Vec<R>, key: R::Key) {
        if list.is_empty() {
            return;
        }
        let flag = R::kind_of(key) == FieldKind::Flag;
        list.retain(|record| {
            record.object_id().is_some() && (flag || record.field(key).is_some())
        });
    }

    /// Keep records whose field equals `value`
    /// DOCUMENTATION: A value of the wrong kind clears the list.
    pub fn filter<R: KeyedRecord>(list: &mut Vec<R>, key: R::Key, value: &FieldValue) {
        if list.is_empty() {
            return;
        }
        if value.kind() != R::kind_of(key) {
            log::debug!(
                "filter by {:?}: {:?} value never matches a {:?} field",
                key,
                value.kind(),
                R::kind_of(key)
            );
            list.clear();
            return;
        }
        list.retain(|record| record.field(key).map_or(false, |field| field == *value));
    }

    /// Keep records whose field equals any of `values`
    /// DOCUMENTATION: No-op for an empty list or value set. The list is cleared
    /// when any of the values has the wrong kind.
    pub fn filter_any_of<R: KeyedRecord>(list: &mut Vec<R>, key: R::Key, values: &[FieldValue]) {
        if list.is_empty() || values.is_empty() {
            return;
        }
        let expected = R::kind_of(key);
        if values.iter().any(|value| value.kind() != expected) {
            log::debug!(
                "filter by {:?}: value set does not hold only {:?} values",
                key,
                expected
            );
            list.clear();
            return;
        }
        list.retain(|record| {
            record
                .field(key)
                .map_or(false, |field| values.iter().any(|value| field == *value))
        });
    }

    /// Whether some record's field equals `value`
    pub fn contains<R: KeyedRecord>(list: &[R], key: R::Key, value: &FieldValue) -> bool {
        if list.is_empty() || value.kind() != R::kind_of(key) {
            return false;
        }
        list.iter()
            .any(|record| record.field(key).map_or(false, |field| field == *value))
    }

    /// Compact by `key`, then order ascending by the field
    /// DOCUMENTATION: Flag fields are ordered with the predicate
    /// `a == b || a` applied by insertion, which is not a strict order. For
    /// input `[A(true), B(false), C(true), D(false)]` the result is
    /// `[C, A, D, B]`. Every other kind uses a stable sort on its natural order.
    pub fn sort<R: KeyedRecord>(list: &mut Vec<R>, key: R::Key) {
        Self::compact(list, key);

        if R::kind_of(key) == FieldKind::Flag {
            let flag = |record: &R| {
                record
                    .field(key)
                    .and_then(|field| field.as_flag())
                    .unwrap_or(false)
            };
            insertion_sort_by(list, |a, b| {
                let (a, b) = (flag(a), flag(b));
                a == b || a
            });
            return;
        }

        list.sort_by(|a, b| match (a.field(key), b.field(key)) {
            (Some(a), Some(b)) => a.natural_cmp(&b),
            _ => Ordering::Equal,
        });
    }

    /// Resolve each POI's category
    /// DOCUMENTATION: Inner join on `poi.poi_category == category.object_id`.
    /// POIs without a matching category are dropped, the first matching
    /// category wins. No-op when either list is empty.
    pub fn join_categories(pois: &mut Vec<Poi>, categories: &[PoiCategory]) {
        if pois.is_empty() || categories.is_empty() {
            return;
        }
        let before = pois.len();
        pois.retain_mut(|poi| {
            let matched = poi.poi_category.as_deref().and_then(|category_id| {
                categories
                    .iter()
                    .find(|category| category.object_id.as_deref() == Some(category_id))
            });
            match matched {
                Some(category) => {
                    poi.poi_category_object = Some(category.clone());
                    true
                }
                None => false,
            }
        });
        if pois.len() < before {
            log::debug!(
                "Dropped {} POIs without a known category",
                before - pois.len()
            );
        }
    }
}

/// Insertion sort moving each element left while `before(element, predecessor)` holds
fn insertion_sort_by<T, F>(list: &mut [T], mut before: F)
where
    F: FnMut(&T, &T) -> bool,
{
    for sorted_end in 1..list.len() {
        let mut i = sorted_end;
        while i > 0 && before(&list[i], &list[i - 1]) {
            list.swap(i, i - 1);
            i -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CategoryFilterField, DetailType, GeoPoint, PoiCategoryKey, PoiKey, RouteType,
    };
    use chrono::{TimeZone, Utc};

    fn poi(id: Option<&str>, name: Option<&str>, category: Option<&str>) -> Poi {
        Poi {
            object_id: id.map(str::to_string),
            name: name.map(str::to_string),
            poi_category: category.map(str::to_string),
            ..Default::default()
        }
    }

    fn category(id: Option<&str>, position: Option<i32>, show: bool) -> PoiCategory {
        PoiCategory {
            object_id: id.map(str::to_string),
            position,
            show_category: show,
            ..Default::default()
        }
    }

    fn ids<R: KeyedRecord>(list: &[R]) -> Vec<&str> {
        list.iter().filter_map(|r| r.object_id()).collect()
    }

    fn fixture_categories() -> Vec<PoiCategory> {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/POICategory.json");
        let json = std::fs::read_to_string(path).unwrap();
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_compact_requires_object_id_and_field() {
        let mut pois = vec![
            poi(Some("a"), Some("Rathaus"), None),
            poi(None, Some("Museum"), None),
            poi(Some("c"), None, None),
        ];
        CollectionService::compact(&mut pois, PoiKey::Name);
        assert_eq!(ids(&pois), vec!["a"]);
    }

    #[test]
    fn test_compact_by_every_key_keeps_complete_records() {
        let complete = Poi {
            object_id: Some("full".into()),
            created_at: Some(Utc.with_ymd_and_hms(2022, 3, 2, 10, 0, 0).unwrap()),
            updated_at: Some(Utc.with_ymd_and_hms(2022, 3, 3, 10, 0, 0).unwrap()),
            name: Some("Rathaus".into()),
            address: Some("Rathausplatz 1".into()),
            zip: Some("42651".into()),
            city: Some("Solingen".into()),
            district: Some("Mitte".into()),
            poi_category: Some("civic".into()),
            route_type: Some(RouteType::Walk),
            geopoint: Some(GeoPoint::new(51.17, 7.08)),
            details: Some(vec![]),
            images: Some(vec![]),
            poi_category_object: Some(category(Some("civic"), Some(1), true)),
            start_geopoint: Some(GeoPoint::new(51.16, 7.07)),
            ..Default::default()
        };
        for key in PoiKey::ALL {
            let mut pois = vec![complete.clone(), poi(None, None, None)];
            CollectionService::compact(&mut pois, key);
            assert_eq!(ids(&pois), vec!["full"], "compact by {:?}", key);
        }
    }

    #[test]
    fn test_compact_by_flag_ignores_flag_value() {
        let mut categories = vec![
            category(Some("a"), None, false),
            category(Some("b"), None, true),
            category(None, None, true),
        ];
        CollectionService::compact(&mut categories, PoiCategoryKey::ShowFilter);
        assert_eq!(ids(&categories), vec!["a", "b"]);
    }

    #[test]
    fn test_filter_by_value() {
        let mut pois = vec![
            poi(Some("a"), Some("Rathaus"), None),
            poi(Some("b"), Some("Museum"), None),
            poi(Some("c"), Some("Rathaus"), None),
        ];
        CollectionService::filter(&mut pois, PoiKey::Name, &"Rathaus".into());
        assert_eq!(ids(&pois), vec!["a", "c"]);
    }

    #[test]
    fn test_filter_with_wrong_kind_clears_for_every_key() {
        for key in PoiKey::ALL {
            let mut pois = vec![poi(Some("a"), Some("Rathaus"), None)];
            let wrong = match Poi::kind_of(key) {
                FieldKind::Integer => FieldValue::from("x"),
                _ => FieldValue::from(42),
            };
            CollectionService::filter(&mut pois, key, &wrong);
            assert!(pois.is_empty(), "filter by {:?}", key);
        }
        for key in PoiCategoryKey::ALL {
            let mut categories = vec![category(Some("a"), Some(1), true)];
            let wrong = match PoiCategory::kind_of(key) {
                FieldKind::Flag => FieldValue::from("true"),
                _ => FieldValue::from(true),
            };
            CollectionService::filter(&mut categories, key, &wrong);
            assert!(categories.is_empty(), "filter by {:?}", key);
        }
    }

    #[test]
    fn test_filter_empty_list_is_noop() {
        let mut pois: Vec<Poi> = Vec::new();
        CollectionService::filter(&mut pois, PoiKey::Name, &FieldValue::from(1));
        assert!(pois.is_empty());
    }

    #[test]
    fn test_filter_any_of() {
        let mut categories = vec![
            category(Some("a"), Some(1), true),
            category(Some("b"), Some(2), true),
            category(Some("c"), Some(3), true),
        ];
        CollectionService::filter_any_of(
            &mut categories,
            PoiCategoryKey::Position,
            &[FieldValue::from(1), FieldValue::from(3)],
        );
        assert_eq!(ids(&categories), vec!["a", "c"]);

        CollectionService::filter_any_of(&mut categories, PoiCategoryKey::Position, &[]);
        assert_eq!(categories.len(), 2);

        CollectionService::filter_any_of(
            &mut categories,
            PoiCategoryKey::Position,
            &[FieldValue::from(1), FieldValue::from("3")],
        );
        assert!(categories.is_empty());
    }

    #[test]
    fn test_contains() {
        let pois = vec![
            poi(Some("a"), Some("Rathaus"), Some("civic")),
            poi(Some("b"), None, Some("museum")),
        ];
        assert!(CollectionService::contains(&pois, PoiKey::PoiCategory, &"museum".into()));
        assert!(!CollectionService::contains(&pois, PoiKey::PoiCategory, &"park".into()));
        assert!(!CollectionService::contains(&pois, PoiKey::PoiCategory, &FieldValue::from(true)));
        assert!(!CollectionService::contains::<Poi>(&[], PoiKey::Name, &"Rathaus".into()));
    }

    #[test]
    fn test_contains_every_field_of_fixture_record() {
        let categories = fixture_categories();
        let sample = &categories[1];
        for key in PoiCategoryKey::ALL {
            let value = match (key, sample.field(key)) {
                (PoiCategoryKey::Position, Some(_)) => sample.position.map(FieldValue::from),
                (PoiCategoryKey::ShowCategory, _) => Some(FieldValue::from(sample.show_category)),
                (PoiCategoryKey::Name, _) => sample.name.clone().map(FieldValue::from),
                (PoiCategoryKey::ObjectId, _) => sample.object_id.clone().map(FieldValue::from),
                (PoiCategoryKey::SourceId, _) => sample.source_id.clone().map(FieldValue::from),
                (PoiCategoryKey::FilterFields, _) => {
                    sample.filter_fields.clone().map(FieldValue::from)
                }
                _ => None,
            };
            if let Some(value) = value {
                assert!(
                    CollectionService::contains(&categories, key, &value),
                    "contains by {:?}",
                    key
                );
            }
        }
    }

    #[test]
    fn test_sort_by_text_is_non_decreasing_after_compact() {
        let mut pois = vec![
            poi(Some("c"), Some("Zoo"), None),
            poi(Some("a"), Some("Altstadt"), None),
            poi(None, Some("Bad"), None),
            poi(Some("b"), None, None),
            poi(Some("d"), Some("Museum"), None),
        ];
        CollectionService::sort(&mut pois, PoiKey::Name);
        assert_eq!(ids(&pois), vec!["a", "d", "c"]);
    }

    #[test]
    fn test_sort_by_filter_fields_uses_element_count() {
        let field = || Some(CategoryFilterField::default());
        let mut categories = vec![
            PoiCategory {
                filter_fields: Some(vec![field(), field(), field()]),
                ..category(Some("three"), None, false)
            },
            PoiCategory {
                filter_fields: Some(vec![]),
                ..category(Some("none"), None, false)
            },
            PoiCategory {
                filter_fields: Some(vec![field()]),
                ..category(Some("one"), None, false)
            },
        ];
        CollectionService::sort(&mut categories, PoiCategoryKey::FilterFields);
        assert_eq!(ids(&categories), vec!["none", "one", "three"]);
    }

    #[test]
    fn test_sort_by_flag_quasi_order() {
        let mut categories = vec![
            category(Some("A"), None, true),
            category(Some("B"), None, false),
            category(Some("C"), None, true),
            category(Some("D"), None, false),
        ];
        CollectionService::sort(&mut categories, PoiCategoryKey::ShowCategory);
        assert_eq!(ids(&categories), vec!["C", "A", "D", "B"]);
    }

    #[test]
    fn test_sort_fixture_by_position() {
        let mut categories = fixture_categories();
        assert_eq!(categories.len(), 4);
        CollectionService::sort(&mut categories, PoiCategoryKey::Position);
        assert_eq!(ids(&categories), vec!["sport28", "sport27", "sport26"]);
    }

    #[test]
    fn test_sort_fixture_by_show_category() {
        let mut categories = fixture_categories();
        CollectionService::sort(&mut categories, PoiCategoryKey::ShowCategory);
        assert_eq!(ids(&categories), vec!["sport29", "sport27", "sport28", "sport26"]);
    }

    #[test]
    fn test_join_categories() {
        let categories = vec![
            category(Some("sport26"), Some(1), true),
            PoiCategory {
                name: Some("duplicate".into()),
                ..category(Some("sport26"), Some(2), true)
            },
            category(None, Some(3), true),
        ];
        let mut pois = vec![
            poi(Some("a"), None, Some("sport26")),
            poi(Some("b"), None, Some("unknown")),
            poi(Some("c"), None, None),
        ];
        CollectionService::join_categories(&mut pois, &categories);

        assert_eq!(ids(&pois), vec!["a"]);
        let joined = pois[0].poi_category_object.as_ref().unwrap();
        assert_eq!(joined.object_id.as_deref(), Some("sport26"));
        assert_eq!(joined.position, Some(1));
    }

    #[test]
    fn test_join_with_no_categories_is_noop() {
        let mut pois = vec![poi(Some("a"), None, Some("x"))];
        CollectionService::join_categories(&mut pois, &[]);
        assert_eq!(pois.len(), 1);
        assert!(pois[0].poi_category_object.is_none());
    }

    #[test]
    fn test_filter_by_details() {
        let details = vec![Some(crate::models::Detail {
            detail_type: Some(DetailType::Text),
            title: Some("Adresse".into()),
            ..Default::default()
        })];
        let mut pois = vec![
            Poi {
                details: Some(details.clone()),
                ..poi(Some("a"), None, None)
            },
            poi(Some("b"), None, None),
        ];
        CollectionService::filter(&mut pois, PoiKey::Details, &details.into());
        assert_eq!(ids(&pois), vec!["a"]);
    }
}
