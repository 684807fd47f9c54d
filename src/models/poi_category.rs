// src/models/poi_category.rs
// DOCUMENTATION: Data structures for POI categories
// PURPOSE: Classification of POIs with icon/symbol presentation metadata and filter fields

use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::asset::asset_url;
use super::keyed::{FieldKind, FieldRef, KeyedRecord};
use super::lenient::bool_from_any;

/// Backend class name of POI category records
pub const POI_CATEGORY_CLASS_NAME: &str = "POICategory";

/// Classification / grouping of POIs
/// DOCUMENTATION: Decoded from backend responses. The image data caches are
/// filled locally after fetching the icon and symbol, never from the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoiCategory {
    /// Server-assigned identifier
    pub object_id: Option<String>,

    /// When the record was created (set by server)
    pub created_at: Option<DateTime<Utc>>,

    /// When the record was last modified (set by server)
    pub updated_at: Option<DateTime<Utc>>,

    /// Name / title of the category
    pub name: Option<String>,

    /// Title of the map showing this category
    pub map_title: Option<String>,

    pub status: Option<String>,

    /// Icon descriptor
    pub icon_name: Option<String>,
    pub icon_path: Option<String>,
    pub icon_mimetype: Option<String>,

    /// Downloaded icon
    #[serde(skip)]
    pub icon_image_data: Option<IconImageData>,

    /// Map pin symbol descriptor
    pub symbol_name: Option<String>,
    pub symbol_path: Option<String>,
    pub symbol_mimetype: Option<String>,

    /// Downloaded symbol
    #[serde(skip)]
    pub symbol_image_data: Option<SymbolImageData>,

    /// Sort key for presenting categories
    pub position: Option<i32>,

    /// Show this category
    #[serde(default, deserialize_with = "bool_from_any")]
    pub show_category: bool,

    pub category_version: Option<String>,

    pub metathema: Option<String>,
    pub metaquelle: Option<String>,
    pub metainfodatum: Option<String>,

    /// Show the filter of this category
    #[serde(default, deserialize_with = "bool_from_any")]
    pub show_filter: bool,

    /// Id of the category in the source system, used by the filter functions
    pub source_id: Option<String>,

    /// Thematic view used by default
    pub default_thematic_view: Option<String>,

    /// Filter fields offered by this category
    pub filter_fields: Option<Vec<Option<CategoryFilterField>>>,
}

/// Field keys of `PoiCategory`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoiCategoryKey {
    ObjectId,
    CreatedAt,
    UpdatedAt,
    Name,
    MapTitle,
    Status,
    IconName,
    IconPath,
    IconMimetype,
    IconImageData,
    SymbolName,
    SymbolPath,
    SymbolMimetype,
    SymbolImageData,
    Position,
    ShowCategory,
    CategoryVersion,
    Metathema,
    Metaquelle,
    Metainfodatum,
    ShowFilter,
    FilterFields,
    SourceId,
    DefaultThematicView,
}

impl PoiCategoryKey {
    pub const ALL: [PoiCategoryKey; 24] = [
        PoiCategoryKey::ObjectId,
        PoiCategoryKey::CreatedAt,
        PoiCategoryKey::UpdatedAt,
        PoiCategoryKey::Name,
        PoiCategoryKey::MapTitle,
        PoiCategoryKey::Status,
        PoiCategoryKey::IconName,
        PoiCategoryKey::IconPath,
        PoiCategoryKey::IconMimetype,
        PoiCategoryKey::IconImageData,
        PoiCategoryKey::SymbolName,
        PoiCategoryKey::SymbolPath,
        PoiCategoryKey::SymbolMimetype,
        PoiCategoryKey::SymbolImageData,
        PoiCategoryKey::Position,
        PoiCategoryKey::ShowCategory,
        PoiCategoryKey::CategoryVersion,
        PoiCategoryKey::Metathema,
        PoiCategoryKey::Metaquelle,
        PoiCategoryKey::Metainfodatum,
        PoiCategoryKey::ShowFilter,
        PoiCategoryKey::FilterFields,
        PoiCategoryKey::SourceId,
        PoiCategoryKey::DefaultThematicView,
    ];
}

impl KeyedRecord for PoiCategory {
    type Key = PoiCategoryKey;

    fn object_id(&self) -> Option<&str> {
        self.object_id.as_deref()
    }

    fn field(&self, key: PoiCategoryKey) -> Option<FieldRef<'_>> {
        use PoiCategoryKey as K;
        match key {
            K::ObjectId => self.object_id.as_deref().map(FieldRef::Text),
            K::CreatedAt => self.created_at.as_ref().map(FieldRef::Date),
            K::UpdatedAt => self.updated_at.as_ref().map(FieldRef::Date),
            K::Name => self.name.as_deref().map(FieldRef::Text),
            K::MapTitle => self.map_title.as_deref().map(FieldRef::Text),
            K::Status => self.status.as_deref().map(FieldRef::Text),
            K::IconName => self.icon_name.as_deref().map(FieldRef::Text),
            K::IconPath => self.icon_path.as_deref().map(FieldRef::Text),
            K::IconMimetype => self.icon_mimetype.as_deref().map(FieldRef::Text),
            K::IconImageData => self.icon_image_data.as_ref().map(FieldRef::IconImage),
            K::SymbolName => self.symbol_name.as_deref().map(FieldRef::Text),
            K::SymbolPath => self.symbol_path.as_deref().map(FieldRef::Text),
            K::SymbolMimetype => self.symbol_mimetype.as_deref().map(FieldRef::Text),
            K::SymbolImageData => self.symbol_image_data.as_ref().map(FieldRef::SymbolImage),
            K::Position => self.position.map(|p| FieldRef::Integer(i64::from(p))),
            K::ShowCategory => Some(FieldRef::Flag(self.show_category)),
            K::CategoryVersion => self.category_version.as_deref().map(FieldRef::Text),
            K::Metathema => self.metathema.as_deref().map(FieldRef::Text),
            K::Metaquelle => self.metaquelle.as_deref().map(FieldRef::Text),
            K::Metainfodatum => self.metainfodatum.as_deref().map(FieldRef::Text),
            K::ShowFilter => Some(FieldRef::Flag(self.show_filter)),
            K::FilterFields => self.filter_fields.as_deref().map(FieldRef::FilterFields),
            K::SourceId => self.source_id.as_deref().map(FieldRef::Text),
            K::DefaultThematicView => self.default_thematic_view.as_deref().map(FieldRef::Text),
        }
    }

    fn kind_of(key: PoiCategoryKey) -> FieldKind {
        use PoiCategoryKey as K;
        match key {
            K::CreatedAt | K::UpdatedAt => FieldKind::Date,
            K::IconImageData => FieldKind::IconImage,
            K::SymbolImageData => FieldKind::SymbolImage,
            K::Position => FieldKind::Integer,
            K::ShowCategory | K::ShowFilter => FieldKind::Flag,
            K::FilterFields => FieldKind::FilterFields,
            _ => FieldKind::Text,
        }
    }
}

impl PoiCategory {
    pub fn icon_url(&self) -> Option<Url> {
        asset_url(
            self.icon_path.as_deref(),
            self.icon_name.as_deref(),
            self.icon_mimetype.as_deref(),
        )
    }

    pub fn symbol_url(&self) -> Option<Url> {
        asset_url(
            self.symbol_path.as_deref(),
            self.symbol_name.as_deref(),
            self.symbol_mimetype.as_deref(),
        )
    }
}

/// Downloaded icon of a category
/// DOCUMENTATION: Ordered by byte length, missing data counts as empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct IconImageData {
    /// `object_id` of the owning category
    pub object_id: Option<String>,
    pub image_data: Option<Vec<u8>>,
    pub url: Option<Url>,
}

impl IconImageData {
    pub fn new(object_id: &str, image_data: Vec<u8>) -> Self {
        Self {
            object_id: Some(object_id.to_string()),
            image_data: Some(image_data),
            url: None,
        }
    }

    pub fn from_url(url: Url, image_data: Vec<u8>) -> Self {
        Self {
            object_id: None,
            image_data: Some(image_data),
            url: Some(url),
        }
    }

    pub fn byte_len(&self) -> usize {
        self.image_data.as_ref().map_or(0, Vec::len)
    }
}

/// Downloaded map pin symbol of a category
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SymbolImageData {
    /// `object_id` of the owning category
    pub object_id: Option<String>,
    pub image_data: Option<Vec<u8>>,
}

impl SymbolImageData {
    pub fn new(object_id: &str, image_data: Vec<u8>) -> Self {
        Self {
            object_id: Some(object_id.to_string()),
            image_data: Some(image_data),
        }
    }

    pub fn byte_len(&self) -> usize {
        self.image_data.as_ref().map_or(0, Vec::len)
    }
}

/// Names of the categories shown when nothing else is selected
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DefaultCategories {
    pub list: Vec<String>,
}

impl DefaultCategories {
    pub fn new(list: Vec<String>) -> Self {
        Self { list }
    }
}

impl Default for DefaultCategories {
    fn default() -> Self {
        Self::new(
            ["Einkaufen", "Baustelle", "Spielplatz", "Freifunk"]
                .iter()
                .map(|name| name.to_string())
                .collect(),
        )
    }
}

/// Filter field offered by a category
/// DOCUMENTATION: `field` matches `Detail::filter_field` of the category's POIs
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryFilterField {
    /// Human readable label
    pub title: Option<String>,
    pub field: Option<String>,
    /// Candidate values
    pub values: Option<Vec<Option<String>>>,
}

/// Ordered by `field`, a missing field sorts first
impl PartialOrd for CategoryFilterField {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CategoryFilterField {
    fn cmp(&self, other: &Self) -> Ordering {
        self.field
            .cmp(&other.field)
            .then_with(|| self.title.cmp(&other.title))
            .then_with(|| self.values.cmp(&other.values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_string_flags() {
        let category: PoiCategory = serde_json::from_value(json!({
            "objectId": "sport26",
            "name": "Sport",
            "position": 26,
            "showCategory": "true",
            "showFilter": "false",
            "sourceId": "src-26",
            "filterFields": [{"title": "Art", "field": "art", "values": ["Halle", null]}]
        }))
        .unwrap();
        assert!(category.show_category);
        assert!(!category.show_filter);
        assert_eq!(category.position, Some(26));
        assert_eq!(category.source_id.as_deref(), Some("src-26"));
        let fields = category.filter_fields.unwrap();
        assert_eq!(fields[0].as_ref().and_then(|f| f.field.as_deref()), Some("art"));
    }

    #[test]
    fn test_icon_and_symbol_url() {
        let category = PoiCategory {
            icon_name: Some("sport".into()),
            icon_path: Some("https://cdn.example.org/icons".into()),
            icon_mimetype: Some(".png".into()),
            symbol_name: Some("sport".into()),
            symbol_path: Some("https://cdn.example.org/symbols".into()),
            symbol_mimetype: Some("png".into()),
            ..Default::default()
        };
        assert_eq!(
            category.icon_url().map(|u| u.to_string()),
            Some("https://cdn.example.org/icons/sport.png".to_string())
        );
        assert!(category.symbol_url().is_none());
    }

    #[test]
    fn test_filter_field_ordering() {
        let unnamed = CategoryFilterField::default();
        let art = CategoryFilterField {
            field: Some("art".into()),
            ..Default::default()
        };
        let zone = CategoryFilterField {
            field: Some("zone".into()),
            ..Default::default()
        };
        let mut fields = vec![zone.clone(), art.clone(), unnamed.clone()];
        fields.sort();
        assert_eq!(fields, vec![unnamed, art, zone]);
    }

    #[test]
    fn test_image_data_byte_len() {
        assert_eq!(IconImageData::new("a", vec![1, 2, 3]).byte_len(), 3);
        assert_eq!(IconImageData::default().byte_len(), 0);
        assert_eq!(SymbolImageData::new("a", vec![1]).byte_len(), 1);
    }

    #[test]
    fn test_default_categories() {
        assert_eq!(DefaultCategories::default().list.len(), 4);
    }
}
