// src/models/query.rs
// DOCUMENTATION: Parameter objects of the backend cloud functions
// PURPOSE: Exact wire shapes for poi-all, poi-nearby, poi-filter(ed) and elastic-search

use serde::{Deserialize, Serialize};

use super::{DetailFilterField, GeoPoint};

/// Cloud function names
pub const FUNCTION_POI_ALL: &str = "poi-all";
pub const FUNCTION_POI_FILTER: &str = "poi-filter";
pub const FUNCTION_POI_FILTERED: &str = "poi-filtered";
pub const FUNCTION_POI_NEARBY: &str = "poi-nearby";
pub const FUNCTION_ELASTIC_SEARCH: &str = "elastic-search";

/// Parameters of `poi-all`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheQueryParameter {
    /// Bypass the server-side cache
    pub force: bool,
}

/// Parameters of `poi-nearby`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NearbyQueryParameter {
    pub lat: f64,
    pub lon: f64,
    /// Search radius in meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,
    /// `objectId` of a category to restrict the search to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl NearbyQueryParameter {
    pub fn around(point: GeoPoint) -> Self {
        Self {
            lat: point.latitude,
            lon: point.longitude,
            ..Default::default()
        }
    }
}

/// Parameters of `poi-filter` and `poi-filtered`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterFieldQueryParameter {
    /// `sourceId` of the category
    pub category: String,
    pub filter: Vec<DetailFilterField>,
    pub force: bool,
}

impl FilterFieldQueryParameter {
    pub fn for_category(source_id: &str, filter: Vec<DetailFilterField>) -> Self {
        Self {
            category: source_id.to_string(),
            filter,
            force: false,
        }
    }
}

/// Parameters of `elastic-search`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElasticSearchQuery {
    pub index: String,
    pub query: String,
    /// Return bare search hits instead of POIs
    #[serde(default = "default_raw")]
    pub raw: bool,
}

fn default_raw() -> bool {
    true
}

impl ElasticSearchQuery {
    pub fn new(index: &str, query: &str) -> Self {
        Self {
            index: index.to_string(),
            query: query.to_string(),
            raw: true,
        }
    }

    pub fn with_raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nearby_skips_unset_options() {
        let mut parameter = NearbyQueryParameter::around(GeoPoint::new(51.17, 7.08));
        assert_eq!(
            serde_json::to_value(&parameter).unwrap(),
            json!({"lat": 51.17, "lon": 7.08})
        );

        parameter.distance = Some(1000);
        parameter.random = Some(true);
        parameter.limit = Some(10);
        parameter.category = Some("sport26".into());
        assert_eq!(
            serde_json::to_value(&parameter).unwrap(),
            json!({"lat": 51.17, "lon": 7.08, "distance": 1000, "random": true, "limit": 10, "category": "sport26"})
        );
    }

    #[test]
    fn test_filter_parameter_wire_shape() {
        let parameter = FilterFieldQueryParameter::for_category(
            "src-26",
            vec![DetailFilterField::with("art", "Halle")],
        );
        assert_eq!(
            serde_json::to_value(&parameter).unwrap(),
            json!({"category": "src-26", "filter": [{"field": "art", "value": "Halle"}], "force": false})
        );
    }

    #[test]
    fn test_elastic_search_raw_defaults_to_true() {
        let query: ElasticSearchQuery =
            serde_json::from_value(json!({"index": "new_poi", "query": "museum"})).unwrap();
        assert!(query.raw);
        assert_eq!(query, ElasticSearchQuery::new("new_poi", "museum"));
        assert!(!query.with_raw(false).raw);
    }

    #[test]
    fn test_cache_parameter() {
        assert_eq!(
            serde_json::to_value(CacheQueryParameter { force: true }).unwrap(),
            json!({"force": true})
        );
    }
}
