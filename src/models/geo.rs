// src/models/geo.rs
// DOCUMENTATION: Geographic point in the backend's wire shape
// PURPOSE: Location of a POI and route start points

use geo_types::Point;
use serde::{Deserialize, Serialize};

/// Type tag the backend attaches to geo points
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
enum GeoPointTag {
    #[default]
    GeoPoint,
}

/// Latitude/longitude pair
/// DOCUMENTATION: Serialized as `{"__type": "GeoPoint", "latitude": .., "longitude": ..}`.
/// Converts to `geo_types::Point` with x = longitude and y = latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "__type", default)]
    tag: GeoPointTag,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            tag: GeoPointTag::GeoPoint,
            latitude,
            longitude,
        }
    }

    /// Parse a point from decimal strings
    /// Returns `None` when either part is missing or not a number.
    pub fn from_strings(latitude: Option<&str>, longitude: Option<&str>) -> Option<Self> {
        let latitude = latitude?.trim().parse::<f64>().ok()?;
        let longitude = longitude?.trim().parse::<f64>().ok()?;
        Some(Self::new(latitude, longitude))
    }
}

impl From<GeoPoint> for Point<f64> {
    fn from(point: GeoPoint) -> Self {
        Point::new(point.longitude, point.latitude)
    }
}

impl From<Point<f64>> for GeoPoint {
    fn from(point: Point<f64>) -> Self {
        GeoPoint::new(point.y(), point.x())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let point: GeoPoint =
            serde_json::from_str(r#"{"__type":"GeoPoint","latitude":51.17,"longitude":7.08}"#)
                .unwrap();
        assert_eq!(point, GeoPoint::new(51.17, 7.08));

        let json = serde_json::to_value(point).unwrap();
        assert_eq!(json["__type"], "GeoPoint");
        assert_eq!(json["latitude"], 51.17);
    }

    #[test]
    fn test_missing_type_tag_is_accepted() {
        let point: GeoPoint = serde_json::from_str(r#"{"latitude":1.0,"longitude":2.0}"#).unwrap();
        assert_eq!(point.longitude, 2.0);
    }

    #[test]
    fn test_geo_types_conversion() {
        let point: Point<f64> = GeoPoint::new(51.17, 7.08).into();
        assert_eq!(point.x(), 7.08);
        assert_eq!(point.y(), 51.17);
        assert_eq!(GeoPoint::from(point), GeoPoint::new(51.17, 7.08));
    }

    #[test]
    fn test_from_strings() {
        assert_eq!(
            GeoPoint::from_strings(Some("51.17"), Some(" 7.08")),
            Some(GeoPoint::new(51.17, 7.08))
        );
        assert!(GeoPoint::from_strings(Some("north"), Some("7.08")).is_none());
        assert!(GeoPoint::from_strings(None, Some("7.08")).is_none());
    }
}
