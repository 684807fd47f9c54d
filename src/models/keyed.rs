// src/models/keyed.rs
// DOCUMENTATION: Field-key addressing for POIs and POI categories
// PURPOSE: Closed set of field selectors with typed values for generic collection operations

use chrono::{DateTime, Utc};
use std::cmp::Ordering;

use super::{
    CategoryFilterField, Detail, GeoPoint, IconImageData, Image, PoiCategory, RouteType,
    SymbolImageData,
};

/// Value type carried by a field
/// DOCUMENTATION: Every field key declares exactly one kind. A caller value of
/// a different kind never matches anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    Integer,
    Flag,
    RouteType,
    GeoPoint,
    Details,
    Images,
    Category,
    FilterFields,
    IconImage,
    SymbolImage,
}

/// Owned value supplied by callers to filter or look up records
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Date(DateTime<Utc>),
    Integer(i64),
    Flag(bool),
    RouteType(RouteType),
    GeoPoint(GeoPoint),
    Details(Vec<Option<Detail>>),
    Images(Vec<Option<Image>>),
    Category(Box<PoiCategory>),
    FilterFields(Vec<Option<CategoryFilterField>>),
    IconImage(IconImageData),
    SymbolImage(SymbolImageData),
}

/// Borrowed view of a field stored in a record
#[derive(Debug, Clone, Copy)]
pub enum FieldRef<'a> {
    Text(&'a str),
    Date(&'a DateTime<Utc>),
    Integer(i64),
    Flag(bool),
    RouteType(RouteType),
    GeoPoint(&'a GeoPoint),
    Details(&'a [Option<Detail>]),
    Images(&'a [Option<Image>]),
    Category(&'a PoiCategory),
    FilterFields(&'a [Option<CategoryFilterField>]),
    IconImage(&'a IconImageData),
    SymbolImage(&'a SymbolImageData),
}

/// A record whose public fields are addressable by a closed key enumeration
/// DOCUMENTATION: Implemented by `Poi` (keyed by `PoiKey`) and `PoiCategory`
/// (keyed by `PoiCategoryKey`).
pub trait KeyedRecord {
    type Key: Copy + std::fmt::Debug;

    /// Server-assigned identity, present once persisted
    fn object_id(&self) -> Option<&str>;

    /// Current value of the field, `None` when absent
    fn field(&self, key: Self::Key) -> Option<FieldRef<'_>>;

    /// Declared kind of the field behind `key`
    fn kind_of(key: Self::Key) -> FieldKind;
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Date(_) => FieldKind::Date,
            FieldValue::Integer(_) => FieldKind::Integer,
            FieldValue::Flag(_) => FieldKind::Flag,
            FieldValue::RouteType(_) => FieldKind::RouteType,
            FieldValue::GeoPoint(_) => FieldKind::GeoPoint,
            FieldValue::Details(_) => FieldKind::Details,
            FieldValue::Images(_) => FieldKind::Images,
            FieldValue::Category(_) => FieldKind::Category,
            FieldValue::FilterFields(_) => FieldKind::FilterFields,
            FieldValue::IconImage(_) => FieldKind::IconImage,
            FieldValue::SymbolImage(_) => FieldKind::SymbolImage,
        }
    }
}

impl<'a> FieldRef<'a> {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldRef::Text(_) => FieldKind::Text,
            FieldRef::Date(_) => FieldKind::Date,
            FieldRef::Integer(_) => FieldKind::Integer,
            FieldRef::Flag(_) => FieldKind::Flag,
            FieldRef::RouteType(_) => FieldKind::RouteType,
            FieldRef::GeoPoint(_) => FieldKind::GeoPoint,
            FieldRef::Details(_) => FieldKind::Details,
            FieldRef::Images(_) => FieldKind::Images,
            FieldRef::Category(_) => FieldKind::Category,
            FieldRef::FilterFields(_) => FieldKind::FilterFields,
            FieldRef::IconImage(_) => FieldKind::IconImage,
            FieldRef::SymbolImage(_) => FieldKind::SymbolImage,
        }
    }

    /// Flag value, `None` for any other kind
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FieldRef::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Ascending natural order between two values of the same kind
    /// DOCUMENTATION: strings lexicographic, dates chronological, integers
    /// numeric, route types in declaration order, geo points by latitude then
    /// longitude, list-valued fields by element count, categories by
    /// `objectId`, image data by byte length. Flags order `true` first.
    /// Values of different kinds order by kind so the relation stays total.
    pub fn natural_cmp(&self, other: &FieldRef<'_>) -> Ordering {
        match (self, other) {
            (FieldRef::Text(a), FieldRef::Text(b)) => a.cmp(b),
            (FieldRef::Date(a), FieldRef::Date(b)) => a.cmp(b),
            (FieldRef::Integer(a), FieldRef::Integer(b)) => a.cmp(b),
            (FieldRef::Flag(a), FieldRef::Flag(b)) => b.cmp(a),
            (FieldRef::RouteType(a), FieldRef::RouteType(b)) => a.cmp(b),
            (FieldRef::GeoPoint(a), FieldRef::GeoPoint(b)) => a
                .latitude
                .total_cmp(&b.latitude)
                .then(a.longitude.total_cmp(&b.longitude)),
            (FieldRef::Details(a), FieldRef::Details(b)) => a.len().cmp(&b.len()),
            (FieldRef::Images(a), FieldRef::Images(b)) => a.len().cmp(&b.len()),
            (FieldRef::FilterFields(a), FieldRef::FilterFields(b)) => a.len().cmp(&b.len()),
            (FieldRef::Category(a), FieldRef::Category(b)) => a.object_id.cmp(&b.object_id),
            (FieldRef::IconImage(a), FieldRef::IconImage(b)) => a.byte_len().cmp(&b.byte_len()),
            (FieldRef::SymbolImage(a), FieldRef::SymbolImage(b)) => {
                a.byte_len().cmp(&b.byte_len())
            }
            _ => (self.kind() as u8).cmp(&(other.kind() as u8)),
        }
    }
}

impl PartialEq<FieldValue> for FieldRef<'_> {
    fn eq(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldRef::Text(a), FieldValue::Text(b)) => *a == b.as_str(),
            (FieldRef::Date(a), FieldValue::Date(b)) => *a == b,
            (FieldRef::Integer(a), FieldValue::Integer(b)) => a == b,
            (FieldRef::Flag(a), FieldValue::Flag(b)) => a == b,
            (FieldRef::RouteType(a), FieldValue::RouteType(b)) => a == b,
            (FieldRef::GeoPoint(a), FieldValue::GeoPoint(b)) => *a == b,
            (FieldRef::Details(a), FieldValue::Details(b)) => *a == b.as_slice(),
            (FieldRef::Images(a), FieldValue::Images(b)) => *a == b.as_slice(),
            (FieldRef::Category(a), FieldValue::Category(b)) => *a == &**b,
            (FieldRef::FilterFields(a), FieldValue::FilterFields(b)) => *a == b.as_slice(),
            (FieldRef::IconImage(a), FieldValue::IconImage(b)) => *a == b,
            (FieldRef::SymbolImage(a), FieldValue::SymbolImage(b)) => *a == b,
            _ => false,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Date(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<RouteType> for FieldValue {
    fn from(value: RouteType) -> Self {
        FieldValue::RouteType(value)
    }
}

impl From<GeoPoint> for FieldValue {
    fn from(value: GeoPoint) -> Self {
        FieldValue::GeoPoint(value)
    }
}

impl From<Vec<Option<Detail>>> for FieldValue {
    fn from(value: Vec<Option<Detail>>) -> Self {
        FieldValue::Details(value)
    }
}

impl From<Vec<Option<Image>>> for FieldValue {
    fn from(value: Vec<Option<Image>>) -> Self {
        FieldValue::Images(value)
    }
}

impl From<PoiCategory> for FieldValue {
    fn from(value: PoiCategory) -> Self {
        FieldValue::Category(Box::new(value))
    }
}

impl From<Vec<Option<CategoryFilterField>>> for FieldValue {
    fn from(value: Vec<Option<CategoryFilterField>>) -> Self {
        FieldValue::FilterFields(value)
    }
}

impl From<IconImageData> for FieldValue {
    fn from(value: IconImageData) -> Self {
        FieldValue::IconImage(value)
    }
}

impl From<SymbolImageData> for FieldValue {
    fn from(value: SymbolImageData) -> Self {
        FieldValue::SymbolImage(value)
    }
}
