// src/models/poi.rs
// DOCUMENTATION: Core data structures for points of interest
// PURPOSE: Wire models for POIs, their details, images and search/filter envelopes

use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::ops::Range;

use super::asset::asset_url;
use super::keyed::{FieldKind, FieldRef, KeyedRecord};
use super::lenient::bool_from_any;
use super::{GeoPoint, PoiCategory, PoiDetailGroup};

/// Backend class name of POI records
pub const POI_CLASS_NAME: &str = "POI";

/// A mappable place record
/// DOCUMENTATION: Decoded from backend responses. `poi_category_object` is
/// never read from the wire; it is filled by the category join and, once set,
/// carries the category whose `object_id` equals `poi_category`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poi {
    /// Server-assigned identifier
    pub object_id: Option<String>,

    /// When the record was created (set by server)
    pub created_at: Option<DateTime<Utc>>,

    /// When the record was last modified (set by server)
    pub updated_at: Option<DateTime<Utc>>,

    /// Name / title of the POI
    pub name: Option<String>,

    /// Street name and number
    pub address: Option<String>,

    /// Postal code
    pub zip: Option<String>,

    /// City name
    pub city: Option<String>,

    /// District name
    pub district: Option<String>,

    /// `object_id` of the owning `PoiCategory`
    pub poi_category: Option<String>,

    /// Show user generated content for this POI
    #[serde(default, deserialize_with = "bool_from_any")]
    pub show_user_generated_content: bool,

    /// Offer a route to this POI
    #[serde(default, deserialize_with = "bool_from_any")]
    pub show_route_to: bool,

    /// Preferred means of travel for the route
    pub route_type: Option<RouteType>,

    /// Location of the POI
    pub geopoint: Option<GeoPoint>,

    /// Labeled facts about the POI
    pub details: Option<Vec<Option<Detail>>>,

    /// Associated images
    pub images: Option<Vec<Option<Image>>>,

    /// Resolved category, filled by the category join
    #[serde(skip)]
    pub poi_category_object: Option<PoiCategory>,

    /// Where a route to this POI starts
    pub start_geopoint: Option<GeoPoint>,
}

/// Field keys of `Poi`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoiKey {
    ObjectId,
    CreatedAt,
    UpdatedAt,
    Name,
    Address,
    Zip,
    City,
    District,
    PoiCategory,
    ShowUserGeneratedContent,
    ShowRouteTo,
    RouteType,
    Geopoint,
    Details,
    Images,
    PoiCategoryObject,
    StartGeopoint,
}

impl PoiKey {
    pub const ALL: [PoiKey; 17] = [
        PoiKey::ObjectId,
        PoiKey::CreatedAt,
        PoiKey::UpdatedAt,
        PoiKey::Name,
        PoiKey::Address,
        PoiKey::Zip,
        PoiKey::City,
        PoiKey::District,
        PoiKey::PoiCategory,
        PoiKey::ShowUserGeneratedContent,
        PoiKey::ShowRouteTo,
        PoiKey::RouteType,
        PoiKey::Geopoint,
        PoiKey::Details,
        PoiKey::Images,
        PoiKey::PoiCategoryObject,
        PoiKey::StartGeopoint,
    ];
}

impl KeyedRecord for Poi {
    type Key = PoiKey;

    fn object_id(&self) -> Option<&str> {
        self.object_id.as_deref()
    }

    fn field(&self, key: PoiKey) -> Option<FieldRef<'_>> {
        match key {
            PoiKey::ObjectId => self.object_id.as_deref().map(FieldRef::Text),
            PoiKey::CreatedAt => self.created_at.as_ref().map(FieldRef::Date),
            PoiKey::UpdatedAt => self.updated_at.as_ref().map(FieldRef::Date),
            PoiKey::Name => self.name.as_deref().map(FieldRef::Text),
            PoiKey::Address => self.address.as_deref().map(FieldRef::Text),
            PoiKey::Zip => self.zip.as_deref().map(FieldRef::Text),
            PoiKey::City => self.city.as_deref().map(FieldRef::Text),
            PoiKey::District => self.district.as_deref().map(FieldRef::Text),
            PoiKey::PoiCategory => self.poi_category.as_deref().map(FieldRef::Text),
            PoiKey::ShowUserGeneratedContent => Some(FieldRef::Flag(self.show_user_generated_content)),
            PoiKey::ShowRouteTo => Some(FieldRef::Flag(self.show_route_to)),
            PoiKey::RouteType => self.route_type.map(FieldRef::RouteType),
            PoiKey::Geopoint => self.geopoint.as_ref().map(FieldRef::GeoPoint),
            PoiKey::Details => self.details.as_deref().map(FieldRef::Details),
            PoiKey::Images => self.images.as_deref().map(FieldRef::Images),
            PoiKey::PoiCategoryObject => self.poi_category_object.as_ref().map(FieldRef::Category),
            PoiKey::StartGeopoint => self.start_geopoint.as_ref().map(FieldRef::GeoPoint),
        }
    }

    fn kind_of(key: PoiKey) -> FieldKind {
        match key {
            PoiKey::CreatedAt | PoiKey::UpdatedAt => FieldKind::Date,
            PoiKey::ShowUserGeneratedContent | PoiKey::ShowRouteTo => FieldKind::Flag,
            PoiKey::RouteType => FieldKind::RouteType,
            PoiKey::Geopoint | PoiKey::StartGeopoint => FieldKind::GeoPoint,
            PoiKey::Details => FieldKind::Details,
            PoiKey::Images => FieldKind::Images,
            PoiKey::PoiCategoryObject => FieldKind::Category,
            PoiKey::ObjectId
            | PoiKey::Name
            | PoiKey::Address
            | PoiKey::Zip
            | PoiKey::City
            | PoiKey::District
            | PoiKey::PoiCategory => FieldKind::Text,
        }
    }
}

impl Poi {
    /// The district as one of the known districts, if it is one
    pub fn known_district(&self) -> Option<District> {
        self.district.as_deref().and_then(District::from_name)
    }

    /// Details collapsed into display groups
    pub fn detail_groups(&self) -> Vec<PoiDetailGroup> {
        self.details
            .as_deref()
            .map(PoiDetailGroup::group)
            .unwrap_or_default()
    }
}

/// Kind of a POI detail
/// DOCUMENTATION: Each kind owns a disjoint position range used for default ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailType {
    /// Plain text without extras
    Text,
    /// HTML formatted content
    Html,
    /// Phone number
    Tel,
    /// Link to external content
    Url,
    /// Email address
    Mail,
}

impl DetailType {
    pub const ALL: [DetailType; 5] = [
        DetailType::Text,
        DetailType::Html,
        DetailType::Tel,
        DetailType::Url,
        DetailType::Mail,
    ];

    /// Half-open position range reserved for this kind
    pub fn position_range(self) -> Range<i32> {
        match self {
            DetailType::Text => 100..200,
            DetailType::Html => 200..300,
            DetailType::Tel => 400..600,
            DetailType::Url => 600..700,
            DetailType::Mail => 700..800,
        }
    }
}

/// One labeled fact about a POI
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detail {
    #[serde(rename = "type")]
    pub detail_type: Option<DetailType>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub value: Option<String>,
    pub position: Option<i32>,
    pub icon_name: Option<String>,
    pub icon_path: Option<String>,
    pub icon_mimetype: Option<String>,
    pub symbol_name: Option<String>,
    pub symbol_path: Option<String>,
    pub symbol_mimetype: Option<String>,
    /// Links to `CategoryFilterField::field`
    pub filter_field: Option<String>,
}

impl Detail {
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

/// A single applied filter constraint
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DetailFilterField {
    pub field: Option<String>,
    pub value: Option<String>,
}

impl DetailFilterField {
    pub fn with(field: &str, value: &str) -> Self {
        Self {
            field: Some(field.to_string()),
            value: Some(value.to_string()),
        }
    }
}

/// Image attached to a POI
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub image_name: Option<String>,
    pub image_path: Option<String>,
    pub image_mimetype: Option<String>,
    /// Caption text
    pub text: Option<String>,
    pub relevance: Option<i32>,
    pub accessibility_hint: Option<String>,
}

impl Image {
    pub fn image_url(&self) -> Option<Url> {
        asset_url(
            self.image_path.as_deref(),
            self.image_name.as_deref(),
            self.image_mimetype.as_deref(),
        )
    }
}

/// Means of travel for a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteType {
    Car,
    Walk,
    Bicycle,
}

/// Known districts of the city
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum District {
    #[serde(rename = "Burg-Höhscheid")]
    BurgHoehscheid,
    #[serde(rename = "Gräfrath")]
    Graefrath,
    #[serde(rename = "Mitte")]
    Mitte,
    #[serde(rename = "Ohligs-Aufderhöhe-Merscheid")]
    OhligsAufderhoeheMerscheid,
    #[serde(rename = "Wald")]
    Wald,
}

impl District {
    pub fn name(self) -> &'static str {
        match self {
            District::BurgHoehscheid => "Burg-Höhscheid",
            District::Graefrath => "Gräfrath",
            District::Mitte => "Mitte",
            District::OhligsAufderhoeheMerscheid => "Ohligs-Aufderhöhe-Merscheid",
            District::Wald => "Wald",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [
            District::BurgHoehscheid,
            District::Graefrath,
            District::Mitte,
            District::OhligsAufderhoeheMerscheid,
            District::Wald,
        ]
        .into_iter()
        .find(|district| district.name() == name)
    }
}

/// One search hit wrapping an external-system id
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchResultItem {
    #[serde(rename = "_id")]
    pub id: Option<String>,
}

/// Filtered POIs with their total count
/// DOCUMENTATION: When both are present, `items.len() == count`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterResult {
    pub items: Option<Vec<Poi>>,
    pub count: Option<i64>,
}

impl FilterResult {
    /// `items` and `count` agree whenever both are present
    pub fn is_consistent(&self) -> bool {
        match (&self.items, self.count) {
            (Some(items), Some(count)) => i64::try_from(items.len()).map_or(false, |len| len == count),
            _ => true,
        }
    }

    /// The items, or an empty list when the server sent none
    pub fn into_items(self) -> Vec<Poi> {
        self.items.unwrap_or_default()
    }
}
