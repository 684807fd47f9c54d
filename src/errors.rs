// src/errors.rs
// DOCUMENTATION: Transport and domain error types
// PURPOSE: Centralized error handling for the map data-access layer

use thiserror::Error;

/// Transport-level failures reported by a network collaborator
/// DOCUMENTATION: Every `NetworkService` implementation speaks this taxonomy.
/// The query facade translates each variant 1:1 into a `MapError`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("invalid request")]
    InvalidRequest,

    #[error("invalid response")]
    InvalidResponse,

    #[error("data loading failed with status code {status_code}")]
    DataLoading { status_code: u16, data: Vec<u8> },

    #[error("JSON decoding failed: {0}")]
    JsonDecoding(String),

    #[error("internet connection failure")]
    InternetConnection,
}

/// Domain error types of the map module
/// DOCUMENTATION: Flat enumeration, no nested cause chains.
/// An error value always means a real transport or decoding problem; empty
/// results from nonsensical queries are successes, not errors.
#[derive(Error, Debug, Clone)]
pub enum MapError {
    #[error("There is a network problem: invalid request!")]
    InvalidRequest,

    #[error("There is a network problem: invalid response!")]
    InvalidResponse,

    #[error("There is a network problem: data loading failed with status code {status_code}: {} bytes", body.len())]
    DataLoading { status_code: u16, body: Vec<u8> },

    #[error("There is a network problem: JSON decoding: {0}")]
    JsonDecoding(String),

    #[error("There is a network problem: internet connection failure!")]
    InternetConnection,

    #[error("There is an unspecified network problem!")]
    Network,

    #[error("Error fetching POIs!")]
    PoiFetch,

    #[error("Error fetching POI categories!")]
    PoiCategoryFetch,

    #[error("Error fetching data: {0}")]
    ImageFetch(String),

    #[error("Error locating user: {0}")]
    UserLocation(String),

    #[error("Error fetching POI search results!")]
    SearchResultsFetch,
}

/// Translate transport failures into domain failures
/// DOCUMENTATION: 1:1 mapping, nothing is swallowed
impl From<NetworkError> for MapError {
    fn from(err: NetworkError) -> Self {
        match err {
            NetworkError::InvalidRequest => MapError::InvalidRequest,
            NetworkError::InvalidResponse => MapError::InvalidResponse,
            NetworkError::DataLoading { status_code, data } => MapError::DataLoading {
                status_code,
                body: data,
            },
            NetworkError::JsonDecoding(message) => MapError::JsonDecoding(message),
            NetworkError::InternetConnection => MapError::InternetConnection,
        }
    }
}

/// Decoding and location errors compare equal regardless of their message
impl PartialEq for MapError {
    fn eq(&self, other: &Self) -> bool {
        use MapError::*;
        match (self, other) {
            (InvalidRequest, InvalidRequest)
            | (InvalidResponse, InvalidResponse)
            | (JsonDecoding(_), JsonDecoding(_))
            | (InternetConnection, InternetConnection)
            | (Network, Network)
            | (PoiFetch, PoiFetch)
            | (PoiCategoryFetch, PoiCategoryFetch)
            | (UserLocation(_), UserLocation(_))
            | (SearchResultsFetch, SearchResultsFetch) => true,
            (
                DataLoading {
                    status_code: lhs_code,
                    body: lhs_body,
                },
                DataLoading {
                    status_code: rhs_code,
                    body: rhs_body,
                },
            ) => lhs_code == rhs_code && lhs_body == rhs_body,
            (ImageFetch(lhs), ImageFetch(rhs)) => lhs == rhs,
            _ => false,
        }
    }
}

/// Failures of the persisted preference store
#[derive(Error, Debug)]
pub enum PreferenceError {
    #[error("Preference file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Preference file is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failures while building the map context
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Preferences(#[from] PreferenceError),
}

impl From<serde_json::Error> for NetworkError {
    fn from(err: serde_json::Error) -> Self {
        NetworkError::JsonDecoding(err.to_string())
    }
}
