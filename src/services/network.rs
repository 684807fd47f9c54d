// src/services/network.rs
// DOCUMENTATION: Network collaborator seam and the resources it serves
// PURPOSE: Describe class queries, cloud functions, bundled fixtures and binary downloads

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::errors::NetworkError;
use crate::models::PoiCategory;

/// Request headers by name
pub type Headers = BTreeMap<String, String>;

/// Something the network collaborator can fetch
#[derive(Debug, Clone, PartialEq)]
pub enum RequestResource {
    /// `GET {base_url}/classes/{class_name}?{query}`
    Class {
        base_url: Url,
        class_name: String,
        query: BTreeMap<String, String>,
        headers: Headers,
    },
    /// `POST {base_url}/functions/{function_name}` with a JSON body
    Function {
        base_url: Url,
        function_name: String,
        parameters: serde_json::Value,
        headers: Headers,
    },
    /// Local JSON file used instead of the backend
    Bundle { dir: PathBuf, file_name: String },
    /// `GET {base_url}/{file_name}{mime_type}`
    ImageData {
        object_id: String,
        base_url: Url,
        file_name: String,
        mime_type: String,
    },
    /// `GET {url}`
    Url { url: Url },
}

impl RequestResource {
    pub fn class(base_url: &Url, class_name: &str, query: BTreeMap<String, String>, headers: Headers) -> Self {
        RequestResource::Class {
            base_url: base_url.clone(),
            class_name: class_name.to_string(),
            query,
            headers,
        }
    }

    /// Cloud function call with `parameters` serialized as the body
    pub fn function<P: Serialize>(
        base_url: &Url,
        function_name: &str,
        parameters: &P,
        headers: Headers,
    ) -> Result<Self, NetworkError> {
        let parameters = serde_json::to_value(parameters).map_err(|e| {
            log::error!("Cannot serialize parameters of {}: {}", function_name, e);
            NetworkError::InvalidRequest
        })?;
        Ok(RequestResource::Function {
            base_url: base_url.clone(),
            function_name: function_name.to_string(),
            parameters,
            headers,
        })
    }

    pub fn bundle(dir: impl Into<PathBuf>, file_name: &str) -> Self {
        RequestResource::Bundle {
            dir: dir.into(),
            file_name: file_name.to_string(),
        }
    }

    /// Download of a category icon
    /// Returns `None` when the category lacks an objectId, icon name, parseable path or mimetype.
    pub fn icon_image_data(category: &PoiCategory) -> Option<Self> {
        Self::image_data(
            category.object_id.as_deref(),
            category.icon_name.as_deref(),
            category.icon_path.as_deref(),
            category.icon_mimetype.as_deref(),
        )
    }

    /// Download of a category map symbol
    pub fn symbol_image_data(category: &PoiCategory) -> Option<Self> {
        Self::image_data(
            category.object_id.as_deref(),
            category.symbol_name.as_deref(),
            category.symbol_path.as_deref(),
            category.symbol_mimetype.as_deref(),
        )
    }

    fn image_data(
        object_id: Option<&str>,
        name: Option<&str>,
        path: Option<&str>,
        mime_type: Option<&str>,
    ) -> Option<Self> {
        let object_id = object_id.filter(|id| !id.is_empty())?;
        let name = name.filter(|n| !n.is_empty())?;
        let base_url = Url::parse(path?).ok()?;
        let mime_type = mime_type.filter(|m| !m.is_empty())?;
        Some(RequestResource::ImageData {
            object_id: object_id.to_string(),
            base_url,
            file_name: name.to_string(),
            mime_type: mime_type.to_string(),
        })
    }

    pub fn url(url: Url) -> Self {
        RequestResource::Url { url }
    }

    /// Headers to send along, `None` for resources without any
    pub fn headers(&self) -> Option<&Headers> {
        match self {
            RequestResource::Class { headers, .. } | RequestResource::Function { headers, .. } => {
                Some(headers)
            }
            _ => None,
        }
    }

    /// Remote location of the resource, `None` for bundled files
    pub fn target_url(&self) -> Result<Option<Url>, NetworkError> {
        let url = match self {
            RequestResource::Class {
                base_url,
                class_name,
                query,
                ..
            } => {
                let mut url = with_segments(base_url, &["classes", class_name.as_str()])?;
                if !query.is_empty() {
                    url.query_pairs_mut().extend_pairs(query.iter());
                }
                url
            }
            RequestResource::Function {
                base_url,
                function_name,
                ..
            } => with_segments(base_url, &["functions", function_name.as_str()])?,
            RequestResource::ImageData {
                base_url,
                file_name,
                mime_type,
                ..
            } => with_segments(base_url, &[format!("{}{}", file_name, mime_type).as_str()])?,
            RequestResource::Url { url } => url.clone(),
            RequestResource::Bundle { .. } => return Ok(None),
        };
        Ok(Some(url))
    }
}

fn with_segments(base_url: &Url, segments: &[&str]) -> Result<Url, NetworkError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| NetworkError::InvalidRequest)?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Transport for `RequestResource`s
/// DOCUMENTATION: Returns the raw response body; decoding is up to the caller
#[async_trait]
pub trait NetworkService: Send + Sync {
    async fn fetch(&self, resource: &RequestResource) -> Result<Vec<u8>, NetworkError>;
}

/// Body of a class query response
#[derive(Debug, Deserialize)]
pub struct ClassResponse<T> {
    pub results: Vec<T>,
}

/// Body of a cloud function response
#[derive(Debug, Deserialize)]
pub struct FunctionResponse<T> {
    pub result: T,
}

/// Decode the records of a class query
/// Bundled fixtures hold the bare list, the backend wraps it in `results`.
pub fn decode_class<T: DeserializeOwned>(bytes: &[u8], bundled: bool) -> Result<Vec<T>, NetworkError> {
    if bundled {
        Ok(serde_json::from_slice(bytes)?)
    } else {
        let response: ClassResponse<T> = serde_json::from_slice(bytes)?;
        Ok(response.results)
    }
}

/// Decode the result of a cloud function
/// Bundled fixtures hold the bare result, the backend wraps it in `result`.
pub fn decode_function<T: DeserializeOwned>(bytes: &[u8], bundled: bool) -> Result<T, NetworkError> {
    if bundled {
        Ok(serde_json::from_slice(bytes)?)
    } else {
        let response: FunctionResponse<T> = serde_json::from_slice(bytes)?;
        Ok(response.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CacheQueryParameter, Poi};

    fn base() -> Url {
        Url::parse("https://parse.example.org/parse/").unwrap()
    }

    #[test]
    fn test_class_url_carries_query() {
        let mut query = BTreeMap::new();
        query.insert("limit".to_string(), "1000".to_string());
        query.insert("where".to_string(), r#"{"name":"Park"}"#.to_string());
        let resource = RequestResource::class(&base(), "POI", query, Headers::new());

        let url = resource.target_url().unwrap().unwrap();
        assert_eq!(url.path(), "/parse/classes/POI");
        let pairs: BTreeMap<String, String> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs["limit"], "1000");
        assert_eq!(pairs["where"], r#"{"name":"Park"}"#);
    }

    #[test]
    fn test_function_url_and_body() {
        let resource =
            RequestResource::function(&base(), "poi-all", &CacheQueryParameter { force: true }, Headers::new())
                .unwrap();
        let url = resource.target_url().unwrap().unwrap();
        assert_eq!(url.as_str(), "https://parse.example.org/parse/functions/poi-all");
        match resource {
            RequestResource::Function { parameters, .. } => {
                assert_eq!(parameters, serde_json::json!({"force": true}))
            }
            other => panic!("unexpected resource {:?}", other),
        }
    }

    #[test]
    fn test_icon_image_resource() {
        let category = PoiCategory {
            object_id: Some("sport26".into()),
            icon_name: Some("halle".into()),
            icon_path: Some("https://cdn.example.org/icons".into()),
            icon_mimetype: Some(".png".into()),
            ..Default::default()
        };
        let resource = RequestResource::icon_image_data(&category).unwrap();
        assert_eq!(
            resource.target_url().unwrap().unwrap().as_str(),
            "https://cdn.example.org/icons/halle.png"
        );
        assert!(RequestResource::symbol_image_data(&category).is_none());

        let without_id = PoiCategory {
            object_id: Some(String::new()),
            ..category
        };
        assert!(RequestResource::icon_image_data(&without_id).is_none());
    }

    #[test]
    fn test_bundle_has_no_url() {
        let resource = RequestResource::bundle("/tmp", "POI.json");
        assert_eq!(resource.target_url(), Ok(None));
        assert!(resource.headers().is_none());
    }

    #[test]
    fn test_decode_envelopes() {
        let wrapped = br#"{"results": [{"objectId": "a"}]}"#;
        let pois: Vec<Poi> = decode_class(wrapped, false).unwrap();
        assert_eq!(pois[0].object_id.as_deref(), Some("a"));

        let bare = br#"[{"objectId": "b"}]"#;
        let pois: Vec<Poi> = decode_class(bare, true).unwrap();
        assert_eq!(pois[0].object_id.as_deref(), Some("b"));

        let result: Vec<String> = decode_function(br#"{"result": ["x"]}"#, false).unwrap();
        assert_eq!(result, vec!["x"]);

        let broken = decode_class::<Poi>(b"{", false);
        assert!(matches!(broken, Err(NetworkError::JsonDecoding(_))));
    }
}
