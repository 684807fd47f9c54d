// src/services/map_service.rs
// DOCUMENTATION: Query facade of the map module
// PURPOSE: Build backend requests, delegate them to the network collaborator, map failures

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use super::cache::DataCache;
use super::network::{decode_class, decode_function, NetworkService, RequestResource};
use super::task::QueryTask;
use crate::config::MapContext;
use crate::errors::{MapError, NetworkError};
use crate::models::{
    CacheQueryParameter, CategoryFilterField, DefaultCategories, DetailFilterField,
    ElasticSearchQuery, FilterFieldQueryParameter, FilterResult, GeoPoint, IconImageData,
    NearbyQueryParameter, Poi, PoiCategory, SearchResultItem, SymbolImageData,
    FUNCTION_ELASTIC_SEARCH, FUNCTION_POI_ALL, FUNCTION_POI_FILTER, FUNCTION_POI_FILTERED,
    FUNCTION_POI_NEARBY, POI_CATEGORY_CLASS_NAME, POI_CLASS_NAME,
};

/// Default radius of `fetch_nearby_pois_around` in meters
pub const NEARBY_DISTANCE: i32 = 1000;
/// Default result count of `fetch_nearby_pois_around`
pub const NEARBY_LIMIT: i32 = 10;

/// Class query parameters
pub type QueryParameters = BTreeMap<String, String>;

/// Map query facade
/// DOCUMENTATION: Cheap to clone. Queries that make no sense (zero limit, empty
/// search term, category without source id) succeed with an empty result;
/// an error always means a transport or decoding failure.
#[derive(Clone)]
pub struct MapClient {
    network: Arc<dyn NetworkService>,
    context: Arc<MapContext>,
}

impl MapClient {
    pub fn new(network: Arc<dyn NetworkService>, context: Arc<MapContext>) -> Self {
        Self { network, context }
    }

    pub fn context(&self) -> &Arc<MapContext> {
        &self.context
    }

    /// Run `query` on the context runtime
    /// DOCUMENTATION: The returned task yields exactly one result; cancelling
    /// or dropping it stops delivery.
    pub fn spawn_query<T, F, Fut>(&self, query: F) -> QueryTask<T>
    where
        F: FnOnce(MapClient) -> Fut,
        Fut: Future<Output = Result<T, MapError>> + Send + 'static,
        T: Send + 'static,
    {
        QueryTask::spawn(self.context.runtime(), query(self.clone()))
    }

    // ---------------------------------------------------------------
    // Class queries
    // ---------------------------------------------------------------

    /// Fetch up to `max_count` POIs
    pub async fn fetch_all_pois(
        &self,
        max_count: i64,
        query: QueryParameters,
    ) -> Result<Vec<Poi>, MapError> {
        self.fetch_class(POI_CLASS_NAME, max_count, query).await
    }

    /// Fetch up to `max_count` POI categories
    pub async fn fetch_all_poi_categories(
        &self,
        max_count: i64,
        query: QueryParameters,
    ) -> Result<Vec<PoiCategory>, MapError> {
        self.fetch_class(POI_CATEGORY_CLASS_NAME, max_count, query)
            .await
    }

    /// Fetch the categories named in `defaults`
    pub async fn fetch_default_categories(
        &self,
        defaults: &DefaultCategories,
    ) -> Result<Vec<PoiCategory>, MapError> {
        if defaults.list.is_empty() {
            log::debug!("No default categories requested");
            return Ok(Vec::new());
        }

        let mut query = QueryParameters::new();
        query.insert(
            "where".to_string(),
            serde_json::json!({ "name": { "$in": defaults.list } }).to_string(),
        );
        let max_count = i64::try_from(defaults.list.len()).unwrap_or(i64::MAX);
        self.fetch_all_poi_categories(max_count, query).await
    }

    async fn fetch_class<T: DeserializeOwned>(
        &self,
        class_name: &str,
        max_count: i64,
        mut query: QueryParameters,
    ) -> Result<Vec<T>, MapError> {
        if max_count <= 0 {
            log::debug!("{} query with limit {} returns nothing", class_name, max_count);
            return Ok(Vec::new());
        }

        let bundled = self.context.bundle_dir().is_some();
        let resource = match self.context.bundle_dir() {
            Some(dir) => RequestResource::bundle(dir, &format!("{}.json", class_name)),
            None => {
                query.insert("limit".to_string(), max_count.to_string());
                RequestResource::class(
                    self.context.base_url(),
                    class_name,
                    query,
                    self.context.request_headers(),
                )
            }
        };

        let bytes = self.fetch(&resource).await?;
        let records: Vec<T> = decode(decode_class(&bytes, bundled))?;
        log::debug!("{} query returned {} records", class_name, records.len());
        Ok(records)
    }

    // ---------------------------------------------------------------
    // Image data
    // ---------------------------------------------------------------

    /// Download the icon of `category`
    pub async fn fetch_icon_image_data(
        &self,
        category: &PoiCategory,
    ) -> Result<IconImageData, MapError> {
        let resource = RequestResource::icon_image_data(category).ok_or_else(|| {
            log::debug!("Category {:?} has no complete icon descriptor", category.object_id);
            MapError::InvalidRequest
        })?;
        let (object_id, url, bytes) = self.fetch_image_resource(&resource).await?;
        Ok(IconImageData {
            object_id: Some(object_id),
            image_data: Some(bytes),
            url: Some(url),
        })
    }

    /// Download the map symbol of `category`
    pub async fn fetch_symbol_image_data(
        &self,
        category: &PoiCategory,
    ) -> Result<SymbolImageData, MapError> {
        let resource = RequestResource::symbol_image_data(category).ok_or_else(|| {
            log::debug!("Category {:?} has no complete symbol descriptor", category.object_id);
            MapError::InvalidRequest
        })?;
        let (object_id, _, bytes) = self.fetch_image_resource(&resource).await?;
        Ok(SymbolImageData::new(&object_id, bytes))
    }

    /// Download raw bytes from `url`
    pub async fn fetch_image_data(&self, url: &Url) -> Result<Vec<u8>, MapError> {
        self.fetch_cached(&RequestResource::url(url.clone()), url)
            .await
    }

    async fn fetch_image_resource(
        &self,
        resource: &RequestResource,
    ) -> Result<(String, Url, Vec<u8>), MapError> {
        let object_id = match resource {
            RequestResource::ImageData { object_id, .. } => object_id.clone(),
            _ => return Err(MapError::InvalidRequest),
        };
        let url = resource
            .target_url()?
            .ok_or(MapError::InvalidRequest)?;
        let bytes = self.fetch_cached(resource, &url).await?;
        Ok((object_id, url, bytes))
    }

    async fn fetch_cached(&self, resource: &RequestResource, url: &Url) -> Result<Vec<u8>, MapError> {
        let cache = self.context.cache();
        let key = DataCache::key_for(url);
        if let Some(bytes) = cache.get(&key).await {
            return Ok(bytes);
        }

        let bytes = self.fetch(resource).await.map_err(|e| {
            log::error!("Image download from {} failed", url);
            e
        })?;
        cache.set(key, bytes.clone()).await;
        Ok(bytes)
    }

    // ---------------------------------------------------------------
    // Elastic search
    // ---------------------------------------------------------------

    /// Raw search hits for `query` in `index` (configured index when `None`)
    pub async fn elastic_search_raw(
        &self,
        query: &str,
        index: Option<&str>,
    ) -> Result<Vec<SearchResultItem>, MapError> {
        match self.search_query(query, index, true) {
            Some(parameters) => {
                self.call_function(FUNCTION_ELASTIC_SEARCH, &parameters)
                    .await
            }
            None => Ok(Vec::new()),
        }
    }

    /// POIs matching `query` in `index` (configured index when `None`)
    pub async fn elastic_search(
        &self,
        query: &str,
        index: Option<&str>,
    ) -> Result<Vec<Poi>, MapError> {
        match self.search_query(query, index, false) {
            Some(parameters) => {
                self.call_function(FUNCTION_ELASTIC_SEARCH, &parameters)
                    .await
            }
            None => Ok(Vec::new()),
        }
    }

    fn search_query(&self, query: &str, index: Option<&str>, raw: bool) -> Option<ElasticSearchQuery> {
        let index = index.unwrap_or(&self.context.config().search_index);
        if query.is_empty() || index.is_empty() {
            log::debug!("Empty search term or index, nothing to search");
            return None;
        }
        Some(ElasticSearchQuery::new(index, query).with_raw(raw))
    }

    // ---------------------------------------------------------------
    // Cloud functions
    // ---------------------------------------------------------------

    /// Filter fields offered for `category`
    pub async fn fetch_all_filter_fields(
        &self,
        category: &PoiCategory,
    ) -> Result<Vec<CategoryFilterField>, MapError> {
        let Some(source_id) = source_id(category) else {
            return Ok(Vec::new());
        };
        let parameters = FilterFieldQueryParameter::for_category(source_id, Vec::new());
        self.call_function(FUNCTION_POI_FILTER, &parameters).await
    }

    /// Filtered POIs of `category` together with their count
    /// DOCUMENTATION: A response whose item list disagrees with its count is
    /// rejected as an invalid response.
    pub async fn fetch_filtered_pois_result(
        &self,
        category: &PoiCategory,
        filter: Vec<DetailFilterField>,
    ) -> Result<FilterResult, MapError> {
        let Some(source_id) = source_id(category) else {
            return Ok(FilterResult::default());
        };
        let parameters = FilterFieldQueryParameter::for_category(source_id, filter);
        let result: FilterResult = self
            .call_function(FUNCTION_POI_FILTERED, &parameters)
            .await?;

        if !result.is_consistent() {
            log::error!(
                "poi-filtered returned {:?} items but a count of {:?}",
                result.items.as_ref().map(Vec::len),
                result.count
            );
            return Err(MapError::InvalidResponse);
        }
        Ok(result)
    }

    /// Filtered POIs of `category`, empty when the server sends no items
    pub async fn fetch_all_filtered_pois(
        &self,
        category: &PoiCategory,
        filter: Vec<DetailFilterField>,
    ) -> Result<Vec<Poi>, MapError> {
        Ok(self
            .fetch_filtered_pois_result(category, filter)
            .await?
            .into_items())
    }

    /// All POIs from the server-side cache, rebuilt first when `force` is set
    pub async fn fetch_all_cached_pois(&self, force: bool) -> Result<Vec<Poi>, MapError> {
        self.call_function(FUNCTION_POI_ALL, &CacheQueryParameter { force })
            .await
    }

    /// POIs near a location
    pub async fn fetch_nearby_pois(
        &self,
        parameters: &NearbyQueryParameter,
    ) -> Result<Vec<Poi>, MapError> {
        self.call_function(FUNCTION_POI_NEARBY, parameters).await
    }

    /// Ten random POIs within a kilometer of `point`, empty without a point
    pub async fn fetch_nearby_pois_around(
        &self,
        point: Option<GeoPoint>,
    ) -> Result<Vec<Poi>, MapError> {
        let Some(point) = point else {
            log::debug!("No location for nearby query");
            return Ok(Vec::new());
        };
        let parameters = NearbyQueryParameter {
            distance: Some(NEARBY_DISTANCE),
            random: Some(true),
            limit: Some(NEARBY_LIMIT),
            ..NearbyQueryParameter::around(point)
        };
        self.fetch_nearby_pois(&parameters).await
    }

    async fn call_function<P, T>(&self, function_name: &str, parameters: &P) -> Result<T, MapError>
    where
        P: Serialize + Sync,
        T: DeserializeOwned,
    {
        let bundled = self.context.bundle_dir().is_some();
        let resource = match self.context.bundle_dir() {
            Some(dir) => RequestResource::bundle(dir, &format!("{}.json", function_name)),
            None => RequestResource::function(
                self.context.base_url(),
                function_name,
                parameters,
                self.context.request_headers(),
            )?,
        };

        let bytes = self.fetch(&resource).await?;
        decode(decode_function(&bytes, bundled))
    }

    async fn fetch(&self, resource: &RequestResource) -> Result<Vec<u8>, MapError> {
        self.network.fetch(resource).await.map_err(|e| {
            log::error!("Map request failed: {}", e);
            MapError::from(e)
        })
    }
}

fn source_id(category: &PoiCategory) -> Option<&str> {
    let source_id = category.source_id.as_deref().filter(|id| !id.is_empty());
    if source_id.is_none() {
        log::debug!("Category {:?} has no source id", category.object_id);
    }
    source_id
}

fn decode<T>(decoded: Result<T, NetworkError>) -> Result<T, MapError> {
    decoded.map_err(|e| {
        log::error!("Cannot decode map response: {}", e);
        MapError::from(e)
    })
}
