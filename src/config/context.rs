// src/config/context.rs
// DOCUMENTATION: Explicit module context
// PURPOSE: Everything the query facade shares, constructed once and passed in

use reqwest::Url;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::env::Config;
use crate::errors::{ConfigError, PreferenceError};
use crate::models::GeoPoint;
use crate::services::cache::{start_cleanup_task, DataCache};
use crate::services::network::Headers;
use crate::services::preferences::{
    JsonFilePreferences, MemoryPreferences, PreferenceStore, CONSTRUCTION_SITES_PUSH_KEY,
    SESSION_TOKEN_KEY,
};

pub const APPLICATION_ID_HEADER: &str = "X-Parse-Application-Id";
pub const CLIENT_KEY_HEADER: &str = "X-Parse-Client-Key";
pub const SESSION_TOKEN_HEADER: &str = "X-Parse-Session-Token";

/// Change notifications of the map module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapNotification {
    ConstructionSitesPushDidChange,
}

/// Shared state of the map module
/// DOCUMENTATION: Holds configuration, base headers, the preference store, the
/// image cache, the notification channel and the runtime queries run on.
pub struct MapContext {
    config: Config,
    base_url: Url,
    headers: Headers,
    preferences: Arc<dyn PreferenceStore>,
    cache: Arc<DataCache>,
    notifications: broadcast::Sender<MapNotification>,
    runtime: Handle,
}

impl MapContext {
    pub fn new(
        config: Config,
        preferences: Arc<dyn PreferenceStore>,
        runtime: Handle,
    ) -> Result<Self, ConfigError> {
        config.validate().map_err(ConfigError::Invalid)?;
        let base_url = config.parsed_base_url().map_err(ConfigError::Invalid)?;

        let mut headers = Headers::new();
        if !config.application_id.is_empty() {
            headers.insert(APPLICATION_ID_HEADER.to_string(), config.application_id.clone());
        }
        if !config.client_key.is_empty() {
            headers.insert(CLIENT_KEY_HEADER.to_string(), config.client_key.clone());
        }

        let (notifications, _) = broadcast::channel(16);

        Ok(Self {
            cache: Arc::new(DataCache::new(config.image_cache_ttl)),
            config,
            base_url,
            headers,
            preferences,
            notifications,
            runtime,
        })
    }

    /// Context for `config` on the current runtime
    /// Uses the JSON preference file when configured, in-memory preferences otherwise.
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let preferences: Arc<dyn PreferenceStore> = match &config.preferences_file {
            Some(path) => Arc::new(JsonFilePreferences::open(path)?),
            None => Arc::new(MemoryPreferences::new()),
        };
        let runtime = Handle::try_current()
            .map_err(|e| ConfigError::Invalid(format!("no tokio runtime: {}", e)))?;
        Self::new(config, preferences, runtime)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base headers plus the session token when one is stored
    pub fn request_headers(&self) -> Headers {
        let mut headers = self.headers.clone();
        if let Some(token) = self
            .preferences
            .string(SESSION_TOKEN_KEY)
            .filter(|t| !t.is_empty())
        {
            headers.insert(SESSION_TOKEN_HEADER.to_string(), token);
        }
        headers
    }

    /// Fixture directory of offline mode
    pub fn bundle_dir(&self) -> Option<&Path> {
        self.config.bundle_dir.as_deref()
    }

    pub fn bundle_path(&self, file_name: &str) -> Option<PathBuf> {
        self.bundle_dir().map(|dir| dir.join(file_name))
    }

    pub fn preferences(&self) -> &Arc<dyn PreferenceStore> {
        &self.preferences
    }

    pub fn cache(&self) -> &Arc<DataCache> {
        &self.cache
    }

    pub fn default_geo_point(&self) -> Option<GeoPoint> {
        self.config.default_geo_point
    }

    pub fn runtime(&self) -> &Handle {
        &self.runtime
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MapNotification> {
        self.notifications.subscribe()
    }

    /// Periodically purge expired image cache entries
    pub fn start_cache_cleanup(&self) -> JoinHandle<()> {
        let _guard = self.runtime.enter();
        start_cleanup_task(self.cache.clone(), self.config.cache_cleanup_interval)
    }

    /// Store the construction-sites push flag and announce the change
    pub fn set_construction_sites_push(&self, enabled: bool) -> Result<(), PreferenceError> {
        self.preferences.set_bool(CONSTRUCTION_SITES_PUSH_KEY, enabled)?;
        if self
            .notifications
            .send(MapNotification::ConstructionSitesPushDidChange)
            .is_err()
        {
            log::debug!("Construction sites push changed, nobody is listening");
        }
        Ok(())
    }

    pub fn is_construction_sites_push_enabled(&self) -> bool {
        self.preferences.bool(CONSTRUCTION_SITES_PUSH_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    fn config() -> Config {
        let mut config = Config::from_lookup(|_| None);
        config.application_id = "poi-app".to_string();
        config.client_key = "secret".to_string();
        config
    }

    #[tokio::test]
    async fn test_session_token_header() {
        let prefs = Arc::new(MemoryPreferences::new());
        let context = assert_ok!(MapContext::new(config(), prefs.clone(), Handle::current()));

        let headers = context.request_headers();
        assert_eq!(headers[APPLICATION_ID_HEADER], "poi-app");
        assert_eq!(headers[CLIENT_KEY_HEADER], "secret");
        assert!(!headers.contains_key(SESSION_TOKEN_HEADER));

        assert_ok!(prefs.set_string(SESSION_TOKEN_KEY, "r:42"));
        assert_eq!(context.request_headers()[SESSION_TOKEN_HEADER], "r:42");
    }

    #[tokio::test]
    async fn test_push_flag_notifies() {
        let context = assert_ok!(MapContext::new(
            config(),
            Arc::new(MemoryPreferences::new()),
            Handle::current()
        ));
        let mut receiver = context.subscribe();

        assert!(!context.is_construction_sites_push_enabled());
        assert_ok!(context.set_construction_sites_push(true));
        assert!(context.is_construction_sites_push_enabled());
        assert_eq!(
            assert_ok!(receiver.recv().await),
            MapNotification::ConstructionSitesPushDidChange
        );
    }

    #[tokio::test]
    async fn test_invalid_base_url_is_rejected() {
        let mut config = config();
        config.base_url = "no url".to_string();
        let result = MapContext::new(config, Arc::new(MemoryPreferences::new()), Handle::current());
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_from_config_with_preference_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config();
        config.preferences_file = Some(dir.path().join("prefs.json"));
        config.bundle_dir = Some(dir.path().to_path_buf());

        let context = assert_ok!(MapContext::from_config(config));
        assert_ok!(context.set_construction_sites_push(true));
        assert!(dir.path().join("prefs.json").exists());
        assert_eq!(context.bundle_path("POI.json"), Some(dir.path().join("POI.json")));
    }
}
