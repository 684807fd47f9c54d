// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use dotenv::dotenv;
use reqwest::Url;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::models::GeoPoint;

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Parse backend base URL (e.g., "https://parse.example.org/parse")
    pub base_url: String,

    /// Sent as X-Parse-Application-Id
    pub application_id: String,

    /// Sent as X-Parse-Client-Key
    pub client_key: String,

    /// Directory with POI.json / POICategory.json; enables offline mode
    pub bundle_dir: Option<PathBuf>,

    /// JSON preference store; in-memory preferences when unset
    pub preferences_file: Option<PathBuf>,

    /// Fallback location for nearby queries
    pub default_geo_point: Option<GeoPoint>,

    /// Default limit of POI and category queries (default 1000)
    pub max_pois: i64,

    /// Elastic search index (default "new_poi")
    pub search_index: String,

    /// Image cache TTL in seconds
    pub image_cache_ttl: u64,

    /// Image cache cleanup interval in seconds
    pub cache_cleanup_interval: u64,

    /// HTTP connect timeout in seconds
    pub connect_timeout: u64,

    /// Environment: development, staging, production
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env if present, then the process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup
    /// Unparseable numbers fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let path = |key: &str| lookup(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from);

        Config {
            base_url: text("MAP_BASE_URL", "http://localhost:1337/parse"),

            application_id: text("PARSE_APPLICATION_ID", ""),

            client_key: text("PARSE_CLIENT_KEY", ""),

            bundle_dir: path("MAP_BUNDLE_DIR"),

            preferences_file: path("MAP_PREFERENCES_FILE"),

            default_geo_point: GeoPoint::from_strings(
                lookup("MAP_DEFAULT_LATITUDE").as_deref(),
                lookup("MAP_DEFAULT_LONGITUDE").as_deref(),
            ),

            max_pois: parse_or(lookup("MAP_MAX_POIS"), 1000),

            search_index: text("MAP_SEARCH_INDEX", "new_poi"),

            image_cache_ttl: parse_or(lookup("IMAGE_CACHE_TTL"), 3600),

            cache_cleanup_interval: parse_or(lookup("CACHE_CLEANUP_INTERVAL"), 300),

            connect_timeout: parse_or(lookup("HTTP_CONNECT_TIMEOUT"), 30),

            environment: text("ENVIRONMENT", "development"),

            log_level: text("LOG_LEVEL", "info"),
        }
    }

    /// Backend base URL, checked to accept path segments
    pub fn parsed_base_url(&self) -> Result<Url, String> {
        let url = Url::parse(self.base_url.trim())
            .map_err(|e| format!("MAP_BASE_URL is not a valid URL: {}", e))?;
        if url.cannot_be_a_base() {
            return Err(format!("MAP_BASE_URL cannot carry paths: {}", url));
        }
        Ok(url)
    }

    pub fn is_offline(&self) -> bool {
        self.bundle_dir.is_some()
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures the client can be built safely
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("MAP_BASE_URL is required".to_string());
        }
        self.parsed_base_url()?;

        if self.application_id.is_empty() && !self.is_offline() {
            log::warn!("PARSE_APPLICATION_ID not configured - the backend will reject requests");
        }

        Ok(())
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}
