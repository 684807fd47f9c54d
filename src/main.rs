// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config and logging, then load the map data once

use anyhow::Context;
use poi_map::models::{DefaultCategories, PoiCategoryKey};
use poi_map::services::QueryParameters;
use poi_map::{CollectionService, Config, MapClient, MapContext, MapError, ParseNetworkService};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration (reads .env)
    let config = Config::from_env();

    // 2. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.as_str()
        } else {
            "info,reqwest=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        anyhow::bail!(e);
    }

    log::info!("Starting poi-map...");
    log::info!("Environment: {}", config.environment);
    match &config.bundle_dir {
        Some(dir) => log::info!("Offline mode, reading fixtures from {}", dir.display()),
        None => log::info!("Backend: {}", config.base_url),
    }

    // 3. Build the map context and the query facade
    let network = ParseNetworkService::new(config.connect_timeout)
        .context("failed to build HTTP client")?;
    let max_pois = config.max_pois;
    let context = Arc::new(MapContext::from_config(config)?);
    let cleanup = context.start_cache_cleanup();
    let client = MapClient::new(Arc::new(network), context.clone());

    // 4. Categories, ordered for display
    let mut categories = client
        .spawn_query(move |client| async move {
            client
                .fetch_all_poi_categories(max_pois, QueryParameters::new())
                .await
        })
        .await?;
    CollectionService::sort(&mut categories, PoiCategoryKey::Position);
    log::info!("Loaded {} POI categories", categories.len());

    let defaults = client
        .fetch_default_categories(&DefaultCategories::default())
        .await?;
    log::info!("{} default categories available", defaults.len());

    // 5. POIs joined with their categories
    let mut pois = client
        .fetch_all_pois(max_pois, QueryParameters::new())
        .await?;
    CollectionService::join_categories(&mut pois, &categories);
    log::info!("Loaded {} POIs with a known category", pois.len());
    for poi in &pois {
        log::debug!(
            "{}: {} detail groups",
            poi.name.as_deref().unwrap_or("<unnamed>"),
            poi.detail_groups().len()
        );
    }

    // 6. POIs around the configured location
    match context.default_geo_point() {
        Some(point) => {
            let nearby = client.fetch_nearby_pois_around(Some(point)).await?;
            log::info!("{} POIs near {:?}", nearby.len(), point);
        }
        None => {
            let err = MapError::UserLocation("no default location configured".to_string());
            log::warn!("{}", err);
        }
    }

    cleanup.abort();
    Ok(())
}
