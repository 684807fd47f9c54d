// src/lib.rs
// DOCUMENTATION: Library root
// PURPOSE: Client data-access layer for points of interest and their categories

pub mod config;
pub mod errors;
pub mod models;
pub mod services;

pub use config::{Config, MapContext, MapNotification};
pub use errors::{MapError, NetworkError};
pub use services::{CollectionService, MapClient, NetworkService, ParseNetworkService, QueryTask};
