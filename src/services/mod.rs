// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod cache;
pub mod collection_service;
pub mod map_service;
pub mod network;
pub mod parse_network;
pub mod preferences;
pub mod task;

pub use cache::*;
pub use collection_service::*;
pub use map_service::*;
pub use network::*;
pub use parse_network::*;
pub use preferences::*;
pub use task::*;
