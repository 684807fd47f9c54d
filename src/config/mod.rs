// src/config/mod.rs
// DOCUMENTATION: Configuration module organization
// PURPOSE: Re-export configuration components

pub mod context;
pub mod env;

pub use context::{MapContext, MapNotification};
pub use env::Config;
