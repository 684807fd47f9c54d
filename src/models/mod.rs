// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod asset;
pub mod detail_group;
pub mod geo;
pub mod keyed;
pub mod lenient;
pub mod poi;
pub mod poi_category;
pub mod query;

pub use detail_group::*;
pub use geo::*;
pub use keyed::*;
pub use poi::*;
pub use poi_category::*;
pub use query::*;
