// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod cache;
pub mod filters;
pub mod google_places_client;
pub mod maps_link;
pub mod picker_service;
pub mod places_source;

pub use cache::*;
pub use google_places_client::GooglePlacesClient;
pub use picker_service::*;
pub use places_source::*;
