// src/services/places_source.rs
// DOCUMENTATION: Abstraction over the places index
// PURPOSE: Lets the picker pipeline run against Google or an in-memory source

use crate::errors::PickerError;
use crate::models::LatLng;
use crate::services::google_places_client::GooglePlace;
use async_trait::async_trait;

/// Parameters of one nearby search
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub location: LatLng,
    /// Radius in meters
    pub radius: u32,
    pub place_type: Option<String>,
    pub open_now: bool,
}

impl NearbyQuery {
    /// Same query restricted to another place type
    pub fn with_type(&self, place_type: &str) -> Self {
        Self {
            place_type: Some(place_type.to_string()),
            ..self.clone()
        }
    }
}

/// Places search + detail lookup + geocoding
#[async_trait]
pub trait PlacesSource: Send + Sync {
    async fn nearby(&self, query: &NearbyQuery) -> Result<Vec<GooglePlace>, PickerError>;

    async fn details(&self, place_id: &str) -> Result<GooglePlace, PickerError>;

    async fn geocode(&self, address: &str) -> Result<LatLng, PickerError>;

    /// Whether credentials are present; unconfigured sources are never queried
    fn is_configured(&self) -> bool {
        true
    }
}
