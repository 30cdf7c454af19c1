// src/models/picker.rs
// DOCUMENTATION: Request/response models for the picker endpoints
// PURPOSE: Query parsing + validation, pipeline input and serialized results

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Cuisine;
use crate::errors::PickerError;
use crate::i18n::{Lang, RadiusSlider, UiStrings};
use crate::models::CuisineOption;
use crate::services::google_places_client::GooglePlace;
use crate::services::maps_link::build_maps_url;

pub const DEFAULT_RADIUS_M: u32 = 8000;
pub const DEFAULT_MIN_RATING: f32 = 4.0;
pub const DEFAULT_MIN_REVIEWS: u32 = 50;

/// Geographic point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance in kilometers (Haversine)
    pub fn distance_km(&self, other: &LatLng) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos()
                * other.lat.to_radians().cos()
                * (d_lng / 2.0).sin().powi(2);

        EARTH_RADIUS_KM * 2.0 * a.sqrt().asin()
    }
}

/// Query parameters of GET /picker/pick
/// DOCUMENTATION: Every filter is optional; defaults mirror the picker UI
#[derive(Debug, Deserialize, Validate)]
pub struct PickQuery {
    #[serde(default)]
    pub cuisine: Cuisine,

    /// Device coordinates ("use my location"); must come with `lng`
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: Option<f64>,

    /// ZIP code or "City, State"
    #[validate(length(max = 200))]
    pub address: Option<String>,

    /// Search radius in meters; nearby search accepts at most 50 km
    #[validate(range(min = 1, max = 50000))]
    pub radius: Option<u32>,

    pub open_now: Option<bool>,

    #[validate(range(min = 0.0, max = 5.0))]
    pub min_rating: Option<f32>,

    pub min_reviews: Option<u32>,

    #[serde(default)]
    pub lang: Lang,
}

/// Where the search is centered
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    Coordinates(LatLng),
    Address(String),
    /// Neither given: fall back to the configured center
    Default,
}

/// Fully resolved pipeline input
#[derive(Debug, Clone)]
pub struct PickCriteria {
    pub location: LocationInput,
    pub radius: u32,
    pub open_now: bool,
    pub cuisine: Cuisine,
    pub min_rating: f32,
    pub min_reviews: u32,
}

impl PickQuery {
    /// Apply defaults and cross-field checks
    pub fn into_criteria(self) -> Result<PickCriteria, PickerError> {
        // Range validation lets NaN through; every comparison with it is false
        for (field, value) in [
            ("lat", self.lat),
            ("lng", self.lng),
            ("min_rating", self.min_rating.map(f64::from)),
        ] {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(PickerError::ValidationError(format!(
                    "{} must be a finite number",
                    field
                )));
            }
        }

        let location = match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => LocationInput::Coordinates(LatLng::new(lat, lng)),
            (None, None) => match self.address.map(|a| a.trim().to_string()) {
                Some(address) if !address.is_empty() => LocationInput::Address(address),
                _ => LocationInput::Default,
            },
            _ => {
                return Err(PickerError::ValidationError(
                    "lat and lng must be given together".to_string(),
                ))
            }
        };

        Ok(PickCriteria {
            location,
            radius: self.radius.unwrap_or(DEFAULT_RADIUS_M),
            open_now: self.open_now.unwrap_or(false),
            cuisine: self.cuisine,
            min_rating: self.min_rating.unwrap_or(DEFAULT_MIN_RATING),
            min_reviews: self.min_reviews.unwrap_or(DEFAULT_MIN_REVIEWS),
        })
    }
}

/// Final state of a pick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PickStatus {
    Picked,
    /// The places search returned nothing
    NoResults,
    /// Places were found but none survived filtering
    NoMatch,
}

/// Candidate counts after each pipeline stage
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineStats {
    pub searched: usize,
    pub after_type_filter: usize,
    pub after_exclusions: usize,
    pub detail_lookups: usize,
    pub after_confirmation: usize,
    /// Confirmation kept too few places and the type-only rule was applied
    pub confirmation_fallback: bool,
    pub after_thresholds: usize,
    /// Thresholds emptied the pool and were ignored
    pub thresholds_relaxed: bool,
}

/// Picked restaurant as returned to clients
#[derive(Debug, Clone, Serialize)]
pub struct PickedPlace {
    pub place_id: String,
    pub name: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub types: Vec<String>,
    pub rating: Option<f32>,
    pub user_ratings_total: Option<u32>,
    pub price_level: Option<i32>,
    pub is_open: Option<bool>,
    pub distance_km: Option<f64>,
    pub maps_url: String,
}

impl PickedPlace {
    pub fn from_google(place: &GooglePlace, center: &LatLng) -> Self {
        let location = place.location();

        PickedPlace {
            place_id: place.place_id.clone(),
            name: place.name.clone(),
            address: place.short_address().map(str::to_string),
            latitude: location.map(|l| l.lat),
            longitude: location.map(|l| l.lng),
            types: place.types.clone(),
            rating: place.rating,
            user_ratings_total: place.user_ratings_total,
            price_level: place.price_level,
            is_open: place.opening_hours.as_ref().and_then(|h| h.open_now),
            distance_km: location.map(|l| center.distance_km(&l)),
            maps_url: build_maps_url(Some(place)),
        }
    }
}

/// Response body of GET /picker/pick
#[derive(Debug, Serialize)]
pub struct PickResponse {
    pub status: PickStatus,
    /// Localized explanation when nothing was picked
    pub message: Option<&'static str>,
    pub center: LatLng,
    pub radius_label: String,
    pub place: Option<PickedPlace>,
    pub stats: PipelineStats,
}

/// Filter defaults advertised to clients
#[derive(Debug, Serialize)]
pub struct FilterDefaults {
    pub cuisine: Cuisine,
    pub min_rating: f32,
    pub min_reviews: u32,
    pub open_now: bool,
    pub radius: u32,
}

impl Default for FilterDefaults {
    fn default() -> Self {
        Self {
            cuisine: Cuisine::default(),
            min_rating: DEFAULT_MIN_RATING,
            min_reviews: DEFAULT_MIN_REVIEWS,
            open_now: false,
            radius: DEFAULT_RADIUS_M,
        }
    }
}

/// Query parameters of GET /picker/options
#[derive(Debug, Deserialize)]
pub struct OptionsQuery {
    #[serde(default)]
    pub lang: Lang,
}

/// Response body of GET /picker/options
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub lang: Lang,
    pub cuisines: Vec<CuisineOption>,
    pub defaults: FilterDefaults,
    pub radius_slider: RadiusSlider,
    pub strings: &'static UiStrings,
}

impl OptionsResponse {
    pub fn for_lang(lang: Lang) -> Self {
        OptionsResponse {
            lang,
            cuisines: CuisineOption::list(lang),
            defaults: FilterDefaults::default(),
            radius_slider: lang.radius_slider(),
            strings: lang.strings(),
        }
    }
}
