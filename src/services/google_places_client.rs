// src/services/google_places_client.rs
// DOCUMENTATION: Google Maps Platform client (Places + Geocoding web services)
// PURPOSE: Nearby search, place details and address geocoding with caching and rate limiting

use crate::config::Config;
use crate::errors::PickerError;
use crate::models::LatLng;
use crate::services::places_source::{NearbyQuery, PlacesSource};
use crate::services::PlacesCache;
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Fields requested by detail lookups; only what cuisine confirmation needs
const DETAIL_FIELDS: &str = "place_id,name,types,vicinity,formatted_address";

/// Google only activates a next_page_token a couple of seconds after issuing it
const PAGE_TOKEN_DELAY: Duration = Duration::from_secs(2);

/// Google Maps Platform client
/// DOCUMENTATION: Handles authentication, caching and throttling of API calls
pub struct GooglePlacesClient {
    /// HTTP client for making requests
    client: Client,
    /// Google Maps Platform API key
    api_key: String,
    /// Base URL, e.g. https://maps.googleapis.com/maps/api
    base_url: String,
    /// Shared response cache
    cache: Arc<PlacesCache>,
    /// Outbound request budget
    limiter: Arc<DefaultDirectRateLimiter>,
    /// Pages followed per nearby search
    max_pages: u32,
    /// Wait before fetching a follow-up page from the network
    page_delay: Duration,
}

/// Response from Google Places Nearby Search
#[derive(Debug, Deserialize, Serialize)]
pub struct GooglePlacesResponse {
    #[serde(default)]
    pub results: Vec<GooglePlace>,
    pub status: String,
    /// Next page token (if more results available)
    pub next_page_token: Option<String>,
    pub error_message: Option<String>,
}

/// Individual place from Google Places API
/// DOCUMENTATION: Shared by nearby search results and detail lookups;
/// detail lookups fill only the requested fields
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GooglePlace {
    /// Google's unique place identifier
    #[serde(default)]
    pub place_id: String,
    #[serde(default)]
    pub name: String,
    /// Place types (e.g., ["korean_restaurant", "restaurant", "food"])
    #[serde(default)]
    pub types: Vec<String>,
    pub geometry: Option<GoogleGeometry>,
    /// Formatted address (detailed, from Place Details)
    pub formatted_address: Option<String>,
    /// Vicinity (short address, from Nearby Search)
    pub vicinity: Option<String>,
    pub rating: Option<f32>,
    pub user_ratings_total: Option<u32>,
    /// Price level (0-4: free to very expensive)
    pub price_level: Option<i32>,
    pub business_status: Option<String>,
    pub opening_hours: Option<GoogleOpeningHours>,
    /// Cuisine tags, present only on detail payloads that expose them
    #[serde(alias = "servesCuisine")]
    pub serves_cuisine: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleGeometry {
    pub location: GoogleLocation,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct GoogleLocation {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleOpeningHours {
    pub open_now: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    result: Option<GooglePlace>,
    status: String,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
    status: String,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: GoogleGeometry,
}

impl GooglePlace {
    pub fn location(&self) -> Option<LatLng> {
        self.geometry
            .as_ref()
            .map(|g| LatLng::new(g.location.lat, g.location.lng))
    }

    /// Vicinity if present, otherwise the formatted address
    pub fn short_address(&self) -> Option<&str> {
        self.vicinity
            .as_deref()
            .or(self.formatted_address.as_deref())
    }

    /// Text the keyword blocklists are matched against: name plus address
    pub fn haystack(&self) -> String {
        format!("{} {}", self.name, self.short_address().unwrap_or(""))
    }

    pub fn has_type(&self, place_type: &str) -> bool {
        self.types.iter().any(|t| t == place_type)
    }
}

/// Map a Google web-service status to an error
/// DOCUMENTATION: OK and ZERO_RESULTS are successes, quota errors become 429s
fn check_status(status: &str, error_message: Option<String>) -> Result<(), PickerError> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        "OVER_QUERY_LIMIT" => {
            log::error!("Google Maps API quota exceeded");
            Err(PickerError::RateLimitExceeded)
        }
        "REQUEST_DENIED" | "INVALID_REQUEST" => {
            let msg = error_message.unwrap_or_else(|| status.to_string());
            log::error!("Google Maps API request denied: {}", msg);
            Err(PickerError::ExternalApiError(msg))
        }
        other => {
            let msg = error_message.unwrap_or_else(|| format!("Unknown status: {}", other));
            log::error!("Google Maps API unexpected status: {}", msg);
            Err(PickerError::ExternalApiError(msg))
        }
    }
}

fn build_limiter(requests_per_second: u32) -> Arc<DefaultDirectRateLimiter> {
    let rate = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
    Arc::new(RateLimiter::direct(Quota::per_second(rate)))
}

impl GooglePlacesClient {
    /// Build the client used by the server from configuration
    pub fn from_config(config: &Config, cache: Arc<PlacesCache>) -> Result<Self, PickerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .build()
            .map_err(|e| PickerError::ExternalApiError(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.google_maps_api_key.clone(),
            base_url: config.google_maps_base_url.trim_end_matches('/').to_string(),
            cache,
            limiter: build_limiter(config.google_requests_per_second),
            max_pages: config.nearby_max_pages.clamp(1, 3),
            page_delay: PAGE_TOKEN_DELAY,
        })
    }

    /// Issue one throttled GET and decode the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, PickerError> {
        self.limiter.until_ready().await;

        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                log::error!("Google Maps API request failed: {}", e);
                PickerError::ExternalApiError(format!("Request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            log::error!("Google Maps API error {}: {}", status, body);
            return Err(PickerError::ExternalApiError(format!(
                "API error {}: {}",
                status, body
            )));
        }

        response.json().await.map_err(|e| {
            log::error!("Failed to parse Google Maps response: {}", e);
            PickerError::ExternalApiError(format!("Parse error: {}", e))
        })
    }

    /// Fetch one nearby search page (first page when `page_token` is None)
    async fn nearby_page(
        &self,
        query: &NearbyQuery,
        page_token: Option<&str>,
    ) -> Result<GooglePlacesResponse, PickerError> {
        let cache_key = PlacesCache::nearby_key(
            query.location.lat,
            query.location.lng,
            query.radius,
            query.place_type.as_deref(),
            query.open_now,
            page_token,
        );

        if let Some(page) = self.cache.get_json::<GooglePlacesResponse>(&cache_key).await {
            return Ok(page);
        }

        // A fresh token is rejected as INVALID_REQUEST until Google activates it
        if page_token.is_some() {
            tokio::time::sleep(self.page_delay).await;
        }

        let location = format!("{},{}", query.location.lat, query.location.lng);
        let radius = query.radius.to_string();

        let mut params: Vec<(&str, &str)> = Vec::new();
        match page_token {
            // Google ignores every other parameter once a page token is given
            Some(token) => params.push(("pagetoken", token)),
            None => {
                params.push(("location", location.as_str()));
                params.push(("radius", radius.as_str()));
                if let Some(pt) = query.place_type.as_deref() {
                    params.push(("type", pt));
                }
                if query.open_now {
                    params.push(("opennow", "true"));
                }
            }
        }

        log::debug!(
            "Google Places nearby search: location={}, radius={}, type={:?}, page_token={}",
            location,
            radius,
            query.place_type,
            page_token.is_some()
        );

        let page: GooglePlacesResponse = self.get_json("place/nearbysearch/json", &params).await?;
        check_status(&page.status, page.error_message.clone())?;

        self.cache.set_json(cache_key, &page).await;

        Ok(page)
    }

    /// Perform nearby search for places, following result pages
    /// DOCUMENTATION: Returns the concatenation of up to `max_pages` pages.
    /// A failure on a follow-up page ends paging without failing the search.
    pub async fn nearby_search(&self, query: &NearbyQuery) -> Result<Vec<GooglePlace>, PickerError> {
        let first = self.nearby_page(query, None).await?;
        let mut places = first.results;
        let mut next_token = first.next_page_token;
        let mut pages = 1;

        while pages < self.max_pages {
            let Some(token) = next_token.take() else {
                break;
            };

            match self.nearby_page(query, Some(&token)).await {
                Ok(page) => {
                    places.extend(page.results);
                    next_token = page.next_page_token;
                    pages += 1;
                }
                Err(e) => {
                    log::warn!("Stopping pagination after {} page(s): {}", pages, e);
                    break;
                }
            }
        }

        log::info!(
            "Google Places search (type={:?}) returned {} results over {} page(s)",
            query.place_type,
            places.len(),
            pages
        );

        Ok(places)
    }

    /// Get detail fields for a specific place
    pub async fn get_place_details(&self, place_id: &str) -> Result<GooglePlace, PickerError> {
        let cache_key = PlacesCache::details_key(place_id);

        if let Some(place) = self.cache.get_json::<GooglePlace>(&cache_key).await {
            return Ok(place);
        }

        log::debug!("Google Places details lookup: place_id={}", place_id);

        let response: DetailsResponse = self
            .get_json(
                "place/details/json",
                &[("place_id", place_id), ("fields", DETAIL_FIELDS)],
            )
            .await?;

        check_status(&response.status, response.error_message)?;

        let place = response.result.ok_or_else(|| {
            PickerError::ExternalApiError(format!("Details status: {}", response.status))
        })?;

        self.cache.set_json(cache_key, &place).await;

        Ok(place)
    }

    /// Resolve a ZIP code or "City, State" to coordinates
    pub async fn geocode_address(&self, address: &str) -> Result<LatLng, PickerError> {
        let cache_key = PlacesCache::geocode_key(address);

        if let Some(location) = self.cache.get_json::<LatLng>(&cache_key).await {
            return Ok(location);
        }

        log::debug!("Geocoding address: {}", address);

        let response: GeocodeResponse = self
            .get_json("geocode/json", &[("address", address)])
            .await?;

        if response.status == "OVER_QUERY_LIMIT" {
            return Err(PickerError::RateLimitExceeded);
        }
        if response.status != "OK" {
            log::warn!(
                "Geocoding '{}' failed: {} {:?}",
                address,
                response.status,
                response.error_message
            );
            return Err(PickerError::GeocodeFailed(address.to_string()));
        }

        let location = response
            .results
            .first()
            .map(|r| LatLng::new(r.geometry.location.lat, r.geometry.location.lng))
            .ok_or_else(|| PickerError::GeocodeFailed(address.to_string()))?;

        self.cache.set_json(cache_key, &location).await;

        Ok(location)
    }
}

#[async_trait]
impl PlacesSource for GooglePlacesClient {
    async fn nearby(&self, query: &NearbyQuery) -> Result<Vec<GooglePlace>, PickerError> {
        self.nearby_search(query).await
    }

    async fn details(&self, place_id: &str) -> Result<GooglePlace, PickerError> {
        self.get_place_details(place_id).await
    }

    async fn geocode(&self, address: &str) -> Result<LatLng, PickerError> {
        self.geocode_address(address).await
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}
