// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use dotenv::dotenv;
use std::env;
use std::str::FromStr;

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "127.0.0.1")
    pub server_address: String,

    /// Server listen port (default 8003)
    pub server_port: u16,

    /// Environment: development, staging, production
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// Google Maps Platform key (Places + Geocoding)
    pub google_maps_api_key: String,

    /// Google Maps web-service root (overridable for proxies)
    pub google_maps_base_url: String,

    /// Admin authentication token (for cache endpoints)
    pub admin_token: String,

    /// Search center used when a request has neither coordinates nor address
    pub default_center_lat: f64,
    pub default_center_lng: f64,

    /// TTL for cached upstream responses
    pub cache_ttl_seconds: u64,

    /// Interval of the background cache cleanup
    pub cache_cleanup_interval_seconds: u64,

    /// Outbound request budget shared by every Google call
    pub google_requests_per_second: u32,

    /// Result pages followed per nearby search (Google serves at most 3)
    pub nearby_max_pages: u32,

    /// Maximum detail lookups during cuisine confirmation
    pub detail_lookup_limit: usize,

    /// Timeout for a single outbound request
    pub http_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        dotenv().ok();

        Config {
            server_address: env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),

            server_port: parse_or("SERVER_PORT", 8003),

            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            google_maps_api_key: env::var("GOOGLE_MAPS_API_KEY")
                .or_else(|_| env::var("GOOGLE_PLACES_API_KEY"))
                .unwrap_or_default(),

            google_maps_base_url: env::var("GOOGLE_MAPS_BASE_URL")
                .unwrap_or_else(|_| "https://maps.googleapis.com/maps/api".to_string()),

            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "admin-token-dev".to_string()),

            // Dallas, TX
            default_center_lat: parse_or("DEFAULT_CENTER_LAT", 32.7767),
            default_center_lng: parse_or("DEFAULT_CENTER_LNG", -96.7970),

            cache_ttl_seconds: parse_or("CACHE_TTL_SECONDS", 3600),

            cache_cleanup_interval_seconds: parse_or("CACHE_CLEANUP_INTERVAL_SECONDS", 300),

            google_requests_per_second: parse_or("GOOGLE_REQUESTS_PER_SECOND", 10),

            nearby_max_pages: parse_or("NEARBY_MAX_PAGES", 1),

            detail_lookup_limit: parse_or("DETAIL_LOOKUP_LIMIT", 50),

            http_timeout_seconds: parse_or("HTTP_TIMEOUT_SECONDS", 15),
        }
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures application can start safely
    pub fn validate(&self) -> Result<(), String> {
        if !(-90.0..=90.0).contains(&self.default_center_lat)
            || !(-180.0..=180.0).contains(&self.default_center_lng)
        {
            return Err(format!(
                "DEFAULT_CENTER_LAT/LNG out of range: {},{}",
                self.default_center_lat, self.default_center_lng
            ));
        }

        if self.nearby_max_pages == 0 || self.nearby_max_pages > 3 {
            return Err("NEARBY_MAX_PAGES must be between 1 and 3".to_string());
        }

        if self.google_requests_per_second == 0 {
            return Err("GOOGLE_REQUESTS_PER_SECOND must be positive".to_string());
        }

        if self.google_maps_api_key.is_empty() {
            log::warn!("GOOGLE_MAPS_API_KEY not configured - picks will not work");
        }

        Ok(())
    }
}

/// Read and parse a variable, falling back to `default` when unset or malformed
fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Invalid value for {}: {:?}, using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
impl Config {
    /// Configuration used by unit tests: no key, no environment lookups
    pub fn for_tests() -> Self {
        Config {
            server_address: "127.0.0.1".to_string(),
            server_port: 8003,
            environment: "test".to_string(),
            log_level: "debug".to_string(),
            google_maps_api_key: String::new(),
            google_maps_base_url: "https://maps.googleapis.com/maps/api".to_string(),
            admin_token: "test-admin".to_string(),
            default_center_lat: 32.7767,
            default_center_lng: -96.7970,
            cache_ttl_seconds: 60,
            cache_cleanup_interval_seconds: 300,
            google_requests_per_second: 10,
            nearby_max_pages: 1,
            detail_lookup_limit: 50,
            http_timeout_seconds: 5,
        }
    }
}
