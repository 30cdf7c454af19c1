// src/handlers/picker.rs
// DOCUMENTATION: HTTP handlers for the restaurant picker
// PURPOSE: Parse requests, run the pick pipeline, return localized responses

use crate::config::Config;
use crate::errors::PickerError;
use crate::i18n::Lang;
use crate::models::{
    OptionsQuery, OptionsResponse, PickCriteria, PickQuery, PickResponse, PickStatus, PickedPlace,
};
use crate::services::{PickOutcome, PickerService, PickerSettings, PlacesSource};
use actix_web::{web, HttpResponse, Responder};
use rand::rngs::StdRng;
use rand::SeedableRng;
use validator::Validate;

/// GET /picker/pick
/// Pick one random restaurant matching the filters
pub async fn pick_restaurant(
    config: web::Data<Config>,
    source: web::Data<dyn PlacesSource>,
    query: web::Query<PickQuery>,
) -> Result<impl Responder, PickerError> {
    if let Err(e) = query.validate() {
        return Err(PickerError::ValidationError(e.to_string()));
    }

    if !source.is_configured() {
        return Err(PickerError::NotConfigured);
    }

    let query = query.into_inner();
    let lang = query.lang;
    let criteria = query.into_criteria()?;
    let settings = PickerSettings::from_config(&config);
    let mut rng = StdRng::from_entropy();

    let outcome = match PickerService::pick(source.get_ref(), &criteria, &settings, &mut rng).await {
        Ok(outcome) => outcome,
        Err(e @ (PickerError::RateLimitExceeded | PickerError::GeocodeFailed(_))) => return Err(e),
        Err(e) => {
            log::error!("Pick failed for {:?}: {}", criteria.cuisine, e);
            return Err(PickerError::SearchFailed(lang.strings().search_fail.to_string()));
        }
    };

    Ok(HttpResponse::Ok().json(to_response(outcome, &criteria, lang)))
}

fn to_response(outcome: PickOutcome, criteria: &PickCriteria, lang: Lang) -> PickResponse {
    let strings = lang.strings();
    let message = match outcome.status {
        PickStatus::Picked => None,
        PickStatus::NoResults => Some(strings.no_results),
        PickStatus::NoMatch => Some(strings.no_match),
    };

    PickResponse {
        status: outcome.status,
        message,
        center: outcome.center,
        radius_label: lang.format_radius(criteria.radius),
        place: outcome
            .place
            .as_ref()
            .map(|p| PickedPlace::from_google(p, &outcome.center)),
        stats: outcome.stats,
    }
}

/// GET /picker/options
/// Cuisines, default filters, radius slider and UI strings for one language
pub async fn picker_options(query: web::Query<OptionsQuery>) -> impl Responder {
    HttpResponse::Ok().json(OptionsResponse::for_lang(query.lang))
}

/// Configuration for picker routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/picker")
            .app_data(
                web::QueryConfig::default()
                    .error_handler(|err, _req| PickerError::InvalidInput(err.to_string()).into()),
            )
            .route("/pick", web::get().to(pick_restaurant))
            .route("/options", web::get().to(picker_options)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LatLng;
    use crate::services::filters::tests::place;
    use crate::services::google_places_client::{GoogleGeometry, GoogleLocation, GooglePlace};
    use crate::services::NearbyQuery;
    use actix_web::{http::StatusCode, test, App};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Arc;

    struct StaticSource {
        places: Vec<GooglePlace>,
        fail: bool,
        configured: bool,
        known_address: &'static str,
    }

    #[async_trait]
    impl PlacesSource for StaticSource {
        async fn nearby(&self, _query: &NearbyQuery) -> Result<Vec<GooglePlace>, PickerError> {
            if self.fail {
                return Err(PickerError::ExternalApiError("INVALID_REQUEST".to_string()));
            }
            Ok(self.places.clone())
        }

        async fn details(&self, place_id: &str) -> Result<GooglePlace, PickerError> {
            Err(PickerError::ExternalApiError(format!("no details for {}", place_id)))
        }

        async fn geocode(&self, address: &str) -> Result<LatLng, PickerError> {
            if address != self.known_address {
                return Err(PickerError::GeocodeFailed(address.to_string()));
            }
            Ok(LatLng::new(32.7876, -96.7994))
        }

        fn is_configured(&self) -> bool {
            self.configured
        }
    }

    fn source(places: Vec<GooglePlace>) -> StaticSource {
        StaticSource {
            places,
            fail: false,
            configured: true,
            known_address: "75201",
        }
    }

    async fn call(source: StaticSource, uri: &str) -> (StatusCode, Value) {
        let source: Arc<dyn PlacesSource> = Arc::new(source);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Config::for_tests()))
                .app_data(web::Data::from(source))
                .configure(config),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }

    #[actix_rt::test]
    async fn test_pick_returns_place_with_link() {
        let mut japanese = place("j1", "Tei An", &["japanese_restaurant"], 4.6, 900);
        japanese.geometry = Some(GoogleGeometry {
            location: GoogleLocation {
                lat: 32.79,
                lng: -96.80,
            },
        });

        let (status, body) = call(
            source(vec![japanese]),
            "/picker/pick?cuisine=japanese&address=75201&radius=3218&lang=en",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "picked");
        assert_eq!(body["message"], Value::Null);
        assert_eq!(body["radius_label"], "2 mi");
        assert_eq!(body["center"]["lat"], 32.7876);
        assert_eq!(body["place"]["place_id"], "j1");
        assert_eq!(
            body["place"]["maps_url"],
            "https://www.google.com/maps/search/?api=1&query=Tei%20An&query_place_id=j1"
        );
        assert!(body["place"]["distance_km"].as_f64().unwrap() < 1.0);
    }

    #[actix_rt::test]
    async fn test_no_results_message_is_localized() {
        let (status, body) = call(source(vec![]), "/picker/pick").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "no_results");
        assert_eq!(body["message"], "결과가 없어요. 반경을 늘리거나 조건을 바꿔보세요.");
        assert_eq!(body["radius_label"], "8 km");
    }

    #[actix_rt::test]
    async fn test_upstream_failure_maps_to_search_failed() {
        let mut failing = source(vec![]);
        failing.fail = true;

        let (status, body) = call(failing, "/picker/pick?lang=en").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "SEARCH_FAILED");
        assert_eq!(body["error"]["message"], "Search failed.");
    }

    #[actix_rt::test]
    async fn test_validation_errors() {
        let (status, body) = call(source(vec![]), "/picker/pick?radius=70000").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, body) = call(source(vec![]), "/picker/pick?lat=32.7").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, body) = call(source(vec![]), "/picker/pick?cuisine=french").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
    }

    #[actix_rt::test]
    async fn test_non_finite_numbers_are_validation_errors() {
        let (status, body) = call(source(vec![]), "/picker/pick?lat=NaN&lng=NaN").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, body) = call(source(vec![]), "/picker/pick?min_rating=NaN").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[actix_rt::test]
    async fn test_unknown_address_is_geocode_failure() {
        let (status, body) = call(source(vec![]), "/picker/pick?address=Atlantis").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "GEOCODE_FAILED");
    }

    #[actix_rt::test]
    async fn test_unconfigured_source() {
        let mut unconfigured = source(vec![]);
        unconfigured.configured = false;

        let (status, body) = call(unconfigured, "/picker/pick").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "NOT_CONFIGURED");
    }

    #[actix_rt::test]
    async fn test_options() {
        let (status, body) = call(source(vec![]), "/picker/options?lang=en").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["lang"], "en");
        assert_eq!(body["cuisines"][0]["key"], "korean");
        assert_eq!(body["cuisines"][0]["label"], "Korean");
        assert_eq!(body["defaults"]["min_reviews"], 50);
        assert_eq!(body["radius_slider"]["step"], 1609);
        assert_eq!(body["strings"]["openInMaps"], "Open in Google Maps");
    }
}
