// src/handlers/admin.rs
// DOCUMENTATION: Admin handlers for the upstream response cache
// PURPOSE: Inspect and flush cached Google Maps responses

use crate::config::Config;
use crate::errors::PickerError;
use crate::services::PlacesCache;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use std::sync::Arc;

/// GET /admin/cache/stats
/// Entry counts of the response cache
pub async fn cache_stats(
    config: web::Data<Config>,
    cache: web::Data<Arc<PlacesCache>>,
    req: HttpRequest,
) -> Result<impl Responder, PickerError> {
    verify_admin_token(&req, &config)?;

    let stats = cache.stats().await;
    Ok(HttpResponse::Ok().json(stats))
}

/// POST /admin/cache/clear
/// Drop every cached response
pub async fn clear_cache(
    config: web::Data<Config>,
    cache: web::Data<Arc<PlacesCache>>,
    req: HttpRequest,
) -> Result<impl Responder, PickerError> {
    verify_admin_token(&req, &config)?;

    let removed = cache.clear().await;
    log::info!("Admin cleared the response cache ({} entries)", removed);

    Ok(HttpResponse::Ok().json(json!({ "removed_entries": removed })))
}

/// Helper function to verify admin authentication
/// DOCUMENTATION: Checks X-Admin-Token header against configured admin token
fn verify_admin_token(req: &HttpRequest, config: &Config) -> Result<(), PickerError> {
    let token = req
        .headers()
        .get("X-Admin-Token")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            log::warn!("Admin request without token");
            PickerError::Unauthorized
        })?;

    if token != config.admin_token {
        log::warn!("Admin request with invalid token");
        return Err(PickerError::Forbidden);
    }

    Ok(())
}

/// Configuration for admin routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/cache/stats", web::get().to(cache_stats))
            .route("/cache/clear", web::post().to(clear_cache)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;

    #[actix_rt::test]
    async fn test_admin_routes_require_token() {
        let cache = Arc::new(PlacesCache::new(60));
        cache.set("details:abc".to_string(), "{}".to_string()).await;

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(Config::for_tests()))
                .app_data(web::Data::new(cache.clone()))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/admin/cache/stats").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/admin/cache/stats")
            .insert_header(("X-Admin-Token", "wrong"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::get()
            .uri("/admin/cache/stats")
            .insert_header(("X-Admin-Token", "test-admin"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["active_entries"], 1);

        let req = test::TestRequest::post()
            .uri("/admin/cache/clear")
            .insert_header(("X-Admin-Token", "test-admin"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["removed_entries"], 1);
        assert_eq!(cache.stats().await.total_entries, 0);
    }
}
