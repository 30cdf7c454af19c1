// src/handlers/health.rs
// DOCUMENTATION: Health check handler
// PURPOSE: Simple endpoint to verify service status

use crate::services::PlacesSource;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

pub async fn health_check(source: web::Data<dyn PlacesSource>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "food-picker",
        "version": env!("CARGO_PKG_VERSION"),
        "maps_configured": source.is_configured()
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
