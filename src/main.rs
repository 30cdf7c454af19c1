// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, Google Maps client and cache, start HTTP server

mod config;
mod errors;
mod handlers;
mod i18n;
mod models;
mod services;

use actix_web::{middleware::Logger, web, App, HttpServer};
use config::Config;
use dotenv::dotenv;
use services::{start_cleanup_task, GooglePlacesClient, PlacesCache, PlacesSource};
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            &config.log_level
        } else {
            "info,actix_web=info"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting food-picker service...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize cache for Google Maps responses
    let cache = Arc::new(PlacesCache::new(config.cache_ttl_seconds));
    log::info!(
        "Initialized Google Maps response cache (TTL: {}s)",
        config.cache_ttl_seconds
    );

    start_cleanup_task(cache.clone(), config.cache_cleanup_interval_seconds);
    log::info!(
        "Started cache cleanup task (interval: {}s)",
        config.cache_cleanup_interval_seconds
    );

    // 5. Google Maps client shared by every worker (one rate limiter)
    let client = match GooglePlacesClient::from_config(&config, cache.clone()) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to build Google Maps client: {}", e);
            std::process::exit(1);
        }
    };
    let source: Arc<dyn PlacesSource> = Arc::new(client);

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_clone = config.clone();

    HttpServer::new(move || {
        App::new()
            // Application state (config, cache and places source)
            .app_data(web::Data::new(config_clone.clone()))
            .app_data(web::Data::new(cache.clone()))
            .app_data(web::Data::from(source.clone()))
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::picker_config)
            .configure(handlers::admin_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
