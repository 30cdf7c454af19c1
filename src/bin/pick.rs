// src/bin/pick.rs
// DOCUMENTATION: Terminal client for the food-picker service
// PURPOSE: Ask a running server for one random restaurant and print it
use anyhow::{bail, Context, Result};
use clap::Parser;
use dotenv::dotenv;
use reqwest::Client;
use serde::Deserialize;
use std::process;
use std::time::{Duration, Instant};

// --- ANSI colors ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";

#[derive(Parser, Debug)]
#[command(name = "pick", about = "Pick a random restaurant near you", version)]
struct Args {
    /// Base URL of the food-picker service
    #[arg(long, env = "PICKER_API_URL", default_value = "http://localhost:8003")]
    url: String,

    /// korean, japanese, chinese, asian_other, western or any
    #[arg(short, long, default_value = "korean")]
    cuisine: String,

    /// Free-form address or ZIP code
    #[arg(short, long, conflicts_with_all = ["lat", "lng"])]
    address: Option<String>,

    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    lat: Option<f64>,

    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lng: Option<f64>,

    /// Search radius in meters
    #[arg(short, long)]
    radius: Option<u32>,

    /// Only places open right now
    #[arg(long)]
    open_now: bool,

    #[arg(long)]
    min_rating: Option<f32>,

    #[arg(long)]
    min_reviews: Option<u32>,

    /// ko or en
    #[arg(short, long, default_value = "ko")]
    lang: String,
}

// --- Response shapes ---

#[derive(Deserialize, Debug)]
struct PickResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    center: Center,
    radius_label: String,
    #[serde(default)]
    place: Option<Place>,
    stats: Stats,
}

#[derive(Deserialize, Debug)]
struct Center {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize, Debug)]
struct Place {
    name: String,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    rating: Option<f32>,
    #[serde(default)]
    user_ratings_total: Option<u32>,
    #[serde(default)]
    is_open: Option<bool>,
    #[serde(default)]
    distance_km: Option<f64>,
    maps_url: String,
}

#[derive(Deserialize, Debug, Default)]
struct Stats {
    #[serde(default)]
    searched: usize,
    #[serde(default)]
    after_type_filter: usize,
    #[serde(default)]
    after_exclusions: usize,
    #[serde(default)]
    detail_lookups: usize,
    #[serde(default)]
    after_confirmation: usize,
    #[serde(default)]
    confirmation_fallback: bool,
    #[serde(default)]
    after_thresholds: usize,
    #[serde(default)]
    thresholds_relaxed: bool,
}

#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    code: String,
    message: String,
}

struct PickerClient {
    base_url: String,
    client: Client,
}

impl PickerClient {
    fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn check_service_health(&self) -> bool {
        match self.client.get(format!("{}/health", self.base_url)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    async fn pick(&self, args: &Args) -> Result<PickResponse> {
        let url = format!("{}/picker/pick", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&query_params(args))
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<PickResponse>()
                .await
                .context("Failed to parse pick response");
        }

        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => bail!("{} ({})", envelope.error.message, envelope.error.code),
            Err(_) => bail!("HTTP {} - {}", status, body),
        }
    }
}

fn query_params(args: &Args) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("cuisine", args.cuisine.clone()),
        ("lang", args.lang.clone()),
        ("open_now", args.open_now.to_string()),
    ];

    if let (Some(lat), Some(lng)) = (args.lat, args.lng) {
        params.push(("lat", lat.to_string()));
        params.push(("lng", lng.to_string()));
    } else if let Some(address) = &args.address {
        params.push(("address", address.clone()));
    }
    if let Some(radius) = args.radius {
        params.push(("radius", radius.to_string()));
    }
    if let Some(min_rating) = args.min_rating {
        params.push(("min_rating", min_rating.to_string()));
    }
    if let Some(min_reviews) = args.min_reviews {
        params.push(("min_reviews", min_reviews.to_string()));
    }

    params
}

fn print_place(resp: &PickResponse) {
    println!(
        "{}📍 Center {:.4}, {:.4} · radius {}{}",
        CYAN, resp.center.lat, resp.center.lng, resp.radius_label, RESET
    );

    let Some(place) = &resp.place else {
        let message = resp.message.as_deref().unwrap_or(resp.status.as_str());
        println!("\n{}🤷 {}{}", YELLOW, message, RESET);
        return;
    };

    println!("\n{}🍽️  {}{}", BOLD, place.name, RESET);
    if let Some(address) = &place.address {
        println!("   {}", address);
    }

    let rating = place
        .rating
        .map(|r| format!("{:.1}", r))
        .unwrap_or_else(|| "-".to_string());
    let reviews = place.user_ratings_total.unwrap_or(0);
    println!("   {}⭐ {}{} ({} reviews)", YELLOW, rating, RESET, reviews);

    match place.is_open {
        Some(true) => println!("   {}● open now{}", GREEN, RESET),
        Some(false) => println!("   {}● closed{}", RED, RESET),
        None => {}
    }
    if let Some(km) = place.distance_km {
        println!("   {}{:.1} km away{}", BLUE, km, RESET);
    }

    println!("\n   {}{}{}", MAGENTA, place.maps_url, RESET);
}

fn print_stats(stats: &Stats, elapsed: f64) {
    println!("\n{}📊 Pipeline{}", BOLD, RESET);
    println!("──────────────────────────────────────────");
    println!("{:<28} {:>10}", "Searched", stats.searched);
    println!("{:<28} {:>10}", "After type filter", stats.after_type_filter);
    println!("{:<28} {:>10}", "After exclusions", stats.after_exclusions);
    if stats.detail_lookups > 0 {
        println!("{:<28} {:>10}", "Detail lookups", stats.detail_lookups);
        println!("{:<28} {:>10}", "Confirmed", stats.after_confirmation);
    }
    println!("{:<28} {:>10}", "After thresholds", stats.after_thresholds);
    println!("──────────────────────────────────────────");

    if stats.confirmation_fallback {
        println!("{}⚠️  Few confirmed matches, used type-tagged places{}", YELLOW, RESET);
    }
    if stats.thresholds_relaxed {
        println!("{}⚠️  Nothing met rating/review minimums, thresholds relaxed{}", YELLOW, RESET);
    }
    println!("⏱️  {:.1}s", elapsed);
}

async fn run(args: Args) -> Result<()> {
    let client = PickerClient::new(&args.url)?;

    println!("\n{}🔍 Checking service status...{}", CYAN, RESET);
    if !client.check_service_health().await {
        println!("{}❌ Service unavailable at {}.{}", RED, client.base_url, RESET);
        println!("{}Please ensure food-picker is running (cargo run){}", YELLOW, RESET);
        process::exit(1);
    }
    println!("{}✅ Service available{}\n", GREEN, RESET);

    let started = Instant::now();
    let resp = client.pick(&args).await?;

    print_place(&resp);
    print_stats(&resp.stats, started.elapsed().as_secs_f64());
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let args = Args::parse();

    if let Err(e) = run(args).await {
        println!("{}❌ {:#}{}", RED, e, RESET);
        process::exit(1);
    }
}
