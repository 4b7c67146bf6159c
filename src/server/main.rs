//! Delivery zone server.
//!
//! Thin HTTP surface over the geometry core for the interactive-map
//! collaborator: the decoded centerline for drawing the ring road, the
//! buffered zone ring for drawing the filled region, and per-point
//! containment checks for marker styling.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ringzone::{decode, ring_road, GeoPoint, ZoneService};

mod config;
use config::Config;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Delivery zone server")]
struct Args {
    /// Listen address (overrides config)
    #[arg(short, long)]
    listen: Option<String>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Application state shared across handlers
struct AppState {
    service: ZoneService,
    zone_config: config::ZoneConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }

    info!("Ringzone Delivery Zone Server");

    // The ring road is essential input: a decode failure is fatal
    let path = match &config.zone.ring_url {
        Some(url) => decode::decode_url(url)?,
        None => ring_road::canonical_path()?,
    };
    let service = ZoneService::with_steps(path, config.zone.steps)?;

    let state = Arc::new(AppState {
        service,
        zone_config: config.zone.clone(),
    });

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/path", get(path_handler))
        .route("/v1/zone", get(zone_handler))
        .route("/v1/check", get(check_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", config.server.listen);

    let listener = tokio::net::TcpListener::bind(&config.server.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        centerline_vertices: state.service.path().len(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    centerline_vertices: usize,
}

/// The decoded centerline, for drawing the ring road and centering the map
async fn path_handler(State(state): State<Arc<AppState>>) -> Json<PathResponse> {
    let center = state.service.center();
    Json(PathResponse {
        center: [center.lat, center.lon],
        coordinates: state
            .service
            .path()
            .points()
            .iter()
            .map(|p| [p.lat, p.lon])
            .collect(),
    })
}

#[derive(Serialize)]
struct PathResponse {
    /// [lat, lon]
    center: [f64; 2],
    /// Centerline vertices, lat-first
    coordinates: Vec<[f64; 2]>,
}

/// The zone polygon's exterior ring at the requested radius
async fn zone_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ZoneQueryParams>,
) -> Result<Json<ZoneResponse>, (StatusCode, String)> {
    let radius_km = validate_radius(&state, params.radius_km)?;

    let zone = spawn_zone_build(state, radius_km).await?;

    Ok(Json(ZoneResponse {
        radius_km,
        ring: zone.ring().iter().map(|p| [p.lat, p.lon]).collect(),
    }))
}

#[derive(Deserialize)]
struct ZoneQueryParams {
    /// Zone radius in kilometers; the configured default when omitted
    radius_km: Option<f64>,
}

#[derive(Serialize)]
struct ZoneResponse {
    radius_km: f64,
    /// Closed exterior ring, lat-first
    ring: Vec<[f64; 2]>,
}

/// Containment check for a candidate point
async fn check_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CheckQueryParams>,
) -> Result<Json<CheckResponse>, (StatusCode, String)> {
    let radius_km = validate_radius(&state, params.radius_km)?;
    let point = GeoPoint::new(params.point_lat, params.point_lon);

    let zone = spawn_zone_build(state, radius_km).await?;

    Ok(Json(CheckResponse {
        contained: zone.contains_point(point),
        radius_km,
    }))
}

#[derive(Deserialize)]
struct CheckQueryParams {
    /// Candidate point latitude
    #[serde(rename = "point.lat")]
    point_lat: f64,
    /// Candidate point longitude
    #[serde(rename = "point.lon")]
    point_lon: f64,
    /// Zone radius in kilometers; the configured default when omitted
    radius_km: Option<f64>,
}

#[derive(Serialize)]
struct CheckResponse {
    contained: bool,
    radius_km: f64,
}

/// Enforce the externally-configured radius range
fn validate_radius(
    state: &AppState,
    radius_km: Option<f64>,
) -> Result<f64, (StatusCode, String)> {
    let radius_km = radius_km.unwrap_or(state.zone_config.default_radius_km);
    let (min, max) = (
        state.zone_config.min_radius_km,
        state.zone_config.max_radius_km,
    );

    if !radius_km.is_finite() || radius_km < min || radius_km > max {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("radius_km must be between {} and {} km", min, max),
        ));
    }
    Ok(radius_km)
}

/// Run the (CPU-bound, pure) buffer build off the async runtime. Stale
/// builds racing a newer radius are discarded by the cache, not installed.
async fn spawn_zone_build(
    state: Arc<AppState>,
    radius_km: f64,
) -> Result<Arc<ringzone::ZonePolygon>, (StatusCode, String)> {
    tokio::task::spawn_blocking(move || state.service.zone(radius_km))
        .await
        .map_err(|e| {
            tracing::error!("Zone build task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?
        .map_err(|e| {
            tracing::error!("Zone computation failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })
}
