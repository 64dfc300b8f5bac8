//! Query server for nearby places.
//!
//! Provides HTTP API for discovery around a point, the compass "radar"
//! grouping and the heading-filtered "ahead" view.

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
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use bearings::direction::{ahead_of, group_by_direction, CardinalGroup, DEFAULT_TOLERANCE_DEG};
use bearings::discovery::{Coordinator, Delivered, Discovery, DiscoveryError, DiscoveryRequest, DEFAULT_LIMIT};
use bearings::overpass::DEFAULT_RADIUS_M;
use bearings::config::FallbackKind;
use bearings::{Config, Coordinate, Overrides, Place};

/// Upper bound on `limit` accepted from clients
const MAX_LIMIT: usize = 100;

#[derive(Parser, Debug)]
#[command(name = "query")]
#[command(about = "Nearby points of interest query server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: String,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overpass endpoint URL; repeat to set the failover order
    #[arg(long = "endpoint")]
    endpoints: Vec<String>,

    /// Fallback strategy when no live data is available
    #[arg(long, value_enum)]
    fallback: Option<FallbackKind>,

    /// Preferred name language (e.g. "en")
    #[arg(long)]
    language: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Application state shared across handlers
struct AppState {
    coordinator: Coordinator,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Bearings Query Server");

    let mut config = Config::load(args.config.as_deref())?;
    config.apply(Overrides {
        endpoints: args.endpoints.clone(),
        fallback: args.fallback,
        language: args.language.clone(),
    })?;
    let coordinator = config.build_coordinator()?;
    for endpoint in &coordinator.settings().endpoints {
        info!("Endpoint: {}", endpoint);
    }
    info!("Fallback strategy: {}", coordinator.fallback_name());

    let state = Arc::new(AppState { coordinator });

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/nearby", get(nearby_handler))
        .route("/v1/radar", get(radar_handler))
        .route("/v1/ahead", get(ahead_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let settings = state.coordinator.settings();
    Json(HealthResponse {
        status: "ok",
        endpoints: settings.endpoints.iter().map(|e| e.name.clone()).collect(),
        fallback: state.coordinator.fallback_name(),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    endpoints: Vec<String>,
    fallback: &'static str,
}

/// Run a discovery that is cancelled if the client goes away
async fn run_discovery(
    state: &AppState,
    params: &NearbyQueryParams,
) -> Result<(Coordinate, Discovery), (StatusCode, String)> {
    let center = Coordinate::new(params.lat, params.lon);
    let request = DiscoveryRequest {
        center,
        radius_m: params.radius.unwrap_or(DEFAULT_RADIUS_M),
        term: params.q.clone(),
        limit: params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT),
    };

    // Dropping the handler future (client disconnect) cancels the discovery
    let token = CancellationToken::new();
    let _guard = token.clone().drop_guard();

    let discovery = state
        .coordinator
        .discover(&request, &token)
        .await
        .map_err(|e| match e {
            DiscoveryError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, e.to_string()),
            DiscoveryError::Cancelled => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
        })?;

    Ok((center, discovery))
}

/// Places around a point, nearest first
async fn nearby_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearbyQueryParams>,
) -> Result<Json<NearbyResponse>, (StatusCode, String)> {
    let (_, discovery) = run_discovery(&state, &params).await?;

    Ok(Json(NearbyResponse {
        outcome: discovery.outcome,
        places: discovery.places,
        fetched_at: Utc::now(),
    }))
}

/// Places bucketed by compass octant
async fn radar_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearbyQueryParams>,
) -> Result<Json<RadarResponse>, (StatusCode, String)> {
    let (center, discovery) = run_discovery(&state, &params).await?;
    let groups = group_by_direction(&discovery.places, &center);

    Ok(Json(RadarResponse {
        outcome: discovery.outcome,
        groups,
        fetched_at: Utc::now(),
    }))
}

/// Places in front of the device, nearest first
async fn ahead_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AheadQueryParams>,
) -> Result<Json<NearbyResponse>, (StatusCode, String)> {
    if !params.heading.is_finite() {
        return Err((StatusCode::BAD_REQUEST, "heading must be a finite number".to_string()));
    }
    let nearby = NearbyQueryParams {
        lat: params.lat,
        lon: params.lon,
        radius: params.radius,
        q: params.q.clone(),
        limit: params.limit,
    };
    let (center, discovery) = run_discovery(&state, &nearby).await?;
    let tolerance = params.tolerance.unwrap_or(DEFAULT_TOLERANCE_DEG);
    let places = ahead_of(&discovery, &center, params.heading, tolerance);

    Ok(Json(NearbyResponse {
        outcome: discovery.outcome,
        places,
        fetched_at: Utc::now(),
    }))
}

#[derive(Deserialize)]
struct NearbyQueryParams {
    /// Observer latitude
    lat: f64,
    /// Observer longitude
    lon: f64,
    /// Search radius in meters (defaults to 1000)
    radius: Option<u32>,
    /// Free-text name search
    q: Option<String>,
    /// Number of results
    limit: Option<usize>,
}

#[derive(Deserialize)]
struct AheadQueryParams {
    lat: f64,
    lon: f64,
    radius: Option<u32>,
    q: Option<String>,
    limit: Option<usize>,
    /// Device heading in degrees from true north
    heading: f64,
    /// Half-width of the view cone in degrees (defaults to 45)
    tolerance: Option<f64>,
}

#[derive(Serialize)]
struct NearbyResponse {
    outcome: Delivered,
    places: Vec<Place>,
    fetched_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct RadarResponse {
    outcome: Delivered,
    groups: Vec<CardinalGroup>,
    fetched_at: DateTime<Utc>,
}
