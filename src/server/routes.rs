//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::error::Error;
use crate::geo::Coordinates;
use crate::poi::{available_categories, CategoryInfo, PoiCategory, PoisByCategory};
use crate::search::keywords::known_keywords;
use crate::search::{SearchParams, SearchResult};
use crate::server::state::AppState;
use crate::zone::ZonePolygon;

use axum::{
    extract::{Query, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/zones", get(zones_handler))
        .route("/api/zones/locate", get(locate_handler))
        .route("/api/categories", get(categories_handler))
        .route("/api/pois", get(pois_handler))
        .route("/api/search", post(search_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the configured frontend origins; unparseable origins are skipped
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn not_found(error: impl Into<String>) -> Self {
        ApiError {
            error: error.into(),
            code: "NOT_FOUND".to_string(),
        }
    }

    fn invalid_query(error: impl Into<String>) -> Self {
        ApiError {
            error: error.into(),
            code: "INVALID_QUERY".to_string(),
        }
    }

    fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "INTERNAL_ERROR" => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        if !err.is_invalid_input() {
            warn!(error = %err, "Request failed");
        }
        let code = match &err {
            Error::InvalidCoordinates(_) => "INVALID_COORDINATES",
            Error::UnknownCategory(_) => "UNKNOWN_CATEGORY",
            Error::UnknownZone(_) => "UNKNOWN_ZONE",
            Error::InvalidQuery(_) => "INVALID_QUERY",
            _ => "INTERNAL_ERROR",
        };
        ApiError {
            error: err.to_string(),
            code: code.to_string(),
        }
    }
}

/// Health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub zones: usize,
    pub uptime_secs: u64,
}

/// Health check
///
/// GET /health
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        zones: state.zones.len(),
        uptime_secs: state.uptime_secs(),
    })
}

/// Zones list response
#[derive(Debug, Serialize, Deserialize)]
pub struct ZonesResponse {
    pub zones: Vec<ZonePolygon>,
}

/// List all zones in registry order
///
/// GET /api/zones
async fn zones_handler(State(state): State<Arc<AppState>>) -> Json<ZonesResponse> {
    Json(ZonesResponse {
        zones: state.zones.all().to_vec(),
    })
}

/// Point query parameters
#[derive(Debug, Deserialize)]
pub struct LocateQuery {
    pub lat: f64,
    pub lon: f64,
}

/// Find the zone containing a point
///
/// GET /api/zones/locate?lat=..&lon=..
async fn locate_handler(
    State(state): State<Arc<AppState>>,
    Query(q): Query<LocateQuery>,
) -> Result<Json<ZonePolygon>, ApiError> {
    let point = Coordinates::checked(q.lat, q.lon)?;

    state
        .zones
        .containing(point)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("No zone contains ({}, {})", q.lat, q.lon)))
}

/// Categories list response
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryInfo>,
    /// Search words answered from tagged OSM data
    pub keywords: Vec<String>,
}

/// List POI categories
///
/// GET /api/categories
async fn categories_handler() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: available_categories(),
        keywords: known_keywords().into_iter().map(str::to_string).collect(),
    })
}

/// POI query parameters
#[derive(Debug, Deserialize)]
pub struct PoisQuery {
    /// Zone name; alternatively give `lat`/`lon` inside a zone
    pub zone: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Comma-separated category keys; all categories when absent
    pub categories: Option<String>,
    pub user_lat: Option<f64>,
    pub user_lon: Option<f64>,
}

/// POI lookup response
#[derive(Debug, Serialize, Deserialize)]
pub struct PoisResponse {
    pub zone: String,
    pub pois: PoisByCategory,
    pub count: usize,
}

/// POIs inside a zone
///
/// GET /api/pois
async fn pois_handler(
    State(state): State<Arc<AppState>>,
    Query(q): Query<PoisQuery>,
) -> Result<Json<PoisResponse>, ApiError> {
    let zone = match (&q.zone, q.lat, q.lon) {
        (Some(name), _, _) => state.zones.require(name)?,
        (None, Some(lat), Some(lon)) => {
            let point = Coordinates::checked(lat, lon)?;
            state
                .zones
                .containing(point)
                .ok_or_else(|| ApiError::not_found(format!("No zone contains ({}, {})", lat, lon)))?
        }
        _ => return Err(ApiError::invalid_query("Provide a zone name or lat and lon")),
    };

    let categories = q
        .categories
        .as_deref()
        .map(PoiCategory::parse_list)
        .transpose()?;

    let user = match (q.user_lat, q.user_lon) {
        (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
        (None, None) => None,
        _ => return Err(ApiError::invalid_query("user_lat and user_lon must be given together")),
    };

    let pois = state
        .pois
        .get_pois(zone, categories.as_deref(), user)
        .await?;
    let count = pois.values().map(Vec::len).sum();

    Ok(Json(PoisResponse {
        zone: zone.name.clone(),
        pois,
        count,
    }))
}

/// Search request body
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub lat: f64,
    pub lon: f64,
    pub limit: Option<usize>,
    pub radius_km: Option<f64>,
}

/// Search response
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub count: usize,
}

/// Free-text place search
///
/// POST /api/search
async fn search_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let defaults = &state.config.search;
    let params = SearchParams {
        origin: Coordinates::new(req.lat, req.lon),
        limit: req
            .limit
            .unwrap_or(defaults.default_limit)
            .clamp(1, defaults.max_limit.max(1)),
        radius_km: req.radius_km.unwrap_or(defaults.default_radius_km),
    };

    let results = state.search.search(&req.query, params).await?;

    if results.is_empty() {
        return Err(ApiError::not_found(format!(
            "No places found for query: {}",
            req.query
        )));
    }

    Ok(Json(SearchResponse {
        count: results.len(),
        results,
    }))
}
