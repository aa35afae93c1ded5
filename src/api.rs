//! HTTP API handlers with Axum and Utoipa.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::directions::UpstreamResponse;
use crate::error::Error;
use crate::filter::{
    apply_filter, find_by_category, find_by_id, matches_title, sort_by_distance, Category,
    FilterCriteria, UserType,
};
use crate::geo::{haversine_km, round2};
use crate::model::AccessibilityRecord;
use crate::server::AppState;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        list_all,
        get_by_id,
        by_category,
        filter,
        nearby,
        search_by_title,
        search_by_title_with_distance,
        accessible_route,
        elevation,
        health
    ),
    components(schemas(AccessibilityRecord, Category, UserType, ErrorResponse)),
    info(
        title = "Jeju Barrier-Free API",
        description = "Accessibility metadata for places in Jeju with geospatial filtering"
    )
)]
struct ApiDoc;

/// Build the Axum router
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health))
        .route("/accessibility", get(list_all))
        .route("/accessibility/filter", get(filter))
        .route("/accessibility/nearby", get(nearby))
        .route("/accessibility/category/{category}", get(by_category))
        .route("/accessibility/search/{title}", get(search_by_title))
        .route(
            "/accessibility/search/{title}/distance",
            get(search_by_title_with_distance),
        )
        .route("/accessibility/{id}", get(get_by_id))
        .route("/routes/accessible", get(accessible_route))
        .route("/routes/elevation", get(elevation))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// ============ Error Mapping ============

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Boundary error: everything a handler can fail with, mapped to a status
/// code and a JSON error body.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => {
                error!("request failed: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

// ============ Data Endpoints ============

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up"))
)]
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// All accessibility records
#[utoipa::path(
    get,
    path = "/accessibility",
    responses(
        (status = 200, description = "Full record set", body = Vec<AccessibilityRecord>),
        (status = 500, description = "Record source unavailable", body = ErrorResponse),
    )
)]
async fn list_all(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AccessibilityRecord>>, ApiError> {
    let records = state.sheets.fetch_records().await?;
    Ok(Json(records))
}

/// Single record by id
#[utoipa::path(
    get,
    path = "/accessibility/{id}",
    params(("id" = String, Path, description = "Record id")),
    responses(
        (status = 200, description = "Record found", body = AccessibilityRecord),
        (status = 404, description = "No record with this id", body = ErrorResponse),
        (status = 500, description = "Record source unavailable", body = ErrorResponse),
    )
)]
async fn get_by_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AccessibilityRecord>, ApiError> {
    let records = state.sheets.fetch_records().await?;
    find_by_id(&records, &id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no record with id {id}")))
}

/// Records in one category
#[utoipa::path(
    get,
    path = "/accessibility/category/{category}",
    params(("category" = String, Path, description = "Category name: TOUR, ACCOMMODATION or RESTAURANT")),
    responses(
        (status = 200, description = "Matching records", body = Vec<AccessibilityRecord>),
        (status = 400, description = "Unknown category", body = ErrorResponse),
        (status = 500, description = "Record source unavailable", body = ErrorResponse),
    )
)]
async fn by_category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<Vec<AccessibilityRecord>>, ApiError> {
    let category = Category::from_str(&category)?;
    let records = state.sheets.fetch_records().await?;
    Ok(Json(find_by_category(&records, category)))
}

/// Query parameters for the filter endpoint. List-valued parameters are
/// comma-separated token lists.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    /// Comma-separated category names (TOUR, ACCOMMODATION, RESTAURANT)
    pub categories: Option<String>,
    /// Comma-separated user types (MOBILITY_IMPAIRED, VISUALLY_IMPAIRED,
    /// HEARING_IMPAIRED, INFANT_ACCOMPANIED)
    pub user_types: Option<String>,
    /// Title substring, case-insensitive
    pub title: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Radius in km, inclusive
    pub radius: Option<f64>,
}

/// Filtered, optionally distance-ranked records
#[utoipa::path(
    get,
    path = "/accessibility/filter",
    params(FilterParams),
    responses(
        (status = 200, description = "Engine output, ascending by distance when a location is given", body = Vec<AccessibilityRecord>),
        (status = 400, description = "Unknown category or user type token", body = ErrorResponse),
        (status = 500, description = "Record source unavailable", body = ErrorResponse),
    )
)]
async fn filter(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<AccessibilityRecord>>, ApiError> {
    let criteria = FilterCriteria {
        categories: parse_tokens(params.categories.as_deref())?,
        user_types: parse_tokens(params.user_types.as_deref())?,
        title: params.title,
        lat: params.lat,
        lon: params.lon,
        radius: params.radius,
    };

    let records = state.sheets.fetch_records().await?;
    Ok(Json(apply_filter(records, &criteria)))
}

fn default_radius() -> f64 {
    1.0
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct NearbyParams {
    pub lat: f64,
    pub lon: f64,
    /// Radius in km, inclusive. Defaults to 1.0.
    #[serde(default = "default_radius")]
    pub radius: f64,
}

/// Records within a radius, nearest first
#[utoipa::path(
    get,
    path = "/accessibility/nearby",
    params(NearbyParams),
    responses(
        (status = 200, description = "Records within the radius, ascending distance", body = Vec<AccessibilityRecord>),
        (status = 500, description = "Record source unavailable", body = ErrorResponse),
    )
)]
async fn nearby(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<Vec<AccessibilityRecord>>, ApiError> {
    let criteria = FilterCriteria {
        lat: Some(params.lat),
        lon: Some(params.lon),
        radius: Some(params.radius),
        ..Default::default()
    };

    let records = state.sheets.fetch_records().await?;
    Ok(Json(apply_filter(records, &criteria)))
}

/// Title substring search
#[utoipa::path(
    get,
    path = "/accessibility/search/{title}",
    params(("title" = String, Path, description = "Title substring, case-insensitive")),
    responses(
        (status = 200, description = "Matching records", body = Vec<AccessibilityRecord>),
        (status = 500, description = "Record source unavailable", body = ErrorResponse),
    )
)]
async fn search_by_title(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
) -> Result<Json<Vec<AccessibilityRecord>>, ApiError> {
    let records = state.sheets.fetch_records().await?;
    let matches: Vec<AccessibilityRecord> = records
        .into_iter()
        .filter(|record| matches_title(record, Some(&title)))
        .collect();
    Ok(Json(matches))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchDistanceParams {
    pub lat: f64,
    pub lon: f64,
}

/// Title search ranked by distance from a point. Records without parsable
/// coordinates are dropped since they cannot be ranked.
#[utoipa::path(
    get,
    path = "/accessibility/search/{title}/distance",
    params(
        ("title" = String, Path, description = "Title substring, case-insensitive"),
        SearchDistanceParams
    ),
    responses(
        (status = 200, description = "Matching records, ascending distance", body = Vec<AccessibilityRecord>),
        (status = 500, description = "Record source unavailable", body = ErrorResponse),
    )
)]
async fn search_by_title_with_distance(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
    Query(params): Query<SearchDistanceParams>,
) -> Result<Json<Vec<AccessibilityRecord>>, ApiError> {
    let records = state.sheets.fetch_records().await?;

    let mut matches: Vec<AccessibilityRecord> = records
        .into_iter()
        .filter(|record| matches_title(record, Some(&title)))
        .filter_map(|mut record| {
            let (rlat, rlon) = record.coordinates()?;
            record.distance = Some(round2(haversine_km(rlat, rlon, params.lat, params.lon)));
            Some(record)
        })
        .collect();

    sort_by_distance(&mut matches);
    Ok(Json(matches))
}

// ============ Directions Proxy ============

#[derive(Debug, Deserialize, IntoParams)]
pub struct RouteParams {
    /// Start coordinate, "lon,lat"
    pub start: String,
    /// End coordinate, "lon,lat"
    pub end: String,
}

/// Walking-directions proxy; the upstream response passes through unmodified.
#[utoipa::path(
    get,
    path = "/routes/accessible",
    params(RouteParams),
    responses(
        (status = 200, description = "Upstream directions response, passed through verbatim"),
        (status = 500, description = "Directions provider unreachable", body = ErrorResponse),
    )
)]
async fn accessible_route(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RouteParams>,
) -> Result<Response, ApiError> {
    let upstream = state
        .directions
        .accessible_route(&params.start, &params.end)
        .await?;
    Ok(passthrough(upstream))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ElevationParams {
    /// Coordinate parameter handed to the elevation provider, "lon,lat"
    pub coordinates: String,
}

/// Elevation proxy; the upstream response passes through unmodified.
#[utoipa::path(
    get,
    path = "/routes/elevation",
    params(ElevationParams),
    responses(
        (status = 200, description = "Upstream elevation response, passed through verbatim"),
        (status = 500, description = "Elevation provider unreachable", body = ErrorResponse),
    )
)]
async fn elevation(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ElevationParams>,
) -> Result<Response, ApiError> {
    let upstream = state.directions.elevation(&params.coordinates).await?;
    Ok(passthrough(upstream))
}

fn passthrough(upstream: UpstreamResponse) -> Response {
    (
        upstream.status,
        [(header::CONTENT_TYPE, "application/json")],
        upstream.body,
    )
        .into_response()
}

/// Parse a comma-separated token list into enum values; any unknown token
/// rejects the whole request.
fn parse_tokens<T: FromStr<Err = Error>>(input: Option<&str>) -> Result<Vec<T>, Error> {
    let Some(input) = input else {
        return Ok(Vec::new());
    };
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(T::from_str)
        .collect()
}
