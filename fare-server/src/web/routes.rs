//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::aggregator::{AggregateError, Mode};
use crate::domain::{SortOrder, sort_offerings};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/search", post(search_services))
        .route("/api/compare", post(compare_fares))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// List services on a route from every provider, sorted and capped.
async fn search_services(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let Json(req) = payload?;

    let (Some(from), Some(to), Some(date)) = (
        required(&req.from_city),
        required(&req.to_city),
        required(&req.travel_date),
    ) else {
        return Err(AppError::missing_parameters());
    };

    let order = match req.sort_order.as_deref() {
        None => SortOrder::default(),
        Some(s) => SortOrder::parse(s).ok_or_else(|| AppError::BadRequest {
            message: format!("Unknown sort order: {s}"),
        })?,
    };

    let result = state
        .aggregator
        .aggregate(from, to, date, Mode::ServiceListing)
        .await?;
    let listing = result.as_services().ok_or_else(|| AppError::Internal {
        message: "cached result has the wrong shape".to_string(),
    })?;

    let mut offerings = listing.offerings.clone();
    sort_offerings(&mut offerings, order);
    offerings.truncate(state.max_services);

    Ok(Json(SearchResponse::new(offerings, listing)))
}

/// Compare the cheapest fare each provider quotes for a route.
async fn compare_fares(
    State(state): State<AppState>,
    payload: Result<Json<CompareRequest>, JsonRejection>,
) -> Result<Json<CompareResponse>, AppError> {
    let Json(req) = payload?;

    let (Some(from), Some(to), Some(date)) = (
        required(&req.from_city),
        required(&req.to_city),
        required(&req.travel_date),
    ) else {
        return Err(AppError::missing_parameters());
    };

    let result = state
        .aggregator
        .aggregate(from, to, date, Mode::FareComparison)
        .await?;
    let comparison = result.as_fares().ok_or_else(|| AppError::Internal {
        message: "cached result has the wrong shape".to_string(),
    })?;

    Ok(Json(CompareResponse::from(comparison)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl AppError {
    fn missing_parameters() -> Self {
        AppError::BadRequest {
            message: "Missing parameters".to_string(),
        }
    }
}

impl From<AggregateError> for AppError {
    fn from(e: AggregateError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::BadRequest {
            message: e.body_text(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => {
                warn!(%message, "Bad request");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Internal { message } => {
                error!(%message, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
