//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::domain::{Coordinate, CycleKind, InvalidCoordinate};
use crate::observations::ObservationSource;
use crate::stations::StationSource;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<S, O>(state: AppState<S, O>) -> Router
where
    S: StationSource + 'static,
    O: ObservationSource + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/check/rain", get(check_rain::<S, O>))
        .route("/check/freeze", get(check_freeze::<S, O>))
        .route("/stations", get(candidate_stations::<S, O>))
        .route("/stations/cache/clear", post(clear_station_cache::<S, O>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn check_rain<S, O>(
    State(state): State<AppState<S, O>>,
    query: Result<Query<LocationQuery>, QueryRejection>,
) -> Result<Json<DecisionResponse>, AppError>
where
    S: StationSource + 'static,
    O: ObservationSource + 'static,
{
    check(state, query, CycleKind::Rain).await
}

async fn check_freeze<S, O>(
    State(state): State<AppState<S, O>>,
    query: Result<Query<LocationQuery>, QueryRejection>,
) -> Result<Json<DecisionResponse>, AppError>
where
    S: StationSource + 'static,
    O: ObservationSource + 'static,
{
    check(state, query, CycleKind::Freeze).await
}

/// Run one cycle. Cycles never fail, so only a bad location is an error.
async fn check<S, O>(
    state: AppState<S, O>,
    query: Result<Query<LocationQuery>, QueryRejection>,
    kind: CycleKind,
) -> Result<Json<DecisionResponse>, AppError>
where
    S: StationSource + 'static,
    O: ObservationSource + 'static,
{
    let origin = parse_location(query)?;
    let result = state.engine.run_cycle(kind, origin).await;
    Ok(Json(result.into()))
}

async fn candidate_stations<S, O>(
    State(state): State<AppState<S, O>>,
    query: Result<Query<LocationQuery>, QueryRejection>,
) -> Result<Json<StationsResponse>, AppError>
where
    S: StationSource + 'static,
    O: ObservationSource + 'static,
{
    let origin = parse_location(query)?;
    let stations = state.engine.candidate_stations(&origin).await;
    Ok(Json(StationsResponse { origin, stations }))
}

async fn clear_station_cache<S, O>(State(state): State<AppState<S, O>>) -> StatusCode
where
    S: StationSource + 'static,
    O: ObservationSource + 'static,
{
    state.engine.clear_station_cache().await;
    StatusCode::NO_CONTENT
}

fn parse_location(
    query: Result<Query<LocationQuery>, QueryRejection>,
) -> Result<Coordinate, AppError> {
    let Query(location) = query.map_err(|e| AppError::BadRequest {
        message: e.body_text(),
    })?;
    Ok(location.coordinate()?)
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
}

impl From<InvalidCoordinate> for AppError {
    fn from(e: InvalidCoordinate) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
        };

        warn!(status = %status, error = %message, "Request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
