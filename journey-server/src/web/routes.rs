//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::changes::detect;
use crate::domain::{BoardKind, JourneyDetails, PinnedJourneySnapshot, StationCode, TrainNumber};
use crate::enrich::EnrichError;
use crate::tracker::{StoreError, TrackerError, TrackerStatus};
use crate::upstream::{RailSource, UpstreamError, parse_timestamp};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<S: RailSource + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/journeys", get(journeys::<S>))
        .route("/api/trains/:number", get(train_details::<S>))
        .route(
            "/api/pinned",
            get(pinned_status::<S>)
                .put(pin_journey::<S>)
                .delete(unpin_journey::<S>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Enriched station board with destination changes.
async fn journeys<S: RailSource + 'static>(
    State(state): State<AppState<S>>,
    Query(req): Query<JourneysQuery>,
) -> Result<Json<BoardResponse>, AppError> {
    let station = StationCode::parse_normalized(&req.station).map_err(|e| AppError::BadRequest {
        message: format!("Invalid station {:?}: {}", req.station, e),
    })?;

    let kind = match req.kind.as_deref() {
        None => BoardKind::Departures,
        Some(k) => BoardKind::parse(k).ok_or_else(|| AppError::BadRequest {
            message: format!("Invalid board type {k:?}: expected departures or arrivals"),
        })?,
    };

    let date_time = req
        .date_time
        .as_deref()
        .map(parse_timestamp)
        .transpose()
        .map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?;

    let board = state
        .enricher
        .get_enriched_journeys(&station, kind, date_time)
        .await?;

    let index = state.stations.snapshot().await;
    let journeys = board
        .journeys
        .into_iter()
        .map(|journey| {
            let destination_change = detect(&journey, &index);
            JourneyView {
                journey,
                destination_change,
            }
        })
        .collect();

    Ok(Json(BoardResponse {
        journeys,
        disruptions: board.disruptions,
    }))
}

/// Stop list and notes of one train.
async fn train_details<S: RailSource + 'static>(
    State(state): State<AppState<S>>,
    Path(number): Path<String>,
) -> Result<Json<JourneyDetails>, AppError> {
    let train = TrainNumber::parse(&number).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;

    match state.enricher.get_journey_details(train).await? {
        Some(details) => Ok(Json(details)),
        None => Err(AppError::NotFound {
            message: format!("Train {train} is not active"),
        }),
    }
}

async fn pinned_status<S: RailSource + 'static>(
    State(state): State<AppState<S>>,
) -> Json<TrackerStatus> {
    Json(state.tracker.status())
}

async fn pin_journey<S: RailSource + 'static>(
    State(state): State<AppState<S>>,
    Json(snapshot): Json<PinnedJourneySnapshot>,
) -> Result<Json<TrackerStatus>, AppError> {
    state.tracker.pin(snapshot)?;
    Ok(Json(state.tracker.status()))
}

async fn unpin_journey<S: RailSource + 'static>(
    State(state): State<AppState<S>>,
) -> Result<StatusCode, AppError> {
    state.tracker.unpin()?;
    Ok(StatusCode::NO_CONTENT)
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    /// Upstream failed; the request itself was fine
    BadGateway { message: String },
    /// The server cannot reach upstream at all (missing credentials)
    Unavailable { message: String },
    Internal { message: String },
}

impl From<EnrichError> for AppError {
    fn from(e: EnrichError) -> Self {
        if e.is_configuration() {
            AppError::Unavailable {
                message: e.public_message(),
            }
        } else {
            AppError::BadGateway {
                message: e.public_message(),
            }
        }
    }
}

impl From<UpstreamError> for AppError {
    fn from(e: UpstreamError) -> Self {
        if e.is_configuration() {
            AppError::Unavailable {
                message: crate::enrich::GENERIC_UNAVAILABLE_MESSAGE.to_string(),
            }
        } else {
            AppError::BadGateway {
                message: e.to_string(),
            }
        }
    }
}

impl From<TrackerError> for AppError {
    fn from(e: TrackerError) -> Self {
        match e {
            TrackerError::InvalidOrigin(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            TrackerError::Store(e) => e.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %message, "Request failed");
        } else {
            debug!(status = status.as_u16(), error = %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
