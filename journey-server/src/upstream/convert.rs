//! Conversion from upstream DTOs to domain types.
//!
//! This module handles the transformation of raw upstream responses into
//! our validated domain types. Board rows that cannot be converted are
//! skipped with a warning rather than failing the whole board; a missing
//! board list is an error.

use chrono::{DateTime, FixedOffset};
use tracing::{debug, warn};

use crate::domain::{
    BoardKind, Composition, Disruption, DisruptionKind, Journey, JourneyDetails, Note, Product,
    RollingStockId, RouteStation, ServiceMessage, Stop, StopEvent, Timespan, TrainNumber, Unit,
};

use super::types::{
    BoardItem, BoardPayload, CompositionDto, DisruptionDto, Envelope, JourneyDetailsPayload,
    LabelDto, StopEventDto,
};

/// Upstream timestamp format, e.g. "2024-03-15T10:00:00+0100".
const UPSTREAM_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// Failed to parse a timestamp
    #[error("invalid time: {0}")]
    InvalidTime(String),

    /// Failed to parse a train number
    #[error("invalid train number: {0}")]
    InvalidTrainNumber(String),

    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Parse an upstream timestamp.
///
/// Upstream sends offsets without a colon (`+0100`); RFC 3339 is accepted
/// as well.
pub fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>, ConversionError> {
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, UPSTREAM_TIME_FORMAT))
        .map_err(|_| ConversionError::InvalidTime(s.to_string()))
}

/// Parse an optional timestamp, dropping unparseable values.
fn parse_optional_timestamp(s: Option<&str>) -> Option<DateTime<FixedOffset>> {
    let s = s?;
    match parse_timestamp(s) {
        Ok(t) => Some(t),
        Err(e) => {
            debug!(error = %e, "Ignoring unparseable timestamp");
            None
        }
    }
}

/// Convert a departures or arrivals response to journeys.
///
/// Fails only when the board list itself is absent.
pub fn convert_board(
    envelope: &Envelope<BoardPayload>,
    kind: BoardKind,
) -> Result<Vec<Journey>, ConversionError> {
    let payload = envelope
        .payload
        .as_ref()
        .ok_or(ConversionError::MissingField("payload"))?;

    let items = match kind {
        BoardKind::Departures => payload
            .departures
            .as_deref()
            .ok_or(ConversionError::MissingField("payload.departures"))?,
        BoardKind::Arrivals => payload
            .arrivals
            .as_deref()
            .ok_or(ConversionError::MissingField("payload.arrivals"))?,
    };

    let mut results = Vec::with_capacity(items.len());

    for item in items {
        match convert_board_item(item) {
            Ok(journey) => results.push(journey),
            Err(e) => {
                warn!(
                    name = item.name.as_deref().unwrap_or("?"),
                    error = %e,
                    "Skipping board row"
                );
            }
        }
    }

    Ok(results)
}

/// Convert a single board row.
pub fn convert_board_item(item: &BoardItem) -> Result<Journey, ConversionError> {
    let product = item
        .product
        .as_ref()
        .ok_or(ConversionError::MissingField("product"))?;

    let number_str = product
        .number
        .as_deref()
        .ok_or(ConversionError::MissingField("product.number"))?;
    let number = TrainNumber::parse(number_str)
        .map_err(|_| ConversionError::InvalidTrainNumber(number_str.to_string()))?;

    let category = product
        .category_code
        .clone()
        .or_else(|| item.train_category.clone())
        .or_else(|| product.short_category_name.clone())
        .unwrap_or_default();

    let operator = product
        .operator_name
        .clone()
        .or_else(|| product.operator_code.clone())
        .unwrap_or_default();

    let planned = item
        .planned_date_time
        .as_deref()
        .ok_or(ConversionError::MissingField("plannedDateTime"))?;
    let planned = parse_timestamp(planned)?;

    // Upstream omits the live time when the train runs to plan
    let actual = parse_optional_timestamp(item.actual_date_time.as_deref()).unwrap_or(planned);

    let route = item
        .route_stations
        .iter()
        .filter_map(|s| {
            Some(RouteStation {
                uic_code: s.uic_code.clone().unwrap_or_default(),
                name: s.medium_name.clone()?,
            })
        })
        .collect();

    let messages = item
        .messages
        .iter()
        .filter_map(|m| {
            Some(ServiceMessage {
                text: m.message.clone()?,
                style: m.style.clone(),
            })
        })
        .collect();

    Ok(Journey {
        product: Product {
            category,
            operator,
            number,
        },
        planned,
        actual,
        planned_track: item.planned_track.clone(),
        actual_track: item.actual_track.clone(),
        cancelled: item.cancelled,
        direction: item.direction.clone(),
        origin: item.origin.clone(),
        route,
        messages,
        origin_planned_departure: parse_optional_timestamp(
            item.origin_planned_date_time.as_deref(),
        ),
    })
}

/// Convert a composition response.
pub fn convert_composition(dto: &CompositionDto) -> Composition {
    let units: Vec<Unit> = dto
        .materieeldelen
        .iter()
        .map(|u| Unit {
            type_code: u.type_code.clone().unwrap_or_default(),
            stock_id: u.materieelnummer.map(RollingStockId::from),
            destination: u.eindbestemming.clone().filter(|d| !d.trim().is_empty()),
            image_url: u.afbeelding.clone(),
        })
        .collect();

    Composition {
        length: dto.lengte.unwrap_or(units.len() as u32),
        units,
        direction: dto.richting.clone(),
    }
}

/// Convert a journey details payload.
pub fn convert_journey_details(payload: &JourneyDetailsPayload) -> JourneyDetails {
    let stops = payload
        .stops
        .iter()
        .map(|s| {
            let location = s.stop.as_ref();
            Stop {
                name: location
                    .and_then(|l| l.name.clone())
                    .unwrap_or_default(),
                uic_code: location.and_then(|l| l.uic_code.clone()),
                destination: s.destination.clone().filter(|d| !d.trim().is_empty()),
                arrival: s.arrivals.first().map(convert_stop_event),
                departure: s.departures.first().map(convert_stop_event),
            }
        })
        .collect();

    let notes = payload
        .notes
        .iter()
        .filter_map(|n| {
            Some(Note {
                text: n.text.clone()?,
                kind: n.note_type.clone(),
            })
        })
        .collect();

    JourneyDetails { stops, notes }
}

fn convert_stop_event(dto: &StopEventDto) -> StopEvent {
    StopEvent {
        planned: parse_optional_timestamp(dto.planned_time.as_deref()),
        actual: parse_optional_timestamp(dto.actual_time.as_deref()),
        planned_track: dto.planned_track.clone(),
        actual_track: dto.actual_track.clone(),
        cancelled: dto.cancelled,
    }
}

/// Convert disruption records, skipping any of an unknown kind.
pub fn convert_disruptions(records: &[DisruptionDto]) -> Vec<Disruption> {
    records
        .iter()
        .filter_map(|d| {
            let Some(kind) = DisruptionKind::parse(&d.kind) else {
                warn!(id = %d.id, kind = %d.kind, "Skipping disruption of unknown kind");
                return None;
            };

            Some(Disruption {
                id: d.id.clone(),
                kind,
                is_active: d.is_active,
                title: d.title.clone(),
                situation: label(d.situation.as_ref()),
                additional_travel_time: label(d.summary_additional_travel_time.as_ref()),
                timespans: d
                    .timespans
                    .iter()
                    .map(|t| Timespan {
                        period: t.period.clone(),
                        situation: label(t.situation.as_ref()),
                        cause: label(t.cause.as_ref()),
                    })
                    .collect(),
                expected_duration: d
                    .expected_duration
                    .as_ref()
                    .and_then(|e| e.description.clone()),
            })
        })
        .collect()
}

fn label(dto: Option<&LabelDto>) -> Option<String> {
    dto.and_then(|l| l.label.clone())
}
