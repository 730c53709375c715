//! Upstream API response DTOs.
//!
//! These types map directly to the NS Reisinformatie, Virtual Train and
//! Disruptions JSON responses. They use `Option` and `#[serde(default)]`
//! liberally because upstream omits fields rather than sending null values
//! in many cases.

use serde::Deserialize;

/// Envelope used by the Reisinformatie endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub payload: Option<T>,
}

/// Payload of the departures and arrivals endpoints.
///
/// Only one of the two lists is present, depending on the endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardPayload {
    pub departures: Option<Vec<BoardItem>>,
    pub arrivals: Option<Vec<BoardItem>>,
}

/// One departure or arrival on a station board.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardItem {
    /// Nominal destination (departures only).
    pub direction: Option<String>,

    /// Where the train comes from (arrivals only).
    pub origin: Option<String>,

    /// Display name, e.g. "NS 3049".
    pub name: Option<String>,

    /// Planned time at the board station.
    pub planned_date_time: Option<String>,

    /// Live time at the board station. Omitted when on time.
    pub actual_date_time: Option<String>,

    pub planned_track: Option<String>,
    pub actual_track: Option<String>,

    /// The train product (category, operator, number).
    pub product: Option<ProductDto>,

    /// Category code duplicated at the top level, e.g. "IC".
    pub train_category: Option<String>,

    #[serde(default)]
    pub cancelled: bool,

    /// Planned departure from the train's origin station (arrivals only).
    pub origin_planned_date_time: Option<String>,

    #[serde(default)]
    pub route_stations: Vec<RouteStationDto>,

    #[serde(default)]
    pub messages: Vec<MessageDto>,
}

/// Train product info.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    /// Train number as a string, e.g. "3049".
    pub number: Option<String>,
    pub category_code: Option<String>,
    pub short_category_name: Option<String>,
    pub long_category_name: Option<String>,
    pub operator_code: Option<String>,
    pub operator_name: Option<String>,
}

/// A station on the board row's remaining route.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStationDto {
    pub uic_code: Option<String>,
    pub medium_name: Option<String>,
}

/// A free-text message on a board row.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageDto {
    pub message: Option<String>,
    pub style: Option<String>,
}

/// Response of the Virtual Train composition endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionDto {
    /// Number of units.
    pub lengte: Option<u32>,

    /// The units, front to back.
    #[serde(default)]
    pub materieeldelen: Vec<UnitDto>,

    /// Direction of travel along the platform.
    pub richting: Option<String>,
}

/// One unit in a composition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitDto {
    /// Rolling-stock number. `0` means "unknown".
    pub materieelnummer: Option<u64>,

    /// Stock type code, e.g. "VIRM".
    #[serde(rename = "type")]
    pub type_code: Option<String>,

    /// Destination of this unit when it differs from the train.
    pub eindbestemming: Option<String>,

    /// Image of the unit.
    pub afbeelding: Option<String>,
}

/// Payload of the journey details endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct JourneyDetailsPayload {
    #[serde(default)]
    pub stops: Vec<StopDto>,

    #[serde(default)]
    pub notes: Vec<NoteDto>,
}

/// One stop in a journey details response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopDto {
    pub stop: Option<StopLocationDto>,

    /// Where the train is heading from this stop.
    pub destination: Option<String>,

    #[serde(default)]
    pub arrivals: Vec<StopEventDto>,

    #[serde(default)]
    pub departures: Vec<StopEventDto>,
}

/// The station of a stop.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopLocationDto {
    pub name: Option<String>,
    pub uic_code: Option<String>,
}

/// An arrival or departure at a stop.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopEventDto {
    pub planned_time: Option<String>,
    pub actual_time: Option<String>,
    pub planned_track: Option<String>,
    pub actual_track: Option<String>,
    #[serde(default)]
    pub cancelled: bool,
}

/// A journey note.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDto {
    pub text: Option<String>,
    pub note_type: Option<String>,
}

/// One record from the station disruptions endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisruptionDto {
    pub id: String,

    /// CALAMITY, DISRUPTION or MAINTENANCE.
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub is_active: bool,

    #[serde(default)]
    pub title: String,

    pub situation: Option<LabelDto>,

    pub summary_additional_travel_time: Option<LabelDto>,

    #[serde(default)]
    pub timespans: Vec<TimespanDto>,

    pub expected_duration: Option<ExpectedDurationDto>,
}

/// A labelled value, e.g. a situation or cause.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelDto {
    pub label: Option<String>,
}

/// One period of a disruption.
#[derive(Debug, Clone, Deserialize)]
pub struct TimespanDto {
    pub period: Option<String>,
    pub situation: Option<LabelDto>,
    pub cause: Option<LabelDto>,
}

/// Expected duration of a disruption.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpectedDurationDto {
    pub description: Option<String>,
}
