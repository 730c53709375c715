//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::changes::DestinationChange;
use crate::domain::{Disruption, EnrichedJourney};

/// Query for a station board.
#[derive(Debug, Deserialize)]
pub struct JourneysQuery {
    /// Station code or UIC code
    pub station: String,

    /// `departures` (default) or `arrivals`
    #[serde(rename = "type")]
    pub kind: Option<String>,

    /// Board time (defaults to now upstream)
    #[serde(rename = "dateTime")]
    pub date_time: Option<String>,
}

/// One board row with its detected destination changes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyView {
    #[serde(flatten)]
    pub journey: EnrichedJourney,
    pub destination_change: DestinationChange,
}

/// Response for a station board.
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub journeys: Vec<JourneyView>,
    pub disruptions: Vec<Disruption>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
