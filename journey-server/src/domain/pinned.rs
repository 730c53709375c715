//! The pinned journey snapshot.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::{RollingStockId, StationCode, TrainNumber};

/// A journey the user chose to follow, captured at pin time.
///
/// The snapshot never changes while pinned. Live status is re-derived
/// from it on every poll by re-querying the origin station's board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedJourneySnapshot {
    pub origin_name: String,
    /// UIC code of the origin station, used to query its departures.
    pub origin_uic: String,
    pub destination: String,
    pub train_number: TrainNumber,
    pub planned_departure: DateTime<FixedOffset>,
    /// Platform shown when the journey was pinned.
    pub platform: Option<String>,
    pub category: String,
    /// The unit the user boarded, if they picked one.
    pub target_stock_id: Option<RollingStockId>,
}

impl PinnedJourneySnapshot {
    /// The origin as a station code for board queries.
    pub fn origin_station(&self) -> Option<StationCode> {
        StationCode::parse_normalized(&self.origin_uic).ok()
    }
}
