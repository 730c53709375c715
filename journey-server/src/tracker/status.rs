//! Live status of the pinned journey.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::domain::{EnrichedBoard, PinnedJourneySnapshot, Stop};

/// Where the pinned train is at its origin right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveDeparture {
    pub actual_departure: DateTime<FixedOffset>,
    pub delay_minutes: i64,
    pub cancelled: bool,
    pub actual_track: Option<String>,
    /// Track differs from the plan or from what was shown at pin time
    pub platform_changed: bool,
    /// Position of the boarded unit in the current composition, from the
    /// front
    pub target_unit: Option<usize>,
}

/// Everything the tracker knows about the pinned journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStatus {
    pub pinned: PinnedJourneySnapshot,
    /// `None` until the first successful board poll, or once the train has
    /// left the board
    pub departure: Option<LiveDeparture>,
    pub next_stop: Option<Stop>,
    /// Message of the last failed cycle, cleared by a fully successful one
    pub last_error: Option<String>,
    /// Number of cycles applied since pinning
    pub cycles: u64,
    pub last_updated: Option<DateTime<FixedOffset>>,
}

impl LiveStatus {
    /// Status of a freshly pinned journey, before any poll.
    pub fn new(pinned: PinnedJourneySnapshot) -> Self {
        Self {
            pinned,
            departure: None,
            next_stop: None,
            last_error: None,
            cycles: 0,
            last_updated: None,
        }
    }
}

/// Tracker state, observable through a watch channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum TrackerStatus {
    Idle,
    Active(LiveStatus),
}

impl TrackerStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, TrackerStatus::Active(_))
    }

    pub fn live(&self) -> Option<&LiveStatus> {
        match self {
            TrackerStatus::Idle => None,
            TrackerStatus::Active(live) => Some(live),
        }
    }
}

/// Find the pinned journey on its origin board and read its live state.
///
/// Journeys are matched on train number and planned departure time, since
/// the same number runs many times a day.
pub fn live_departure(
    board: &EnrichedBoard,
    pinned: &PinnedJourneySnapshot,
) -> Option<LiveDeparture> {
    let enriched = board.journeys.iter().find(|e| {
        e.journey.train_number() == pinned.train_number
            && e.journey.planned == pinned.planned_departure
    })?;
    let journey = &enriched.journey;

    // An unknown id cannot tell units apart
    let target_unit = pinned
        .target_stock_id
        .filter(|id| !id.is_unknown())
        .zip(enriched.composition.as_ref())
        .and_then(|(id, composition)| composition.unit_by_stock(id))
        .map(|(position, _)| position);

    let track = journey.track();
    let moved_since_pin = match (pinned.platform.as_deref(), track) {
        (Some(at_pin), Some(now)) => at_pin != now,
        _ => false,
    };

    Some(LiveDeparture {
        actual_departure: journey.actual,
        delay_minutes: journey.delay_minutes(),
        cancelled: journey.cancelled,
        actual_track: track.map(str::to_string),
        platform_changed: journey.track_changed() || moved_since_pin,
        target_unit,
    })
}

/// The first stop the train has not yet passed at `now`.
///
/// Uses actual-or-planned departure, or arrival for a stop without a
/// departure (the terminus). Stops with no time at all are skipped.
pub fn next_stop(stops: &[Stop], now: DateTime<FixedOffset>) -> Option<&Stop> {
    stops
        .iter()
        .find(|s| s.passing_time().is_some_and(|t| t > now))
}
