//! Destination-change detection.
//!
//! Flags services that stop short of their scheduled destination (announced
//! through a "Rijdt niet verder dan ..." service message) and rolling-stock
//! units whose own destination differs from where the train is going.
//! Everything here is pure: the same journey and station index always give
//! the same result, and the journey itself is never modified.

mod truncation;

pub use truncation::{extract_truncation, truncated_destination};

use serde::Serialize;

use crate::domain::{EnrichedJourney, RollingStockId};
use crate::stations::StationIndex;

/// A unit that terminates somewhere other than the effective destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitTermination {
    /// Zero-based position of the unit in the composition
    pub position: usize,
    pub stock_id: Option<RollingStockId>,
    /// Where this unit goes
    pub destination: String,
}

/// What changed about where a journey ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationChange {
    /// Station the service is truncated to, if a truncation was announced
    pub truncated_to: Option<String>,
    /// Where the train actually ends: the truncation if any, else the
    /// nominal destination
    pub effective_destination: Option<String>,
    pub early_units: Vec<UnitTermination>,
}

impl DestinationChange {
    /// Whether anything differs from the timetable.
    pub fn has_changes(&self) -> bool {
        self.truncated_to.is_some() || !self.early_units.is_empty()
    }
}

/// Detect truncation and early-terminating units for one journey.
///
/// A truncated station name is resolved to its canonical spelling through
/// `stations`; names the index does not know are kept as written.
pub fn detect(enriched: &EnrichedJourney, stations: &StationIndex) -> DestinationChange {
    let journey = &enriched.journey;

    let truncated_to = truncated_destination(&journey.messages).map(|name| {
        stations
            .lookup(&name)
            .map(|entry| entry.name.clone())
            .unwrap_or(name)
    });

    let effective_destination = truncated_to
        .clone()
        .or_else(|| enriched.final_destination.clone())
        .or_else(|| journey.direction.clone());

    let early_units = match (&effective_destination, &enriched.composition) {
        (Some(effective), Some(composition)) => composition
            .units
            .iter()
            .enumerate()
            .filter_map(|(position, unit)| {
                let destination = unit.destination.as_deref()?;
                (!same_station(destination, effective, stations)).then(|| UnitTermination {
                    position,
                    stock_id: unit.stock_id,
                    destination: destination.to_string(),
                })
            })
            .collect(),
        _ => Vec::new(),
    };

    DestinationChange {
        truncated_to,
        effective_destination,
        early_units,
    }
}

/// Compare two station names, by code when both are known.
fn same_station(a: &str, b: &str, stations: &StationIndex) -> bool {
    match (stations.lookup(a), stations.lookup(b)) {
        (Some(x), Some(y)) => x.code == y.code,
        _ => a.trim().to_lowercase() == b.trim().to_lowercase(),
    }
}
