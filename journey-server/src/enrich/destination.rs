//! Final-destination lookup from journey details.

use crate::domain::JourneyDetails;

/// The destination a train is ultimately heading for.
///
/// Takes the last stop's destination field; if that is empty, the first
/// stop that has one. `None` when no stop carries a destination.
pub fn final_destination(details: &JourneyDetails) -> Option<String> {
    if let Some(dest) = details.stops.last().and_then(|s| s.destination.as_ref()) {
        return Some(dest.clone());
    }

    details.stops.iter().find_map(|s| s.destination.clone())
}
