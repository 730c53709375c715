//! Journey detail types: the full stop list of one train.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// An arrival or departure event at a stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopEvent {
    pub planned: Option<DateTime<FixedOffset>>,
    pub actual: Option<DateTime<FixedOffset>>,
    pub planned_track: Option<String>,
    pub actual_track: Option<String>,
    pub cancelled: bool,
}

impl StopEvent {
    /// Actual time if known, otherwise planned.
    pub fn time(&self) -> Option<DateTime<FixedOffset>> {
        self.actual.or(self.planned)
    }
}

/// One stop on a train's route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub name: String,
    pub uic_code: Option<String>,
    /// Where the train is heading from this stop, when upstream says.
    pub destination: Option<String>,
    pub arrival: Option<StopEvent>,
    pub departure: Option<StopEvent>,
}

impl Stop {
    /// The time the train leaves this stop, or arrives if it terminates here.
    pub fn passing_time(&self) -> Option<DateTime<FixedOffset>> {
        self.departure
            .as_ref()
            .and_then(StopEvent::time)
            .or_else(|| self.arrival.as_ref().and_then(StopEvent::time))
    }
}

/// A note attached to a train's journey (facilities, reservations, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub text: String,
    pub kind: Option<String>,
}

/// The stop list and notes of one active train.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyDetails {
    pub stops: Vec<Stop>,
    pub notes: Vec<Note>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn event(planned: &str, actual: Option<&str>) -> StopEvent {
        StopEvent {
            planned: Some(at(planned)),
            actual: actual.map(at),
            planned_track: None,
            actual_track: None,
            cancelled: false,
        }
    }

    #[test]
    fn event_time_prefers_actual() {
        let e = event("2024-03-15T10:00:00+01:00", Some("2024-03-15T10:04:00+01:00"));
        assert_eq!(e.time(), Some(at("2024-03-15T10:04:00+01:00")));

        let e = event("2024-03-15T10:00:00+01:00", None);
        assert_eq!(e.time(), Some(at("2024-03-15T10:00:00+01:00")));
    }

    #[test]
    fn passing_time_falls_back_to_arrival() {
        let terminus = Stop {
            name: "Amsterdam Centraal".to_string(),
            uic_code: Some("8400058".to_string()),
            destination: None,
            arrival: Some(event("2024-03-15T10:30:00+01:00", None)),
            departure: None,
        };
        assert_eq!(
            terminus.passing_time(),
            Some(at("2024-03-15T10:30:00+01:00"))
        );

        let through = Stop {
            departure: Some(event("2024-03-15T10:32:00+01:00", None)),
            ..terminus
        };
        assert_eq!(through.passing_time(), Some(at("2024-03-15T10:32:00+01:00")));
    }
}
