//! Journey types.
//!
//! A `Journey` is one row of a departure or arrival board: a single train
//! calling at the board station, with its planned and live times.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::TrainNumber;

/// Which board to query at a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardKind {
    Departures,
    Arrivals,
}

impl BoardKind {
    /// Parse the query-string form (`departures` / `arrivals`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "departures" => Some(BoardKind::Departures),
            "arrivals" => Some(BoardKind::Arrivals),
            _ => None,
        }
    }

    /// The path segment and payload key upstream uses for this board.
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardKind::Departures => "departures",
            BoardKind::Arrivals => "arrivals",
        }
    }
}

/// The product running a journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Category code, e.g. "IC", "SPR".
    pub category: String,
    /// Operator name, e.g. "NS".
    pub operator: String,
    /// Train number.
    pub number: TrainNumber,
}

/// A station on the remaining route, as shown on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStation {
    pub uic_code: String,
    pub name: String,
}

/// A free-text service message attached to a journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMessage {
    pub text: String,
    pub style: Option<String>,
}

/// A departure or arrival of one train at the board station.
///
/// `actual` is always populated; it equals `planned` when the train runs
/// on time. Cancelled journeys keep their scheduled fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Journey {
    pub product: Product,
    pub planned: DateTime<FixedOffset>,
    pub actual: DateTime<FixedOffset>,
    pub planned_track: Option<String>,
    pub actual_track: Option<String>,
    pub cancelled: bool,
    /// Nominal destination (departure boards).
    pub direction: Option<String>,
    /// Where the train came from (arrival boards).
    pub origin: Option<String>,
    pub route: Vec<RouteStation>,
    pub messages: Vec<ServiceMessage>,
    pub origin_planned_departure: Option<DateTime<FixedOffset>>,
}

impl Journey {
    /// Returns the train number.
    pub fn train_number(&self) -> TrainNumber {
        self.product.number
    }

    /// Delay in whole minutes. Early running counts as zero.
    pub fn delay_minutes(&self) -> i64 {
        (self.actual - self.planned).num_minutes().max(0)
    }

    /// The track the train will actually use, falling back to the plan.
    pub fn track(&self) -> Option<&str> {
        self.actual_track
            .as_deref()
            .or(self.planned_track.as_deref())
    }

    /// Whether the track differs from the planned one.
    pub fn track_changed(&self) -> bool {
        match (&self.planned_track, &self.actual_track) {
            (Some(planned), Some(actual)) => planned != actual,
            _ => false,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Parse an RFC 3339 timestamp for tests.
    pub fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    /// A minimal on-time departure for tests.
    pub fn journey(number: u32, planned: &str) -> Journey {
        Journey {
            product: Product {
                category: "IC".to_string(),
                operator: "NS".to_string(),
                number: TrainNumber::try_from(number).unwrap(),
            },
            planned: at(planned),
            actual: at(planned),
            planned_track: Some("5".to_string()),
            actual_track: Some("5".to_string()),
            cancelled: false,
            direction: Some("Amsterdam Centraal".to_string()),
            origin: None,
            route: Vec::new(),
            messages: Vec::new(),
            origin_planned_departure: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{at, journey};
    use super::*;

    #[test]
    fn board_kind_parse() {
        assert_eq!(BoardKind::parse("departures"), Some(BoardKind::Departures));
        assert_eq!(BoardKind::parse("ARRIVALS"), Some(BoardKind::Arrivals));
        assert_eq!(BoardKind::parse("both"), None);
    }

    #[test]
    fn delay_minutes() {
        let mut j = journey(3049, "2024-03-15T10:00:00+01:00");
        assert_eq!(j.delay_minutes(), 0);

        j.actual = at("2024-03-15T10:07:30+01:00");
        assert_eq!(j.delay_minutes(), 7);

        j.actual = at("2024-03-15T09:59:00+01:00");
        assert_eq!(j.delay_minutes(), 0);
    }

    #[test]
    fn track_change() {
        let mut j = journey(3049, "2024-03-15T10:00:00+01:00");
        assert!(!j.track_changed());
        assert_eq!(j.track(), Some("5"));

        j.actual_track = Some("7a".to_string());
        assert!(j.track_changed());
        assert_eq!(j.track(), Some("7a"));

        j.actual_track = None;
        assert!(!j.track_changed());
        assert_eq!(j.track(), Some("5"));
    }
}
