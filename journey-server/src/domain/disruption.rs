//! Disruption and maintenance records.

use serde::Serialize;

/// Kind of disruption record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisruptionKind {
    Calamity,
    Disruption,
    Maintenance,
}

impl DisruptionKind {
    /// Parse the upstream `type` field.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CALAMITY" => Some(DisruptionKind::Calamity),
            "DISRUPTION" => Some(DisruptionKind::Disruption),
            "MAINTENANCE" => Some(DisruptionKind::Maintenance),
            _ => None,
        }
    }
}

/// One period of a disruption, with its situation and cause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timespan {
    /// Human-readable period, e.g. "zaterdag 16 maart tot 06:00".
    pub period: Option<String>,
    pub situation: Option<String>,
    pub cause: Option<String>,
}

/// A disruption, calamity, or planned maintenance affecting a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Disruption {
    pub id: String,
    pub kind: DisruptionKind,
    pub is_active: bool,
    pub title: String,
    pub situation: Option<String>,
    pub additional_travel_time: Option<String>,
    pub timespans: Vec<Timespan>,
    pub expected_duration: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_kinds() {
        assert_eq!(
            DisruptionKind::parse("CALAMITY"),
            Some(DisruptionKind::Calamity)
        );
        assert_eq!(
            DisruptionKind::parse("DISRUPTION"),
            Some(DisruptionKind::Disruption)
        );
        assert_eq!(
            DisruptionKind::parse("MAINTENANCE"),
            Some(DisruptionKind::Maintenance)
        );
        assert_eq!(DisruptionKind::parse("maintenance"), None);
        assert_eq!(DisruptionKind::parse("OTHER"), None);
    }

    #[test]
    fn kind_serializes_upper_case() {
        assert_eq!(
            serde_json::to_string(&DisruptionKind::Maintenance).unwrap(),
            "\"MAINTENANCE\""
        );
    }
}
