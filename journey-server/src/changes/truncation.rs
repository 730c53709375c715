//! Extraction of the truncation template from service messages.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::domain::ServiceMessage;

/// The announcement that a train stops short: "Rijdt niet verder dan X".
static TEMPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)rijdt\s+niet\s+verder\s+dan\s*").expect("truncation template is valid")
});

/// Where the station name ends when it is not bracketed: a cause clause,
/// the end of a sentence, or a comma.
static STATION_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+(door|wegens|vanwege|i\.v\.m\.)(\s|$)|[.!?;]\s|[.!?;]$|,|\n")
        .expect("station terminator is valid")
});

static VIA_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+via\s.*$").expect("via clause is valid"));

const ANNOTATION_CHARS: &[char] = &['[', ']', '(', ')', '{', '}', '<', '>', '*'];

/// Extract the station a service is truncated to from one message text.
///
/// Returns `None` when the text does not contain the template or the
/// station part is empty after cleanup.
pub fn extract_truncation(text: &str) -> Option<String> {
    let found = TEMPLATE.find(text)?;
    let rest = &text[found.end()..];

    let station = match rest.strip_prefix('[') {
        Some(inner) => inner.split(']').next().unwrap_or(inner),
        None => match STATION_END.find(rest) {
            Some(end) => &rest[..end.start()],
            None => rest,
        },
    };

    let station = match VIA_CLAUSE.find(station) {
        Some(via) => &station[..via.start()],
        None => station,
    };

    let cleaned = station
        .replace(ANNOTATION_CHARS, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    (!cleaned.is_empty()).then_some(cleaned)
}

/// The first truncation announced among a journey's messages.
pub fn truncated_destination(messages: &[ServiceMessage]) -> Option<String> {
    messages.iter().find_map(|m| extract_truncation(&m.text))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Phrasings seen on the departure boards, with the expected station.
    const CORPUS: &[(&str, Option<&str>)] = &[
        (
            "Rijdt niet verder dan [Utrecht Centraal] door werkzaamheden",
            Some("Utrecht Centraal"),
        ),
        ("Rijdt niet verder dan Utrecht Centraal", Some("Utrecht Centraal")),
        (
            "Rijdt niet verder dan Amersfoort Centraal door een defecte trein",
            Some("Amersfoort Centraal"),
        ),
        (
            "Rijdt niet verder dan Zwolle wegens een aanrijding",
            Some("Zwolle"),
        ),
        (
            "Rijdt niet verder dan Leiden Centraal vanwege een storing",
            Some("Leiden Centraal"),
        ),
        (
            "Rijdt niet verder dan Gouda i.v.m. werkzaamheden",
            Some("Gouda"),
        ),
        (
            "Rijdt niet verder dan Utrecht Centraal door",
            Some("Utrecht Centraal"),
        ),
        ("Rijdt niet verder dan Gouda i.v.m.", Some("Gouda")),
        (
            "rijdt NIET verder dan Den Haag Centraal. Reis via Leiden Centraal.",
            Some("Den Haag Centraal"),
        ),
        (
            "Rijdt niet verder dan Schiphol Airport, stap over op de trein naar Amsterdam",
            Some("Schiphol Airport"),
        ),
        (
            "Rijdt niet verder dan Eindhoven Centraal via Weert",
            Some("Eindhoven Centraal"),
        ),
        (
            "Let op: rijdt niet verder dan *Roosendaal*",
            Some("Roosendaal"),
        ),
        (
            "Rijdt niet verder dan (Arnhem Centraal)",
            Some("Arnhem Centraal"),
        ),
        (
            "Rijdt niet verder dan   's-Hertogenbosch   ",
            Some("'s-Hertogenbosch"),
        ),
        ("Rijdt niet verder dan []", None),
        ("Rijdt niet verder dan", None),
        ("Extra trein", None),
        ("Rijdt niet", None),
        ("Let op, gewijzigd vertrekspoor", None),
    ];

    #[test]
    fn fixture_corpus() {
        for (text, expected) in CORPUS {
            assert_eq!(
                extract_truncation(text).as_deref(),
                *expected,
                "message {text:?}"
            );
        }
    }

    #[test]
    fn deterministic() {
        for (text, _) in CORPUS {
            assert_eq!(extract_truncation(text), extract_truncation(text));
        }
    }

    #[test]
    fn first_matching_message_wins() {
        let messages = vec![
            ServiceMessage {
                text: "Extra drukte verwacht".to_string(),
                style: None,
            },
            ServiceMessage {
                text: "Rijdt niet verder dan [Utrecht Centraal]".to_string(),
                style: Some("WARNING".to_string()),
            },
            ServiceMessage {
                text: "Rijdt niet verder dan [Amersfoort Centraal]".to_string(),
                style: None,
            },
        ];

        assert_eq!(
            truncated_destination(&messages).as_deref(),
            Some("Utrecht Centraal")
        );
        assert_eq!(truncated_destination(&[]), None);
    }
}
