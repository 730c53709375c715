//! Case-insensitive station lookup.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::domain::StationCode;

use super::client::StationDto;

/// Canonical identity of a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationEntry {
    pub code: StationCode,
    pub uic_code: String,
    /// Long display name, e.g. "Utrecht Centraal"
    pub name: String,
}

/// Lookup from any spelling of a station to its entry.
///
/// Keys are normalized (trimmed, whitespace collapsed, lower-cased). When
/// two stations share a spelling, the first inserted keeps it.
#[derive(Debug, Clone, Default)]
pub struct StationIndex {
    entries: Vec<StationEntry>,
    by_key: HashMap<String, usize>,
}

impl StationIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from the upstream station list.
    ///
    /// Stations whose code is not a valid [`StationCode`] are skipped.
    pub fn from_stations(stations: Vec<StationDto>) -> Self {
        let mut index = Self::new();

        for station in stations {
            let Ok(code) = StationCode::parse_normalized(&station.code) else {
                debug!(code = %station.code, "Skipping station with invalid code");
                continue;
            };

            let aliases: Vec<String> = [station.namen.middel, station.namen.kort]
                .into_iter()
                .flatten()
                .chain(station.synoniemen)
                .collect();

            index.insert(
                StationEntry {
                    code,
                    uic_code: station.uic_code,
                    name: station.namen.lang,
                },
                aliases,
            );
        }

        index
    }

    /// Add a station under its name, code, UIC code and any aliases.
    pub fn insert<I, A>(&mut self, entry: StationEntry, aliases: I)
    where
        I: IntoIterator<Item = A>,
        A: AsRef<str>,
    {
        let idx = self.entries.len();

        let keys = [
            entry.name.clone(),
            entry.code.as_str().to_string(),
            entry.uic_code.clone(),
        ];

        for key in keys
            .iter()
            .map(String::as_str)
            .map(normalize)
            .chain(aliases.into_iter().map(|a| normalize(a.as_ref())))
        {
            if !key.is_empty() {
                self.by_key.entry(key).or_insert(idx);
            }
        }

        self.entries.push(entry);
    }

    /// Find a station by any of its spellings.
    pub fn lookup(&self, name: &str) -> Option<&StationEntry> {
        self.by_key
            .get(&normalize(name))
            .map(|&idx| &self.entries[idx])
    }

    /// Number of stations (not spellings) in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lower-case and collapse whitespace.
fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
