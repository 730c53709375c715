//! NS station directory and name lookup.
//!
//! Maps every known spelling of a station (long, medium and short name,
//! synonyms, code, UIC code) to its canonical entry. Fetched from the
//! stations endpoint at startup and refreshed daily.

mod client;
mod error;
mod index;
mod names;

pub use client::{StationClient, StationClientConfig};
pub use error::StationError;
pub use index::{StationEntry, StationIndex};
pub use names::StationNames;
