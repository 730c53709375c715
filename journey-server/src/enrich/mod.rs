//! Journey enrichment pipeline.
//!
//! Fetches a station board, fans out per-journey composition and
//! destination lookups concurrently, and merges the results with the
//! station's active disruptions. Failures of individual lookups degrade
//! the affected journey only; the board itself must load.

mod destination;
mod disruptions;
mod orchestrator;

#[cfg(test)]
mod orchestrator_tests;

pub use destination::final_destination;
pub use disruptions::{fetch_active_disruptions, retain_active};
pub use orchestrator::{EnrichError, GENERIC_UNAVAILABLE_MESSAGE, JourneyEnricher};
