//! Domain types for the journey enrichment pipeline.
//!
//! This module contains the core domain model types that represent
//! validated rail data. Identifier types enforce their invariants at
//! construction time, so code that receives them can trust their validity.

mod composition;
mod details;
mod disruption;
mod journey;
mod pinned;
mod station;
mod train;

pub use composition::{Composition, RollingStockId, Unit};
pub use details::{JourneyDetails, Note, Stop, StopEvent};
pub use disruption::{Disruption, DisruptionKind, Timespan};
pub use journey::{BoardKind, Journey, Product, RouteStation, ServiceMessage};
pub use pinned::PinnedJourneySnapshot;
pub use station::{InvalidStationCode, StationCode};
pub use train::{InvalidTrainNumber, TrainNumber};

#[cfg(test)]
pub(crate) use journey::fixtures;

/// A board row together with everything fetched about it.
///
/// `composition` and `final_destination` are `None` when the lookup found
/// nothing or failed; a failure never removes the journey itself.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedJourney {
    #[serde(flatten)]
    pub journey: Journey,
    pub composition: Option<Composition>,
    /// Final destination of the train (arrival boards only).
    pub final_destination: Option<String>,
}

/// Result of one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub struct EnrichedBoard {
    pub journeys: Vec<EnrichedJourney>,
    /// Active disruptions at the station.
    pub disruptions: Vec<Disruption>,
}
