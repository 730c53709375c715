//! The read interface the pipeline needs from upstream.

use std::future::Future;

use chrono::{DateTime, FixedOffset};

use crate::domain::{
    BoardKind, Composition, Disruption, Journey, JourneyDetails, StationCode, TrainNumber,
};

use super::error::UpstreamError;

/// Trait for providing rail information.
///
/// This abstraction allows the orchestrator and tracker to be tested with
/// in-memory data. Implementations are stateless across calls and must not
/// retry; absence (a 404 upstream) is reported as `Ok(None)` / `Ok(vec![])`
/// where noted, never as an error.
pub trait RailSource: Send + Sync {
    /// Departures or arrivals at a station, optionally from a given time.
    fn fetch_journeys(
        &self,
        station: &StationCode,
        kind: BoardKind,
        date_time: Option<DateTime<FixedOffset>>,
    ) -> impl Future<Output = Result<Vec<Journey>, UpstreamError>> + Send;

    /// Rolling-stock composition of a train at a station.
    ///
    /// `Ok(None)` when upstream has no composition for the train.
    fn fetch_composition(
        &self,
        train: TrainNumber,
        station: &StationCode,
    ) -> impl Future<Output = Result<Option<Composition>, UpstreamError>> + Send;

    /// Stop list and notes of a train.
    ///
    /// `Ok(None)` when the train is not active.
    fn fetch_journey_details(
        &self,
        train: TrainNumber,
    ) -> impl Future<Output = Result<Option<JourneyDetails>, UpstreamError>> + Send;

    /// All disruption records for a station, active or not.
    ///
    /// `Ok(vec![])` when upstream has none.
    fn fetch_station_disruptions(
        &self,
        station: &StationCode,
    ) -> impl Future<Output = Result<Vec<Disruption>, UpstreamError>> + Send;
}
