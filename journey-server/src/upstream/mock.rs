//! Mock rail source for testing without API access.
//!
//! Serves boards, compositions, journey details and disruptions from
//! memory, with injectable failures, latency, and a gate that holds board
//! requests open until released.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use tokio::sync::watch;

use crate::domain::{
    BoardKind, Composition, Disruption, Journey, JourneyDetails, StationCode, TrainNumber,
};

use super::error::UpstreamError;
use super::source::RailSource;

/// A failure the mock should return instead of data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// Non-success status from upstream.
    Status(u16),
    /// No credentials configured.
    Unconfigured,
}

impl MockFailure {
    fn to_error(self) -> UpstreamError {
        match self {
            MockFailure::Status(status) => UpstreamError::Unavailable {
                status,
                message: "mock failure".to_string(),
            },
            MockFailure::Unconfigured => {
                UpstreamError::Configuration("no subscription key configured".to_string())
            }
        }
    }
}

/// A call received by the mock, for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Journeys(StationCode, BoardKind),
    Composition(TrainNumber, StationCode),
    Details(TrainNumber),
    Disruptions(StationCode),
}

#[derive(Default)]
struct MockData {
    boards: HashMap<(StationCode, BoardKind), Result<Vec<Journey>, MockFailure>>,
    compositions: HashMap<TrainNumber, Result<Composition, MockFailure>>,
    details: HashMap<TrainNumber, Result<JourneyDetails, MockFailure>>,
    disruptions: HashMap<StationCode, Result<Vec<Disruption>, MockFailure>>,
    latency: Option<Duration>,
    calls: Vec<MockCall>,
}

/// In-memory implementation of [`RailSource`].
///
/// Anything not configured behaves like an upstream 404: no composition,
/// train not active, no disruptions. An unknown board is a 404 failure,
/// matching the real boards endpoint.
pub struct MockRailSource {
    data: Mutex<MockData>,
    gate: watch::Sender<bool>,
}

impl Default for MockRailSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRailSource {
    /// Create an empty mock with the gate open.
    pub fn new() -> Self {
        let (gate, _) = watch::channel(true);
        Self {
            data: Mutex::new(MockData::default()),
            gate,
        }
    }

    fn data(&self) -> MutexGuard<'_, MockData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Serve these journeys for a station board.
    pub fn set_board(&self, station: &StationCode, kind: BoardKind, journeys: Vec<Journey>) {
        self.data()
            .boards
            .insert((station.clone(), kind), Ok(journeys));
    }

    /// Fail requests for a station board.
    pub fn fail_board(&self, station: &StationCode, kind: BoardKind, failure: MockFailure) {
        self.data()
            .boards
            .insert((station.clone(), kind), Err(failure));
    }

    pub fn set_composition(&self, train: TrainNumber, composition: Composition) {
        self.data().compositions.insert(train, Ok(composition));
    }

    pub fn fail_composition(&self, train: TrainNumber, failure: MockFailure) {
        self.data().compositions.insert(train, Err(failure));
    }

    pub fn set_details(&self, train: TrainNumber, details: JourneyDetails) {
        self.data().details.insert(train, Ok(details));
    }

    pub fn fail_details(&self, train: TrainNumber, failure: MockFailure) {
        self.data().details.insert(train, Err(failure));
    }

    pub fn set_disruptions(&self, station: &StationCode, disruptions: Vec<Disruption>) {
        self.data()
            .disruptions
            .insert(station.clone(), Ok(disruptions));
    }

    pub fn fail_disruptions(&self, station: &StationCode, failure: MockFailure) {
        self.data()
            .disruptions
            .insert(station.clone(), Err(failure));
    }

    /// Delay every response by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.data().latency = Some(latency);
    }

    /// Hold board requests until [`open_gate`](Self::open_gate) is called.
    pub fn close_gate(&self) {
        self.gate.send_replace(false);
    }

    /// Release held board requests.
    pub fn open_gate(&self) {
        self.gate.send_replace(true);
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.data().calls.clone()
    }

    /// Number of board requests received for a station.
    pub fn board_requests(&self, station: &StationCode) -> usize {
        self.data()
            .calls
            .iter()
            .filter(|c| matches!(c, MockCall::Journeys(s, _) if s == station))
            .count()
    }

    /// Record a call and return the configured latency.
    fn record(&self, call: MockCall) -> Option<Duration> {
        let mut data = self.data();
        data.calls.push(call);
        data.latency
    }
}

async fn pause(latency: Option<Duration>) {
    if let Some(latency) = latency {
        tokio::time::sleep(latency).await;
    }
}

impl RailSource for MockRailSource {
    async fn fetch_journeys(
        &self,
        station: &StationCode,
        kind: BoardKind,
        _date_time: Option<DateTime<FixedOffset>>,
    ) -> Result<Vec<Journey>, UpstreamError> {
        let latency = self.record(MockCall::Journeys(station.clone(), kind));

        let mut gate = self.gate.subscribe();
        // The sender lives as long as `self`, so this only errors if the mock is gone.
        let _ = gate.wait_for(|open| *open).await;
        pause(latency).await;

        match self.data().boards.get(&(station.clone(), kind)) {
            Some(Ok(journeys)) => Ok(journeys.clone()),
            Some(Err(failure)) => Err(failure.to_error()),
            None => Err(MockFailure::Status(404).to_error()),
        }
    }

    async fn fetch_composition(
        &self,
        train: TrainNumber,
        station: &StationCode,
    ) -> Result<Option<Composition>, UpstreamError> {
        let latency = self.record(MockCall::Composition(train, station.clone()));
        pause(latency).await;

        match self.data().compositions.get(&train) {
            Some(Ok(c)) => Ok(Some(c.clone())),
            Some(Err(failure)) => Err(failure.to_error()),
            None => Ok(None),
        }
    }

    async fn fetch_journey_details(
        &self,
        train: TrainNumber,
    ) -> Result<Option<JourneyDetails>, UpstreamError> {
        let latency = self.record(MockCall::Details(train));
        pause(latency).await;

        match self.data().details.get(&train) {
            Some(Ok(d)) => Ok(Some(d.clone())),
            Some(Err(failure)) => Err(failure.to_error()),
            None => Ok(None),
        }
    }

    async fn fetch_station_disruptions(
        &self,
        station: &StationCode,
    ) -> Result<Vec<Disruption>, UpstreamError> {
        let latency = self.record(MockCall::Disruptions(station.clone()));
        pause(latency).await;

        match self.data().disruptions.get(station) {
            Some(Ok(d)) => Ok(d.clone()),
            Some(Err(failure)) => Err(failure.to_error()),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::journey;

    fn ut() -> StationCode {
        StationCode::parse("UT").unwrap()
    }

    #[tokio::test]
    async fn serves_configured_board() {
        let mock = MockRailSource::new();
        mock.set_board(
            &ut(),
            BoardKind::Departures,
            vec![journey(3049, "2024-03-15T10:00:00+01:00")],
        );

        let journeys = mock
            .fetch_journeys(&ut(), BoardKind::Departures, None)
            .await
            .unwrap();
        assert_eq!(journeys.len(), 1);
        assert_eq!(mock.board_requests(&ut()), 1);
    }

    #[tokio::test]
    async fn unknown_board_returns_error() {
        let mock = MockRailSource::new();
        let result = mock.fetch_journeys(&ut(), BoardKind::Arrivals, None).await;
        assert_eq!(result.unwrap_err().status(), Some(404));
    }

    #[tokio::test]
    async fn unconfigured_lookups_are_empty() {
        let mock = MockRailSource::new();
        let train = TrainNumber::try_from(3049).unwrap();

        assert!(mock.fetch_composition(train, &ut()).await.unwrap().is_none());
        assert!(mock.fetch_journey_details(train).await.unwrap().is_none());
        assert!(mock.fetch_station_disruptions(&ut()).await.unwrap().is_empty());
        assert_eq!(mock.calls().len(), 3);
    }
}
