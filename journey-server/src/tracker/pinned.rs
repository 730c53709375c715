//! The polling tracker.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::domain::{BoardKind, InvalidStationCode, PinnedJourneySnapshot, StationCode, Stop};
use crate::enrich::{GENERIC_UNAVAILABLE_MESSAGE, JourneyEnricher};
use crate::upstream::{RailSource, UpstreamError};

use super::status::{LiveDeparture, LiveStatus, TrackerStatus, live_departure, next_stop};
use super::store::{PinStore, StoreError};

/// Default time between polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Configuration for the tracker.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Time between the starts of two cycles
    pub poll_interval: Duration,
}

impl TrackerConfig {
    pub fn new() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors from pinning a journey.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("pinned journey has an invalid origin: {0}")]
    InvalidOrigin(#[from] InvalidStationCode),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Follows one pinned journey by polling its origin board and stop list.
///
/// At most one poll task exists at a time. Each pin or unpin retires the
/// current epoch, and a cycle only writes its result while its epoch is
/// still current, so results that arrive after a re-pin or unpin are
/// dropped.
pub struct PinnedJourneyTracker<S: RailSource + 'static> {
    enricher: Arc<JourneyEnricher<S>>,
    store: PinStore,
    config: TrackerConfig,
    status: Arc<watch::Sender<TrackerStatus>>,
    epoch: Arc<AtomicU64>,
    poll: Mutex<Option<JoinHandle<()>>>,
}

impl<S: RailSource + 'static> PinnedJourneyTracker<S> {
    /// Create an idle tracker.
    pub fn new(enricher: Arc<JourneyEnricher<S>>, store: PinStore, config: TrackerConfig) -> Self {
        let (status, _) = watch::channel(TrackerStatus::Idle);
        Self {
            enricher,
            store,
            config,
            status: Arc::new(status),
            epoch: Arc::new(AtomicU64::new(0)),
            poll: Mutex::new(None),
        }
    }

    /// The current status.
    pub fn status(&self) -> TrackerStatus {
        self.status.borrow().clone()
    }

    /// Observe status changes.
    pub fn subscribe(&self) -> watch::Receiver<TrackerStatus> {
        self.status.subscribe()
    }

    pub fn store(&self) -> &PinStore {
        &self.store
    }

    fn poll_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.poll.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start following a journey, replacing any journey already pinned.
    ///
    /// The snapshot is persisted before polling starts; the first cycle
    /// runs immediately.
    pub fn pin(&self, snapshot: PinnedJourneySnapshot) -> Result<(), TrackerError> {
        let station = StationCode::parse_normalized(&snapshot.origin_uic)?;

        let mut poll = self.poll_slot();
        self.store.set(Some(snapshot.clone()))?;

        if let Some(previous) = poll.take() {
            previous.abort();
        }
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;

        info!(
            train = %snapshot.train_number,
            origin = %station,
            planned = %snapshot.planned_departure,
            "Pinned journey"
        );

        self.status
            .send_replace(TrackerStatus::Active(LiveStatus::new(snapshot.clone())));

        *poll = Some(tokio::spawn(poll_loop(PollTask {
            enricher: self.enricher.clone(),
            status: self.status.clone(),
            epoch: self.epoch.clone(),
            my_epoch: epoch,
            snapshot,
            station,
            interval: self.config.poll_interval,
        })));

        Ok(())
    }

    /// Stop following the pinned journey and clear it from the store.
    ///
    /// Does nothing when idle. The store is cleared first; if that fails
    /// the journey stays pinned and polling continues.
    pub fn unpin(&self) -> Result<(), StoreError> {
        let mut poll = self.poll_slot();
        if poll.is_none() {
            return Ok(());
        }

        self.store.set(None)?;

        if let Some(handle) = poll.take() {
            handle.abort();
        }
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.status.send_replace(TrackerStatus::Idle);

        info!("Unpinned journey");
        Ok(())
    }

    /// Re-pin the journey found in the store, if any.
    ///
    /// Returns whether a journey was resumed.
    pub fn resume(&self) -> Result<bool, TrackerError> {
        match self.store.current() {
            Some(snapshot) => {
                self.pin(snapshot)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl<S: RailSource + 'static> Drop for PinnedJourneyTracker<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.poll_slot().take() {
            handle.abort();
        }
    }
}

struct PollTask<S> {
    enricher: Arc<JourneyEnricher<S>>,
    status: Arc<watch::Sender<TrackerStatus>>,
    epoch: Arc<AtomicU64>,
    my_epoch: u64,
    snapshot: PinnedJourneySnapshot,
    station: StationCode,
    interval: Duration,
}

/// Run cycles until the epoch is retired.
///
/// Cycles run one after another in this task, so a slow cycle delays the
/// next tick instead of overlapping it.
async fn poll_loop<S: RailSource>(task: PollTask<S>) {
    let mut ticker = tokio::time::interval(task.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        let outcome = run_cycle(&task.enricher, &task.snapshot, &task.station).await;
        let now = Utc::now().fixed_offset();

        if !apply_if_current(&task.status, &task.epoch, task.my_epoch, outcome, now) {
            debug!(train = %task.snapshot.train_number, "Discarding result of retired poll");
            return;
        }
    }
}

/// Result of one poll cycle. Each half may fail on its own.
#[derive(Debug)]
pub(crate) struct CycleOutcome {
    pub departure: Result<Option<LiveDeparture>, String>,
    pub next_stop: Result<Option<Stop>, String>,
}

async fn run_cycle<S: RailSource>(
    enricher: &JourneyEnricher<S>,
    snapshot: &PinnedJourneySnapshot,
    station: &StationCode,
) -> CycleOutcome {
    let train = snapshot.train_number;

    let (board, details) = tokio::join!(
        enricher.get_enriched_journeys(station, BoardKind::Departures, None),
        enricher.get_journey_details(train),
    );

    let departure = board
        .map(|board| live_departure(&board, snapshot))
        .map_err(|e| {
            warn!(train = %train, station = %station, error = %e, "Poll of origin board failed");
            e.public_message()
        });

    let now = Utc::now().fixed_offset();
    let upcoming = details
        .map(|details| details.and_then(|d| next_stop(&d.stops, now).cloned()))
        .map_err(|e| {
            warn!(train = %train, error = %e, "Poll of journey details failed");
            public_upstream_message(&e)
        });

    CycleOutcome {
        departure,
        next_stop: upcoming,
    }
}

fn public_upstream_message(e: &UpstreamError) -> String {
    if e.is_configuration() {
        GENERIC_UNAVAILABLE_MESSAGE.to_string()
    } else {
        e.to_string()
    }
}

/// Write a cycle's outcome into the status if `my_epoch` is still current.
///
/// The epoch check runs under the watch channel's write lock, so it is
/// atomic with the write. Returns false when the result was discarded.
pub(crate) fn apply_if_current(
    status: &watch::Sender<TrackerStatus>,
    epoch: &AtomicU64,
    my_epoch: u64,
    outcome: CycleOutcome,
    now: DateTime<FixedOffset>,
) -> bool {
    let mut applied = false;

    status.send_if_modified(|current| {
        if epoch.load(Ordering::SeqCst) != my_epoch {
            return false;
        }
        let TrackerStatus::Active(live) = current else {
            return false;
        };

        let mut error = None;
        match outcome.departure {
            Ok(departure) => live.departure = departure,
            Err(message) => error = Some(message),
        }
        match outcome.next_stop {
            Ok(stop) => live.next_stop = stop,
            Err(message) => error = error.or(Some(message)),
        }

        live.last_error = error;
        live.cycles += 1;
        live.last_updated = Some(now);
        applied = true;
        true
    });

    applied
}
