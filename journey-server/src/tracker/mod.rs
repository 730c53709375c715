//! Live tracking of one pinned journey.
//!
//! The user pins a journey from a departure board; the tracker then polls
//! the origin station's board and the train's stop list on a fixed
//! interval and publishes a [`TrackerStatus`] through a watch channel. The
//! pinned snapshot itself lives in a [`PinStore`] so it survives restarts
//! and can be resumed.

mod pinned;
mod status;
mod store;

pub use pinned::{DEFAULT_POLL_INTERVAL, PinnedJourneyTracker, TrackerConfig, TrackerError};
pub use status::{LiveDeparture, LiveStatus, TrackerStatus, live_departure, next_stop};
pub use store::{FileBackend, MemoryBackend, PINNED_JOURNEY_KEY, PinBackend, PinStore, StoreError};
