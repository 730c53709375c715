//! Application state for the web layer.

use std::sync::Arc;

use crate::enrich::JourneyEnricher;
use crate::stations::StationNames;
use crate::tracker::PinnedJourneyTracker;
use crate::upstream::{RailSource, UpstreamClient};

/// Shared application state.
///
/// Contains all the services needed to handle requests.
pub struct AppState<S: RailSource + 'static = UpstreamClient> {
    /// Enrichment pipeline over the upstream API
    pub enricher: Arc<JourneyEnricher<S>>,

    /// Station directory for destination-change detection
    pub stations: StationNames,

    /// Tracker for the pinned journey
    pub tracker: Arc<PinnedJourneyTracker<S>>,
}

impl<S: RailSource + 'static> AppState<S> {
    /// Create a new app state.
    pub fn new(
        enricher: Arc<JourneyEnricher<S>>,
        stations: StationNames,
        tracker: PinnedJourneyTracker<S>,
    ) -> Self {
        Self {
            enricher,
            stations,
            tracker: Arc::new(tracker),
        }
    }
}

impl<S: RailSource + 'static> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            enricher: self.enricher.clone(),
            stations: self.stations.clone(),
            tracker: self.tracker.clone(),
        }
    }
}
