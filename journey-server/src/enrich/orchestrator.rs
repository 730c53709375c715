//! The enrichment orchestrator.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use futures::future::join_all;
use tracing::{debug, warn};

use crate::domain::{
    BoardKind, Composition, EnrichedBoard, EnrichedJourney, Journey, JourneyDetails,
    StationCode, TrainNumber,
};
use crate::upstream::{RailSource, UpstreamError};

use super::destination::final_destination;
use super::disruptions::fetch_active_disruptions;

/// Message shown instead of configuration problems.
pub const GENERIC_UNAVAILABLE_MESSAGE: &str = "journey information is temporarily unavailable";

/// Error from the enrichment pipeline.
///
/// Only failures of the board itself and of the disruption list reach
/// the caller; per-journey lookups never fail the call.
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    /// Failed to fetch the station board
    #[error("failed to fetch journeys at {station}: {source}")]
    Journeys {
        station: StationCode,
        source: UpstreamError,
    },

    /// Failed to fetch the station's disruptions
    #[error("failed to fetch disruptions at {station}: {source}")]
    Disruptions {
        station: StationCode,
        source: UpstreamError,
    },
}

impl EnrichError {
    /// The underlying upstream error.
    pub fn upstream(&self) -> &UpstreamError {
        match self {
            EnrichError::Journeys { source, .. } | EnrichError::Disruptions { source, .. } => {
                source
            }
        }
    }

    /// Whether the failure comes from missing credentials.
    pub fn is_configuration(&self) -> bool {
        self.upstream().is_configuration()
    }

    /// A message safe to show end users.
    ///
    /// Configuration causes are replaced by a generic message so that
    /// deployment details never leak.
    pub fn public_message(&self) -> String {
        if self.is_configuration() {
            GENERIC_UNAVAILABLE_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

/// Builds enriched station boards from a [`RailSource`].
///
/// Stateless per call; share it through an `Arc`.
pub struct JourneyEnricher<S> {
    source: Arc<S>,
}

impl<S: RailSource> JourneyEnricher<S> {
    /// Create a new enricher over the given source.
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Fetch a station board and enrich every journey on it.
    ///
    /// The board and the station's disruptions are fetched concurrently;
    /// a failure of either fails the call. Compositions (and, for
    /// arrivals, final destinations) are then fetched concurrently for all
    /// journeys; each lookup that fails is logged and left empty. The
    /// result has one entry per board row, in board order.
    pub async fn get_enriched_journeys(
        &self,
        station: &StationCode,
        kind: BoardKind,
        date_time: Option<DateTime<FixedOffset>>,
    ) -> Result<EnrichedBoard, EnrichError> {
        let (journeys, disruptions) = tokio::join!(
            self.source.fetch_journeys(station, kind, date_time),
            fetch_active_disruptions(self.source.as_ref(), station),
        );

        let journeys = journeys.map_err(|source| EnrichError::Journeys {
            station: station.clone(),
            source,
        })?;

        let disruptions = disruptions.map_err(|source| EnrichError::Disruptions {
            station: station.clone(),
            source,
        })?;

        let journeys: Vec<EnrichedJourney> = join_all(
            journeys
                .into_iter()
                .map(|journey| self.enrich_one(journey, station, kind)),
        )
        .await;

        debug!(
            station = %station,
            kind = kind.as_str(),
            journeys = journeys.len(),
            with_composition = journeys.iter().filter(|j| j.composition.is_some()).count(),
            disruptions = disruptions.len(),
            "Enriched station board"
        );

        Ok(EnrichedBoard {
            journeys,
            disruptions,
        })
    }

    /// Stop list and notes of a train; `None` when it is not active.
    pub async fn get_journey_details(
        &self,
        train: TrainNumber,
    ) -> Result<Option<JourneyDetails>, UpstreamError> {
        self.source.fetch_journey_details(train).await
    }

    async fn enrich_one(
        &self,
        journey: Journey,
        station: &StationCode,
        kind: BoardKind,
    ) -> EnrichedJourney {
        let train = journey.train_number();

        let destination = async {
            match kind {
                BoardKind::Departures => None,
                BoardKind::Arrivals => self.lookup_final_destination(train).await,
            }
        };

        let (composition, final_destination) =
            tokio::join!(self.lookup_composition(train, station), destination);

        EnrichedJourney {
            journey,
            composition,
            final_destination,
        }
    }

    async fn lookup_composition(
        &self,
        train: TrainNumber,
        station: &StationCode,
    ) -> Option<Composition> {
        match self.source.fetch_composition(train, station).await {
            Ok(composition) => composition,
            Err(e) => {
                warn!(
                    train = %train,
                    station = %station,
                    error = %e,
                    "Composition lookup failed, continuing without"
                );
                None
            }
        }
    }

    async fn lookup_final_destination(&self, train: TrainNumber) -> Option<String> {
        match self.source.fetch_journey_details(train).await {
            Ok(Some(details)) => final_destination(&details),
            Ok(None) => {
                debug!(train = %train, "Train not active, no final destination");
                None
            }
            Err(e) => {
                warn!(
                    train = %train,
                    error = %e,
                    "Destination lookup failed, continuing without"
                );
                None
            }
        }
    }
}
