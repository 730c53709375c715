//! Refreshable station directory.

use std::sync::Arc;
use tokio::sync::RwLock;

use super::client::StationClient;
use super::error::StationError;
use super::index::StationIndex;

/// Thread-safe station directory.
///
/// Readers take a cheap [`snapshot`](Self::snapshot) of the current index;
/// a background refresh swaps in a new one without blocking them for long.
#[derive(Clone)]
pub struct StationNames {
    inner: Arc<RwLock<Arc<StationIndex>>>,
    client: Option<StationClient>,
}

impl StationNames {
    /// Create a new StationNames by fetching from the API.
    ///
    /// This will fail if the API is unreachable.
    pub async fn fetch(client: StationClient) -> Result<Self, StationError> {
        let stations = client.fetch_all().await?;
        let index = StationIndex::from_stations(stations);

        Ok(Self {
            inner: Arc::new(RwLock::new(Arc::new(index))),
            client: Some(client),
        })
    }

    /// Create an empty directory that can be refreshed later.
    pub fn empty(client: StationClient) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(StationIndex::new()))),
            client: Some(client),
        }
    }

    /// Create a fixed directory with no upstream (for tests and for running
    /// without credentials).
    pub fn fixed(index: StationIndex) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(index))),
            client: None,
        }
    }

    /// The current index.
    pub async fn snapshot(&self) -> Arc<StationIndex> {
        self.inner.read().await.clone()
    }

    /// Get the number of stations in the directory.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Refresh the station data from the API.
    ///
    /// On success, replaces the current index. On failure, the existing
    /// index is preserved and the error is returned.
    pub async fn refresh(&self) -> Result<usize, StationError> {
        let client = self.client.as_ref().ok_or_else(|| {
            StationError::Configuration("station directory has no upstream".to_string())
        })?;

        let stations = client.fetch_all().await?;
        let index = StationIndex::from_stations(stations);
        let count = index.len();

        *self.inner.write().await = Arc::new(index);

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StationCode;
    use crate::stations::StationEntry;

    fn utrecht() -> StationIndex {
        let mut index = StationIndex::new();
        index.insert(
            StationEntry {
                code: StationCode::parse("UT").unwrap(),
                uic_code: "8400621".to_string(),
                name: "Utrecht Centraal".to_string(),
            },
            ["Utrecht"],
        );
        index
    }

    #[tokio::test]
    async fn fixed_directory_serves_snapshot() {
        let names = StationNames::fixed(utrecht());
        assert_eq!(names.len().await, 1);

        let snapshot = names.snapshot().await;
        assert_eq!(snapshot.lookup("utrecht").unwrap().code.as_str(), "UT");
    }

    #[tokio::test]
    async fn refresh_without_upstream_keeps_index() {
        let names = StationNames::fixed(utrecht());

        let err = names.refresh().await.unwrap_err();
        assert!(matches!(err, StationError::Configuration(_)));
        assert_eq!(names.len().await, 1);
    }
}
