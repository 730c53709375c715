//! Observable storage for the pinned journey.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::{Map, Value};
use tokio::sync::watch;
use tracing::debug;

use crate::domain::PinnedJourneySnapshot;

/// Key under which the snapshot is stored.
pub const PINNED_JOURNEY_KEY: &str = "pinnedJourney";

/// Errors from reading or writing the pin store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("pin store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pin store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable storage behind a [`PinStore`].
pub trait PinBackend: Send + Sync {
    /// Read the stored snapshot, if any.
    fn load(&self) -> Result<Option<PinnedJourneySnapshot>, StoreError>;

    /// Replace the stored snapshot; `None` clears it.
    fn save(&self, pinned: Option<&PinnedJourneySnapshot>) -> Result<(), StoreError>;
}

/// Keeps the snapshot in memory only.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    pinned: Mutex<Option<PinnedJourneySnapshot>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PinBackend for MemoryBackend {
    fn load(&self) -> Result<Option<PinnedJourneySnapshot>, StoreError> {
        Ok(self
            .pinned
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, pinned: Option<&PinnedJourneySnapshot>) -> Result<(), StoreError> {
        *self.pinned.lock().unwrap_or_else(PoisonError::into_inner) = pinned.cloned();
        Ok(())
    }
}

/// Persists the snapshot in a JSON object file.
///
/// Only the `pinnedJourney` key is touched; other keys in the file are kept.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Read the file as a JSON object; a missing file is an empty object.
    fn read_object(&self) -> Result<Map<String, Value>, StoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&contents)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }
}

impl PinBackend for FileBackend {
    fn load(&self) -> Result<Option<PinnedJourneySnapshot>, StoreError> {
        let mut object = self.read_object()?;

        match object.remove(PINNED_JOURNEY_KEY) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    fn save(&self, pinned: Option<&PinnedJourneySnapshot>) -> Result<(), StoreError> {
        let mut object = self.read_object()?;

        match pinned {
            Some(snapshot) => {
                object.insert(
                    PINNED_JOURNEY_KEY.to_string(),
                    serde_json::to_value(snapshot)?,
                );
            }
            None => {
                object.remove(PINNED_JOURNEY_KEY);
            }
        }

        // Create parent directories if needed
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        // Write beside the target and rename over it, so an interrupted
        // write never leaves a truncated store behind
        let json = serde_json::to_string_pretty(&Value::Object(object))?;
        let staging = self.staging_path();
        std::fs::write(&staging, json)?;
        std::fs::rename(&staging, &self.path)?;

        debug!(path = %self.path.display(), pinned = pinned.is_some(), "Saved pin store");
        Ok(())
    }
}

/// Single-writer, multi-reader store for the pinned journey.
///
/// Every write is persisted through the backend first and only then
/// broadcast to subscribers, so observers never see a state that was not
/// saved.
#[derive(Clone)]
pub struct PinStore {
    backend: Arc<dyn PinBackend>,
    tx: Arc<watch::Sender<Option<PinnedJourneySnapshot>>>,
    write: Arc<Mutex<()>>,
}

impl PinStore {
    /// Open a store, loading the current snapshot from the backend.
    pub fn open(backend: impl PinBackend + 'static) -> Result<Self, StoreError> {
        let initial = backend.load()?;
        let (tx, _) = watch::channel(initial);

        Ok(Self {
            backend: Arc::new(backend),
            tx: Arc::new(tx),
            write: Arc::new(Mutex::new(())),
        })
    }

    /// An empty store that keeps nothing on disk.
    pub fn in_memory() -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            backend: Arc::new(MemoryBackend::new()),
            tx: Arc::new(tx),
            write: Arc::new(Mutex::new(())),
        }
    }

    /// The current snapshot.
    pub fn current(&self) -> Option<PinnedJourneySnapshot> {
        self.tx.borrow().clone()
    }

    /// Observe changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<PinnedJourneySnapshot>> {
        self.tx.subscribe()
    }

    /// Persist and broadcast a new value.
    pub fn set(&self, pinned: Option<PinnedJourneySnapshot>) -> Result<(), StoreError> {
        let _guard = self.write.lock().unwrap_or_else(PoisonError::into_inner);

        self.backend.save(pinned.as_ref())?;
        self.tx.send_replace(pinned);

        Ok(())
    }
}
