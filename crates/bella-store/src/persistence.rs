//! # Snapshot Persistence
//!
//! Loads and saves the whole snapshot as one document.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        JsonFileStore::save                              │
//! │                                                                         │
//! │  Snapshot ──serde_json──► bellagestao_v1.json.tmp ──fsync──► rename     │
//! │                                                        │                │
//! │                                                        ▼                │
//! │                                          bellagestao_v1.json            │
//! │                                                                         │
//! │  A crash mid-write leaves the previous document intact.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bella_core::Snapshot;
use parking_lot::Mutex;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};

/// Where a snapshot lives between runs.
pub trait SnapshotPersistence: Send {
    /// Reads the stored snapshot. `Ok(None)` when nothing was stored yet.
    fn load(&self) -> StoreResult<Option<Snapshot>>;

    /// Replaces the stored snapshot.
    fn save(&self, snapshot: &Snapshot) -> StoreResult<()>;

    /// Moves an undecodable document aside so the next save cannot
    /// overwrite it. Returns the new location, if the backend has one.
    fn quarantine(&self) -> StoreResult<Option<PathBuf>> {
        Ok(None)
    }
}

impl<P: SnapshotPersistence + ?Sized> SnapshotPersistence for Box<P> {
    fn load(&self) -> StoreResult<Option<Snapshot>> {
        (**self).load()
    }

    fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        (**self).save(snapshot)
    }

    fn quarantine(&self) -> StoreResult<Option<PathBuf>> {
        (**self).quarantine()
    }
}

// =============================================================================
// JSON File
// =============================================================================

/// One JSON file per storage key.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    pretty: bool,
}

impl JsonFileStore {
    pub fn new(config: &StoreConfig) -> Self {
        JsonFileStore {
            path: config.snapshot_path(),
            pretty: config.pretty,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling(".tmp")
    }

    /// `bellagestao_v1.json.corrupt`, then `.corrupt.1`, `.corrupt.2`, ...
    /// so an earlier quarantined document is never replaced.
    fn corrupt_path(&self) -> PathBuf {
        let first = self.sibling(".corrupt");
        if !first.exists() {
            return first;
        }
        (1..)
            .map(|n| self.sibling(&format!(".corrupt.{}", n)))
            .find(|candidate| !candidate.exists())
            .unwrap_or(first)
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    }
}

impl SnapshotPersistence for JsonFileStore {
    fn load(&self) -> StoreResult<Option<Snapshot>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No snapshot file yet");
                return Ok(None);
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        if raw.trim().is_empty() {
            return Ok(None);
        }

        let snapshot = serde_json::from_str(&raw)?;
        debug!(path = %self.path.display(), bytes = raw.len(), "Snapshot read");
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
        }

        let body = if self.pretty {
            serde_json::to_vec_pretty(snapshot)?
        } else {
            serde_json::to_vec(snapshot)?
        };

        let temp = self.temp_path();
        let mut file = fs::File::create(&temp).map_err(|e| StoreError::io(&temp, e))?;
        file.write_all(&body).map_err(|e| StoreError::io(&temp, e))?;
        file.sync_all().map_err(|e| StoreError::io(&temp, e))?;
        drop(file);

        fs::rename(&temp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;

        debug!(path = %self.path.display(), bytes = body.len(), "Snapshot written");
        Ok(())
    }

    fn quarantine(&self) -> StoreResult<Option<PathBuf>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let target = self.corrupt_path();
        fs::rename(&self.path, &target).map_err(|e| StoreError::io(&self.path, e))?;
        warn!(from = %self.path.display(), to = %target.display(), "Snapshot moved aside");
        Ok(Some(target))
    }
}

// =============================================================================
// In-Memory
// =============================================================================

/// Keeps the last saved snapshot in memory (for testing).
///
/// `fail_saves(true)` makes every save fail, to exercise the store's
/// dirty-retry path.
#[derive(Debug, Default)]
pub struct InMemoryPersistence {
    stored: Mutex<Option<Snapshot>>,
    fail_saves: Mutex<bool>,
    saves: Mutex<usize>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_saves(&self, fail: bool) {
        *self.fail_saves.lock() = fail;
    }

    /// The last successfully saved snapshot.
    pub fn stored(&self) -> Option<Snapshot> {
        self.stored.lock().clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }
}

impl SnapshotPersistence for InMemoryPersistence {
    fn load(&self) -> StoreResult<Option<Snapshot>> {
        Ok(self.stored.lock().clone())
    }

    fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        if *self.fail_saves.lock() {
            return Err(StoreError::io(
                "memory",
                std::io::Error::new(ErrorKind::Other, "save disabled"),
            ));
        }
        *self.stored.lock() = Some(snapshot.clone());
        *self.saves.lock() += 1;
        Ok(())
    }
}

impl<P: SnapshotPersistence + Sync + ?Sized> SnapshotPersistence for std::sync::Arc<P> {
    fn load(&self) -> StoreResult<Option<Snapshot>> {
        (**self).load()
    }

    fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        (**self).save(snapshot)
    }

    fn quarantine(&self) -> StoreResult<Option<PathBuf>> {
        (**self).quarantine()
    }
}
