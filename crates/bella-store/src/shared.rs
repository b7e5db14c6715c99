//! # Shared Store
//!
//! Thread-safe handle to one [`EntityStore`].
//!
//! ## Locking Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SharedStore (Arc<Mutex<EntityStore>>)                                  │
//! │                                                                         │
//! │  Thread A: with_store_mut(|s| s.create_sale(..))  ── holds lock ──┐    │
//! │  Thread B: with_store(|s| s.dashboard_stats())    ── waits ───────┤    │
//! │                                                                    ▼    │
//! │  One operation at a time, always against a fully published snapshot.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Keep closures short; they run under the lock.

use bella_core::{Clock, SystemClock};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::error::StoreResult;
use crate::persistence::SnapshotPersistence;
use crate::store::EntityStore;

/// Cloneable handle; every clone points at the same store.
pub struct SharedStore<P: SnapshotPersistence, C: Clock = SystemClock> {
    inner: Arc<Mutex<EntityStore<P, C>>>,
}

impl<P: SnapshotPersistence, C: Clock> Clone for SharedStore<P, C> {
    fn clone(&self) -> Self {
        SharedStore {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: SnapshotPersistence, C: Clock> SharedStore<P, C> {
    pub fn new(store: EntityStore<P, C>) -> Self {
        SharedStore {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Executes a function with read access to the store.
    pub fn with_store<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&EntityStore<P, C>) -> R,
    {
        let store = self.inner.lock();
        f(&store)
    }

    /// Executes a function with write access to the store.
    pub fn with_store_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut EntityStore<P, C>) -> R,
    {
        let mut store = self.inner.lock();
        f(&mut store)
    }

    pub fn flush(&self) -> StoreResult<()> {
        self.inner.lock().flush()
    }
}
