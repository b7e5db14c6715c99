//! # bella-store: State Ownership for Bella
//!
//! Owns the published snapshot, applies mutations as whole replacements
//! and persists them.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Bella Data Flow                                │
//! │                                                                         │
//! │  CLI command (sale create)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   bella-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  EntityStore  │    │  SharedStore  │    │ Persistence  │  │   │
//! │  │   │  (store.rs)   │◄───│  (shared.rs)  │    │ JsonFileStore│  │   │
//! │  │   │   snapshot    │───►│ Arc<Mutex<_>> │    │ InMemory     │  │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────▲───────┘  │   │
//! │  │           └────────────── save / load ─────────────┘          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │   <data dir>/bellagestao_v1.json                                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bella_store::{EntityStore, JsonFileStore, StoreConfig};
//! use bella_core::SystemClock;
//!
//! let config = StoreConfig::new("path/to/data");
//! let mut store = EntityStore::open(JsonFileStore::new(&config), SystemClock::new(offset));
//!
//! let stats = store.dashboard_stats();
//! store.close()?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod persistence;
pub mod shared;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use persistence::{InMemoryPersistence, JsonFileStore, SnapshotPersistence};
pub use shared::SharedStore;
pub use store::EntityStore;
