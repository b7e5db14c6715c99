//! # Store State
//!
//! Opens the entity store described by the configuration.

use bella_core::SystemClock;
use bella_store::{EntityStore, JsonFileStore, StoreConfig};
use tracing::info;

use super::config::AppConfig;
use crate::error::ApiError;

/// The store as the CLI runs it: a JSON file and the wall clock.
pub type AppStore = EntityStore<JsonFileStore, SystemClock>;

/// Opens the store in the configured data directory.
///
/// ## Startup Sequence
/// ```text
/// AppConfig ──► data dir + offset ──► StoreConfig ──► JsonFileStore
///                                                          │
///                              SystemClock(offset) ────────┤
///                                                          ▼
///                                              EntityStore::open (load)
/// ```
pub fn open_store(config: &AppConfig) -> Result<AppStore, ApiError> {
    let offset = config
        .offset()
        .map_err(|e| ApiError::config(e.to_string()))?;

    let store_config = StoreConfig::new(config.resolved_data_dir()).pretty(config.pretty_json);
    let persistence = JsonFileStore::new(&store_config);
    info!(path = %persistence.path().display(), %offset, "Opening store");

    Ok(EntityStore::open(persistence, SystemClock::new(offset)))
}
