//! # Store Configuration
//!
//! Where and how the snapshot is persisted.

use bella_core::STORAGE_KEY;
use std::path::PathBuf;

/// Store configuration.
///
/// ## Example
/// ```rust
/// use bella_store::StoreConfig;
///
/// let config = StoreConfig::new("/var/lib/bella").pretty(false);
/// assert!(config.snapshot_path().ends_with("bellagestao_v1.json"));
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the snapshot file. Created on first save.
    pub data_dir: PathBuf,

    /// Namespace key; the snapshot file is `<key>.json`.
    /// Default: `bellagestao_v1`
    pub storage_key: String,

    /// Indent the JSON document.
    /// Default: true (the file is small and sometimes read by hand)
    pub pretty: bool,
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        StoreConfig {
            data_dir: data_dir.into(),
            storage_key: STORAGE_KEY.to_string(),
            pretty: true,
        }
    }

    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Full path of the snapshot document.
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.storage_key))
    }
}
