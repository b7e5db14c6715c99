//! # State Module
//!
//! What a command run needs: the loaded configuration and the open store.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────┐      ┌──────────────────────────────┐    │
//! │  │        AppConfig         │      │          AppStore            │    │
//! │  │                          │      │                              │    │
//! │  │  data_dir                │─────►│  EntityStore<                │    │
//! │  │  currency_symbol?        │      │    JsonFileStore,            │    │
//! │  │  utc_offset              │─────►│    SystemClock>              │    │
//! │  └──────────────────────────┘      └──────────────────────────────┘    │
//! │                                                                         │
//! │  AppConfig: read-only after startup                                     │
//! │  AppStore:  owned by `run`, borrowed mutably by one command, closed     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod store;

pub use config::{currency_symbol_for, parse_offset, AppConfig, ConfigError, ConfigResult};
pub use store::{open_store, AppStore};
