//! # Profile Commands
//!
//! The operator's profile: shown on the dashboard header and the account
//! pages.

use bella_core::{Clock, Profile, Theme};
use bella_store::{EntityStore, SnapshotPersistence};
use tracing::debug;

use crate::error::ApiError;

/// Fields to change; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub business_name: Option<String>,
    pub currency: Option<String>,
    pub theme: Option<Theme>,
}

pub fn show_profile<P: SnapshotPersistence, C: Clock>(
    store: &EntityStore<P, C>,
) -> Result<Profile, ApiError> {
    Ok(store.snapshot().profile.clone())
}

/// Merges `changes` into the current profile and saves it.
pub fn set_profile<P: SnapshotPersistence, C: Clock>(
    store: &mut EntityStore<P, C>,
    changes: ProfileChanges,
) -> Result<Profile, ApiError> {
    debug!(?changes, "set_profile command");

    let current = store.snapshot().profile.clone();
    let profile = Profile {
        name: changes.name.unwrap_or(current.name),
        business_name: changes.business_name.unwrap_or(current.business_name),
        currency: changes
            .currency
            .map(|c| c.trim().to_uppercase())
            .unwrap_or(current.currency),
        theme: changes.theme.or(current.theme),
    };

    Ok(store.update_profile(profile)?)
}
