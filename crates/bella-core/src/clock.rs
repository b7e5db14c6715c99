//! # Clock
//!
//! Source of "now" for the store.
//!
//! The ledger, classifier and aggregator are pure functions that take `now`
//! as an argument; only the store asks a [`Clock`] for it. Production code
//! uses [`SystemClock`]; tests drive time with [`ManualClock`] (e.g. to let
//! an installment's due date pass).

use chrono::{DateTime, Duration, FixedOffset, Utc};
use parking_lot::Mutex;

/// Provides the current instant in the operator's calendar offset.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

// =============================================================================
// System Clock
// =============================================================================

/// Wall clock, reported in a fixed calendar offset.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        SystemClock { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

// =============================================================================
// Manual Clock
// =============================================================================

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<FixedOffset>>,
}

impl ManualClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        ManualClock {
            now: Mutex::new(now),
        }
    }

    /// Starts at `now` in UTC.
    pub fn at_utc(now: DateTime<Utc>) -> Self {
        ManualClock::new(now.fixed_offset())
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.now.lock()
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> DateTime<FixedOffset> {
        (**self).now()
    }
}
