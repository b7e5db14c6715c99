//! # Calendar Arithmetic
//!
//! Day and month boundaries for the operator's calendar.
//!
//! Timestamps are stored in UTC, but "today" and "this month" are the
//! operator's wall-clock notions. Every function here takes the reference
//! instant as a `DateTime<FixedOffset>`; its offset IS the operator's
//! calendar.
//!
//! ## Month Addition Rule
//! ```text
//! 2026-01-15 + 1 month  →  2026-02-15
//! 2026-01-31 + 1 month  →  2026-02-28   (clamped to last day)
//! 2028-01-31 + 1 month  →  2028-02-29   (leap year)
//! 2026-01-31 + 2 months →  2026-03-31   (each k counted from the origin)
//! ```
//! The time of day is preserved.

use chrono::{
    DateTime, Datelike, Days, Duration, FixedOffset, Months, NaiveDateTime, NaiveTime, TimeZone,
    Utc,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Converts an operator wall-clock time to UTC.
fn local_to_utc(naive: NaiveDateTime, offset: FixedOffset) -> DateTime<Utc> {
    let utc_naive = naive - Duration::seconds(offset.local_minus_utc() as i64);
    Utc.from_utc_datetime(&utc_naive)
}

/// First instant of the calendar day containing `now`.
pub fn start_of_day(now: &DateTime<FixedOffset>) -> DateTime<Utc> {
    local_to_utc(now.date_naive().and_time(NaiveTime::MIN), *now.offset())
}

/// First instant of the calendar month containing `now`.
pub fn start_of_month(now: &DateTime<FixedOffset>) -> DateTime<Utc> {
    let first = now.date_naive() - Days::new(now.day0() as u64);
    local_to_utc(first.and_time(NaiveTime::MIN), *now.offset())
}

/// `origin` advanced by `months` calendar months, clamped to the last day
/// of a shorter target month.
pub fn add_months(origin: &DateTime<FixedOffset>, months: u32) -> DateTime<Utc> {
    let shifted = origin.naive_local() + Months::new(months);
    local_to_utc(shifted, *origin.offset())
}

// =============================================================================
// Year-Month Key
// =============================================================================

/// A (year, month) bucket key, ordered chronologically.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct YearMonth {
    pub year: i32,
    /// 1-12
    pub month: u32,
}

impl YearMonth {
    pub const fn new(year: i32, month: u32) -> Self {
        YearMonth { year, month }
    }

    /// The month `instant` falls in, seen from `offset`.
    pub fn of(instant: &DateTime<Utc>, offset: &FixedOffset) -> Self {
        let local = instant.with_timezone(offset);
        YearMonth::new(local.year(), local.month())
    }

    /// The month containing `now` (in its own offset).
    pub fn current(now: &DateTime<FixedOffset>) -> Self {
        YearMonth::new(now.year(), now.month())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(offset_hours: i32, rfc3339_local: &str) -> DateTime<FixedOffset> {
        let offset = FixedOffset::east_opt(offset_hours * 3600).unwrap();
        let naive = NaiveDateTime::parse_from_str(rfc3339_local, "%Y-%m-%d %H:%M:%S").unwrap();
        offset.from_local_datetime(&naive).unwrap()
    }

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_start_of_day_respects_offset() {
        // 01:30 in São Paulo is 04:30 UTC; the local day began at 03:00 UTC.
        let now = at(-3, "2026-03-10 01:30:00");
        assert_eq!(start_of_day(&now), utc("2026-03-10T03:00:00Z"));
    }

    #[test]
    fn test_start_of_month() {
        let now = at(0, "2026-03-17 15:45:00");
        assert_eq!(start_of_month(&now), utc("2026-03-01T00:00:00Z"));

        let now = at(-3, "2026-03-01 00:10:00");
        assert_eq!(start_of_month(&now), utc("2026-03-01T03:00:00Z"));
    }

    #[test]
    fn test_add_months_keeps_day_and_time() {
        let origin = at(0, "2026-01-15 10:00:00");
        assert_eq!(add_months(&origin, 1), utc("2026-02-15T10:00:00Z"));
        assert_eq!(add_months(&origin, 12), utc("2027-01-15T10:00:00Z"));
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        let origin = at(0, "2026-01-31 09:00:00");
        assert_eq!(add_months(&origin, 1), utc("2026-02-28T09:00:00Z"));
        assert_eq!(add_months(&origin, 2), utc("2026-03-31T09:00:00Z"));
        assert_eq!(add_months(&origin, 3), utc("2026-04-30T09:00:00Z"));

        let leap = at(0, "2028-01-31 09:00:00");
        assert_eq!(add_months(&leap, 1), utc("2028-02-29T09:00:00Z"));
    }

    #[test]
    fn test_add_months_is_local_calendar_based() {
        // 22:00 on Jan 31 in UTC-3 is already Feb 1 in UTC; the local day wins.
        let origin = at(-3, "2026-01-31 22:00:00");
        assert_eq!(add_months(&origin, 1), utc("2026-03-01T01:00:00Z"));
    }

    #[test]
    fn test_year_month_ordering_and_display() {
        let a = YearMonth::new(2025, 12);
        let b = YearMonth::new(2026, 1);
        assert!(a < b);
        assert_eq!(b.to_string(), "2026-01");

        let offset = FixedOffset::west_opt(3 * 3600).unwrap();
        assert_eq!(
            YearMonth::of(&utc("2026-02-01T02:00:00Z"), &offset),
            YearMonth::new(2026, 1)
        );
    }
}
