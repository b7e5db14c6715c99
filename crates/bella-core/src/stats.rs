//! # Dashboard Aggregator
//!
//! Sales totals and the receivables projection shown on the dashboard.
//!
//! ## Receivables Projection
//! ```text
//! unpaid installments, bucketed by (year, month) of due date
//!
//!   2026-01   2026-02   2026-03 ◄ current   2026-04   2026-05
//!   ───────   ───────   ───────            ───────   ───────
//!    overdue   overdue  this month          future    future
//!
//! total_receivable       = every bucket
//! receivable_this_month  = current bucket
//! receivable_future      = buckets after the current one
//! ```
//! Past-month buckets count toward `total_receivable` only.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::calendar::{start_of_day, start_of_month, YearMonth};
use crate::money::Money;
use crate::snapshot::Snapshot;

/// Unpaid total of one due-date month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MonthBucket {
    pub month: YearMonth,
    pub amount: Money,
    /// Number of unpaid installments in the bucket.
    pub installments: usize,
    pub is_current: bool,
}

/// Dashboard figures, computed at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardStats {
    pub sales_today: Money,
    pub sales_month: Money,
    pub total_receivable: Money,
    pub active_customers: usize,
    pub low_stock_items: usize,
    pub receivable_this_month: Money,
    pub receivable_future: Money,
    /// Ascending by month.
    pub receivables_by_month: Vec<MonthBucket>,
    #[ts(as = "Option<String>")]
    pub furthest_installment: Option<DateTime<Utc>>,
}

/// Computes the dashboard at `now`. Day and month boundaries follow the
/// offset of `now`.
pub fn dashboard_stats(snapshot: &Snapshot, now: &DateTime<FixedOffset>) -> DashboardStats {
    let day_start = start_of_day(now);
    let month_start = start_of_month(now);

    let sales_today: Money = snapshot
        .sales
        .iter()
        .filter(|s| s.created_at >= day_start)
        .map(|s| s.total())
        .sum();

    let sales_month: Money = snapshot
        .sales
        .iter()
        .filter(|s| s.created_at >= month_start)
        .map(|s| s.total())
        .sum();

    let offset = now.offset();
    let current = YearMonth::current(now);

    let mut buckets: BTreeMap<YearMonth, (Money, usize)> = BTreeMap::new();
    let mut furthest: Option<DateTime<Utc>> = None;
    for installment in snapshot.unpaid_installments() {
        let slot = buckets
            .entry(YearMonth::of(&installment.due_date, offset))
            .or_insert((Money::zero(), 0));
        slot.0 += installment.amount();
        slot.1 += 1;

        furthest = furthest.max(Some(installment.due_date));
    }

    let receivable_this_month = buckets
        .get(&current)
        .map(|(amount, _)| *amount)
        .unwrap_or_default();
    let receivable_future: Money = buckets
        .range(current..)
        .filter(|(month, _)| **month > current)
        .map(|(_, (amount, _))| *amount)
        .sum();
    let total_receivable: Money = buckets.values().map(|(amount, _)| *amount).sum();

    let receivables_by_month = buckets
        .into_iter()
        .map(|(month, (amount, installments))| MonthBucket {
            month,
            amount,
            installments,
            is_current: month == current,
        })
        .collect();

    DashboardStats {
        sales_today,
        sales_month,
        total_receivable,
        active_customers: snapshot.customers.len(),
        low_stock_items: snapshot.products.iter().filter(|p| p.is_low_stock()).count(),
        receivable_this_month,
        receivable_future,
        receivables_by_month,
        furthest_installment: furthest,
    }
}
