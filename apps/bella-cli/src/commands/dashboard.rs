//! # Dashboard Command
//!
//! The home-screen figures, formatted for display.

use bella_core::{Clock, DashboardStats, Money, MonthBucket};
use bella_store::{EntityStore, SnapshotPersistence};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppConfig;

/// A money figure with its display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Amount {
    pub cents: i64,
    pub formatted: String,
}

impl Amount {
    fn of(config: &AppConfig, money: Money) -> Self {
        Amount {
            cents: money.cents(),
            formatted: config.format_currency(money.cents()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthDto {
    /// `YYYY-MM`
    pub month: String,
    pub amount: Amount,
    pub installments: usize,
    pub is_current: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDto {
    pub business_name: String,
    pub sales_today: Amount,
    pub sales_month: Amount,
    pub total_receivable: Amount,
    pub receivable_this_month: Amount,
    pub receivable_future: Amount,
    pub active_customers: usize,
    pub low_stock_items: usize,
    pub receivables_by_month: Vec<MonthDto>,
    pub furthest_installment: Option<DateTime<Utc>>,
}

impl DashboardDto {
    fn build(config: &AppConfig, business_name: String, stats: DashboardStats) -> Self {
        let month = |b: MonthBucket| MonthDto {
            month: b.month.to_string(),
            amount: Amount::of(config, b.amount),
            installments: b.installments,
            is_current: b.is_current,
        };

        DashboardDto {
            business_name,
            sales_today: Amount::of(config, stats.sales_today),
            sales_month: Amount::of(config, stats.sales_month),
            total_receivable: Amount::of(config, stats.total_receivable),
            receivable_this_month: Amount::of(config, stats.receivable_this_month),
            receivable_future: Amount::of(config, stats.receivable_future),
            active_customers: stats.active_customers,
            low_stock_items: stats.low_stock_items,
            receivables_by_month: stats.receivables_by_month.into_iter().map(month).collect(),
            furthest_installment: stats.furthest_installment,
        }
    }
}

pub fn dashboard<P: SnapshotPersistence, C: Clock>(
    store: &EntityStore<P, C>,
    config: &AppConfig,
) -> Result<DashboardDto, ApiError> {
    let now = store.now();
    debug!(%now, "dashboard command");

    Ok(DashboardDto::build(
        config,
        store.snapshot().profile.business_name.clone(),
        store.dashboard_stats(),
    ))
}
