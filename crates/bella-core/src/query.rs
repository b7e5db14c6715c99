//! # Read Views
//!
//! Filtered and joined views over a snapshot: the receivables list,
//! customer search, catalog filters and the customer account page.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use ts_rs::TS;

use crate::calendar::start_of_day;
use crate::money::Money;
use crate::snapshot::Snapshot;
use crate::status::{classify, CustomerStatus};
use crate::types::{Customer, Installment, Product, Sale};

// =============================================================================
// Receivables
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum InstallmentState {
    /// Due before the start of today.
    Overdue,
    Pending,
}

/// An unpaid installment with its owner resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PendingInstallment {
    pub installment: Installment,
    pub sale_installments: u32,
    pub customer_id: String,
    /// Empty when the owning customer no longer resolves.
    pub customer_name: String,
    pub state: InstallmentState,
}

/// Every unpaid installment, earliest due date first.
pub fn pending_installments(
    snapshot: &Snapshot,
    now: &DateTime<FixedOffset>,
) -> Vec<PendingInstallment> {
    let today = start_of_day(now);

    let mut pending: Vec<PendingInstallment> = snapshot
        .unpaid_installments()
        .filter_map(|installment| {
            let sale = snapshot.sale(&installment.sale_id)?;
            let customer_name = snapshot
                .customer(&sale.customer_id)
                .map(|c| c.name.clone())
                .unwrap_or_default();

            Some(PendingInstallment {
                installment: installment.clone(),
                sale_installments: sale.installments_count,
                customer_id: sale.customer_id.clone(),
                customer_name,
                state: if installment.is_overdue(today) {
                    InstallmentState::Overdue
                } else {
                    InstallmentState::Pending
                },
            })
        })
        .collect();

    pending.sort_by(|a, b| {
        a.installment
            .due_date
            .cmp(&b.installment.due_date)
            .then(a.installment.number.cmp(&b.installment.number))
    });
    pending
}

// =============================================================================
// Customers
// =============================================================================

/// Customers whose name contains `term` (case-insensitive) or whose phone
/// contains it. A blank term matches everyone.
pub fn search_customers<'a>(snapshot: &'a Snapshot, term: &str) -> Vec<&'a Customer> {
    let term = term.trim();
    if term.is_empty() {
        return snapshot.customers.iter().collect();
    }

    let needle = term.to_lowercase();
    snapshot
        .customers
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&needle) || c.phone.contains(term))
        .collect()
}

/// One sale with its schedule, as shown on the account page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleWithInstallments {
    pub sale: Sale,
    pub installments: Vec<Installment>,
}

/// A customer's full account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CustomerAccount {
    pub customer: Customer,
    pub status: CustomerStatus,
    /// Sum of unpaid installments.
    pub balance: Money,
    /// Newest first.
    pub sales: Vec<SaleWithInstallments>,
}

/// Builds the account view, or `None` for an unknown customer.
pub fn customer_account(
    snapshot: &Snapshot,
    customer_id: &str,
    now: &DateTime<FixedOffset>,
) -> Option<CustomerAccount> {
    let customer = snapshot.customer(customer_id)?.clone();

    let mut sales: Vec<SaleWithInstallments> = snapshot
        .sales_of(customer_id)
        .map(|sale| SaleWithInstallments {
            sale: sale.clone(),
            installments: snapshot
                .installments_of_sale(&sale.id)
                .into_iter()
                .cloned()
                .collect(),
        })
        .collect();
    sales.sort_by(|a, b| b.sale.created_at.cmp(&a.sale.created_at));

    let all = sales.iter().flat_map(|s| s.installments.iter());
    let status = classify(all.clone(), now);
    let balance: Money = all.filter(|i| !i.is_paid()).map(Installment::amount).sum();

    Some(CustomerAccount {
        customer,
        status,
        balance,
        sales,
    })
}

/// Sales ordered newest first, optionally limited to one customer.
pub fn recent_sales<'a>(snapshot: &'a Snapshot, customer_id: Option<&str>) -> Vec<&'a Sale> {
    let mut sales: Vec<&Sale> = snapshot
        .sales
        .iter()
        .filter(|s| customer_id.map_or(true, |id| s.customer_id == id))
        .collect();
    sales.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sales
}

// =============================================================================
// Products
// =============================================================================

/// Products whose name contains `term` (case-insensitive), optionally
/// restricted to one category.
pub fn filter_products<'a>(
    snapshot: &'a Snapshot,
    term: &str,
    category: Option<&str>,
) -> Vec<&'a Product> {
    let needle = term.trim().to_lowercase();
    snapshot
        .products
        .iter()
        .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
        .filter(|p| category.map_or(true, |c| p.category == c))
        .collect()
}

/// Distinct non-empty categories, sorted.
pub fn categories(snapshot: &Snapshot) -> Vec<String> {
    snapshot
        .products
        .iter()
        .map(|p| p.category.trim())
        .filter(|c| !c.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Products at or below their threshold, lowest stock first.
pub fn low_stock_products(snapshot: &Snapshot) -> Vec<&Product> {
    let mut low: Vec<&Product> = snapshot.products.iter().filter(|p| p.is_low_stock()).collect();
    low.sort_by_key(|p| p.stock);
    low
}

/// Instant of the latest unpaid due date of a customer, if any.
pub fn last_due_date(snapshot: &Snapshot, customer_id: &str) -> Option<DateTime<Utc>> {
    snapshot
        .installments_of_customer(customer_id)
        .into_iter()
        .filter(|i| !i.is_paid())
        .map(|i| i.due_date)
        .max()
}
