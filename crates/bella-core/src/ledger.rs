//! # Ledger Engine
//!
//! Turns a cart into a sale, its installment schedule and the matching
//! stock adjustment.
//!
//! ## Sale Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          plan_sale                                      │
//! │                                                                         │
//! │  CreateSaleRequest ──► validate ──► resolve customer/products           │
//! │                                            │                            │
//! │                                            ▼                            │
//! │                      freeze unit prices, total = Σ qty × price          │
//! │                                            │                            │
//! │                                            ▼                            │
//! │                 split total into N installments (remainder → last)      │
//! │                 installment k due at now + k months                     │
//! │                                            │                            │
//! │                                            ▼                            │
//! │                 SalePlan { sale, installments, stock_changes }          │
//! │                                            │                            │
//! │                    store: clone snapshot ──► apply_to ──► publish       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Planning reads the snapshot and never mutates it. A failed plan leaves
//! nothing behind.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::calendar::add_months;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::snapshot::Snapshot;
use crate::types::{CreateSaleRequest, Installment, Sale, SaleItem};
use crate::validation::validate_sale_request;
use crate::{new_id, MAX_CART_ITEMS};

/// Stock level of one product before and after a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockChange {
    pub product_id: String,
    pub before: i64,
    pub after: i64,
}

/// Everything a sale adds to or changes in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalePlan {
    pub sale: Sale,
    pub installments: Vec<Installment>,
    pub stock_changes: Vec<StockChange>,
}

impl SalePlan {
    /// Applies the plan to a working copy of the snapshot.
    pub fn apply_to(&self, snapshot: &mut Snapshot) {
        snapshot.sales.push(self.sale.clone());
        snapshot.installments.extend(self.installments.iter().cloned());

        for change in &self.stock_changes {
            if let Some(product) = snapshot
                .products
                .iter_mut()
                .find(|p| p.id == change.product_id)
            {
                product.stock = change.after;
            }
        }
    }
}

/// Builds the installment schedule for a sale.
///
/// ## Schedule Rules
/// - `count` installments numbered 1..=count
/// - Each one is `total / count` cents; the final one also carries the
///   remainder, so the amounts sum to `total` exactly
/// - Installment k is due `k` calendar months after `now`
///
/// ```text
/// 100.00 in 3  →  33.33, 33.33, 33.34
/// 300.00 in 3  →  100.00, 100.00, 100.00
/// ```
pub fn installment_schedule(
    sale_id: &str,
    total: Money,
    count: u32,
    now: &DateTime<FixedOffset>,
) -> Vec<Installment> {
    total
        .split_evenly(count)
        .into_iter()
        .zip(1..=count)
        .map(|(amount, number)| Installment {
            id: new_id(),
            sale_id: sale_id.to_string(),
            number,
            amount_cents: amount.cents(),
            due_date: add_months(now, number),
            paid_at: None,
        })
        .collect()
}

/// Plans a credit sale against the current snapshot.
///
/// ## Errors
/// - `CoreError::Validation` for malformed requests (empty cart,
///   non-positive quantity, installments outside 1..=12)
/// - `CoreError::CartTooLarge` above MAX_CART_ITEMS lines
/// - `CoreError::CustomerNotFound` / `CoreError::ProductNotFound` for
///   unknown references
///
/// Selling more units than are in stock is allowed; stock floors at zero.
pub fn plan_sale(
    snapshot: &Snapshot,
    request: &CreateSaleRequest,
    now: DateTime<FixedOffset>,
) -> CoreResult<SalePlan> {
    if request.items.len() > MAX_CART_ITEMS {
        return Err(CoreError::CartTooLarge {
            max: MAX_CART_ITEMS,
        });
    }
    validate_sale_request(request)?;

    if snapshot.customer(&request.customer_id).is_none() {
        return Err(CoreError::CustomerNotFound(request.customer_id.clone()));
    }

    // Freeze prices and total up sold units per product in one pass.
    let mut items = Vec::with_capacity(request.items.len());
    let mut total = Money::zero();
    let mut sold: Vec<(&str, i64)> = Vec::new();
    let mut sold_index: HashMap<&str, usize> = HashMap::new();

    for line in &request.items {
        let product = snapshot
            .product(&line.product_id)
            .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;

        let item = SaleItem {
            product_id: product.id.clone(),
            quantity: line.quantity,
            unit_price_cents: product.price_cents,
        };
        // Prices loaded from disk skip validation.
        total = item
            .unit_price()
            .checked_multiply_quantity(item.quantity)
            .and_then(|subtotal| total.checked_add(subtotal))
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "sale total".to_string(),
                min: 0,
                max: i64::MAX,
            })?;
        items.push(item);

        match sold_index.get(product.id.as_str()) {
            Some(&i) => sold[i].1 += line.quantity,
            None => {
                sold_index.insert(product.id.as_str(), sold.len());
                sold.push((product.id.as_str(), line.quantity));
            }
        }
    }

    let sale = Sale {
        id: new_id(),
        customer_id: request.customer_id.clone(),
        items,
        total_cents: total.cents(),
        payment_method: request.payment_method,
        installments_count: request.installments_count,
        created_at: now.with_timezone(&Utc),
    };

    let installments = installment_schedule(&sale.id, total, request.installments_count, &now);

    let stock_changes = sold
        .into_iter()
        .filter_map(|(product_id, quantity)| {
            let product = snapshot.product(product_id)?;
            Some(StockChange {
                product_id: product.id.clone(),
                before: product.stock,
                after: product.with_stock_delta(-quantity).stock,
            })
        })
        .collect();

    Ok(SalePlan {
        sale,
        installments,
        stock_changes,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
