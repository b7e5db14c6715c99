//! # Stored Record Shapes
//!
//! Deserialization of the persisted entities. Two document shapes load:
//!
//! ```text
//! ┌──────────────┬──────────────────────────────┬──────────────────────────┐
//! │ Field        │ Written by this crate        │ Data-model documents     │
//! ├──────────────┼──────────────────────────────┼──────────────────────────┤
//! │ amounts      │ "priceCents": 4990           │ "price": 49.9            │
//! │ timestamps   │ "2026-01-15T13:00:00Z"       │ 1768482000000 (epoch ms) │
//! └──────────────┴──────────────────────────────┴──────────────────────────┘
//! ```
//!
//! When both amount keys are present the cents key wins. Saving always
//! writes the left-hand shape.

use chrono::{DateTime, TimeZone, Utc};
use serde::de::{self, Deserializer};
use serde::Deserialize;

use crate::types::{Customer, Installment, PaymentMethod, Product, Sale, SaleItem};

/// RFC 3339 text or epoch milliseconds.
#[derive(Deserialize)]
#[serde(untagged)]
enum Timestamp {
    Millis(i64),
    Text(DateTime<Utc>),
}

impl Timestamp {
    fn resolve<E: de::Error>(self) -> Result<DateTime<Utc>, E> {
        match self {
            Timestamp::Text(at) => Ok(at),
            Timestamp::Millis(ms) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| E::custom(format!("timestamp out of range: {}", ms))),
        }
    }
}

/// Picks the cents value, or converts the major-unit decimal.
fn resolve_cents<E: de::Error>(
    cents: Option<i64>,
    major: Option<f64>,
    field: &'static str,
) -> Result<i64, E> {
    match (cents, major) {
        (Some(cents), _) => Ok(cents),
        (None, Some(major)) => major_to_cents(major)
            .ok_or_else(|| E::custom(format!("{} out of range: {}", field, major))),
        (None, None) => Err(E::missing_field(field)),
    }
}

/// `49.9` → `4990`, rounded half away from zero.
fn major_to_cents(major: f64) -> Option<i64> {
    let cents = (major * 100.0).round();
    // `i64::MAX as f64` is 2^63, one past the largest i64.
    if cents.is_finite() && cents >= i64::MIN as f64 && cents < i64::MAX as f64 {
        Some(cents as i64)
    } else {
        None
    }
}

// =============================================================================
// Records
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomerRecord {
    id: String,
    name: String,
    phone: String,
    created_at: Timestamp,
}

impl<'de> Deserialize<'de> for Customer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = CustomerRecord::deserialize(deserializer)?;
        Ok(Customer {
            id: record.id,
            name: record.name,
            phone: record.phone,
            created_at: record.created_at.resolve::<D::Error>()?,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRecord {
    id: String,
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    price_cents: Option<i64>,
    #[serde(default)]
    price: Option<f64>,
    stock: i64,
    #[serde(default)]
    min_stock: i64,
}

impl<'de> Deserialize<'de> for Product {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = ProductRecord::deserialize(deserializer)?;
        Ok(Product {
            price_cents: resolve_cents::<D::Error>(
                record.price_cents,
                record.price,
                "priceCents",
            )?,
            id: record.id,
            name: record.name,
            category: record.category,
            stock: record.stock,
            min_stock: record.min_stock,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaleItemRecord {
    product_id: String,
    quantity: i64,
    #[serde(default)]
    unit_price_cents: Option<i64>,
    #[serde(default)]
    unit_price: Option<f64>,
}

impl<'de> Deserialize<'de> for SaleItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = SaleItemRecord::deserialize(deserializer)?;
        Ok(SaleItem {
            unit_price_cents: resolve_cents::<D::Error>(
                record.unit_price_cents,
                record.unit_price,
                "unitPriceCents",
            )?,
            product_id: record.product_id,
            quantity: record.quantity,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaleRecord {
    id: String,
    customer_id: String,
    items: Vec<SaleItem>,
    #[serde(default)]
    total_cents: Option<i64>,
    #[serde(default)]
    total: Option<f64>,
    #[serde(default)]
    payment_method: PaymentMethod,
    #[serde(alias = "installments")]
    installments_count: u32,
    created_at: Timestamp,
}

impl<'de> Deserialize<'de> for Sale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = SaleRecord::deserialize(deserializer)?;
        Ok(Sale {
            total_cents: resolve_cents::<D::Error>(
                record.total_cents,
                record.total,
                "totalCents",
            )?,
            created_at: record.created_at.resolve::<D::Error>()?,
            id: record.id,
            customer_id: record.customer_id,
            items: record.items,
            payment_method: record.payment_method,
            installments_count: record.installments_count,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstallmentRecord {
    id: String,
    sale_id: String,
    number: u32,
    #[serde(default)]
    amount_cents: Option<i64>,
    #[serde(default)]
    amount: Option<f64>,
    due_date: Timestamp,
    #[serde(default)]
    paid_at: Option<Timestamp>,
}

impl<'de> Deserialize<'de> for Installment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = InstallmentRecord::deserialize(deserializer)?;
        Ok(Installment {
            amount_cents: resolve_cents::<D::Error>(
                record.amount_cents,
                record.amount,
                "amountCents",
            )?,
            due_date: record.due_date.resolve::<D::Error>()?,
            paid_at: record.paid_at.map(Timestamp::resolve::<D::Error>).transpose()?,
            id: record.id,
            sale_id: record.sale_id,
            number: record.number,
        })
    }
}
