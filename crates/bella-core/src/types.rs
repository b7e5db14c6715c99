//! # Domain Types
//!
//! Core domain types used throughout Bella.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │      Sale       │   │  Installment    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  customer_id    │◄──│  sale_id        │       │
//! │  │  name, phone    │   │  items[]        │   │  number 1..N    │       │
//! │  │  created_at     │   │  total_cents    │   │  amount_cents   │       │
//! │  └─────────────────┘   │  installments_  │   │  due_date       │       │
//! │                        │    count (N)    │   │  paid_at?       │       │
//! │  ┌─────────────────┐   └────────┬────────┘   └─────────────────┘       │
//! │  │    Product      │            │                                       │
//! │  │  ─────────────  │   ┌────────▼────────┐   ┌─────────────────┐       │
//! │  │  price_cents    │◄──│    SaleItem     │   │    Profile      │       │
//! │  │  stock          │   │  product_id     │   │  (singleton)    │       │
//! │  │  min_stock      │   │  quantity       │   │  name, currency │       │
//! │  └─────────────────┘   │  unit_price     │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persisted Shape
//! Every type serializes with camelCase keys (`minStock`, `paidAt`, ...).
//! Entities deserialize through the `record` module, which also accepts
//! decimal amounts and epoch-millisecond timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Customer
// =============================================================================

/// A customer buying on credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Customer {
    /// Unique identifier (UUID v4), stable for the customer's lifetime.
    pub id: String,

    pub name: String,

    /// Phone digits as typed; formatting is a front-end concern.
    pub phone: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A stocked catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: String,

    pub name: String,

    /// Free-form catalog category ("Maquiagem", "Cabelo", ...).
    pub category: String,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Units on hand. Never negative.
    pub stock: i64,

    /// Low-stock threshold: the product is flagged when `stock <= min_stock`.
    pub min_stock: i64,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks if stock is at or below the low-stock threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }

    /// Returns a copy with `delta` applied to stock, clamped at zero.
    ///
    /// ## Stock Clamping
    /// ```text
    /// stock 5, delta -3  →  2
    /// stock 2, delta -3  →  0   (never negative)
    /// stock 0, delta +4  →  4
    /// ```
    pub fn with_stock_delta(&self, delta: i64) -> Product {
        Product {
            stock: self.stock.saturating_add(delta).max(0),
            ..self.clone()
        }
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer intends to pay the installments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PaymentMethod {
    /// Brazilian instant transfer.
    Pix,
    CreditCard,
    DebitCard,
    Cash,
}

impl PaymentMethod {
    /// Wire/persisted name of the method.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Pix => "pix",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::Cash => "cash",
        }
    }

    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Pix,
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::Cash,
    ];
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Pix
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        PaymentMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "payment method".to_string(),
                reason: format!("expected one of pix, credit_card, debit_card, cash; got '{}'", s),
            })
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A line of a sale.
/// Uses snapshot pattern to freeze the unit price at time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleItem {
    pub product_id: String,

    /// Quantity sold (> 0).
    pub quantity: i64,

    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
}

impl SaleItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line subtotal (unit price × quantity).
    #[inline]
    pub fn subtotal(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

/// A credit sale. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub customer_id: String,
    pub items: Vec<SaleItem>,

    /// Sum of item subtotals, in cents.
    pub total_cents: i64,

    pub payment_method: PaymentMethod,

    /// Number of installments generated for this sale (≥ 1).
    pub installments_count: u32,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Installment
// =============================================================================

/// One scheduled portion of a sale's total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Installment {
    pub id: String,
    pub sale_id: String,

    /// Position in the schedule, 1-based.
    pub number: u32,

    pub amount_cents: i64,

    #[ts(as = "String")]
    pub due_date: DateTime<Utc>,

    /// Set once by payment confirmation; never cleared.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Installment {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }

    #[inline]
    pub fn is_paid(&self) -> bool {
        self.paid_at.is_some()
    }

    /// Unpaid and due strictly before `day_start`.
    #[inline]
    pub fn is_overdue(&self, day_start: DateTime<Utc>) -> bool {
        !self.is_paid() && self.due_date < day_start
    }
}

// =============================================================================
// Profile
// =============================================================================

/// UI theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Theme {
    Light,
    Dark,
}

impl FromStr for Theme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ValidationError::InvalidFormat {
                field: "theme".to_string(),
                reason: format!("expected light or dark; got '{}'", other),
            }),
        }
    }
}

/// The operator's profile (singleton record).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Profile {
    pub name: String,
    pub business_name: String,

    /// ISO 4217 code. Picks the display symbol; amounts are never converted.
    pub currency: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl Default for Profile {
    fn default() -> Self {
        Profile {
            name: "Consultora Bella".to_string(),
            business_name: "Minha Loja de Beleza".to_string(),
            currency: "BRL".to_string(),
            theme: None,
        }
    }
}

// =============================================================================
// Request Types
// =============================================================================
// Explicit per-operation inputs, validated at the store boundary.

/// Input for registering a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewCustomer {
    pub name: String,
    pub phone: String,
}

/// Partial customer edit; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CustomerUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl CustomerUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none()
    }

    /// Merges the provided fields into `customer`.
    pub fn apply(&self, customer: &Customer) -> Customer {
        Customer {
            name: self
                .name
                .as_ref()
                .map(|n| n.trim().to_string())
                .unwrap_or_else(|| customer.name.clone()),
            phone: self
                .phone
                .as_ref()
                .map(|p| p.trim().to_string())
                .unwrap_or_else(|| customer.phone.clone()),
            ..customer.clone()
        }
    }
}

/// Input for adding a catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub price_cents: i64,
    pub stock: i64,
    #[serde(default)]
    pub min_stock: i64,
}

/// One cart line of a sale request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleLine {
    pub product_id: String,
    pub quantity: i64,
}

impl SaleLine {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        SaleLine {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Input for the ledger engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateSaleRequest {
    pub customer_id: String,
    pub items: Vec<SaleLine>,
    pub payment_method: PaymentMethod,
    pub installments_count: u32,
}

// =============================================================================
// Unit Tests
// =============================================================================
