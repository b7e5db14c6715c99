//! # bella-core: Pure Business Logic for Bella
//!
//! Domain types and the credit-sales ledger as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Bella Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    bella-cli (clap subcommands)                 │   │
//! │  │    customer, product, sale, installment, dashboard, profile     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               bella-store (EntityStore + persistence)           │   │
//! │  │         owns the snapshot, publishes whole replacements         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bella-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  ledger   │  │  status   │  │   stats   │  │   │
//! │  │   │ Customer  │  │ plan_sale │  │ EmDia ... │  │ dashboard │  │   │
//! │  │   │   Sale    │  │ schedule  │  │  Devedor  │  │ buckets   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • `now` IS ALWAYS AN ARGUMENT               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records and request types
//! - `record` - Tolerant deserialization of stored entities
//! - [`money`] - Money type with integer arithmetic
//! - [`snapshot`] - The whole state, lookups and invariant checks
//! - [`calendar`] - Day/month boundaries and month addition
//! - [`clock`] - Where "now" comes from
//! - [`ledger`] - Sale planning and installment schedules
//! - [`status`] - Customer payment-risk classification
//! - [`stats`] - Dashboard aggregation
//! - [`query`] - Read views (receivables, search, account)
//! - [`validation`] - Request validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use bella_core::money::Money;
//!
//! let total = Money::from_cents(10000); // 100.00
//! let shares = total.split_evenly(3);
//!
//! assert_eq!(shares[0].cents(), 3333);
//! assert_eq!(shares[2].cents(), 3334);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calendar;
pub mod clock;
pub mod error;
pub mod ledger;
pub mod money;
pub mod query;
mod record;
pub mod snapshot;
pub mod stats;
pub mod status;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, CoreResult, ValidationError};
pub use ledger::{plan_sale, SalePlan, StockChange};
pub use money::Money;
pub use snapshot::{CustomerRemoval, Snapshot};
pub use stats::{dashboard_stats, DashboardStats, MonthBucket};
pub use status::{customer_status, CustomerStatus};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Namespace key of the persisted snapshot.
///
/// Existing data files are named after it, so it must not change.
pub const STORAGE_KEY: &str = "bellagestao_v1";

/// Maximum lines allowed in a single sale.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single sale line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum unit price of a product, in cents (1,000,000.00).
///
/// Keeps `price × quantity` summed over a full cart far inside `i64`.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// Maximum number of installments a sale can be split into.
pub const MAX_INSTALLMENTS: u32 = 12;

/// Generates a new record id (UUID v4).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
