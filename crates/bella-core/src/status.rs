//! # Status Classifier
//!
//! Payment-risk label of a customer, derived from their installments.
//!
//! ```text
//! any unpaid installment due before today?  ──yes──► Devedor
//!              │ no
//!              ▼
//! any unpaid installment at all?            ──yes──► Pendente
//!              │ no
//!              ▼
//!            EmDia   (also: no sales, unknown customer)
//! ```

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::calendar::start_of_day;
use crate::snapshot::Snapshot;
use crate::types::Installment;

/// A customer's payment standing. Ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum CustomerStatus {
    /// Nothing owed.
    #[serde(rename = "em dia")]
    EmDia,
    /// Owes installments, none overdue.
    #[serde(rename = "pendente")]
    Pendente,
    /// At least one installment overdue.
    #[serde(rename = "devedor")]
    Devedor,
}

impl CustomerStatus {
    pub const fn label(&self) -> &'static str {
        match self {
            CustomerStatus::EmDia => "em dia",
            CustomerStatus::Pendente => "pendente",
            CustomerStatus::Devedor => "devedor",
        }
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies a set of installments as seen at `now`.
pub fn classify<'a>(
    installments: impl IntoIterator<Item = &'a Installment>,
    now: &DateTime<FixedOffset>,
) -> CustomerStatus {
    let today = start_of_day(now);

    installments
        .into_iter()
        .filter(|i| !i.is_paid())
        .map(|i| {
            if i.is_overdue(today) {
                CustomerStatus::Devedor
            } else {
                CustomerStatus::Pendente
            }
        })
        .max()
        .unwrap_or(CustomerStatus::EmDia)
}

/// Status of one customer. Unknown customers are `EmDia`.
pub fn customer_status(
    snapshot: &Snapshot,
    customer_id: &str,
    now: &DateTime<FixedOffset>,
) -> CustomerStatus {
    classify(snapshot.installments_of_customer(customer_id), now)
}
