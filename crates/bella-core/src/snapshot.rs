//! # Snapshot
//!
//! The complete state of all records at one point in time.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Snapshot Replacement                              │
//! │                                                                         │
//! │   published ──clone──► working copy ──mutate──► next                    │
//! │       ▲                                           │                     │
//! │       └──────────── single replacement ◄──────────┘                     │
//! │                                                                         │
//! │   Readers only ever see `published` or `next`, never the working copy. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The persisted layout is exactly this struct, camelCase keys, every
//! top-level field optional on load.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Customer, Installment, Product, Profile, Sale};

/// All entities of the business.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct Snapshot {
    pub customers: Vec<Customer>,
    pub products: Vec<Product>,
    pub sales: Vec<Sale>,
    pub installments: Vec<Installment>,
    pub profile: Profile,
}

/// What a cascading customer deletion removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRemoval {
    pub customer: Customer,
    pub sales_removed: usize,
    pub installments_removed: usize,
}

impl Snapshot {
    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn customer(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn sale(&self, id: &str) -> Option<&Sale> {
        self.sales.iter().find(|s| s.id == id)
    }

    pub fn installment(&self, id: &str) -> Option<&Installment> {
        self.installments.iter().find(|i| i.id == id)
    }

    /// Sales of one customer, in insertion order.
    pub fn sales_of<'a>(&'a self, customer_id: &'a str) -> impl Iterator<Item = &'a Sale> + 'a {
        self.sales.iter().filter(move |s| s.customer_id == customer_id)
    }

    /// Installments of one sale, ordered by number.
    pub fn installments_of_sale(&self, sale_id: &str) -> Vec<&Installment> {
        let mut list: Vec<&Installment> = self
            .installments
            .iter()
            .filter(|i| i.sale_id == sale_id)
            .collect();
        list.sort_by_key(|i| i.number);
        list
    }

    /// Installments belonging to any sale of the customer.
    pub fn installments_of_customer(&self, customer_id: &str) -> Vec<&Installment> {
        let sale_ids: HashSet<&str> = self.sales_of(customer_id).map(|s| s.id.as_str()).collect();
        self.installments
            .iter()
            .filter(|i| sale_ids.contains(i.sale_id.as_str()))
            .collect()
    }

    pub fn unpaid_installments(&self) -> impl Iterator<Item = &Installment> {
        self.installments.iter().filter(|i| !i.is_paid())
    }

    /// Sum of every unpaid installment.
    pub fn total_receivable(&self) -> Money {
        self.unpaid_installments().map(Installment::amount).sum()
    }

    // =========================================================================
    // Working-copy Mutations
    // =========================================================================
    // These mutate a CLONE owned by the store; the published snapshot is
    // replaced only after they return.

    /// Removes a customer together with their sales and those sales'
    /// installments. Returns `None` (and changes nothing) if absent.
    pub fn remove_customer_cascade(&mut self, customer_id: &str) -> Option<CustomerRemoval> {
        let position = self.customers.iter().position(|c| c.id == customer_id)?;
        let customer = self.customers.remove(position);

        let doomed: HashSet<String> = self
            .sales
            .iter()
            .filter(|s| s.customer_id == customer_id)
            .map(|s| s.id.clone())
            .collect();

        let sales_before = self.sales.len();
        self.sales.retain(|s| !doomed.contains(&s.id));
        let installments_before = self.installments.len();
        self.installments.retain(|i| !doomed.contains(&i.sale_id));

        Some(CustomerRemoval {
            customer,
            sales_removed: sales_before - self.sales.len(),
            installments_removed: installments_before - self.installments.len(),
        })
    }

    // =========================================================================
    // Invariants
    // =========================================================================

    /// Checks the cross-record ledger invariants.
    ///
    /// Returns every violation found; an empty vector means the snapshot
    /// is consistent. Used by tests and as a load-time sanity check.
    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();

        let mut per_sale: HashMap<&str, Vec<&Installment>> = HashMap::new();
        for installment in &self.installments {
            per_sale
                .entry(installment.sale_id.as_str())
                .or_default()
                .push(installment);
        }

        for sale in &self.sales {
            let installments = per_sale.remove(sale.id.as_str()).unwrap_or_default();

            if installments.len() != sale.installments_count as usize {
                violations.push(InvariantViolation::InstallmentCount {
                    sale_id: sale.id.clone(),
                    expected: sale.installments_count,
                    found: installments.len(),
                });
            }

            let sum: Money = installments.iter().map(|i| i.amount()).sum();
            if sum != sale.total() {
                violations.push(InvariantViolation::InstallmentSum {
                    sale_id: sale.id.clone(),
                    total: sale.total(),
                    sum,
                });
            }

            let mut numbers: Vec<u32> = installments.iter().map(|i| i.number).collect();
            numbers.sort_unstable();
            let expected: Vec<u32> = (1..=sale.installments_count).collect();
            if installments.len() == expected.len() && numbers != expected {
                violations.push(InvariantViolation::InstallmentNumbering {
                    sale_id: sale.id.clone(),
                });
            }
        }

        // Whatever is left references a sale that does not exist.
        let mut orphans: Vec<String> = per_sale
            .into_values()
            .flatten()
            .map(|i| i.id.clone())
            .collect();
        orphans.sort();
        violations.extend(
            orphans
                .into_iter()
                .map(|installment_id| InvariantViolation::OrphanInstallment { installment_id }),
        );

        for product in &self.products {
            if product.stock < 0 {
                violations.push(InvariantViolation::NegativeStock {
                    product_id: product.id.clone(),
                    stock: product.stock,
                });
            }
        }

        violations
    }
}

/// A broken cross-record invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    InstallmentCount {
        sale_id: String,
        expected: u32,
        found: usize,
    },
    InstallmentSum {
        sale_id: String,
        total: Money,
        sum: Money,
    },
    InstallmentNumbering {
        sale_id: String,
    },
    OrphanInstallment {
        installment_id: String,
    },
    NegativeStock {
        product_id: String,
        stock: i64,
    },
}
