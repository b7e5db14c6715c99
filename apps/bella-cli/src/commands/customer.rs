//! # Customer Commands
//!
//! Registration, edits, cascading deletion, search and the account view.
//!
//! ## Deletion Cascade
//! ```text
//! bella customer delete c-1
//!        │
//!        ▼
//!  ┌──────────────┐     ┌──────────────────┐     ┌──────────────────────┐
//!  │  Customer    │────►│  Sales of c-1    │────►│  Their installments  │
//!  │  removed     │     │  removed         │     │  removed             │
//!  └──────────────┘     └──────────────────┘     └──────────────────────┘
//!
//!  Stock sold in those sales is NOT returned to the catalog.
//! ```

use bella_core::query::{self, CustomerAccount};
use bella_core::{Clock, Customer, CustomerStatus, CustomerUpdate, Installment, Money, NewCustomer};
use bella_store::{EntityStore, SnapshotPersistence};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::installment::InstallmentDto;
use super::sale::SaleDto;
use crate::error::ApiError;
use crate::state::AppConfig;

/// Customer row with its current standing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub status: CustomerStatus,
    /// Sum of unpaid installments
    pub balance_cents: i64,
    pub balance: String,
}

impl CustomerDto {
    fn build<P: SnapshotPersistence, C: Clock>(
        store: &EntityStore<P, C>,
        config: &AppConfig,
        customer: Customer,
    ) -> Self {
        let balance: Money = store
            .snapshot()
            .installments_of_customer(&customer.id)
            .into_iter()
            .filter(|i| !i.is_paid())
            .map(Installment::amount)
            .sum();

        CustomerDto {
            status: store.customer_status(&customer.id),
            balance_cents: balance.cents(),
            balance: config.format_currency(balance.cents()),
            id: customer.id,
            name: customer.name,
            phone: customer.phone,
            created_at: customer.created_at,
        }
    }
}

/// Result of a cascading delete.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedCustomerDto {
    pub id: String,
    pub name: String,
    pub sales_removed: usize,
    pub installments_removed: usize,
}

/// A sale on the account page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSaleDto {
    pub sale: SaleDto,
    pub installments: Vec<InstallmentDto>,
}

/// Full account of one customer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAccountDto {
    pub customer: CustomerDto,
    /// Latest unpaid due date, if any
    pub last_due_date: Option<DateTime<Utc>>,
    pub sales: Vec<AccountSaleDto>,
}

pub fn add_customer<P: SnapshotPersistence, C: Clock>(
    store: &mut EntityStore<P, C>,
    config: &AppConfig,
    name: String,
    phone: String,
) -> Result<CustomerDto, ApiError> {
    debug!(name = %name, "add_customer command");
    let customer = store.add_customer(NewCustomer { name, phone })?;
    Ok(CustomerDto::build(store, config, customer))
}

/// Changes name and/or phone. `None` for an unknown id.
pub fn edit_customer<P: SnapshotPersistence, C: Clock>(
    store: &mut EntityStore<P, C>,
    config: &AppConfig,
    id: &str,
    update: CustomerUpdate,
) -> Result<Option<CustomerDto>, ApiError> {
    debug!(customer_id = %id, "edit_customer command");
    let updated = store.update_customer(id, update)?;
    Ok(updated.map(|c| CustomerDto::build(store, config, c)))
}

pub fn delete_customer<P: SnapshotPersistence, C: Clock>(
    store: &mut EntityStore<P, C>,
    id: &str,
) -> Result<Option<DeletedCustomerDto>, ApiError> {
    debug!(customer_id = %id, "delete_customer command");
    Ok(store.delete_customer(id).map(|removal| DeletedCustomerDto {
        id: removal.customer.id,
        name: removal.customer.name,
        sales_removed: removal.sales_removed,
        installments_removed: removal.installments_removed,
    }))
}

/// Lists customers, optionally filtered by a name or phone fragment.
pub fn list_customers<P: SnapshotPersistence, C: Clock>(
    store: &EntityStore<P, C>,
    config: &AppConfig,
    search: Option<&str>,
) -> Result<Vec<CustomerDto>, ApiError> {
    let term = search.unwrap_or_default();
    debug!(search = %term, "list_customers command");

    let found: Vec<Customer> = query::search_customers(store.snapshot(), term)
        .into_iter()
        .cloned()
        .collect();
    Ok(found
        .into_iter()
        .map(|c| CustomerDto::build(store, config, c))
        .collect())
}

/// The account view: every sale, newest first, with its schedule.
pub fn show_customer<P: SnapshotPersistence, C: Clock>(
    store: &EntityStore<P, C>,
    config: &AppConfig,
    id: &str,
) -> Result<CustomerAccountDto, ApiError> {
    let CustomerAccount {
        customer, sales, ..
    } = store
        .customer_account(id)
        .ok_or_else(|| ApiError::not_found("Customer", id))?;

    let last_due_date = query::last_due_date(store.snapshot(), id);
    let sales = sales
        .into_iter()
        .map(|entry| AccountSaleDto {
            sale: SaleDto::build(store.snapshot(), config, entry.sale),
            installments: entry
                .installments
                .into_iter()
                .map(|i| InstallmentDto::build(config, i))
                .collect(),
        })
        .collect();

    Ok(CustomerAccountDto {
        customer: CustomerDto::build(store, config, customer),
        last_due_date,
        sales,
    })
}
