//! # Installment Commands
//!
//! Recording payments and listing what is still owed.

use bella_core::query::{InstallmentState, PendingInstallment};
use bella_core::{Clock, Installment};
use bella_store::{EntityStore, SnapshotPersistence};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppConfig;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentDto {
    pub id: String,
    pub sale_id: String,
    /// 1-based position in the schedule
    pub number: u32,
    pub amount_cents: i64,
    pub amount: String,
    pub due_date: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub paid: bool,
}

impl InstallmentDto {
    pub fn build(config: &AppConfig, i: Installment) -> Self {
        InstallmentDto {
            paid: i.is_paid(),
            amount: config.format_currency(i.amount_cents),
            id: i.id,
            sale_id: i.sale_id,
            number: i.number,
            amount_cents: i.amount_cents,
            due_date: i.due_date,
            paid_at: i.paid_at,
        }
    }
}

/// A receivable row: "Ana, 2/3, R$100.00, overdue".
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingInstallmentDto {
    #[serde(flatten)]
    pub installment: InstallmentDto,
    /// Installment count of the owning sale
    pub of: u32,
    pub customer_id: String,
    pub customer_name: String,
    pub state: InstallmentState,
}

impl PendingInstallmentDto {
    fn build(config: &AppConfig, pending: PendingInstallment) -> Self {
        PendingInstallmentDto {
            installment: InstallmentDto::build(config, pending.installment),
            of: pending.sale_installments,
            customer_id: pending.customer_id,
            customer_name: pending.customer_name,
            state: pending.state,
        }
    }
}

/// Marks an installment paid now. Paying an already paid installment
/// returns it unchanged; an unknown id returns `None`.
pub fn pay_installment<P: SnapshotPersistence, C: Clock>(
    store: &mut EntityStore<P, C>,
    config: &AppConfig,
    id: &str,
) -> Result<Option<InstallmentDto>, ApiError> {
    debug!(installment_id = %id, "pay_installment command");
    Ok(store
        .mark_installment_paid(id)
        .map(|i| InstallmentDto::build(config, i)))
}

/// Unpaid installments, earliest due date first. `overdue_only` keeps
/// the ones due before today.
pub fn pending_installments<P: SnapshotPersistence, C: Clock>(
    store: &EntityStore<P, C>,
    config: &AppConfig,
    overdue_only: bool,
) -> Result<Vec<PendingInstallmentDto>, ApiError> {
    Ok(store
        .pending_installments()
        .into_iter()
        .filter(|p| !overdue_only || p.state == InstallmentState::Overdue)
        .map(|p| PendingInstallmentDto::build(config, p))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{config, store};
    use bella_core::{CreateSaleRequest, NewCustomer, NewProduct, PaymentMethod, SaleLine};
    use chrono::Duration;

    #[test]
    fn test_pay_and_pending() {
        let mut store = store();
        let config = config();
        let ana = store
            .add_customer(NewCustomer {
                name: "Ana".into(),
                phone: "11988887777".into(),
            })
            .unwrap();
        let kit = store
            .add_product(NewProduct {
                name: "Kit".into(),
                category: String::new(),
                price_cents: 30000,
                stock: 1,
                min_stock: 0,
            })
            .unwrap();
        let plan = store
            .create_sale(CreateSaleRequest {
                customer_id: ana.id.clone(),
                items: vec![SaleLine::new(kit.id, 1)],
                payment_method: PaymentMethod::Cash,
                installments_count: 3,
            })
            .unwrap();

        let pending = pending_installments(&store, &config, false).unwrap();
        assert_eq!(pending.len(), 3);
        assert_eq!(pending[0].of, 3);
        assert_eq!(pending[0].customer_name, "Ana");
        assert!(pending.iter().all(|p| p.state == InstallmentState::Pending));
        assert!(pending_installments(&store, &config, true).unwrap().is_empty());

        let first = &plan.installments[0].id;
        let paid = pay_installment(&mut store, &config, first).unwrap().unwrap();
        assert!(paid.paid);
        assert_eq!(paid.amount, "R$100.00");

        let again = pay_installment(&mut store, &config, first).unwrap().unwrap();
        assert_eq!(again.paid_at, paid.paid_at);
        assert!(pay_installment(&mut store, &config, "nope").unwrap().is_none());

        assert_eq!(pending_installments(&store, &config, false).unwrap().len(), 2);
    }

    #[test]
    fn test_pending_row_serializes_flat() {
        let config = config();
        let due = Utc::now() + Duration::days(30);
        let row = PendingInstallmentDto {
            installment: InstallmentDto::build(
                &config,
                Installment {
                    id: "i-1".into(),
                    sale_id: "s-1".into(),
                    number: 2,
                    amount_cents: 5000,
                    due_date: due,
                    paid_at: None,
                },
            ),
            of: 3,
            customer_id: "c-1".into(),
            customer_name: "Ana".into(),
            state: InstallmentState::Overdue,
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["id"], "i-1");
        assert_eq!(json["number"], 2);
        assert_eq!(json["of"], 3);
        assert_eq!(json["state"], "overdue");
        assert_eq!(json["amount"], "R$50.00");
    }
}
