//! # Sale Commands
//!
//! Credit sales on installments.
//!
//! ## Sale Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  bella sale create --customer c-1 --item p-1:2 --installments 3         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  parse_sale_line("p-1:2") ──► SaleLine { product_id, quantity }         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  EntityStore::create_sale                                               │
//! │    validate ──► price lines ──► split total ──► deduct stock            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  CreatedSaleDto { sale, installments, stockChanges }                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bella_core::query;
use bella_core::{
    Clock, CreateSaleRequest, PaymentMethod, Sale, SaleItem, SaleLine, Snapshot, StockChange,
};
use bella_store::{EntityStore, SnapshotPersistence};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::installment::InstallmentDto;
use crate::error::ApiError;
use crate::state::AppConfig;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemDto {
    pub product_id: String,
    /// Current catalog name; empty if the product is gone
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub subtotal: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDto {
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub items: Vec<SaleItemDto>,
    pub total_cents: i64,
    pub total: String,
    pub payment_method: PaymentMethod,
    pub installments_count: u32,
    pub created_at: DateTime<Utc>,
}

impl SaleDto {
    pub fn build(snapshot: &Snapshot, config: &AppConfig, sale: Sale) -> Self {
        let customer_name = snapshot
            .customer(&sale.customer_id)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        let items = sale
            .items
            .iter()
            .map(|item: &SaleItem| SaleItemDto {
                product_id: item.product_id.clone(),
                product_name: snapshot
                    .product(&item.product_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_default(),
                quantity: item.quantity,
                unit_price_cents: item.unit_price_cents,
                subtotal: config.format_currency(item.subtotal().cents()),
            })
            .collect();

        SaleDto {
            total: config.format_currency(sale.total_cents),
            customer_name,
            items,
            id: sale.id,
            customer_id: sale.customer_id,
            total_cents: sale.total_cents,
            payment_method: sale.payment_method,
            installments_count: sale.installments_count,
            created_at: sale.created_at,
        }
    }
}

/// Everything a sale changed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSaleDto {
    pub sale: SaleDto,
    pub installments: Vec<InstallmentDto>,
    pub stock_changes: Vec<StockChange>,
}

/// Parses a `PRODUCT_ID:QUANTITY` cart line.
///
/// The quantity defaults to 1 when omitted. Range checks are left to the
/// store so the error shape matches every other validation failure.
pub fn parse_sale_line(raw: &str) -> Result<SaleLine, String> {
    let raw = raw.trim();
    match raw.rsplit_once(':') {
        Some((product_id, qty)) => {
            let quantity = qty
                .trim()
                .parse::<i64>()
                .map_err(|_| format!("invalid quantity in '{}'", raw))?;
            Ok(SaleLine::new(product_id.trim(), quantity))
        }
        None if !raw.is_empty() => Ok(SaleLine::new(raw, 1)),
        None => Err("empty item".to_string()),
    }
}

pub fn create_sale<P: SnapshotPersistence, C: Clock>(
    store: &mut EntityStore<P, C>,
    config: &AppConfig,
    request: CreateSaleRequest,
) -> Result<CreatedSaleDto, ApiError> {
    debug!(
        customer_id = %request.customer_id,
        lines = request.items.len(),
        installments = request.installments_count,
        "create_sale command"
    );

    let plan = store.create_sale(request)?;
    let snapshot = store.snapshot();

    Ok(CreatedSaleDto {
        sale: SaleDto::build(snapshot, config, plan.sale),
        installments: plan
            .installments
            .into_iter()
            .map(|i| InstallmentDto::build(config, i))
            .collect(),
        stock_changes: plan.stock_changes,
    })
}

/// Sales newest first, optionally for one customer.
pub fn list_sales<P: SnapshotPersistence, C: Clock>(
    store: &EntityStore<P, C>,
    config: &AppConfig,
    customer_id: Option<&str>,
) -> Result<Vec<SaleDto>, ApiError> {
    let snapshot = store.snapshot();
    Ok(query::recent_sales(snapshot, customer_id)
        .into_iter()
        .map(|s| SaleDto::build(snapshot, config, s.clone()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{config, store, TestStore};
    use crate::error::ErrorCode;
    use bella_core::{NewCustomer, NewProduct, MAX_CART_ITEMS};

    fn seeded() -> (TestStore, String, String) {
        let mut store = store();
        let ana = store
            .add_customer(NewCustomer {
                name: "Ana".into(),
                phone: "11988887777".into(),
            })
            .unwrap();
        let kit = store
            .add_product(NewProduct {
                name: "Kit Skincare".into(),
                category: "Pele".into(),
                price_cents: 10000,
                stock: 4,
                min_stock: 1,
            })
            .unwrap();
        (store, ana.id, kit.id)
    }

    fn request(customer_id: &str, items: Vec<SaleLine>, installments: u32) -> CreateSaleRequest {
        CreateSaleRequest {
            customer_id: customer_id.to_string(),
            items,
            payment_method: PaymentMethod::CreditCard,
            installments_count: installments,
        }
    }

    #[test]
    fn test_parse_sale_line() {
        assert_eq!(parse_sale_line("p-1:3").unwrap(), SaleLine::new("p-1", 3));
        assert_eq!(parse_sale_line("p-1").unwrap(), SaleLine::new("p-1", 1));
        assert_eq!(parse_sale_line(" p-1 : 2 ").unwrap(), SaleLine::new("p-1", 2));
        assert!(parse_sale_line("p-1:two").is_err());
        assert!(parse_sale_line("").is_err());
    }

    #[test]
    fn test_create_sale_output() {
        let (mut store, ana, kit) = seeded();
        let config = config();

        let created = create_sale(
            &mut store,
            &config,
            request(&ana, vec![SaleLine::new(kit.clone(), 1)], 3),
        )
        .unwrap();

        assert_eq!(created.sale.total, "R$100.00");
        assert_eq!(created.sale.customer_name, "Ana");
        assert_eq!(created.sale.items[0].product_name, "Kit Skincare");
        let amounts: Vec<&str> = created
            .installments
            .iter()
            .map(|i| i.amount.as_str())
            .collect();
        assert_eq!(amounts, vec!["R$33.33", "R$33.33", "R$33.34"]);
        assert_eq!(created.stock_changes[0].before, 4);
        assert_eq!(created.stock_changes[0].after, 3);

        assert_eq!(list_sales(&store, &config, Some(&ana)).unwrap().len(), 1);
        assert!(list_sales(&store, &config, Some("other")).unwrap().is_empty());
    }

    #[test]
    fn test_create_sale_errors() {
        let (mut store, ana, kit) = seeded();
        let config = config();

        let err = create_sale(
            &mut store,
            &config,
            request("ghost", vec![SaleLine::new(kit.clone(), 1)], 1),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = create_sale(&mut store, &config, request(&ana, vec![], 1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = create_sale(
            &mut store,
            &config,
            request(&ana, vec![SaleLine::new(kit.clone(), 1)], 0),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let oversized = vec![SaleLine::new(kit.clone(), 1); MAX_CART_ITEMS + 1];
        let err = create_sale(&mut store, &config, request(&ana, oversized, 1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);

        assert!(store.snapshot().sales.is_empty());
        assert_eq!(store.snapshot().product(&kit).unwrap().stock, 4);
    }
}
