//! # Product Commands
//!
//! Catalog registration, listing and stock adjustment.

use bella_core::query;
use bella_core::{Clock, NewProduct, Product};
use bella_store::{EntityStore, SnapshotPersistence};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppConfig;

/// Product DTO for output.
///
/// Carries both the raw cents and the formatted price so scripts do not
/// need to know the currency settings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    pub price: String,
    pub stock: i64,
    pub min_stock: i64,
    /// Stock at or below `min_stock`
    pub low_stock: bool,
}

impl ProductDto {
    pub fn build(config: &AppConfig, p: Product) -> Self {
        ProductDto {
            low_stock: p.is_low_stock(),
            price: config.format_currency(p.price_cents),
            id: p.id,
            name: p.name,
            category: p.category,
            price_cents: p.price_cents,
            stock: p.stock,
            min_stock: p.min_stock,
        }
    }
}

/// Filters for `product list`.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub low_stock: bool,
}

pub fn add_product<P: SnapshotPersistence, C: Clock>(
    store: &mut EntityStore<P, C>,
    config: &AppConfig,
    request: NewProduct,
) -> Result<ProductDto, ApiError> {
    debug!(name = %request.name, "add_product command");
    let product = store.add_product(request)?;
    Ok(ProductDto::build(config, product))
}

/// Lists the catalog.
///
/// With `low_stock` the result is ordered lowest stock first; otherwise
/// it keeps registration order.
pub fn list_products<P: SnapshotPersistence, C: Clock>(
    store: &EntityStore<P, C>,
    config: &AppConfig,
    filter: &ProductFilter,
) -> Result<Vec<ProductDto>, ApiError> {
    debug!(?filter, "list_products command");
    let snapshot = store.snapshot();

    let matching = query::filter_products(
        snapshot,
        filter.search.as_deref().unwrap_or_default(),
        filter.category.as_deref(),
    );
    let products: Vec<&Product> = if filter.low_stock {
        query::low_stock_products(snapshot)
            .into_iter()
            .filter(|p| matching.iter().any(|m| m.id == p.id))
            .collect()
    } else {
        matching
    };

    Ok(products
        .into_iter()
        .map(|p| ProductDto::build(config, p.clone()))
        .collect())
}

/// Adds (or with a negative delta, removes) stock. Never goes below zero.
pub fn restock<P: SnapshotPersistence, C: Clock>(
    store: &mut EntityStore<P, C>,
    config: &AppConfig,
    id: &str,
    delta: i64,
) -> Result<Option<ProductDto>, ApiError> {
    debug!(product_id = %id, delta, "restock command");
    Ok(store
        .adjust_stock(id, delta)
        .map(|p| ProductDto::build(config, p)))
}

pub fn list_categories<P: SnapshotPersistence, C: Clock>(
    store: &EntityStore<P, C>,
) -> Result<Vec<String>, ApiError> {
    Ok(query::categories(store.snapshot()))
}
