//! End-to-end ledger behaviour through the store, with a controllable clock.

use bella_core::{
    CreateSaleRequest, CustomerStatus, ManualClock, NewCustomer, NewProduct, PaymentMethod,
    SaleLine, Snapshot,
};
use bella_store::{EntityStore, InMemoryPersistence, JsonFileStore, StoreConfig};
use chrono::{DateTime, FixedOffset};
use std::fs;
use std::sync::Arc;

fn local(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

fn customer(name: &str) -> NewCustomer {
    NewCustomer {
        name: name.to_string(),
        phone: "11912345678".to_string(),
    }
}

fn skincare_kit() -> NewProduct {
    NewProduct {
        name: "Kit Skincare".to_string(),
        category: "Pele".to_string(),
        price_cents: 15000,
        stock: 5,
        min_stock: 2,
    }
}

#[test]
fn credit_sale_lifecycle() {
    let clock = Arc::new(ManualClock::new(local("2026-01-15T10:00:00-03:00")));
    let persistence = Arc::new(InMemoryPersistence::new());
    let mut store = EntityStore::open(persistence.clone(), clock.clone());

    let ana = store.add_customer(customer("Ana")).unwrap();
    let kit = store.add_product(skincare_kit()).unwrap();
    assert_eq!(store.customer_status(&ana.id), CustomerStatus::EmDia);

    // 2 × 150.00 = 300.00 in 3 installments
    let plan = store
        .create_sale(CreateSaleRequest {
            customer_id: ana.id.clone(),
            items: vec![SaleLine::new(kit.id.clone(), 2)],
            payment_method: PaymentMethod::CreditCard,
            installments_count: 3,
        })
        .unwrap();

    assert_eq!(plan.sale.total_cents, 30000);
    let amounts: Vec<i64> = plan.installments.iter().map(|i| i.amount_cents).collect();
    assert_eq!(amounts, vec![10000, 10000, 10000]);
    let due: Vec<String> = plan
        .installments
        .iter()
        .map(|i| i.due_date.to_rfc3339())
        .collect();
    assert_eq!(
        due,
        vec![
            "2026-02-15T13:00:00+00:00",
            "2026-03-15T13:00:00+00:00",
            "2026-04-15T13:00:00+00:00",
        ]
    );
    assert_eq!(store.snapshot().product(&kit.id).unwrap().stock, 3);
    assert_eq!(store.customer_status(&ana.id), CustomerStatus::Pendente);

    let stats = store.dashboard_stats();
    assert_eq!(stats.sales_today.cents(), 30000);
    assert_eq!(stats.sales_month.cents(), 30000);
    assert_eq!(stats.total_receivable.cents(), 30000);
    assert!(stats.receivable_this_month.is_zero());
    assert_eq!(stats.receivable_future.cents(), 30000);
    assert_eq!(stats.receivables_by_month.len(), 3);
    assert_eq!(stats.furthest_installment, Some(plan.installments[2].due_date));

    // Pay #1
    store.mark_installment_paid(&plan.installments[0].id).unwrap();
    assert_eq!(store.dashboard_stats().total_receivable.cents(), 20000);
    assert_eq!(store.customer_status(&ana.id), CustomerStatus::Pendente);

    // #2 falls due and stays unpaid
    clock.set(local("2026-03-16T09:00:00-03:00"));
    assert_eq!(store.customer_status(&ana.id), CustomerStatus::Devedor);

    let pending = store.pending_installments();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].installment.number, 2);
    assert_eq!(pending[0].customer_name, "Ana");

    let stats = store.dashboard_stats();
    assert_eq!(stats.receivable_this_month.cents(), 10000);
    assert_eq!(stats.receivable_future.cents(), 10000);
    assert!(stats.sales_today.is_zero());

    // Everything above reached persistence
    let stored = persistence.stored().unwrap();
    assert_eq!(&stored, store.snapshot());
    assert!(stored.check_invariants().is_empty());
}

#[test]
fn deleting_customer_leaves_no_orphans() {
    let clock = ManualClock::new(local("2026-05-02T18:30:00-03:00"));
    let mut store = EntityStore::open(InMemoryPersistence::new(), clock);

    let ana = store.add_customer(customer("Ana")).unwrap();
    let bia = store.add_customer(customer("Bia")).unwrap();
    let kit = store.add_product(skincare_kit()).unwrap();

    for (who, installments) in [(&ana, 2), (&ana, 4), (&bia, 1)] {
        store
            .create_sale(CreateSaleRequest {
                customer_id: who.id.clone(),
                items: vec![SaleLine::new(kit.id.clone(), 1)],
                payment_method: PaymentMethod::Pix,
                installments_count: installments,
            })
            .unwrap();
    }

    let removal = store.delete_customer(&ana.id).unwrap();
    assert_eq!(removal.sales_removed, 2);
    assert_eq!(removal.installments_removed, 6);

    let snapshot = store.snapshot();
    assert_eq!(snapshot.sales.len(), 1);
    assert_eq!(snapshot.installments.len(), 1);
    assert!(snapshot.check_invariants().is_empty());
    // Stock is not restored by deletion
    assert_eq!(snapshot.product(&kit.id).unwrap().stock, 2);
}

#[test]
fn json_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path());
    let clock = || ManualClock::new(local("2026-07-01T12:00:00-03:00"));

    let saved = {
        let mut store = EntityStore::open(JsonFileStore::new(&config), clock());
        let ana = store.add_customer(customer("Ana")).unwrap();
        let kit = store.add_product(skincare_kit()).unwrap();
        store
            .create_sale(CreateSaleRequest {
                customer_id: ana.id,
                items: vec![SaleLine::new(kit.id, 1)],
                payment_method: PaymentMethod::Cash,
                installments_count: 3,
            })
            .unwrap();
        let snapshot = store.snapshot().clone();
        store.close().unwrap();
        snapshot
    };

    let reopened = EntityStore::open(JsonFileStore::new(&config), clock());
    assert_eq!(reopened.snapshot(), &saved);
}

#[test]
fn corrupt_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path());
    fs::write(config.snapshot_path(), "this is not json").unwrap();

    let mut store = EntityStore::open(
        JsonFileStore::new(&config),
        ManualClock::new(local("2026-07-01T12:00:00-03:00")),
    );
    assert_eq!(store.snapshot(), &Snapshot::default());

    // The broken document is kept next to the fresh one.
    let corrupt = dir.path().join("bellagestao_v1.json.corrupt");
    assert_eq!(fs::read_to_string(&corrupt).unwrap(), "this is not json");

    store.add_customer(customer("Ana")).unwrap();
    let raw = fs::read_to_string(config.snapshot_path()).unwrap();
    let on_disk: Snapshot = serde_json::from_str(&raw).unwrap();
    assert_eq!(on_disk.customers.len(), 1);
    assert_eq!(fs::read_to_string(&corrupt).unwrap(), "this is not json");
}

#[test]
fn data_model_document_loads_and_is_rewritten_in_cents() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path());
    fs::write(
        config.snapshot_path(),
        r#"{
          "customers": [{"id":"c1","name":"Ana","phone":"11999990000","createdAt":1767225600000}],
          "products": [{"id":"p1","name":"Batom","category":"Lábios","price":49.9,"stock":3,"minStock":1}],
          "sales": [{"id":"s1","customerId":"c1","items":[{"productId":"p1","quantity":2,"unitPrice":49.9}],
                     "total":99.8,"paymentMethod":"pix","installments":2,"createdAt":1767225600000}],
          "installments": [
            {"id":"i1","saleId":"s1","number":1,"amount":49.9,"dueDate":1769904000000,"paidAt":1769990400000},
            {"id":"i2","saleId":"s1","number":2,"amount":49.9,"dueDate":1772323200000}
          ],
          "profile": {"name":"Carla","businessName":"Bella","currency":"BRL","theme":"dark"}
        }"#,
    )
    .unwrap();

    let mut store = EntityStore::open(
        JsonFileStore::new(&config),
        ManualClock::new(local("2026-02-15T12:00:00-03:00")),
    );
    assert_eq!(store.snapshot().customers.len(), 1);
    assert_eq!(store.snapshot().products[0].price_cents, 4990);
    assert_eq!(store.snapshot().sales[0].total_cents, 9980);
    assert!(store.snapshot().installments[0].is_paid());
    assert!(store.snapshot().check_invariants().is_empty());
    assert_eq!(store.customer_status("c1"), CustomerStatus::Pendente);
    assert!(!dir.path().join("bellagestao_v1.json.corrupt").exists());

    store.adjust_stock("p1", 1).unwrap();
    let raw = fs::read_to_string(config.snapshot_path()).unwrap();
    assert!(raw.contains("\"priceCents\": 4990"));
    let reloaded: Snapshot = serde_json::from_str(&raw).unwrap();
    assert_eq!(reloaded.products[0].stock, 4);
    assert_eq!(reloaded.customers, store.snapshot().customers);
}

#[test]
fn legacy_document_with_missing_fields_loads() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path());
    fs::write(
        config.snapshot_path(),
        r#"{"customers":[{"id":"c1","name":"Ana","phone":"11999990000","createdAt":"2026-01-01T12:00:00Z"}]}"#,
    )
    .unwrap();

    let store = EntityStore::open(
        JsonFileStore::new(&config),
        ManualClock::new(local("2026-07-01T12:00:00-03:00")),
    );
    assert_eq!(store.snapshot().customers.len(), 1);
    assert!(store.snapshot().sales.is_empty());
    assert_eq!(store.snapshot().profile.currency, "BRL");
}
