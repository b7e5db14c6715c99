//! Property-based tests for the ledger engine.
//!
//! These tests verify invariants that should hold for any valid sale.

use bella_core::calendar::start_of_day;
use bella_core::ledger::{installment_schedule, plan_sale};
use bella_core::money::Money;
use bella_core::snapshot::Snapshot;
use bella_core::status::{classify, CustomerStatus};
use bella_core::types::{CreateSaleRequest, Customer, PaymentMethod, Product, SaleLine};
use bella_core::MAX_INSTALLMENTS;
use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use proptest::prelude::*;

// =============================================================================
// Arbitrary Strategies
// =============================================================================

/// Any instant between 2020 and 2035, in an offset between -12h and +14h.
fn arb_now() -> impl Strategy<Value = DateTime<FixedOffset>> {
    (1_577_836_800i64..2_051_222_400i64, -12i32..=14i32).prop_map(|(secs, hours)| {
        let offset = FixedOffset::east_opt(hours * 3600).unwrap();
        Utc.timestamp_opt(secs, 0).unwrap().with_timezone(&offset)
    })
}

fn arb_installments() -> impl Strategy<Value = u32> {
    1u32..=MAX_INSTALLMENTS
}

fn store_with_product(price_cents: i64, stock: i64) -> Snapshot {
    let mut snapshot = Snapshot::default();
    snapshot.customers.push(Customer {
        id: "c-1".to_string(),
        name: "Ana".to_string(),
        phone: "11999990000".to_string(),
        created_at: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
    });
    snapshot.products.push(Product {
        id: "p-1".to_string(),
        name: "Perfume".to_string(),
        category: "Fragrâncias".to_string(),
        price_cents,
        stock,
        min_stock: 0,
    });
    snapshot
}

fn sale_of(quantity: i64, installments: u32) -> CreateSaleRequest {
    CreateSaleRequest {
        customer_id: "c-1".to_string(),
        items: vec![SaleLine::new("p-1", quantity)],
        payment_method: PaymentMethod::Pix,
        installments_count: installments,
    }
}

// =============================================================================
// Schedule Invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Installment amounts always sum to the sale total.
    #[test]
    fn schedule_sums_to_total(
        total in 0i64..100_000_000,
        count in arb_installments(),
        now in arb_now(),
    ) {
        let schedule = installment_schedule("s-1", Money::from_cents(total), count, &now);

        prop_assert_eq!(schedule.len(), count as usize);
        prop_assert_eq!(schedule.iter().map(|i| i.amount_cents).sum::<i64>(), total);

        let numbers: Vec<u32> = schedule.iter().map(|i| i.number).collect();
        prop_assert_eq!(numbers, (1..=count).collect::<Vec<_>>());
    }

    /// Due dates strictly increase and all lie in the future.
    #[test]
    fn due_dates_increase(
        count in arb_installments(),
        now in arb_now(),
    ) {
        let schedule = installment_schedule("s-1", Money::from_cents(12_345), count, &now);

        let mut previous = now.with_timezone(&Utc);
        for installment in &schedule {
            prop_assert!(installment.due_date > previous);
            previous = installment.due_date;
        }
    }

    /// Non-final installments differ from the final one by less than `count` cents.
    #[test]
    fn shares_are_even(
        total in 0i64..10_000_000,
        count in arb_installments(),
    ) {
        let shares = Money::from_cents(total).split_evenly(count);
        let first = shares[0].cents();
        let last = shares[shares.len() - 1].cents();

        prop_assert!(shares[..shares.len() - 1].iter().all(|s| s.cents() == first));
        prop_assert!(last >= first);
        prop_assert!(last - first < count as i64);
    }
}

// =============================================================================
// Stock Invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Applied sale by sale, stock ends at max(0, initial - sold) and never dips below zero.
    #[test]
    fn stock_never_negative(
        initial in 0i64..50,
        quantities in prop::collection::vec(1i64..20, 1..8),
        now in arb_now(),
    ) {
        let mut snapshot = store_with_product(1_000, initial);
        let mut expected = initial;

        for quantity in &quantities {
            let plan = plan_sale(&snapshot, &sale_of(*quantity, 1), now).unwrap();
            plan.apply_to(&mut snapshot);

            expected = (expected - quantity).max(0);
            let stock = snapshot.product("p-1").unwrap().stock;
            prop_assert!(stock >= 0);
            prop_assert_eq!(stock, expected);
        }

        prop_assert!(snapshot.check_invariants().is_empty());
    }

    /// Every applied sale keeps count and sum invariants.
    #[test]
    fn applied_sales_keep_invariants(
        price in 0i64..1_000_000,
        quantity in 1i64..50,
        count in arb_installments(),
        now in arb_now(),
    ) {
        let mut snapshot = store_with_product(price, 10);
        let plan = plan_sale(&snapshot, &sale_of(quantity, count), now).unwrap();
        plan.apply_to(&mut snapshot);

        prop_assert_eq!(snapshot.sales[0].total_cents, price * quantity);
        prop_assert!(snapshot.check_invariants().is_empty());
    }
}

// =============================================================================
// Classifier Invariants
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// A fresh schedule is never overdue; letting every due date pass makes it so.
    #[test]
    fn fresh_schedule_is_pending_then_devedor(
        count in arb_installments(),
        now in arb_now(),
    ) {
        let schedule = installment_schedule("s-1", Money::from_cents(9_999), count, &now);
        prop_assert_eq!(classify(&schedule, &now), CustomerStatus::Pendente);

        let last_due = schedule.iter().map(|i| i.due_date).max().unwrap();
        let much_later = (last_due + Duration::days(2)).with_timezone(now.offset());
        prop_assert!(start_of_day(&much_later) > last_due);
        prop_assert_eq!(classify(&schedule, &much_later), CustomerStatus::Devedor);
    }
}
