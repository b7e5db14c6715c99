//! # Entity Store
//!
//! The single owner of the published snapshot.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Every Mutation                                   │
//! │                                                                         │
//! │  request ──► validate ──► clone snapshot ──► change the copy            │
//! │                  │                                 │                    │
//! │                  ✗ error: nothing changed          ▼                    │
//! │                                         commit: replace published       │
//! │                                                    │                    │
//! │                                                    ▼                    │
//! │                                         persist whole snapshot          │
//! │                                           ok  → clean                   │
//! │                                           err → error!, dirty           │
//! │                                                    │                    │
//! │                                  flush()/close() retries while dirty    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lifecycle
//! ```rust,ignore
//! let mut store = EntityStore::open(JsonFileStore::new(&config), SystemClock::new(offset));
//! let customer = store.add_customer(NewCustomer { .. })?;
//! store.close()?;
//! ```
//!
//! Operations on an unknown id return `None` and change nothing.

use bella_core::query::{self, CustomerAccount, PendingInstallment};
use bella_core::validation::{
    validate_customer_update, validate_new_customer, validate_new_product, validate_profile,
};
use bella_core::{
    dashboard_stats, new_id, plan_sale, status, Clock, CreateSaleRequest, Customer,
    CustomerRemoval, CustomerStatus, CustomerUpdate, DashboardStats, Installment, NewCustomer,
    NewProduct, Product, Profile, SalePlan, Snapshot, SystemClock,
};
use chrono::{DateTime, FixedOffset, Utc};
use tracing::{debug, error, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::persistence::SnapshotPersistence;

/// Authoritative in-memory state plus its persistence.
pub struct EntityStore<P: SnapshotPersistence, C: Clock = SystemClock> {
    snapshot: Snapshot,
    persistence: P,
    clock: C,
    /// Published state not yet saved.
    dirty: bool,
}

impl<P: SnapshotPersistence, C: Clock> EntityStore<P, C> {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Loads the stored snapshot, falling back to an empty one.
    ///
    /// A missing document starts fresh. An undecodable one is moved aside
    /// (see [`SnapshotPersistence::quarantine`]) and the store starts from
    /// defaults. Other read failures are logged and also start from defaults.
    pub fn open(persistence: P, clock: C) -> Self {
        let snapshot = match persistence.load() {
            Ok(Some(snapshot)) => {
                info!(
                    customers = snapshot.customers.len(),
                    products = snapshot.products.len(),
                    sales = snapshot.sales.len(),
                    installments = snapshot.installments.len(),
                    "Snapshot loaded"
                );
                snapshot
            }
            Ok(None) => {
                info!("No stored snapshot, starting empty");
                Snapshot::default()
            }
            Err(e @ StoreError::Serialization(_)) => {
                match persistence.quarantine() {
                    Ok(moved_to) => warn!(
                        error = %e,
                        moved_to = ?moved_to,
                        "Stored snapshot undecodable, starting from defaults"
                    ),
                    Err(move_err) => error!(
                        error = %e,
                        move_error = %move_err,
                        "Stored snapshot undecodable and could not be moved aside"
                    ),
                }
                Snapshot::default()
            }
            Err(e) => {
                warn!(error = %e, "Stored snapshot unreadable, starting from defaults");
                Snapshot::default()
            }
        };

        for violation in snapshot.check_invariants() {
            warn!(?violation, "Loaded snapshot breaks a ledger invariant");
        }

        EntityStore {
            snapshot,
            persistence,
            clock,
            dirty: false,
        }
    }

    /// Saves the snapshot if the last save failed.
    pub fn flush(&mut self) -> StoreResult<()> {
        if !self.dirty {
            return Ok(());
        }

        debug!("Flushing unsaved snapshot");
        self.persistence.save(&self.snapshot)?;
        self.dirty = false;
        info!("Pending snapshot saved");
        Ok(())
    }

    /// Final flush at teardown.
    pub fn close(mut self) -> StoreResult<()> {
        info!("Closing store");
        self.flush()
    }

    /// True when the published snapshot has not reached persistence.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now()
    }

    /// Publishes `next` and persists it.
    fn commit(&mut self, next: Snapshot) {
        self.snapshot = next;

        match self.persistence.save(&self.snapshot) {
            Ok(()) => self.dirty = false,
            Err(e) => {
                error!(error = %e, "Failed to persist snapshot; will retry on flush");
                self.dirty = true;
            }
        }
    }

    // =========================================================================
    // Customers
    // =========================================================================

    pub fn add_customer(&mut self, request: NewCustomer) -> StoreResult<Customer> {
        validate_new_customer(&request)?;

        let customer = Customer {
            id: new_id(),
            name: request.name.trim().to_string(),
            phone: request.phone.trim().to_string(),
            created_at: self.now().with_timezone(&Utc),
        };

        let mut next = self.snapshot.clone();
        next.customers.push(customer.clone());
        self.commit(next);

        info!(customer_id = %customer.id, "Customer added");
        Ok(customer)
    }

    /// Merges the given fields into a customer. `None` if absent.
    pub fn update_customer(
        &mut self,
        id: &str,
        update: CustomerUpdate,
    ) -> StoreResult<Option<Customer>> {
        validate_customer_update(&update)?;

        let Some(position) = self.snapshot.customers.iter().position(|c| c.id == id) else {
            debug!(customer_id = %id, "Update of unknown customer ignored");
            return Ok(None);
        };

        let updated = update.apply(&self.snapshot.customers[position]);
        if update.is_empty() {
            return Ok(Some(updated));
        }

        let mut next = self.snapshot.clone();
        next.customers[position] = updated.clone();
        self.commit(next);

        info!(customer_id = %id, "Customer updated");
        Ok(Some(updated))
    }

    /// Removes a customer with their sales and installments.
    pub fn delete_customer(&mut self, id: &str) -> Option<CustomerRemoval> {
        if self.snapshot.customer(id).is_none() {
            debug!(customer_id = %id, "Delete of unknown customer ignored");
            return None;
        }

        let mut next = self.snapshot.clone();
        let removal = next.remove_customer_cascade(id)?;
        self.commit(next);

        info!(
            customer_id = %id,
            sales = removal.sales_removed,
            installments = removal.installments_removed,
            "Customer deleted"
        );
        Some(removal)
    }

    // =========================================================================
    // Products
    // =========================================================================

    pub fn add_product(&mut self, request: NewProduct) -> StoreResult<Product> {
        validate_new_product(&request)?;

        let product = Product {
            id: new_id(),
            name: request.name.trim().to_string(),
            category: request.category.trim().to_string(),
            price_cents: request.price_cents,
            stock: request.stock,
            min_stock: request.min_stock,
        };

        let mut next = self.snapshot.clone();
        next.products.push(product.clone());
        self.commit(next);

        info!(product_id = %product.id, stock = product.stock, "Product added");
        Ok(product)
    }

    /// Applies `delta` to a product's stock, floored at zero.
    pub fn adjust_stock(&mut self, product_id: &str, delta: i64) -> Option<Product> {
        let Some(position) = self.snapshot.products.iter().position(|p| p.id == product_id)
        else {
            debug!(product_id = %product_id, "Stock adjustment of unknown product ignored");
            return None;
        };

        let adjusted = self.snapshot.products[position].with_stock_delta(delta);
        let mut next = self.snapshot.clone();
        next.products[position] = adjusted.clone();
        self.commit(next);

        info!(product_id = %product_id, delta, stock = adjusted.stock, "Stock adjusted");
        Some(adjusted)
    }

    // =========================================================================
    // Sales & Installments
    // =========================================================================

    /// Records a credit sale with its installment schedule and stock
    /// deduction, published as one replacement.
    ///
    /// ## Errors
    /// Validation failures and unknown customer/product ids; nothing is
    /// applied in either case.
    pub fn create_sale(&mut self, request: CreateSaleRequest) -> StoreResult<SalePlan> {
        let plan = plan_sale(&self.snapshot, &request, self.now())?;

        let mut next = self.snapshot.clone();
        plan.apply_to(&mut next);
        self.commit(next);

        info!(
            sale_id = %plan.sale.id,
            customer_id = %plan.sale.customer_id,
            total = %plan.sale.total(),
            installments = plan.sale.installments_count,
            "Sale created"
        );
        for change in &plan.stock_changes {
            debug!(
                product_id = %change.product_id,
                before = change.before,
                after = change.after,
                "Stock deducted"
            );
        }
        Ok(plan)
    }

    /// Marks an installment paid at the current instant.
    ///
    /// Paying twice is a no-op: the original `paid_at` is kept.
    pub fn mark_installment_paid(&mut self, id: &str) -> Option<Installment> {
        let Some(position) = self.snapshot.installments.iter().position(|i| i.id == id) else {
            debug!(installment_id = %id, "Payment of unknown installment ignored");
            return None;
        };

        let current = &self.snapshot.installments[position];
        if current.is_paid() {
            debug!(installment_id = %id, "Installment already paid");
            return Some(current.clone());
        }

        let paid = Installment {
            paid_at: Some(self.now().with_timezone(&Utc)),
            ..current.clone()
        };

        let mut next = self.snapshot.clone();
        next.installments[position] = paid.clone();
        self.commit(next);

        info!(
            installment_id = %id,
            sale_id = %paid.sale_id,
            amount = %paid.amount(),
            "Installment paid"
        );
        Some(paid)
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Replaces the profile.
    pub fn update_profile(&mut self, profile: Profile) -> StoreResult<Profile> {
        validate_profile(&profile)?;

        let mut next = self.snapshot.clone();
        next.profile = profile.clone();
        self.commit(next);

        info!(business = %profile.business_name, "Profile updated");
        Ok(profile)
    }

    // =========================================================================
    // Read Views
    // =========================================================================

    pub fn customer_status(&self, customer_id: &str) -> CustomerStatus {
        status::customer_status(&self.snapshot, customer_id, &self.now())
    }

    pub fn dashboard_stats(&self) -> DashboardStats {
        dashboard_stats(&self.snapshot, &self.now())
    }

    pub fn pending_installments(&self) -> Vec<PendingInstallment> {
        query::pending_installments(&self.snapshot, &self.now())
    }

    pub fn customer_account(&self, customer_id: &str) -> Option<CustomerAccount> {
        query::customer_account(&self.snapshot, customer_id, &self.now())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
