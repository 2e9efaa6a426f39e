//! # Entity Store
//!
//! The current snapshot of all entities, plus the Mutex wrapper that guards
//! it.
//!
//! ## Optimistic-Replace Contract
//! Operations never mutate a slice in place. They read the relevant slice,
//! compute a replacement, and swap it in whole:
//!
//! ```text
//! read products ──► ops::stock::decrement(...) ──► store.products = new
//! ```
//!
//! This keeps every operation testable as a pure function of
//! (old state, input) → new state, and matches what a backing store
//! collaborator expects: supply the current slice, accept the replacement.

use std::sync::{Arc, Mutex};

use karobar_core::{Client, ClientId, Payment, PaymentId, Product, ProductId, Sale, SaleId};

/// The current snapshot of Products, Sales, Clients and Payments.
///
/// Plain data. All invariant-preserving logic lives in the operation
/// modules; the store only offers lookups and id allocation.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    /// Product catalog with live stock counts.
    pub products: Vec<Product>,

    /// Recorded sales.
    pub sales: Vec<Sale>,

    /// Clients with running purchase aggregates.
    pub clients: Vec<Client>,

    /// Received payments.
    pub payments: Vec<Payment>,
}

impl EntityStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        EntityStore::default()
    }

    // -------------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------------

    /// Finds a product by id.
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Finds a sale by id.
    pub fn sale(&self, id: SaleId) -> Option<&Sale> {
        self.sales.iter().find(|s| s.id == id)
    }

    /// Finds a client by id.
    pub fn client(&self, id: ClientId) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    /// Finds a client by trimmed name, case-sensitively.
    ///
    /// "Acme" and "acme" are different clients; "  Acme " and "Acme" are the
    /// same one. Purchase aggregation relies on exactly this matching rule.
    pub fn client_by_name(&self, name: &str) -> Option<&Client> {
        let name = name.trim();
        self.clients.iter().find(|c| c.name.trim() == name)
    }

    // -------------------------------------------------------------------------
    // Id Allocation
    // -------------------------------------------------------------------------
    // Next id = max existing + 1, or 1 when the slice is empty. This is NOT a
    // persistent counter: deleting the newest record frees its id for reuse.
    // A backing store with a real sequence should substitute its own
    // allocation.

    /// Next sale id.
    pub fn next_sale_id(&self) -> SaleId {
        SaleId(self.sales.iter().map(|s| s.id.value()).max().unwrap_or(0) + 1)
    }

    /// Next payment id.
    pub fn next_payment_id(&self) -> PaymentId {
        PaymentId(self.payments.iter().map(|p| p.id.value()).max().unwrap_or(0) + 1)
    }
}

/// Mutex-guarded store handle shared with the host.
///
/// ## Thread Safety
/// Uses `Arc<Mutex<EntityStore>>` because:
/// - `Arc`: Allows shared ownership across threads
/// - `Mutex`: Ensures only one operation touches the snapshot at a time
///
/// ## Why Not RwLock?
/// Operations are quick, and most of them write. A RwLock would add
/// complexity with minimal benefit.
#[derive(Debug, Clone)]
pub struct StoreState {
    store: Arc<Mutex<EntityStore>>,
}

impl StoreState {
    /// Wraps a seeded store.
    pub fn new(store: EntityStore) -> Self {
        StoreState {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Executes a function with read access to the store.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let products = state.with_store(|s| s.products.clone());
    /// ```
    pub fn with_store<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&EntityStore) -> R,
    {
        let store = self.store.lock().expect("Store mutex poisoned");
        f(&store)
    }

    /// Executes a function with write access to the store.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// state.with_store_mut(|s| s.products = new_products);
    /// ```
    pub fn with_store_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut EntityStore) -> R,
    {
        let mut store = self.store.lock().expect("Store mutex poisoned");
        f(&mut store)
    }
}

impl Default for StoreState {
    fn default() -> Self {
        StoreState::new(EntityStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use karobar_core::Money;

    fn product(id: i64, name: &str) -> Product {
        Product {
            id: ProductId(id),
            name: name.to_string(),
            category: "General".to_string(),
            unit_price: Money::from_rupees(100),
            units: "10".to_string(),
            reorder_level: 2,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_client_by_name_trims_but_is_case_sensitive() {
        let mut store = EntityStore::new();
        store.clients.push(Client {
            id: ClientId(1),
            name: "Acme Traders".to_string(),
            email: "acme@example.com".to_string(),
            phone: "9876543210".to_string(),
            joined_at: Utc::now(),
            total_purchases: 0,
            total_spent: Money::zero(),
            last_purchase: None,
            purchase_history: Vec::new(),
            gst_number: None,
            address: None,
        });

        assert!(store.client_by_name("Acme Traders").is_some());
        assert!(store.client_by_name("  Acme Traders  ").is_some());
        assert!(store.client_by_name("acme traders").is_none());
    }

    #[test]
    fn test_next_ids_start_at_one() {
        let store = EntityStore::new();
        assert_eq!(store.next_sale_id(), SaleId(1));
        assert_eq!(store.next_payment_id(), PaymentId(1));
    }

    #[test]
    fn test_next_sale_id_is_max_plus_one() {
        let mut store = EntityStore::new();
        let p = product(1, "Bottle");
        store.sales.push(Sale {
            id: SaleId(7),
            product_id: p.id,
            product: p.snapshot(),
            quantity: 1,
            selling_price: Money::from_rupees(100),
            sold_at: Utc::now(),
            client_id: None,
            client_name: "Acme".to_string(),
            estimate_id: None,
        });
        store.products.push(p);

        assert_eq!(store.next_sale_id(), SaleId(8));
    }

    #[test]
    fn test_store_state_read_write() {
        let state = StoreState::default();
        state.with_store_mut(|s| s.products.push(product(1, "Bottle")));

        let count = state.with_store(|s| s.products.len());
        assert_eq!(count, 1);
    }
}
