//! Cart store.
//!
//! One [`CartStore`] per session owns the cart. Every mutation is computed on
//! a copy of the current state, written to storage, and only then committed
//! and broadcast, so a failed write leaves both memory and storage untouched.

use std::{
    fmt::{self, Debug, Formatter},
    sync::Arc,
};

use rusty_money::{Money, iso::Currency};
use tracing::{debug, warn};

use crate::{
    cart::{
        CartError, CartLine, CartState,
        snapshot::CartSnapshot,
        subscribers::{Subscribers, SubscriptionKey},
    },
    catalog::Catalog,
    checkout::{CheckoutError, CustomerDetails, Order, PaymentMethod},
    pricing::TotalPriceError,
    products::{Product, ProductId},
    storage::SnapshotStorage,
};

/// Storage key the cart snapshot is written under.
pub const CART_STORAGE_KEY: &str = "storefront.cart";

/// Session cart.
pub struct CartStore<S: SnapshotStorage> {
    catalog: Arc<Catalog>,
    storage: S,
    state: CartState,
    subscribers: Subscribers,
}

impl<S: SnapshotStorage> CartStore<S> {
    /// Open the session cart, hydrating it from storage.
    ///
    /// A missing, unreadable or malformed snapshot yields an empty cart.
    /// Persisted lines whose product is no longer in the catalog are dropped.
    pub fn open(catalog: Arc<Catalog>, storage: S) -> Self {
        let state = hydrate(&catalog, &storage);

        debug!(
            lines = state.len(),
            count = state.count(),
            "opened cart"
        );

        Self {
            catalog,
            storage,
            state,
            subscribers: Subscribers::default(),
        }
    }

    /// Add `quantity` units of a product, incrementing its line if present.
    ///
    /// The product is trusted as given; it is not checked against the catalog.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: `quantity` is zero, negative or too large.
    /// - [`CartError::CurrencyMismatch`]: the product is priced in another currency.
    /// - [`CartError::QuantityOverflow`]: the line would exceed the counter.
    /// - [`CartError::Storage`]: the snapshot could not be written.
    pub fn add_to_cart(&mut self, product: &Arc<Product>, quantity: i64) -> Result<(), CartError> {
        let mut next = self.state.clone();
        next.add(product, quantity)?;

        self.commit(next)?;

        debug!(product_id = %product.id, quantity, "added to cart");

        Ok(())
    }

    /// Add a single unit of a product.
    ///
    /// # Errors
    ///
    /// See [`CartStore::add_to_cart`].
    pub fn add_one(&mut self, product: &Arc<Product>) -> Result<(), CartError> {
        self.add_to_cart(product, 1)
    }

    /// Resolve an identifier against the catalog, then add it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownProduct`] if the identifier does not resolve,
    /// otherwise see [`CartStore::add_to_cart`].
    pub fn add_by_id(&mut self, product_id: &str, quantity: i64) -> Result<(), CartError> {
        let product = self
            .catalog
            .get(product_id)
            .cloned()
            .ok_or_else(|| CartError::UnknownProduct(ProductId::from(product_id)))?;

        self.add_to_cart(&product, quantity)
    }

    /// Set a line's quantity. Zero or below removes the line.
    ///
    /// Does nothing if the product has no line.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidQuantity`]: `quantity` exceeds the line counter.
    /// - [`CartError::Storage`]: the snapshot could not be written.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> Result<(), CartError> {
        let mut next = self.state.clone();

        if !next.set_quantity(product_id, quantity)? {
            debug!(product_id, "update for product not in cart ignored");

            return Ok(());
        }

        self.commit(next)?;

        debug!(product_id, quantity, "updated cart quantity");

        Ok(())
    }

    /// Remove a product's line. Does nothing if it has none.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the snapshot could not be written.
    pub fn remove_from_cart(&mut self, product_id: &str) -> Result<(), CartError> {
        let mut next = self.state.clone();

        if !next.remove(product_id) {
            debug!(product_id, "removal of product not in cart ignored");

            return Ok(());
        }

        self.commit(next)?;

        debug!(product_id, "removed from cart");

        Ok(())
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the snapshot could not be written.
    pub fn clear_cart(&mut self) -> Result<(), CartError> {
        let mut next = self.state.clone();
        next.clear();

        self.commit(next)?;

        debug!("cleared cart");

        Ok(())
    }

    /// Place an order for the cart contents and clear the cart.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`]: the cart has no lines.
    /// - [`CheckoutError::InvalidDetails`]: a customer field failed validation.
    /// - [`CheckoutError::Cart`]: the cart could not be cleared; no order is returned.
    pub fn checkout(
        &mut self,
        customer: CustomerDetails,
        payment_method: PaymentMethod,
    ) -> Result<Order, CheckoutError> {
        let order = Order::place(&self.state, customer, payment_method)?;

        self.clear_cart()?;

        debug!(
            order = %order.uuid,
            total = %order.total,
            items = order.item_count(),
            "order placed"
        );

        Ok(order)
    }

    /// Call `callback` with the new state after every committed mutation.
    pub fn subscribe(&mut self, callback: impl FnMut(&CartState) + 'static) -> SubscriptionKey {
        self.subscribers.insert(Box::new(callback))
    }

    /// Stop notifying a subscriber. Returns whether it was subscribed.
    pub fn unsubscribe(&mut self, key: SubscriptionKey) -> bool {
        self.subscribers.remove(key)
    }

    /// Current cart contents.
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        self.state.lines()
    }

    /// The line for a product, if present.
    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.state.line(product_id)
    }

    /// Whether the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Total number of units in the cart.
    pub fn cart_count(&self) -> u64 {
        self.state.count()
    }

    /// Sum of price times quantity over every line.
    ///
    /// # Errors
    ///
    /// Returns a [`TotalPriceError`] if a line total overflows.
    pub fn cart_total(&self) -> Result<Money<'static, Currency>, TotalPriceError> {
        self.state.total()
    }

    /// Currency the cart is priced in.
    pub fn currency(&self) -> &'static Currency {
        self.state.currency()
    }

    /// Catalog used to resolve identifiers.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Close the session, handing back the storage backend.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn commit(&mut self, next: CartState) -> Result<(), CartError> {
        let snapshot = CartSnapshot::from(&next).encode()?;

        self.storage.write(CART_STORAGE_KEY, &snapshot)?;

        self.state = next;
        self.subscribers.notify(&self.state);

        Ok(())
    }
}

impl<S: SnapshotStorage + Debug> Debug for CartStore<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("state", &self.state)
            .field("storage", &self.storage)
            .field("subscribers", &self.subscribers)
            .finish_non_exhaustive()
    }
}

fn hydrate(catalog: &Catalog, storage: &impl SnapshotStorage) -> CartState {
    let empty = || CartState::new(catalog.currency());

    let json = match storage.read(CART_STORAGE_KEY) {
        Ok(Some(json)) => json,
        Ok(None) => return empty(),
        Err(error) => {
            warn!(%error, "cart snapshot unreadable, starting with an empty cart");

            return empty();
        }
    };

    match CartSnapshot::decode(&json) {
        Ok(snapshot) => snapshot.restore(catalog),
        Err(error) => {
            warn!(%error, "cart snapshot malformed, starting with an empty cart");

            empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, io, rc::Rc};

    use rusty_money::iso::KES;
    use testresult::TestResult;

    use crate::{
        checkout::{CheckoutField, PaymentStatus},
        storage::{MemoryStorage, MockSnapshotStorage, StorageError},
        test_support::{CapturedLogs, catalog, customer, product},
    };

    use super::*;

    fn store() -> Result<CartStore<MemoryStorage>, crate::catalog::CatalogError> {
        let catalog = catalog([product("a", 1_000), product("b", 250), product("c", 99)])?;

        Ok(CartStore::open(catalog, MemoryStorage::new()))
    }

    fn ids<S: SnapshotStorage>(store: &CartStore<S>) -> Vec<String> {
        store
            .lines()
            .iter()
            .map(|line| line.product_id().to_string())
            .collect()
    }

    fn failing_writes() -> MockSnapshotStorage {
        let mut storage = MockSnapshotStorage::new();

        storage.expect_read().returning(|_| Ok(None));

        storage.expect_write().returning(|key, _| {
            Err(StorageError::Io {
                key: key.to_string(),
                source: io::Error::other("disk full"),
            })
        });

        storage
    }

    #[test]
    fn opens_empty_without_snapshot() -> TestResult {
        let store = store()?;

        assert!(store.is_empty());
        assert_eq!(store.cart_count(), 0);
        assert_eq!(store.cart_total()?, Money::from_minor(0, KES));

        Ok(())
    }

    #[test]
    fn every_mutation_is_persisted() -> TestResult {
        let mut store = store()?;

        store.add_by_id("a", 2)?;

        assert_eq!(
            store.storage().get(CART_STORAGE_KEY),
            Some(r#"{"version":1,"lines":[{"product_id":"a","quantity":2}]}"#)
        );

        store.update_quantity("a", 3)?;

        assert_eq!(
            store.storage().get(CART_STORAGE_KEY),
            Some(r#"{"version":1,"lines":[{"product_id":"a","quantity":3}]}"#)
        );

        store.clear_cart()?;

        assert_eq!(
            store.storage().get(CART_STORAGE_KEY),
            Some(r#"{"version":1,"lines":[]}"#)
        );

        Ok(())
    }

    #[test]
    fn add_by_unknown_id_is_rejected() -> TestResult {
        let mut store = store()?;

        let result = store.add_by_id("missing", 1);

        assert!(
            matches!(&result, Err(CartError::UnknownProduct(id)) if id.as_str() == "missing"),
            "expected UnknownProduct, got {result:?}"
        );
        assert_eq!(store.storage().get(CART_STORAGE_KEY), None);

        Ok(())
    }

    #[test]
    fn add_trusts_products_outside_the_catalog() -> TestResult {
        let mut store = store()?;

        store.add_one(&Arc::new(product("off-catalog", 500)))?;

        assert_eq!(ids(&store), ["off-catalog"]);

        Ok(())
    }

    #[test]
    fn invalid_quantity_does_not_persist_or_notify() -> TestResult {
        let mut store = store()?;
        let notified = Rc::new(RefCell::new(0_u32));
        let counter = Rc::clone(&notified);
        store.subscribe(move |_| *counter.borrow_mut() += 1);

        let result = store.add_by_id("a", 0);

        assert!(matches!(result, Err(CartError::InvalidQuantity(0))));
        assert_eq!(*notified.borrow(), 0);
        assert_eq!(store.storage().get(CART_STORAGE_KEY), None);

        Ok(())
    }

    #[test]
    fn subscribers_see_committed_state() -> TestResult {
        let mut store = store()?;
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);

        store.subscribe(move |state| log.borrow_mut().push(state.count()));

        store.add_by_id("a", 2)?;
        store.add_by_id("b", 1)?;
        store.update_quantity("a", 5)?;
        store.remove_from_cart("b")?;
        store.clear_cart()?;

        assert_eq!(*seen.borrow(), [2, 3, 6, 5, 0]);

        Ok(())
    }

    #[test]
    fn noops_do_not_notify() -> TestResult {
        let mut store = store()?;
        let notified = Rc::new(RefCell::new(0_u32));
        let counter = Rc::clone(&notified);

        store.add_by_id("a", 1)?;
        store.subscribe(move |_| *counter.borrow_mut() += 1);

        store.update_quantity("missing", 4)?;
        store.update_quantity("missing", 0)?;
        store.remove_from_cart("missing")?;

        assert_eq!(*notified.borrow(), 0);

        Ok(())
    }

    #[test]
    fn unsubscribed_callbacks_stop_receiving() -> TestResult {
        let mut store = store()?;
        let notified = Rc::new(RefCell::new(0_u32));
        let counter = Rc::clone(&notified);

        let key = store.subscribe(move |_| *counter.borrow_mut() += 1);
        store.add_by_id("a", 1)?;

        assert!(store.unsubscribe(key));

        store.add_by_id("a", 1)?;

        assert_eq!(*notified.borrow(), 1);

        Ok(())
    }

    #[test]
    fn failed_write_leaves_state_unchanged() -> TestResult {
        let catalog = catalog([product("a", 1_000)])?;
        let mut store = CartStore::open(catalog, failing_writes());
        let notified = Rc::new(RefCell::new(0_u32));
        let counter = Rc::clone(&notified);
        store.subscribe(move |_| *counter.borrow_mut() += 1);

        let result = store.add_by_id("a", 1);

        assert!(
            matches!(result, Err(CartError::Storage(StorageError::Io { .. }))),
            "expected storage error"
        );
        assert!(store.is_empty());
        assert_eq!(*notified.borrow(), 0);

        Ok(())
    }

    #[test]
    fn mutations_are_logged_only_once_committed() -> TestResult {
        let logs = CapturedLogs::default();

        let mut failing = CartStore::open(catalog([product("a", 1_000)])?, failing_writes());
        let failed = logs.capture(|| failing.add_by_id("a", 1));

        assert!(failed.is_err(), "expected the write to fail");
        assert!(
            !logs.contents().contains("added to cart"),
            "uncommitted add was logged"
        );

        let mut working = store()?;
        logs.capture(|| working.add_by_id("a", 1))?;

        assert!(logs.contents().contains("added to cart"));

        Ok(())
    }

    #[test]
    fn unreadable_snapshot_opens_empty() -> TestResult {
        let catalog = catalog([product("a", 1_000)])?;
        let mut storage = MockSnapshotStorage::new();

        storage.expect_read().returning(|key| {
            Err(StorageError::Io {
                key: key.to_string(),
                source: io::Error::other("permission denied"),
            })
        });

        let store = CartStore::open(catalog, storage);

        assert!(store.is_empty());

        Ok(())
    }

    #[test]
    fn malformed_snapshot_opens_empty() -> TestResult {
        let catalog = catalog([product("a", 1_000)])?;
        let storage = MemoryStorage::with_entry(CART_STORAGE_KEY, "{not json");

        let store = CartStore::open(catalog, storage);

        assert!(store.is_empty());

        Ok(())
    }

    #[test]
    fn checkout_returns_order_and_clears_cart() -> TestResult {
        let mut store = store()?;
        store.add_by_id("a", 2)?;
        store.add_by_id("c", 1)?;

        let order = store.checkout(customer(), PaymentMethod::Card)?;

        assert_eq!(order.total, Money::from_minor(2_099, KES));
        assert_eq!(order.item_count(), 3);
        assert_eq!(order.payment_status, PaymentStatus::Unpaid);
        assert!(store.is_empty());
        assert_eq!(
            store.storage().get(CART_STORAGE_KEY),
            Some(r#"{"version":1,"lines":[]}"#)
        );

        Ok(())
    }

    #[test]
    fn checkout_with_invalid_details_keeps_cart() -> TestResult {
        let mut store = store()?;
        store.add_by_id("a", 2)?;

        let mut details = customer();
        details.email = "nope".to_string();

        let result = store.checkout(details, PaymentMethod::Paypal);

        assert!(matches!(
            result,
            Err(CheckoutError::InvalidDetails(CheckoutField::Email))
        ));
        assert_eq!(store.cart_count(), 2);

        Ok(())
    }

    #[test]
    fn checkout_of_empty_cart_is_rejected() -> TestResult {
        let mut store = store()?;

        let result = store.checkout(customer(), PaymentMethod::Mpesa);

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));

        Ok(())
    }

    #[test]
    fn checkout_fails_when_cart_cannot_be_cleared() -> TestResult {
        let catalog = catalog([product("a", 1_000)])?;
        let mut storage = MockSnapshotStorage::new();
        let mut writes = 0_u32;

        storage.expect_read().returning(|_| Ok(None));
        storage.expect_write().returning(move |key, _| {
            writes += 1;

            if writes == 1 {
                Ok(())
            } else {
                Err(StorageError::Io {
                    key: key.to_string(),
                    source: io::Error::other("disk full"),
                })
            }
        });

        let mut store = CartStore::open(catalog, storage);
        store.add_by_id("a", 1)?;

        let result = store.checkout(customer(), PaymentMethod::Card);

        assert!(matches!(result, Err(CheckoutError::Cart(CartError::Storage(_)))));
        assert_eq!(store.cart_count(), 1);

        Ok(())
    }
}
