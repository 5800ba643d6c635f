//! Client-local shopping cart.
//!
//! The cart is a JSON list of `{product, quantity}` entries stored under
//! [`keys::CART`] in the persistent [`KeyValueStore`]. There is one entry
//! per product ID and every quantity is at least 1.
//!
//! Every successful mutation publishes a [`CartEvent`] on a broadcast
//! channel, after the new list has been persisted. Sending never blocks and
//! nobody waits for listeners.
//!
//! # Degraded mode
//!
//! If the store cannot be read or written the cart switches to an in-memory
//! copy for the rest of the session and logs a warning once. A stored value
//! that is not a valid cart reads as empty and is left in place until the
//! next write replaces it.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use lumiere_api::models::Product;
use lumiere_api::storage::keys;
use lumiere_api::KeyValueStore;
use lumiere_core::{Price, ProductId};

/// Shipping charged on every order. Delivery is free.
pub const SHIPPING_FEE: Price = Price::ZERO;

const EVENT_CAPACITY: usize = 16;

/// One cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Snapshot of the product taken when it was added.
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Unit price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.saturating_mul_qty(self.quantity)
    }
}

/// Sum of unit price × quantity over `items`. Shipping is not included.
#[must_use]
pub fn cart_total(items: &[CartItem]) -> Price {
    items.iter().map(CartItem::line_total).sum()
}

/// Total number of units in `items`.
#[must_use]
pub fn cart_item_count(items: &[CartItem]) -> u32 {
    items
        .iter()
        .fold(0u32, |acc, item| acc.saturating_add(item.quantity))
}

/// Published after the stored cart changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartEvent {
    Updated {
        /// Units in the cart after the change.
        item_count: u32,
        /// Subtotal after the change.
        total: Price,
    },
}

/// Errors returned by cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Adding would push a line past the largest representable quantity.
    #[error("quantity for product {0} is too large")]
    QuantityOverflow(ProductId),

    /// The cart could not be encoded for storage.
    #[error("failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Where the cart currently lives.
#[derive(Debug)]
enum Backing {
    Store,
    Memory(Vec<CartItem>),
}

/// Cart backed by a [`KeyValueStore`].
///
/// Cheap to clone; clones share the store, the degraded-mode state and the
/// event channel. Mutations are serialized within a process; separate
/// processes writing the same store race and the last write wins.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    store: Arc<dyn KeyValueStore>,
    backing: Mutex<Backing>,
    events: broadcast::Sender<CartEvent>,
}

impl CartStore {
    /// Create a cart over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(CartStoreInner {
                store,
                backing: Mutex::new(Backing::Store),
                events,
            }),
        }
    }

    /// Listen for cart changes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.inner.events.subscribe()
    }

    /// Whether the cart has fallen back to memory because storage failed.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(*self.lock(), Backing::Memory(_))
    }

    /// Current cart lines. Never fails: unreadable data reads as empty.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        let mut backing = self.lock();
        self.read(&mut backing)
    }

    /// Subtotal of the current cart.
    #[must_use]
    pub fn total(&self) -> Price {
        cart_total(&self.items())
    }

    /// Units in the current cart.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        cart_item_count(&self.items())
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Add `quantity` units of `product`, merging with an existing line.
    ///
    /// A zero quantity is ignored.
    ///
    /// # Errors
    ///
    /// Returns `CartError::QuantityOverflow` if the merged quantity does not
    /// fit, leaving the cart unchanged.
    pub fn add(&self, product: Product, quantity: u32) -> Result<Vec<CartItem>, CartError> {
        let mut backing = self.lock();
        let mut items = self.read(&mut backing);
        if quantity == 0 {
            return Ok(items);
        }

        if let Some(item) = items.iter_mut().find(|item| item.product.id == product.id) {
            item.quantity = item
                .quantity
                .checked_add(quantity)
                .ok_or_else(|| CartError::QuantityOverflow(product.id.clone()))?;
        } else {
            debug!(product_id = %product.id, quantity, "Adding new cart line");
            items.push(CartItem { product, quantity });
        }

        self.write(&mut backing, items)
    }

    /// Set the quantity of a line. Quantities below 1 and unknown products
    /// leave the cart unchanged and publish nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be encoded.
    pub fn update_quantity(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Vec<CartItem>, CartError> {
        let mut backing = self.lock();
        let mut items = self.read(&mut backing);
        if quantity < 1 {
            return Ok(items);
        }

        let Some(item) = items.iter_mut().find(|item| &item.product.id == product_id) else {
            return Ok(items);
        };
        item.quantity = quantity;

        self.write(&mut backing, items)
    }

    /// Remove a line. Removing an unknown product is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be encoded.
    pub fn remove(&self, product_id: &ProductId) -> Result<Vec<CartItem>, CartError> {
        let mut backing = self.lock();
        let mut items = self.read(&mut backing);
        let before = items.len();
        items.retain(|item| &item.product.id != product_id);
        if items.len() == before {
            return Ok(items);
        }

        self.write(&mut backing, items)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be encoded.
    pub fn clear(&self) -> Result<(), CartError> {
        let mut backing = self.lock();
        self.write(&mut backing, Vec::new())?;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Backing> {
        // A panic while holding the lock cannot leave `Backing` half-updated,
        // so a poisoned lock is still safe to use.
        self.inner
            .backing
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn read(&self, backing: &mut Backing) -> Vec<CartItem> {
        if let Backing::Memory(items) = backing {
            return items.clone();
        }

        match self.inner.store.get(keys::CART) {
            Ok(None) => Vec::new(),
            Ok(Some(raw)) => parse_cart(&raw),
            Err(e) => {
                warn!(error = %e, "Cart storage unavailable, keeping cart in memory");
                *backing = Backing::Memory(Vec::new());
                Vec::new()
            }
        }
    }

    fn write(
        &self,
        backing: &mut Backing,
        items: Vec<CartItem>,
    ) -> Result<Vec<CartItem>, CartError> {
        match backing {
            Backing::Memory(stored) => stored.clone_from(&items),
            Backing::Store => {
                let json = serde_json::to_string(&items)?;
                if let Err(e) = self.inner.store.set(keys::CART, &json) {
                    warn!(error = %e, "Cart storage unavailable, keeping cart in memory");
                    *backing = Backing::Memory(items.clone());
                }
            }
        }

        // Nobody listening is fine
        let _ = self.inner.events.send(CartEvent::Updated {
            item_count: cart_item_count(&items),
            total: cart_total(&items),
        });
        Ok(items)
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("degraded", &self.is_degraded())
            .field("listeners", &self.inner.events.receiver_count())
            .finish_non_exhaustive()
    }
}

/// Parse a stored cart, dropping lines with a zero quantity.
fn parse_cart(raw: &str) -> Vec<CartItem> {
    match serde_json::from_str::<Vec<CartItem>>(raw) {
        Ok(mut items) => {
            items.retain(|item| item.quantity > 0);
            items
        }
        Err(e) => {
            warn!(error = %e, "Stored cart is malformed, treating it as empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use lumiere_api::{MemoryStore, StorageError};

    use super::*;

    fn product(id: &str, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::from_dong(price),
            original_price: None,
            slug: None,
            image: None,
            description: None,
            category: None,
            stock: None,
        }
    }

    fn cart() -> (CartStore, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (CartStore::new(store.clone()), store)
    }

    /// A store whose every operation fails.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disk gone".to_string()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disk gone".to_string()))
        }
        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disk gone".to_string()))
        }
    }

    #[test]
    fn test_empty_cart() {
        let (cart, _) = cart();
        assert!(cart.items().is_empty());
        assert_eq!(cart.total(), Price::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_add_same_product_merges() {
        let (cart, _) = cart();
        cart.add(product("p1", 100_000), 1).unwrap();
        cart.add(product("p1", 100_000), 2).unwrap();

        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 3);
    }

    #[test]
    fn test_add_zero_is_ignored() {
        let (cart, _) = cart();
        cart.add(product("p1", 100_000), 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_overflow_leaves_cart_unchanged() {
        let (cart, _) = cart();
        cart.add(product("p1", 1), u32::MAX).unwrap();
        let err = cart.add(product("p1", 1), 1).unwrap_err();
        assert!(matches!(err, CartError::QuantityOverflow(_)));
        assert_eq!(cart.items()[0].quantity, u32::MAX);
    }

    #[test]
    fn test_total_matches_example_cart() {
        let (cart, _) = cart();
        cart.add(product("p1", 100_000), 2).unwrap();
        cart.add(product("p2", 50_000), 1).unwrap();

        assert_eq!(cart.total(), Price::from_dong(250_000));
        assert_eq!(cart.total() + SHIPPING_FEE, Price::from_dong(250_000));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_total_is_sum_of_lines() {
        let items = vec![
            CartItem {
                product: product("a", 12_500),
                quantity: 4,
            },
            CartItem {
                product: product("b", 99_000),
                quantity: 3,
            },
            CartItem {
                product: product("c", 1),
                quantity: 7,
            },
        ];
        let expected: i64 = 12_500 * 4 + 99_000 * 3 + 7;
        assert_eq!(cart_total(&items), Price::from_dong(expected));
    }

    #[test]
    fn test_update_quantity_below_one_is_ignored() {
        let (cart, _) = cart();
        cart.add(product("p1", 100_000), 2).unwrap();
        let mut events = cart.subscribe();

        cart.update_quantity(&ProductId::new("p1"), 0).unwrap();

        assert_eq!(cart.items()[0].quantity, 2);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_update_quantity_overwrites() {
        let (cart, _) = cart();
        cart.add(product("p1", 100_000), 2).unwrap();
        cart.update_quantity(&ProductId::new("p1"), 5).unwrap();
        assert_eq!(cart.items()[0].quantity, 5);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let (cart, store) = cart();
        cart.add(product("p1", 100_000), 1).unwrap();
        let before = store.get(keys::CART).unwrap();

        cart.remove(&ProductId::new("missing")).unwrap();

        assert_eq!(store.get(keys::CART).unwrap(), before);
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let (cart, _) = cart();
        cart.add(product("p1", 100_000), 1).unwrap();
        cart.add(product("p2", 50_000), 1).unwrap();

        cart.remove(&ProductId::new("p1")).unwrap();
        assert_eq!(cart.items().len(), 1);

        cart.clear().unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_event_fires_after_persist() {
        let (cart, store) = cart();
        let mut events = cart.subscribe();

        cart.add(product("p1", 100_000), 2).unwrap();

        let event = events.try_recv().unwrap();
        assert_eq!(
            event,
            CartEvent::Updated {
                item_count: 2,
                total: Price::from_dong(200_000)
            }
        );
        // Already persisted when the event was observed
        assert!(store.get(keys::CART).unwrap().unwrap().contains("p1"));
    }

    #[test]
    fn test_corrupt_cart_reads_empty_until_next_write() {
        let (cart, store) = cart();
        store.set(keys::CART, "{broken").unwrap();

        assert!(cart.items().is_empty());
        assert_eq!(store.get(keys::CART).unwrap().as_deref(), Some("{broken"));

        cart.add(product("p1", 10_000), 1).unwrap();
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_zero_quantity_lines_are_dropped_on_read() {
        let (cart, store) = cart();
        let stored = serde_json::to_string(&vec![
            CartItem {
                product: product("p1", 10_000),
                quantity: 0,
            },
            CartItem {
                product: product("p2", 20_000),
                quantity: 1,
            },
        ])
        .unwrap();
        store.set(keys::CART, &stored).unwrap();

        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product.id, ProductId::new("p2"));
    }

    #[test]
    fn test_broken_storage_falls_back_to_memory() {
        let cart = CartStore::new(Arc::new(BrokenStore));
        let mut events = cart.subscribe();

        cart.add(product("p1", 100_000), 1).unwrap();
        cart.add(product("p1", 100_000), 1).unwrap();

        assert!(cart.is_degraded());
        assert_eq!(cart.items()[0].quantity, 2);
        assert!(events.try_recv().is_ok());
    }

    #[test]
    fn test_clones_share_state() {
        let (cart, _) = cart();
        let other = cart.clone();
        let mut events = other.subscribe();

        cart.add(product("p1", 100_000), 1).unwrap();

        assert_eq!(other.item_count(), 1);
        assert!(events.try_recv().is_ok());
    }
}
