//! Persistent shopping cart.
//!
//! The [`CartStore`] owns the in-memory [`Cart`] and mirrors it to a
//! [`KeyValueStore`] slot after every mutation. It is loaded once at startup;
//! missing or corrupt persisted data yields an empty cart without an error.

pub mod storage;

pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};

use std::sync::Arc;

use green_earth_core::types::price::{coerce_amount, format_amount};
use green_earth_core::{Cart, CartLineItem, LineItemId, Price};
use rust_decimal::Decimal;

/// Storage slot holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "greenearth_cart_v1";

/// Notice shown when checking out an empty cart.
pub const EMPTY_CART_NOTICE: &str = "Cart is empty. Add some trees first 🌱";

/// Result of a simulated checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Nothing to check out; the cart is unchanged.
    EmptyCart,
    /// The cart was cleared; `total` is what it held.
    Completed { total: Decimal },
}

impl CheckoutOutcome {
    /// Message shown to the shopper.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::EmptyCart => EMPTY_CART_NOTICE.to_string(),
            Self::Completed { total } => format!(
                "Thanks for supporting Green Earth! Your order total: {}",
                Price::usd(*total).display()
            ),
        }
    }
}

/// Generates placeholder ids for products that arrive without one.
///
/// Ids look like `local-{session_tag}-{n}`; the tag is the process start time
/// in milliseconds and `n` increases monotonically, so ids never repeat within
/// a session.
#[derive(Debug, Clone)]
struct LocalIdGenerator {
    session_tag: i64,
    next: u64,
}

impl LocalIdGenerator {
    fn new() -> Self {
        Self {
            session_tag: chrono::Utc::now().timestamp_millis(),
            next: 1,
        }
    }

    fn next_id(&mut self) -> LineItemId {
        let id = LineItemId::new(format!("local-{}-{}", self.session_tag, self.next));
        self.next += 1;
        id
    }
}

/// The cart plus its persistence slot.
pub struct CartStore {
    cart: Cart,
    storage: Arc<dyn KeyValueStore>,
    local_ids: LocalIdGenerator,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("local_ids", &self.local_ids)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Load the cart from `storage`.
    ///
    /// Never fails: unreadable, missing or corrupt data gives an empty cart.
    #[must_use]
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let cart = match storage.get(CART_STORAGE_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<Cart>(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding corrupt persisted cart");
                Cart::new()
            }),
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read persisted cart");
                Cart::new()
            }
        };

        tracing::debug!(items = cart.len(), "Cart loaded");
        Self {
            cart,
            storage,
            local_ids: LocalIdGenerator::new(),
        }
    }

    /// Write the whole cart to storage.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the write fails.
    pub fn save(&self) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&self.cart)?;
        self.storage.set(CART_STORAGE_KEY, &raw)
    }

    /// Add one unit of a product from raw form values.
    ///
    /// A blank `id` gets a synthesized placeholder id, a blank `name` becomes
    /// `Plant`, and `price` is coerced to a non-negative amount (zero if it
    /// does not parse). Returns the id the line item was stored under.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if persisting fails. The in-memory cart keeps
    /// the change either way.
    pub fn add(&mut self, id: &str, name: &str, price: &str) -> Result<LineItemId, StorageError> {
        let id = match id.trim() {
            "" => self.local_ids.next_id(),
            trimmed => LineItemId::new(trimmed),
        };
        let qty = self.cart.add(id.clone(), name.trim(), coerce_amount(price));
        tracing::debug!(id = %id, qty, "Added to cart");

        self.save()?;
        Ok(id)
    }

    /// Remove the line item at a zero-based `index`.
    ///
    /// Out-of-range indices (including negative ones) are ignored and do not
    /// touch storage. Returns the removed item.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if persisting fails.
    pub fn remove(&mut self, index: i64) -> Result<Option<CartLineItem>, StorageError> {
        let Some(removed) = usize::try_from(index)
            .ok()
            .and_then(|i| self.cart.remove(i))
        else {
            return Ok(None);
        };

        tracing::debug!(id = %removed.id, "Removed from cart");
        self.save()?;
        Ok(Some(removed))
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if persisting fails.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.cart.clear();
        self.save()
    }

    /// Simulated checkout: report the total and clear a non-empty cart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if persisting the cleared cart fails.
    pub fn checkout(&mut self) -> Result<CheckoutOutcome, StorageError> {
        if self.cart.is_empty() {
            return Ok(CheckoutOutcome::EmptyCart);
        }
        let total = self.total();
        tracing::info!(total = %total, items = self.cart.item_count(), "Checkout completed");
        self.clear()?;
        Ok(CheckoutOutcome::Completed { total })
    }

    /// Sum of `price * qty`, rounded to cents.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.cart.total()
    }

    /// The total formatted with two decimals (e.g. `"19.98"`).
    #[must_use]
    pub fn total_display(&self) -> String {
        format_amount(self.total())
    }

    /// Total quantity across all line items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.cart.item_count()
    }

    /// The cart contents.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use serde_json::json;

    fn empty_store() -> (Arc<MemoryStore>, CartStore) {
        let storage = Arc::new(MemoryStore::new());
        let store = CartStore::load(storage.clone());
        (storage, store)
    }

    fn persisted(storage: &MemoryStore) -> serde_json::Value {
        serde_json::from_str(&storage.get(CART_STORAGE_KEY).unwrap().unwrap()).unwrap()
    }

    #[test]
    fn test_fern_added_twice() {
        let (storage, mut store) = empty_store();
        store.add("p1", "Fern", "9.99").unwrap();
        store.add("p1", "Fern", "9.99").unwrap();

        assert_eq!(
            persisted(&storage),
            json!([{"id": "p1", "name": "Fern", "price": 9.99, "qty": 2}])
        );
        assert_eq!(store.total_display(), "19.98");
        assert_eq!(store.item_count(), 2);
    }

    #[test]
    fn test_missing_id_gets_unique_placeholder() {
        let (_storage, mut store) = empty_store();
        let first = store.add("", "Plant", "1").unwrap();
        let second = store.add("  ", "Plant", "1").unwrap();

        assert!(first.as_str().starts_with("local-"));
        assert_ne!(first, second);
        assert_eq!(store.cart().len(), 2);
    }

    #[test]
    fn test_price_coercion() {
        let (_storage, mut store) = empty_store();
        store.add("a", "A", "not a price").unwrap();
        store.add("b", "B", "-4").unwrap();
        store.add("c", "C", " 2.50 ").unwrap();

        let prices: Vec<_> = store.cart().items().iter().map(|i| i.price).collect();
        assert_eq!(prices, [Decimal::ZERO, Decimal::ZERO, Decimal::new(25, 1)]);
        assert_eq!(store.total_display(), "2.50");
    }

    #[test]
    fn test_extreme_and_precise_prices_persist_exactly() {
        let (storage, mut store) = empty_store();
        let cases = [
            ("max", "79228162514264337593543950335", 1_000_000_000.0),
            ("precise", "0.1234567890123456789", 0.12),
            ("sci", "1e30", 1_000_000_000.0),
            ("cents", "999999999.99", 999_999_999.99),
        ];
        for (id, price, _) in cases {
            store.add(id, "Plant", price).unwrap();
        }
        store.add("max", "Plant", "79228162514264337593543950335").unwrap();

        let prices: Vec<f64> = persisted(&storage)
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["price"].as_f64().unwrap())
            .collect();
        let expected: Vec<f64> = cases.iter().map(|(_, _, price)| *price).collect();
        assert_eq!(prices, expected);

        let reloaded = CartStore::load(storage);
        assert_eq!(reloaded.cart(), store.cart());
        assert_eq!(reloaded.total_display(), "4000000000.11");
    }

    #[test]
    fn test_remove_invalid_index_leaves_storage_untouched() {
        let (storage, mut store) = empty_store();
        store.add("p1", "Fern", "9.99").unwrap();
        let before = persisted(&storage);

        for index in [-1, 1, 42, i64::MAX, i64::MIN] {
            assert!(store.remove(index).unwrap().is_none());
        }
        assert_eq!(persisted(&storage), before);
        assert_eq!(store.cart().len(), 1);

        let removed = store.remove(0).unwrap().unwrap();
        assert_eq!(removed.name, "Fern");
        assert_eq!(persisted(&storage), json!([]));
    }

    #[test]
    fn test_reload_reproduces_cart() {
        let (storage, mut store) = empty_store();
        store.add("1", "Oak", "12.50").unwrap();
        store.add("", "Mystery", "3").unwrap();
        store.add("1", "Oak", "12.50").unwrap();

        let reloaded = CartStore::load(storage);
        assert_eq!(reloaded.cart(), store.cart());
        assert_eq!(reloaded.cart().items()[0].qty, 2);
    }

    #[test]
    fn test_corrupt_data_loads_empty() {
        for raw in ["not json", "{\"id\": 1}", "[{\"name\": \"no id\"}]", ""] {
            let storage = Arc::new(MemoryStore::with_value(CART_STORAGE_KEY, raw));
            let store = CartStore::load(storage);
            assert!(store.cart().is_empty(), "{raw:?}");
        }
    }

    #[test]
    fn test_checkout() {
        let (storage, mut store) = empty_store();
        assert_eq!(store.checkout().unwrap(), CheckoutOutcome::EmptyCart);
        assert_eq!(
            CheckoutOutcome::EmptyCart.message(),
            "Cart is empty. Add some trees first 🌱"
        );

        store.add("p1", "Fern", "9.99").unwrap();
        store.add("p1", "Fern", "9.99").unwrap();
        let outcome = store.checkout().unwrap();

        assert_eq!(
            outcome,
            CheckoutOutcome::Completed {
                total: Decimal::new(1998, 2)
            }
        );
        assert_eq!(
            outcome.message(),
            "Thanks for supporting Green Earth! Your order total: $19.98"
        );
        assert!(store.cart().is_empty());
        assert_eq!(persisted(&storage), json!([]));
    }
}
