//! Cart State Machine
//!
//! The cart lives in the browser. Every mutation writes the whole snapshot
//! back to storage under [`CART_STORAGE_KEY`]; loading never fails and falls
//! back to an empty cart when the stored blob is missing or unreadable.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::error::{Result, ShopError};

/// Storage key holding the serialized cart
pub const CART_STORAGE_KEY: &str = "raven_cart_v1";

/// A product line in the cart
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub quantity: u32,
}

impl CartItem {
    /// Price times quantity
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

impl From<&Product> for CartItem {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity: 1,
        }
    }
}

/// Ordered list of cart items, unique by id
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Total number of units, shown on the cart badge
    pub fn count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |count: u32, item| count.saturating_add(item.quantity))
    }

    /// Sum of price times quantity
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |total, item| total.saturating_add(item.line_total()))
    }

    fn add(&mut self, product: &Product) {
        match self.items.iter_mut().find(|item| item.id == product.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(1),
            None => self.items.push(CartItem::from(product)),
        }
    }

    fn increase(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(1);
                true
            }
            None => false,
        }
    }

    fn decrease(&mut self, id: &str) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return false;
        };

        item.quantity = item.quantity.saturating_sub(1);
        if item.quantity == 0 {
            self.items.retain(|item| item.id != id);
        }
        true
    }

    fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Parse a stored snapshot, dropping lines that could never be bought
    fn from_snapshot(raw: &str) -> Result<Self> {
        let mut cart: Self = serde_json::from_str(raw)?;
        cart.items
            .retain(|item| item.quantity > 0 && item.price > Decimal::ZERO);

        let mut units: u32 = 0;
        let mut total = Decimal::ZERO;
        for item in &cart.items {
            units = units
                .checked_add(item.quantity)
                .ok_or_else(|| ShopError::CorruptCart("unit count out of range".into()))?;
            total = item
                .price
                .checked_mul(Decimal::from(item.quantity))
                .and_then(|line| total.checked_add(line))
                .ok_or_else(|| ShopError::CorruptCart("total out of range".into()))?;
        }

        Ok(cart)
    }
}

/// Key-value storage the cart is persisted to
///
/// Implemented over `window.localStorage` in the browser and by
/// [`MemoryCartStorage`] elsewhere.
pub trait CartStorage {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory cart storage (for tests and non-browser use)
///
/// Clones share the same backing map, so a clone can stand in for the same
/// browser profile across a simulated page reload.
#[derive(Clone, Debug, Default)]
pub struct MemoryCartStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryCartStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStorage for MemoryCartStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| ShopError::Storage(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| ShopError::Storage(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| ShopError::Storage(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

/// Cart controller: owns the cart and keeps storage in sync
#[derive(Debug)]
pub struct CartController<S: CartStorage> {
    storage: S,
    cart: Cart,
}

impl<S: CartStorage> CartController<S> {
    /// Load the saved cart, or start empty if nothing usable is stored
    pub fn load(storage: S) -> Self {
        let cart = match storage.get(CART_STORAGE_KEY) {
            Ok(Some(raw)) => Cart::from_snapshot(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding unreadable saved cart");
                Cart::new()
            }),
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Cart storage unavailable");
                Cart::new()
            }
        };

        Self { storage, cart }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Add one unit of a product and return the toast text
    pub fn add(&mut self, product: &Product) -> String {
        self.cart.add(product);
        self.persist();
        format!("{} added to cart", product.name)
    }

    /// Add one unit of an item already in the cart
    pub fn increase(&mut self, id: &str) -> bool {
        let changed = self.cart.increase(id);
        if changed {
            self.persist();
        }
        changed
    }

    /// Remove one unit; the line goes away when it reaches zero
    pub fn decrease(&mut self, id: &str) -> bool {
        let changed = self.cart.decrease(id);
        if changed {
            self.persist();
        }
        changed
    }

    /// Remove a line regardless of its quantity
    pub fn remove(&mut self, id: &str) -> bool {
        let changed = self.cart.remove(id);
        if changed {
            self.persist();
        }
        changed
    }

    /// Empty the cart and drop the stored snapshot (after a confirmed payment)
    pub fn clear(&mut self) {
        self.cart = Cart::new();
        if let Err(e) = self.storage.remove(CART_STORAGE_KEY) {
            tracing::warn!(error = %e, "Could not clear saved cart");
        }
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.cart)
            .map_err(ShopError::from)
            .and_then(|raw| self.storage.set(CART_STORAGE_KEY, &raw));

        if let Err(e) = result {
            tracing::warn!(error = %e, "Could not persist cart");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn hoodie() -> Product {
        Product::new("Raven Classic Hoodie", dec!(650), "/images/hoodie.jpg", "hoodies")
    }

    fn tee() -> Product {
        Product::new("Feather Logo Tee", dec!(320), "/images/tee.jpg", "tees")
    }

    /// Storage that rejects every write
    struct ReadOnlyStorage;

    impl CartStorage for ReadOnlyStorage {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(ShopError::Storage("denied".into()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(ShopError::Storage("quota exceeded".into()))
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Err(ShopError::Storage("denied".into()))
        }
    }

    #[test]
    fn test_add_same_product_twice() {
        let mut controller = CartController::load(MemoryCartStorage::new());
        let toast = controller.add(&hoodie());
        controller.add(&hoodie());

        assert_eq!(toast, "Raven Classic Hoodie added to cart");
        assert_eq!(controller.cart().len(), 1);
        assert_eq!(controller.cart().items()[0].quantity, 2);
        assert_eq!(controller.cart().total(), dec!(1300));
    }

    #[test]
    fn test_decrease_to_zero_removes_item() {
        let mut controller = CartController::load(MemoryCartStorage::new());
        controller.add(&hoodie());
        controller.add(&tee());
        controller.add(&tee());

        assert!(controller.decrease(&hoodie().id));
        assert!(controller.cart().get(&hoodie().id).is_none());
        assert_eq!(controller.cart().total(), dec!(640));
        assert_eq!(controller.cart().count(), 2);

        assert!(controller.decrease(&tee().id));
        assert_eq!(controller.cart().get(&tee().id).map(|i| i.quantity), Some(1));
    }

    #[test]
    fn test_remove_ignores_quantity() {
        let mut controller = CartController::load(MemoryCartStorage::new());
        controller.add(&tee());
        controller.add(&tee());
        controller.add(&tee());

        assert!(controller.remove(&tee().id));
        assert!(controller.cart().is_empty());
        assert!(!controller.remove(&tee().id));
    }

    #[test]
    fn test_unknown_id_is_a_no_op() {
        let mut controller = CartController::load(MemoryCartStorage::new());
        controller.add(&tee());

        assert!(!controller.increase("missing"));
        assert!(!controller.decrease("missing"));
        assert_eq!(controller.cart().count(), 1);
    }

    #[test]
    fn test_reload_round_trips() {
        let storage = MemoryCartStorage::new();
        let mut controller = CartController::load(storage.clone());
        controller.add(&hoodie());
        controller.add(&tee());
        controller.add(&tee());
        controller.increase(&hoodie().id);

        let reloaded = CartController::load(storage);
        assert_eq!(reloaded.cart(), controller.cart());
        let ids: Vec<_> = reloaded.cart().items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["raven-classic-hoodie", "feather-logo-tee"]);
    }

    #[test]
    fn test_corrupt_storage_resets_to_empty() {
        let storage = MemoryCartStorage::new();
        storage.set(CART_STORAGE_KEY, "{not json").unwrap();
        assert!(CartController::load(storage.clone()).cart().is_empty());

        storage.set(CART_STORAGE_KEY, r#"{"id":"x"}"#).unwrap();
        assert!(CartController::load(storage).cart().is_empty());
    }

    #[test]
    fn test_out_of_range_snapshot_resets_to_empty() {
        let storage = MemoryCartStorage::new();
        storage
            .set(
                CART_STORAGE_KEY,
                r#"[{"id":"a","name":"A","price":"1","image":"","quantity":4294967295},
                    {"id":"b","name":"B","price":"1","image":"","quantity":4294967295}]"#,
            )
            .unwrap();
        assert!(CartController::load(storage.clone()).cart().is_empty());

        storage
            .set(
                CART_STORAGE_KEY,
                r#"[{"id":"a","name":"A","price":"50000000000000000000000000000","image":"","quantity":2}]"#,
            )
            .unwrap();
        let controller = CartController::load(storage);
        assert!(controller.cart().is_empty());
        assert_eq!(controller.cart().count(), 0);
        assert_eq!(controller.cart().total(), Decimal::ZERO);
    }

    #[test]
    fn test_snapshot_drops_unpriced_lines() {
        let storage = MemoryCartStorage::new();
        storage
            .set(
                CART_STORAGE_KEY,
                r#"[{"id":"free","name":"Free","price":"0","image":"","quantity":1},
                    {"id":"neg","name":"Neg","price":"-5","image":"","quantity":1},
                    {"id":"tee","name":"Tee","price":"320","image":"","quantity":1}]"#,
            )
            .unwrap();

        let controller = CartController::load(storage);
        assert_eq!(controller.cart().len(), 1);
        assert!(controller.cart().get("tee").is_some());
    }

    #[test]
    fn test_increase_updates_count_and_total() {
        let mut controller = CartController::load(MemoryCartStorage::new());
        controller.add(&hoodie());
        for _ in 0..3 {
            controller.increase("raven-classic-hoodie");
        }
        assert_eq!(controller.cart().count(), 4);
        assert_eq!(controller.cart().total(), dec!(2600));
    }

    #[test]
    fn test_loads_numeric_prices() {
        let storage = MemoryCartStorage::new();
        storage
            .set(
                CART_STORAGE_KEY,
                r#"[{"id":"feather-logo-tee","name":"Feather Logo Tee","price":320,"image":"","quantity":3}]"#,
            )
            .unwrap();

        let controller = CartController::load(storage);
        assert_eq!(controller.cart().total(), dec!(960));
    }

    #[test]
    fn test_storage_failures_do_not_escape() {
        let mut controller = CartController::load(ReadOnlyStorage);
        assert!(controller.cart().is_empty());

        controller.add(&hoodie());
        assert_eq!(controller.cart().count(), 1);

        controller.clear();
        assert!(controller.cart().is_empty());
    }

    #[test]
    fn test_clear_drops_snapshot() {
        let storage = MemoryCartStorage::new();
        let mut controller = CartController::load(storage.clone());
        controller.add(&hoodie());
        controller.clear();

        assert_eq!(storage.get(CART_STORAGE_KEY).unwrap(), None);
        assert!(CartController::load(storage).cart().is_empty());
    }
}
