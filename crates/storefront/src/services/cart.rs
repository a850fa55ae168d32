//! Cart manager: load, transition, persist.
//!
//! Every operation re-reads the cart from the store, applies one pure
//! transition from `choco_shop_core::cart` and writes the result back with a
//! single `set`. Nothing is cached between calls, so a cart changed by
//! another process is picked up on the next operation (last writer wins).
//!
//! Rendering is not done here; callers render the returned snapshot.

use choco_shop_core::{Cart, CartStateError, LineItem, ProductId};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::catalog::{CatalogError, CatalogProvider};
use crate::models::{decode_cart, encode_cart, keys};
use crate::store::{KeyValueStore, StoreError};

/// Errors returned by [`CartManager`] operations.
///
/// No variant leaves a partial write behind: the store is either updated in
/// full or not touched.
#[derive(Debug, Error)]
pub enum CartError {
    /// The catalog doesn't list the product being added.
    #[error("Product {0} not found in catalog")]
    ProductNotFound(ProductId),

    /// The cart has no line for the product being changed.
    #[error("Item {0} not found in cart")]
    ItemNotFound(ProductId),

    /// A line is already at the maximum quantity.
    #[error("Quantity limit reached for item {0}")]
    QuantityLimit(ProductId),

    /// Reading or writing the store failed.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    /// Loading the catalog failed.
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(#[from] CatalogError),
}

impl From<CartStateError> for CartError {
    fn from(err: CartStateError) -> Self {
        match err {
            CartStateError::ItemNotFound(id) => Self::ItemNotFound(id),
            CartStateError::QuantityOverflow(id) => Self::QuantityLimit(id),
            // Transitions never build duplicate or zero-quantity lines
            CartStateError::DuplicateItem(_) | CartStateError::ZeroQuantity(_) => {
                Self::StoreUnavailable(StoreError::Unavailable(err.to_string()))
            }
        }
    }
}

/// Result of [`CartManager::add_or_increment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    /// The line that was created or incremented.
    pub item: LineItem,
    /// Total units in the cart after the add.
    pub item_count: u64,
    /// The cart as persisted.
    pub cart: Cart,
}

/// Applies cart operations against an injected catalog and store.
#[derive(Debug, Clone)]
pub struct CartManager<C, S> {
    catalog: C,
    store: S,
}

impl<C: CatalogProvider, S: KeyValueStore> CartManager<C, S> {
    /// Create a cart manager.
    pub const fn new(catalog: C, store: S) -> Self {
        Self { catalog, store }
    }

    /// Load the persisted cart.
    ///
    /// A missing value is an empty cart. An unreadable value (bad JSON,
    /// unknown version, broken invariants) is logged and also treated as an
    /// empty cart; it is overwritten by the next successful mutation.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StoreUnavailable` if the store can't be read.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<Cart, CartError> {
        let Some(raw) = self.store.get(keys::CART).await? else {
            return Ok(Cart::new());
        };

        match decode_cart(&raw) {
            Ok(cart) => Ok(cart),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable persisted cart");
                Ok(Cart::new())
            }
        }
    }

    async fn save(&self, cart: &Cart) -> Result<(), CartError> {
        let raw = encode_cart(cart).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        self.store.set(keys::CART, raw).await?;
        debug!(lines = cart.len(), items = cart.item_count(), "Cart persisted");
        Ok(())
    }

    /// Add one unit of `product_id`.
    ///
    /// The catalog is resolved before the cart is read. An existing line is
    /// incremented; otherwise a new line is appended with quantity 1 and the
    /// product's current title, price and image.
    ///
    /// # Errors
    ///
    /// - `ProductNotFound` if the catalog doesn't list the product
    /// - `CatalogUnavailable` if the catalog can't be loaded
    /// - `StoreUnavailable` if the store can't be read or written
    /// - `QuantityLimit` if the line is already at the maximum quantity
    #[instrument(skip(self))]
    pub async fn add_or_increment(&self, product_id: ProductId) -> Result<AddOutcome, CartError> {
        let product = self
            .catalog
            .find_by_id(product_id)
            .await?
            .ok_or(CartError::ProductNotFound(product_id))?;

        let mut cart = self.load().await?;
        let item = cart.add_or_increment(&product)?.clone();
        self.save(&cart).await?;

        info!(
            product_id = %product_id,
            quantity = item.quantity(),
            "Added to cart"
        );

        Ok(AddOutcome {
            item,
            item_count: cart.item_count(),
            cart,
        })
    }

    /// Change the quantity of `product_id` by `delta`.
    ///
    /// A resulting quantity of zero or less removes the line.
    ///
    /// # Errors
    ///
    /// - `ItemNotFound` if the cart has no line for the product (nothing is written)
    /// - `StoreUnavailable` if the store can't be read or written
    /// - `QuantityLimit` if the new quantity exceeds the maximum
    #[instrument(skip(self))]
    pub async fn change_quantity(
        &self,
        product_id: ProductId,
        delta: i64,
    ) -> Result<Cart, CartError> {
        let mut cart = self.load().await?;
        let quantity = cart
            .change_quantity(product_id, delta)?
            .map(LineItem::quantity);
        self.save(&cart).await?;

        match quantity {
            Some(quantity) => debug!(product_id = %product_id, quantity, "Quantity changed"),
            None => info!(product_id = %product_id, "Item removed by quantity change"),
        }
        Ok(cart)
    }

    /// Remove `product_id` from the cart. Removing an absent item is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the store can't be read or written.
    #[instrument(skip(self))]
    pub async fn remove(&self, product_id: ProductId) -> Result<Cart, CartError> {
        let mut cart = self.load().await?;
        if cart.remove(product_id).is_some() {
            self.save(&cart).await?;
            info!(product_id = %product_id, "Item removed");
        }
        Ok(cart)
    }

    /// Total units in the persisted cart, for the cart badge.
    ///
    /// # Errors
    ///
    /// Returns `StoreUnavailable` if the store can't be read.
    pub async fn item_count(&self) -> Result<u64, CartError> {
        Ok(self.load().await?.item_count())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use choco_shop_core::{Price, Product, compute_total};

    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::store::MemoryStore;

    fn catalog() -> StaticCatalog {
        StaticCatalog::new(vec![
            Product {
                id: ProductId::new(1),
                title: "Trufas".to_string(),
                unit_price: Price::from_units(10),
                image_ref: "t.jpg".to_string(),
                description: String::new(),
            },
            Product {
                id: ProductId::new(2),
                title: "Alfajores".to_string(),
                unit_price: Price::from_units(5),
                image_ref: "a.jpg".to_string(),
                description: String::new(),
            },
        ])
    }

    fn manager() -> (CartManager<StaticCatalog, MemoryStore>, MemoryStore) {
        let store = MemoryStore::new();
        (CartManager::new(catalog(), store.clone()), store)
    }

    #[tokio::test]
    async fn test_load_empty_store() {
        let (manager, _) = manager();
        assert!(manager.load().await.unwrap().is_empty());
        assert_eq!(manager.item_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_add_on_empty_cart() {
        let (manager, store) = manager();
        let outcome = manager.add_or_increment(ProductId::new(1)).await.unwrap();

        assert_eq!(outcome.item.quantity(), 1);
        assert_eq!(outcome.item.title, "Trufas");
        assert_eq!(outcome.item_count, 1);
        assert!(store.snapshot(keys::CART).is_some());
    }

    #[tokio::test]
    async fn test_add_twice_increments() {
        let (manager, _) = manager();
        manager.add_or_increment(ProductId::new(1)).await.unwrap();
        let outcome = manager.add_or_increment(ProductId::new(1)).await.unwrap();

        assert_eq!(outcome.item.quantity(), 2);
        assert_eq!(outcome.cart.len(), 1);
        assert_eq!(manager.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_unknown_product_does_not_write() {
        let (manager, store) = manager();
        let err = manager.add_or_increment(ProductId::new(99)).await.unwrap_err();
        assert!(matches!(err, CartError::ProductNotFound(id) if id == ProductId::new(99)));
        assert!(store.snapshot(keys::CART).is_none());
    }

    #[tokio::test]
    async fn test_decrement_last_unit_removes_item() {
        let (manager, _) = manager();
        manager.add_or_increment(ProductId::new(1)).await.unwrap();
        let cart = manager.change_quantity(ProductId::new(1), -1).await.unwrap();
        assert!(!cart.contains(ProductId::new(1)));
        assert!(manager.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_change_missing_item_leaves_store_unchanged() {
        let (manager, store) = manager();
        manager.add_or_increment(ProductId::new(1)).await.unwrap();
        let before = store.snapshot(keys::CART);

        let err = manager.change_quantity(ProductId::new(2), 1).await.unwrap_err();
        assert!(matches!(err, CartError::ItemNotFound(_)));
        assert_eq!(store.snapshot(keys::CART), before);
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let (manager, store) = manager();
        manager.add_or_increment(ProductId::new(1)).await.unwrap();
        let before = store.snapshot(keys::CART);

        let cart = manager.remove(ProductId::new(2)).await.unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(store.snapshot(keys::CART), before);
    }

    #[tokio::test]
    async fn test_total_after_mixed_operations() {
        let (manager, _) = manager();
        manager.add_or_increment(ProductId::new(1)).await.unwrap();
        manager.add_or_increment(ProductId::new(2)).await.unwrap();
        manager.change_quantity(ProductId::new(1), 1).await.unwrap();
        let cart = manager.change_quantity(ProductId::new(2), 2).await.unwrap();

        assert_eq!(compute_total(&cart), Price::from_units(35));
        assert_eq!(cart.item_count(), 5);
    }

    #[tokio::test]
    async fn test_corrupt_cart_treated_as_empty() {
        let store = MemoryStore::with_entries([(keys::CART, "{not json")]);
        let manager = CartManager::new(catalog(), store.clone());

        assert!(manager.load().await.unwrap().is_empty());
        let outcome = manager.add_or_increment(ProductId::new(2)).await.unwrap();
        assert_eq!(outcome.item_count, 1);
        assert!(decode_cart(&store.snapshot(keys::CART).unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_legacy_cart_is_read_and_upgraded() {
        let legacy = r#"[{"id": 2, "titulo": "Alfajores", "precio": 4, "imagen": "a.jpg", "cantidad": 3}]"#;
        let store = MemoryStore::with_entries([(keys::CART, legacy)]);
        let manager = CartManager::new(catalog(), store.clone());

        let outcome = manager.add_or_increment(ProductId::new(2)).await.unwrap();
        // Snapshot price from the legacy line is kept
        assert_eq!(outcome.item.unit_price, Price::from_units(4));
        assert_eq!(outcome.item.quantity(), 4);
        assert!(store.snapshot(keys::CART).unwrap().starts_with(r#"{"version":1"#));
    }

    #[tokio::test]
    async fn test_external_mutation_is_observed() {
        let (manager, store) = manager();
        manager.add_or_increment(ProductId::new(1)).await.unwrap();

        // Another tab clears the cart
        store.set(keys::CART, "[]".to_string()).await.unwrap();

        let outcome = manager.add_or_increment(ProductId::new(1)).await.unwrap();
        assert_eq!(outcome.item.quantity(), 1);
    }

    #[tokio::test]
    async fn test_rejected_write_surfaces_store_error() {
        let (manager, store) = manager();
        manager.add_or_increment(ProductId::new(1)).await.unwrap();
        let before = store.snapshot(keys::CART);
        store.reject_writes(true);

        let err = manager.add_or_increment(ProductId::new(1)).await.unwrap_err();
        assert!(matches!(err, CartError::StoreUnavailable(_)));
        assert_eq!(store.snapshot(keys::CART), before);
    }
}
