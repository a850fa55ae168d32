//! Cart line items and the pure transitions between cart states.
//!
//! A [`Cart`] is an ordered list of [`LineItem`]s keyed by product id. The
//! functions here never touch storage; the storefront's cart manager loads a
//! cart, applies one of these transitions, and writes the result back.
//!
//! Per line the only reachable states are:
//!
//! ```text
//! absent ──add──▶ present(1) ──add / change(+d)──▶ present(n + d)
//!                     │
//!                     └──change(n + d <= 0) / remove──▶ absent
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::types::{Price, Product, ProductId};

/// Errors raised by cart state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartStateError {
    /// The product has no line in the cart.
    #[error("item {0} is not in the cart")]
    ItemNotFound(ProductId),

    /// Two lines share a product id.
    #[error("item {0} appears more than once")]
    DuplicateItem(ProductId),

    /// A line was built with a zero quantity.
    #[error("item {0} has a quantity of zero")]
    ZeroQuantity(ProductId),

    /// A quantity change would exceed the representable maximum.
    #[error("quantity of item {0} overflows")]
    QuantityOverflow(ProductId),
}

/// One product entry in the cart.
///
/// Title, price and image are snapshotted from the catalog when the line is
/// created; later catalog changes don't reach existing lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: Price,
    pub image_ref: String,
    quantity: u32,
}

impl LineItem {
    /// Build a line item.
    ///
    /// # Errors
    ///
    /// Returns [`CartStateError::ZeroQuantity`] if `quantity` is zero.
    pub fn new(
        product_id: ProductId,
        title: impl Into<String>,
        unit_price: Price,
        image_ref: impl Into<String>,
        quantity: u32,
    ) -> Result<Self, CartStateError> {
        if quantity == 0 {
            return Err(CartStateError::ZeroQuantity(product_id));
        }
        Ok(Self {
            product_id,
            title: title.into(),
            unit_price,
            image_ref: image_ref.into(),
            quantity,
        })
    }

    /// A fresh line for `product` with quantity 1.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id,
            title: product.title.clone(),
            unit_price: product.unit_price,
            image_ref: product.image_ref.clone(),
            quantity: 1,
        }
    }

    /// Quantity of this line, always at least 1.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price * self.quantity
    }
}

/// Ordered collection of line items with unique product ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from already-constructed lines, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`CartStateError::DuplicateItem`] if two lines share a product id.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, CartStateError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.product_id) {
                return Err(CartStateError::DuplicateItem(item.product_id));
            }
        }
        Ok(Self { items })
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product_id == product_id)
    }

    /// Increment the line for `product`, or append a new line with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns [`CartStateError::QuantityOverflow`] if the line is already at
    /// the maximum quantity.
    pub fn add_or_increment(&mut self, product: &Product) -> Result<&LineItem, CartStateError> {
        let index = match self.position(product.id) {
            Some(index) => {
                let item = self
                    .items
                    .get_mut(index)
                    .ok_or(CartStateError::ItemNotFound(product.id))?;
                item.quantity = item
                    .quantity
                    .checked_add(1)
                    .ok_or(CartStateError::QuantityOverflow(product.id))?;
                index
            }
            None => {
                self.items.push(LineItem::from_product(product));
                self.items.len() - 1
            }
        };
        self.items
            .get(index)
            .ok_or(CartStateError::ItemNotFound(product.id))
    }

    /// Apply a signed quantity change.
    ///
    /// Returns the updated line, or `None` when the new quantity is zero or
    /// below and the line was removed.
    ///
    /// # Errors
    ///
    /// - [`CartStateError::ItemNotFound`] if the product has no line.
    /// - [`CartStateError::QuantityOverflow`] if the new quantity doesn't fit.
    pub fn change_quantity(
        &mut self,
        product_id: ProductId,
        delta: i64,
    ) -> Result<Option<&LineItem>, CartStateError> {
        let index = self
            .position(product_id)
            .ok_or(CartStateError::ItemNotFound(product_id))?;
        let current = self
            .items
            .get(index)
            .map(LineItem::quantity)
            .ok_or(CartStateError::ItemNotFound(product_id))?;

        let new_quantity = i64::from(current).saturating_add(delta);
        if new_quantity <= 0 {
            self.items.remove(index);
            return Ok(None);
        }

        let new_quantity = u32::try_from(new_quantity)
            .map_err(|_| CartStateError::QuantityOverflow(product_id))?;
        let item = self
            .items
            .get_mut(index)
            .ok_or(CartStateError::ItemNotFound(product_id))?;
        item.quantity = new_quantity;
        Ok(Some(&*item))
    }

    /// Remove the line for `product_id`, returning it if it was present.
    pub fn remove(&mut self, product_id: ProductId) -> Option<LineItem> {
        self.position(product_id)
            .map(|index| self.items.remove(index))
    }

    /// Sum of `unit_price × quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Sum of quantities, shown on the cart badge.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Total price of `cart`; zero for an empty cart.
#[must_use]
pub fn compute_total(cart: &Cart) -> Price {
    cart.total()
}

/// Total number of units in `cart`; zero for an empty cart.
#[must_use]
pub fn item_count(cart: &Cart) -> u64 {
    cart.item_count()
}
