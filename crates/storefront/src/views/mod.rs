//! View rendering.
//!
//! Views are plain display structs built from domain types, rendered through
//! askama templates in `crates/storefront/templates/`. Nothing here mutates
//! state: callers run a cart operation first and render its result.

use askama::Template;
use choco_shop_core::{Cart, LineItem, Product};

use crate::error::AppError;

/// Product display data for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub image: String,
    pub price: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            title: product.title.clone(),
            description: product.description.clone(),
            image: product.image_ref.clone(),
            price: product.unit_price.to_string(),
        }
    }
}

/// Cart item display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: i32,
    pub title: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl From<&LineItem> for CartItemView {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.product_id.as_i32(),
            title: item.title.clone(),
            image: item.image_ref.clone(),
            quantity: item.quantity(),
            price: item.unit_price.to_string(),
            line_price: item.line_total().to_string(),
        }
    }
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u64,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.iter().map(CartItemView::from).collect(),
            total: cart.total().to_string(),
            item_count: cart.item_count(),
        }
    }
}

/// Product listing (home page and search results).
#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductListTemplate {
    pub products: Vec<ProductView>,
    /// Set when the listing is a search result.
    pub query: Option<String>,
}

impl ProductListTemplate {
    #[must_use]
    pub fn new(products: &[Product], query: Option<&str>) -> Self {
        Self {
            products: products.iter().map(ProductView::from).collect(),
            query: query.map(str::to_string),
        }
    }
}

/// Product detail page.
#[derive(Template)]
#[template(path = "products/show.html")]
pub struct ProductDetailTemplate {
    pub product: ProductView,
}

impl From<&Product> for ProductDetailTemplate {
    fn from(product: &Product) -> Self {
        Self {
            product: ProductView::from(product),
        }
    }
}

/// Cart page.
#[derive(Template)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub user: Option<String>,
}

impl CartShowTemplate {
    #[must_use]
    pub fn new(cart: &Cart, user: Option<&str>) -> Self {
        Self {
            cart: CartView::from(cart),
            user: user.map(str::to_string),
        }
    }
}

/// Cart count badge.
#[derive(Template)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Kind of transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A short message shown to the user after an action (the toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    /// Confirmation shown after adding a product.
    #[must_use]
    pub fn added(item: &LineItem) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: format!("\"{}\" agregado al carrito", item.title),
        }
    }

    /// User-facing report of a failed action.
    #[must_use]
    pub fn error(err: &AppError) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: err.notification(),
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
