//! Integration tests for Choco Shop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p choco-shop-integration-tests
//! ```
//!
//! No network or external services are needed: catalogs are in-memory or
//! written to a scratch directory, and every test gets its own store.
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart manager against memory and file stores
//! - `storefront` - Catalog loading, search, session and rendering

use std::path::{Path, PathBuf};

use choco_shop_core::{Price, Product, ProductId};

/// A small catalog with distinct prices and titles.
#[must_use]
pub fn sample_products() -> Vec<Product> {
    [
        (1, "Trufas de chocolate", 10, "Trufas de cacao amargo"),
        (2, "Alfajores", 5, "Rellenos de dulce de leche"),
        (3, "Bombones surtidos", 18, "Caja de doce bombones"),
        (4, "Tableta amarga", 7, "Chocolate 70% cacao"),
    ]
    .into_iter()
    .map(|(id, title, price, desc)| Product {
        id: ProductId::new(id),
        title: title.to_string(),
        unit_price: Price::from_units(price),
        image_ref: format!("./img/{id}.jpg"),
        description: desc.to_string(),
    })
    .collect()
}

/// The sample catalog as the JSON document a storefront serves.
#[must_use]
pub fn sample_catalog_json() -> String {
    let items: Vec<serde_json::Value> = sample_products()
        .iter()
        .map(|p| {
            serde_json::json!({
                "id": p.id.as_i32(),
                "title": p.title,
                "image": p.image_ref,
                "price": p.unit_price,
                "desc": p.description,
            })
        })
        .collect();
    serde_json::Value::Array(items).to_string()
}

/// A scratch directory removed on drop.
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Create a fresh directory under the system temp dir.
    ///
    /// # Panics
    ///
    /// Panics if the directory can't be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new(prefix: &str) -> Self {
        let path = std::env::temp_dir().join(format!("{prefix}-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&path).expect("Failed to create scratch dir");
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of `name` inside the directory.
    #[must_use]
    pub fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
