//! Read-only product catalog.
//!
//! # Architecture
//!
//! - [`CatalogSource`] knows where the catalog JSON lives (HTTP URL or file)
//!   and how to fetch and parse it
//! - [`CachedCatalog`] wraps a source in a `moka` cache: the first successful
//!   load is kept for the lifetime of the process and never invalidated, and
//!   concurrent callers wait on the same in-flight load
//! - [`StaticCatalog`] serves a fixed product list (tests, demos)
//!
//! A catalog update therefore requires restarting the process.

mod cached;
mod source;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use choco_shop_core::{Product, ProductId};
use thiserror::Error;

pub use cached::CachedCatalog;
pub use source::CatalogSource;

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog URL answered with a non-success status.
    #[error("Catalog request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Reading the catalog file failed.
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A shared load (see [`CachedCatalog`]) failed.
    #[error(transparent)]
    Shared(#[from] Arc<Self>),
}

/// Read-only access to the product catalog.
pub trait CatalogProvider: Send + Sync {
    /// All products, in catalog order.
    fn get_all(&self) -> impl Future<Output = Result<Arc<[Product]>, CatalogError>> + Send;

    /// The product with `id`, or `None` if the catalog doesn't list it.
    fn find_by_id(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Option<Product>, CatalogError>> + Send {
        async move {
            let products = self.get_all().await?;
            Ok(products.iter().find(|p| p.id == id).cloned())
        }
    }
}

impl<T: CatalogProvider> CatalogProvider for &T {
    fn get_all(&self) -> impl Future<Output = Result<Arc<[Product]>, CatalogError>> + Send {
        (**self).get_all()
    }
}

/// A fixed, already-loaded catalog.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    products: Arc<[Product]>,
}

impl StaticCatalog {
    /// Create a catalog serving `products`.
    #[must_use]
    pub fn new(products: impl Into<Arc<[Product]>>) -> Self {
        Self {
            products: products.into(),
        }
    }
}

impl CatalogProvider for StaticCatalog {
    async fn get_all(&self) -> Result<Arc<[Product]>, CatalogError> {
        Ok(Arc::clone(&self.products))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use choco_shop_core::Price;

    use super::*;

    fn products() -> Vec<Product> {
        vec![
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
        ]
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let catalog = StaticCatalog::new(products());
        let found = catalog.find_by_id(ProductId::new(2)).await.unwrap();
        assert_eq!(found.unwrap().title, "Alfajores");
    }

    #[tokio::test]
    async fn test_find_by_id_missing() {
        let catalog = StaticCatalog::new(products());
        assert!(catalog.find_by_id(ProductId::new(9)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reference_provider_delegates() {
        let catalog = StaticCatalog::new(products());
        let by_ref = &catalog;
        assert_eq!(by_ref.get_all().await.unwrap().len(), 2);
    }

    #[test]
    fn test_shared_error_is_transparent() {
        let inner = CatalogError::Status {
            url: "http://localhost/productos.json".to_string(),
            status: 404,
        };
        let shared = CatalogError::from(Arc::new(inner));
        assert_eq!(
            shared.to_string(),
            "Catalog request to http://localhost/productos.json returned HTTP 404"
        );
    }
}
