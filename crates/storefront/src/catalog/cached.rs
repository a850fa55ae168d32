//! Process-lifetime catalog cache.

use std::sync::Arc;

use choco_shop_core::Product;
use moka::future::Cache;
use tracing::{info, instrument};

use super::{CatalogError, CatalogProvider, CatalogSource};

/// Catalog loaded once from a [`CatalogSource`] and kept until the process exits.
///
/// Failed loads are not cached: the next call tries again.
#[derive(Clone)]
pub struct CachedCatalog {
    inner: Arc<CachedCatalogInner>,
}

struct CachedCatalogInner {
    source: CatalogSource,
    client: reqwest::Client,
    cache: Cache<(), Arc<[Product]>>,
}

impl CachedCatalog {
    /// Create a cached catalog over `source`. Nothing is fetched until first use.
    #[must_use]
    pub fn new(source: CatalogSource) -> Self {
        Self::with_client(source, reqwest::Client::new())
    }

    /// Create a cached catalog using an existing HTTP client.
    #[must_use]
    pub fn with_client(source: CatalogSource, client: reqwest::Client) -> Self {
        // Single entry, no TTL: the catalog is never invalidated
        let cache = Cache::builder().max_capacity(1).build();

        Self {
            inner: Arc::new(CachedCatalogInner {
                source,
                client,
                cache,
            }),
        }
    }

    /// Whether a successful load is already cached.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.inner.cache.contains_key(&())
    }
}

impl CatalogProvider for CachedCatalog {
    #[instrument(skip(self), fields(source = %self.inner.source))]
    async fn get_all(&self) -> Result<Arc<[Product]>, CatalogError> {
        let inner = &self.inner;
        let products = inner
            .cache
            .try_get_with((), async {
                let products = inner.source.load(&inner.client).await?;
                info!(count = products.len(), "Catalog cached");
                Ok::<_, CatalogError>(Arc::<[Product]>::from(products))
            })
            .await?;
        Ok(products)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::Path;

    use choco_shop_core::ProductId;

    use super::*;

    async fn write_catalog(path: &Path, body: &str) {
        tokio::fs::write(path, body).await.unwrap();
    }

    #[tokio::test]
    async fn test_catalog_is_cached_after_first_load() {
        let path = std::env::temp_dir().join(format!("catalog-{}.json", uuid::Uuid::new_v4()));
        write_catalog(
            &path,
            r#"[{"id": 1, "title": "Trufas", "image": "t.jpg", "price": 10, "desc": ""}]"#,
        )
        .await;

        let catalog = CachedCatalog::new(CatalogSource::File(path.clone()));
        assert!(!catalog.is_loaded());
        assert_eq!(catalog.get_all().await.unwrap().len(), 1);
        assert!(catalog.is_loaded());

        // Changing the file has no effect once cached
        write_catalog(&path, "[]").await;
        let product = catalog.find_by_id(ProductId::new(1)).await.unwrap();
        assert_eq!(product.unwrap().title, "Trufas");

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let path = std::env::temp_dir().join(format!("catalog-{}.json", uuid::Uuid::new_v4()));
        let catalog = CachedCatalog::new(CatalogSource::File(path.clone()));

        let err = catalog.get_all().await.unwrap_err();
        assert!(matches!(err, CatalogError::Shared(_)));
        assert!(!catalog.is_loaded());

        write_catalog(&path, "[]").await;
        assert!(catalog.get_all().await.unwrap().is_empty());

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_load() {
        let path = std::env::temp_dir().join(format!("catalog-{}.json", uuid::Uuid::new_v4()));
        write_catalog(
            &path,
            r#"[{"id": 7, "title": "Bombones", "image": "b.jpg", "price": 3, "desc": ""}]"#,
        )
        .await;

        let catalog = CachedCatalog::new(CatalogSource::File(path.clone()));
        let (a, b) = tokio::join!(catalog.get_all(), catalog.get_all());
        let (a, b) = (a.unwrap(), b.unwrap());
        assert!(Arc::ptr_eq(&a, &b));

        let _ = tokio::fs::remove_file(&path).await;
    }
}
