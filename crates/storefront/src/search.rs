//! Catalog search.
//!
//! The catalog is small and already in memory, so search is a linear scan:
//! every whitespace-separated term of the query must appear (case-insensitive)
//! in the product title or description.

use std::str::FromStr;

use choco_shop_core::Product;
use tracing::instrument;

use crate::catalog::{CatalogError, CatalogProvider};

/// Result ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchSort {
    /// Catalog order.
    #[default]
    Catalog,
    PriceAsc,
    PriceDesc,
    TitleAsc,
}

impl SearchSort {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::TitleAsc => "title",
        }
    }
}

impl std::fmt::Display for SearchSort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "catalog" => Ok(Self::Catalog),
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "title" => Ok(Self::TitleAsc),
            other => Err(format!(
                "unknown sort '{other}' (expected catalog, price-asc, price-desc or title)"
            )),
        }
    }
}

/// Filter `products` by `query` and order the matches by `sort`.
///
/// A blank query matches every product.
#[must_use]
pub fn filter_products(products: &[Product], query: &str, sort: SearchSort) -> Vec<Product> {
    let terms: Vec<String> = query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();

    let mut matches: Vec<Product> = products
        .iter()
        .filter(|p| terms.iter().all(|term| p.matches(term)))
        .cloned()
        .collect();

    // Stable sorts keep catalog order among equal keys
    match sort {
        SearchSort::Catalog => {}
        SearchSort::PriceAsc => matches.sort_by_key(|p| p.unit_price),
        SearchSort::PriceDesc => matches.sort_by_key(|p| std::cmp::Reverse(p.unit_price)),
        SearchSort::TitleAsc => matches.sort_by_cached_key(|p| p.title.to_lowercase()),
    }

    matches
}

/// Search the catalog.
///
/// # Errors
///
/// Returns `CatalogError` if the catalog can't be loaded.
#[instrument(skip(catalog))]
pub async fn search<C: CatalogProvider>(
    catalog: &C,
    query: &str,
    sort: SearchSort,
) -> Result<Vec<Product>, CatalogError> {
    let products = catalog.get_all().await?;
    let results = filter_products(&products, query, sort);
    tracing::debug!(results = results.len(), "Search complete");
    Ok(results)
}
