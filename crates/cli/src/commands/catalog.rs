//! Catalog browsing commands.

use askama::Template;
use choco_shop_core::ProductId;
use choco_shop_storefront::catalog::CatalogProvider;
use choco_shop_storefront::error::AppError;
use choco_shop_storefront::search::{self, SearchSort, filter_products};
use choco_shop_storefront::state::AppState;
use choco_shop_storefront::views::{ProductDetailTemplate, ProductListTemplate};

use super::CommandResult;
use crate::output;

/// List the whole catalog.
pub async fn list(state: &AppState, sort: SearchSort) -> CommandResult {
    let products = state.catalog().get_all().await?;
    let products = filter_products(&products, "", sort);
    output::emit(ProductListTemplate::new(&products, None).render()?)?;
    Ok(())
}

/// Show one product.
pub async fn show(state: &AppState, id: ProductId) -> CommandResult {
    let product = state
        .catalog()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("producto {id}")))?;
    output::emit(ProductDetailTemplate::from(&product).render()?)?;
    Ok(())
}

/// Search by title and description.
pub async fn search(state: &AppState, query: &str, sort: SearchSort) -> CommandResult {
    let results = search::search(state.catalog(), query, sort).await?;
    output::emit(ProductListTemplate::new(&results, Some(query)).render()?)?;
    Ok(())
}
