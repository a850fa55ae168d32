//! Cart commands.
//!
//! Every mutating command prints the cart as it was persisted, so the output
//! always reflects the stored state.

use askama::Template;
use choco_shop_core::{Cart, ProductId};
use choco_shop_storefront::error::add_breadcrumb;
use choco_shop_storefront::models::DisplayName;
use choco_shop_storefront::state::AppState;
use choco_shop_storefront::views::{CartCountTemplate, CartShowTemplate, Notice};

use super::CommandResult;
use crate::output;

/// The logged-in user for the page header. The cart has already been saved
/// by the time this runs, so a session read failure only drops the header.
async fn header_user(state: &AppState) -> Option<DisplayName> {
    match state.sessions().current_user().await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "Rendering cart without user");
            None
        }
    }
}

async fn render(state: &AppState, cart: &Cart) -> CommandResult {
    let user = header_user(state).await;
    let page = CartShowTemplate::new(cart, user.as_ref().map(DisplayName::as_str)).render()?;
    output::emit(page)?;
    Ok(())
}

/// Show the cart.
pub async fn show(state: &AppState) -> CommandResult {
    let cart = state.cart().load().await?;
    render(state, &cart).await
}

/// Add one unit of a product.
pub async fn add(state: &AppState, id: ProductId) -> CommandResult {
    let id_str = id.to_string();
    let data = [("product_id", id_str.as_str())];
    add_breadcrumb("cart", "Add to cart", Some(&data[..]));

    let outcome = state.cart().add_or_increment(id).await?;
    render(state, &outcome.cart).await?;
    output::notify(&Notice::added(&outcome.item))?;
    Ok(())
}

/// Change a line's quantity by `delta`.
pub async fn change(state: &AppState, id: ProductId, delta: i64) -> CommandResult {
    let id_str = id.to_string();
    let delta_str = delta.to_string();
    let data = [("product_id", id_str.as_str()), ("delta", delta_str.as_str())];
    add_breadcrumb("cart", "Change quantity", Some(&data[..]));

    let cart = state.cart().change_quantity(id, delta).await?;
    render(state, &cart).await
}

/// Remove a line.
pub async fn remove(state: &AppState, id: ProductId) -> CommandResult {
    let id_str = id.to_string();
    let data = [("product_id", id_str.as_str())];
    add_breadcrumb("cart", "Remove from cart", Some(&data[..]));

    let cart = state.cart().remove(id).await?;
    render(state, &cart).await
}

/// Print the cart badge.
pub async fn count(state: &AppState) -> CommandResult {
    let count = state.cart().item_count().await?;
    output::emit(CartCountTemplate { count }.render()?)?;
    Ok(())
}
