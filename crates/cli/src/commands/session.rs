//! Mock login commands.

use choco_shop_storefront::error::{clear_sentry_user, set_sentry_user};
use choco_shop_storefront::state::AppState;
use choco_shop_storefront::views::{Notice, NoticeKind};

use super::CommandResult;
use crate::output;

fn success(message: String) -> CommandResult {
    output::notify(&Notice {
        kind: NoticeKind::Success,
        message,
    })?;
    Ok(())
}

/// Register a new display name and log in as it.
pub async fn register(state: &AppState, name: &str) -> CommandResult {
    let user = state.sessions().register(name).await?;
    set_sentry_user(user.as_str());
    success(format!("Bienvenido/a, {user}"))
}

/// Log in as a registered display name.
pub async fn login(state: &AppState, name: &str) -> CommandResult {
    let user = state.sessions().login(name).await?;
    set_sentry_user(user.as_str());
    success(format!("Hola de nuevo, {user}"))
}

/// Log out.
pub async fn logout(state: &AppState) -> CommandResult {
    state.sessions().logout().await?;
    clear_sentry_user();
    success("Sesión cerrada".to_string())
}

/// Print the logged-in display name.
pub async fn whoami(state: &AppState) -> CommandResult {
    match state.sessions().current_user().await? {
        Some(user) => output::emit(user)?,
        None => output::emit("Sin sesión")?,
    }
    Ok(())
}
