//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for everything a storefront action can
//! fail with. Front ends call [`AppError::report`] once per failed action,
//! which captures internal failures to Sentry and logs them, then show
//! [`AppError::notification`] to the user. No error is fatal to the session.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::services::{CartError, SessionError};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Login/register failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Template rendering failed.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Whether this is a failure of the system rather than of the request.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        match self {
            Self::Cart(err) => matches!(
                err,
                CartError::StoreUnavailable(_) | CartError::CatalogUnavailable(_)
            ),
            Self::Session(err) => matches!(err, SessionError::Store(_)),
            Self::Catalog(_) | Self::Render(_) | Self::Io(_) => true,
            Self::NotFound(_) => false,
        }
    }

    /// Message suitable for the transient notification.
    ///
    /// Internal details (paths, URLs, parser messages) are not exposed.
    #[must_use]
    pub fn notification(&self) -> String {
        match self {
            Self::Cart(err) => match err {
                CartError::ProductNotFound(id) => format!("El producto {id} no existe"),
                CartError::ItemNotFound(id) => format!("El producto {id} no está en el carrito"),
                CartError::QuantityLimit(_) => "Cantidad máxima alcanzada".to_string(),
                CartError::StoreUnavailable(_) => "No se pudo guardar el carrito".to_string(),
                CartError::CatalogUnavailable(_) => {
                    "No se pudieron cargar los productos".to_string()
                }
            },
            Self::Catalog(_) => "No se pudieron cargar los productos".to_string(),
            Self::Session(err) => match err {
                SessionError::InvalidName(e) => format!("Nombre inválido: {e}"),
                SessionError::AlreadyRegistered(name) => {
                    format!("El usuario \"{name}\" ya está registrado")
                }
                SessionError::UnknownUser(name) => format!("El usuario \"{name}\" no existe"),
                SessionError::Store(_) => "No se pudo guardar la sesión".to_string(),
            },
            Self::Render(_) | Self::Io(_) => "Error interno".to_string(),
            Self::NotFound(what) => format!("No encontrado: {what}"),
        }
    }

    /// Log the error and capture internal failures to Sentry.
    pub fn report(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Action failed"
            );
        } else {
            tracing::warn!(error = %self, "Action rejected");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from the logged-in display name.
///
/// Call this after login to associate errors with users.
pub fn set_sentry_user(name: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            username: Some(name.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
