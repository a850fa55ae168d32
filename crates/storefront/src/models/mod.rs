//! Persisted schemas and the storage keys they live under.
//!
//! Everything written to a [`crate::store::KeyValueStore`] goes through this
//! module so that field names and versions are defined in one place.

pub mod cart;
pub mod session;

pub use cart::{CART_SCHEMA_VERSION, CartDecodeError, decode_cart, encode_cart};
pub use session::{DisplayName, DisplayNameError};

/// Well-known storage keys.
pub mod keys {
    /// Key for the serialized cart.
    pub const CART: &str = "carrito";

    /// Key for the logged-in user's display name.
    pub const CURRENT_USER: &str = "usuario";

    /// Key for the list of registered display names.
    pub const REGISTERED_USERS: &str = "usuarios";
}
