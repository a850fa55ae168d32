//! Persisted cart schema.
//!
//! # Format
//!
//! Version 1 (written by this crate):
//!
//! ```json
//! {"version": 1, "items": [{"id": 1, "titulo": "Trufas", "precio": 10.0, "imagen": "t.jpg", "cantidad": 2}]}
//! ```
//!
//! Version 0 (legacy, read only) is the bare item array without the envelope.
//!
//! Decoding validates the same invariants the in-memory [`Cart`] enforces:
//! unique ids, quantities of at least 1 and non-negative prices.

use choco_shop_core::{Cart, CartStateError, LineItem, Price, ProductId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Schema version written by [`encode_cart`].
pub const CART_SCHEMA_VERSION: u32 = 1;

/// Errors that can occur when decoding a persisted cart.
#[derive(Debug, Error)]
pub enum CartDecodeError {
    /// Not valid JSON, or a field has the wrong type.
    #[error("invalid cart JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Envelope carries a version this build doesn't understand.
    #[error("unsupported cart schema version {0}")]
    UnsupportedVersion(u32),

    /// Well-formed JSON that violates a cart invariant.
    #[error("invalid cart contents: {0}")]
    Invalid(#[from] CartStateError),
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredLineItem {
    id: ProductId,
    titulo: String,
    precio: Price,
    imagen: String,
    cantidad: u32,
}

#[derive(Debug, Serialize)]
struct StoredCart {
    version: u32,
    items: Vec<StoredLineItem>,
}

#[derive(Debug, Deserialize)]
struct StoredEnvelope {
    version: u32,
    items: Vec<Value>,
}

impl From<&LineItem> for StoredLineItem {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.product_id,
            titulo: item.title.clone(),
            precio: item.unit_price,
            imagen: item.image_ref.clone(),
            cantidad: item.quantity(),
        }
    }
}

impl TryFrom<StoredLineItem> for LineItem {
    type Error = CartStateError;

    fn try_from(stored: StoredLineItem) -> Result<Self, Self::Error> {
        Self::new(
            stored.id,
            stored.titulo,
            stored.precio,
            stored.imagen,
            stored.cantidad,
        )
    }
}

/// Serialize `cart` in the current schema version.
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn encode_cart(cart: &Cart) -> Result<String, serde_json::Error> {
    let stored = StoredCart {
        version: CART_SCHEMA_VERSION,
        items: cart.iter().map(StoredLineItem::from).collect(),
    };
    serde_json::to_string(&stored)
}

/// Parse a persisted cart, accepting the current and legacy formats.
///
/// # Errors
///
/// Returns `CartDecodeError` if the value isn't a valid cart. Callers treat
/// this as an empty cart rather than a hard failure.
pub fn decode_cart(raw: &str) -> Result<Cart, CartDecodeError> {
    // Derived structs also accept JSON arrays, so the shape is checked
    // explicitly before any typed decoding.
    let values = match serde_json::from_str::<Value>(raw)? {
        value @ Value::Object(_) => {
            let envelope: StoredEnvelope = serde_json::from_value(value)?;
            if envelope.version != CART_SCHEMA_VERSION {
                return Err(CartDecodeError::UnsupportedVersion(envelope.version));
            }
            envelope.items
        }
        Value::Array(items) => items,
        _ => return Err(unexpected_shape("a cart object or an item array").into()),
    };

    let items = values
        .into_iter()
        .map(|value| match value {
            value @ Value::Object(_) => serde_json::from_value::<StoredLineItem>(value),
            _ => Err(unexpected_shape("a line item object")),
        })
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(LineItem::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Cart::from_items(items)?)
}

fn unexpected_shape(expected: &str) -> serde_json::Error {
    <serde_json::Error as serde::de::Error>::custom(format!("expected {expected}"))
}
