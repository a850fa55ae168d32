//! Choco Shop Core - Shared types library.
//!
//! This crate provides the domain types used across all Choco Shop components:
//! - `storefront` - Catalog, persistence, cart manager and view rendering
//! - `cli` - Command-line front end for browsing and managing the cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O,
//! no storage access, no HTTP clients. Everything here can be exercised
//! headlessly in tests.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs and prices, catalog products
//! - [`cart`] - Line items, the cart collection and its totals

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartStateError, LineItem, compute_total, item_count};
pub use types::*;
