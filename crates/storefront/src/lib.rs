//! Choco Shop Storefront library.
//!
//! Everything the storefront does besides the pure cart transitions in
//! `choco-shop-core`: loading the product catalog, persisting the cart and
//! the session in a local key-value store, and rendering views.
//!
//! # Architecture
//!
//! - [`catalog`] - Read-only product catalog (HTTP or file), cached for the
//!   process lifetime
//! - [`store`] - Key-value persistence (`localStorage` analogue)
//! - [`models`] - Persisted schemas and well-known storage keys
//! - [`services`] - Cart manager and mock session service
//! - [`views`] - Askama templates for listing, detail and cart pages
//!
//! Collaborators are injected, never global: a [`services::CartManager`] is
//! built from any [`catalog::CatalogProvider`] and any
//! [`store::KeyValueStore`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod services;
pub mod state;
pub mod store;
pub mod views;
