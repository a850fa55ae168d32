//! Command implementations.
//!
//! Each command runs one storefront action and writes its result. Failures
//! are returned as `AppError` and reported once by `main`.

pub mod cart;
pub mod catalog;
pub mod session;

/// Result type for all commands.
pub type CommandResult = choco_shop_storefront::error::Result<()>;
