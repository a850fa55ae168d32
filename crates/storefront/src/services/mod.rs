//! Business logic layered over the catalog and the store.
//!
//! - [`cart`] - Cart manager (add, change quantity, remove, totals)
//! - [`session`] - Mock login/register keyed on a display name

pub mod cart;
pub mod session;

pub use cart::{AddOutcome, CartError, CartManager};
pub use session::{SessionError, SessionService};
