//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog and cart files carry prices as plain JSON numbers (`"price": 12.5`).
//! They are parsed into a [`Decimal`] so that line totals and cart totals are
//! exact: `0.1 + 0.2` is `0.3` here, not `0.30000000000000004`.
//!
//! A price accepted by [`Price::new`] or by deserialization survives a write
//! and re-read of its JSON number unchanged. Amounts with more significant
//! digits than that number carries are rejected, so a stored snapshot price
//! never drifts.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors produced when constructing a [`Price`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// Prices can't be below zero.
    #[error("price must not be negative (got {0})")]
    Negative(Decimal),

    /// More precision than the stored JSON number keeps.
    #[error("price {0} has more precision than can be stored")]
    TooPrecise(Decimal),
}

/// A non-negative amount in the store's single currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// The zero price, also the total of an empty cart.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// - [`PriceError::Negative`] if `amount` is below zero
    /// - [`PriceError::TooPrecise`] if `amount` would change when written
    ///   as a JSON number and read back
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        if !survives_json(amount) {
            return Err(PriceError::TooPrecise(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: u32) -> Self {
        Self(Decimal::from(units))
    }

    /// Create a price from an amount in cents (e.g. `1250` is `12.50`).
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::from(cents) / Decimal::ONE_HUNDRED)
    }

    /// Whether this is the zero price.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

/// Whole amounts render without decimals (`$35`), fractional ones with two (`$12.50`).
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let amount = self.0.normalize();
        if amount.scale() == 0 {
            write!(f, "${amount}")
        } else {
            write!(f, "${amount:.2}")
        }
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self::Output {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// Mirrors the write path (`Decimal` to `f64`) and the read path (the
/// shortest `f64` text parsed back into a `Decimal`).
fn survives_json(amount: Decimal) -> bool {
    amount
        .to_f64()
        .and_then(|f| Decimal::from_str(&f.to_string()).ok())
        .is_some_and(|back| back == amount)
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0.normalize(), serializer)
    }
}

// Accepts JSON numbers as well as numeric strings ("12.50").
impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}
