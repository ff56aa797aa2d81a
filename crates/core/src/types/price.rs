//! Product price.
//!
//! Prices arrive as text (form fields) or JSON numbers and are stored as
//! floating-point numbers. Only finite, non-negative values are accepted;
//! `NaN`, infinities and negative amounts are rejected at parse time so they
//! never reach the store.

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is empty or whitespace.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a number.
    #[error("price is not a number")]
    NotANumber,
    /// The input is `NaN` or infinite.
    #[error("price must be finite")]
    NotFinite,
    /// The input is below zero.
    #[error("price cannot be negative")]
    Negative,
}

/// A finite, non-negative amount.
///
/// No currency or upper bound is attached; the catalog stores plain numbers.
///
/// ## Examples
///
/// ```
/// use nextshop_core::Price;
///
/// assert_eq!(Price::parse("19.99").map(Price::amount), Ok(19.99));
/// assert_eq!(Price::parse(" 0 ").map(Price::amount), Ok(0.0));
///
/// assert!(Price::parse("abc").is_err());
/// assert!(Price::parse("NaN").is_err());
/// assert!(Price::parse("inf").is_err());
/// assert!(Price::parse("-1").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    /// Parse a price from its textual form.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not a number, not finite, or
    /// negative.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PriceError::Empty);
        }

        let amount = trimmed
            .parse::<f64>()
            .map_err(|_| PriceError::NotANumber)?;

        Self::try_from(amount)
    }

    /// Returns the amount.
    #[must_use]
    pub const fn amount(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Price {
    type Error = PriceError;

    fn try_from(amount: f64) -> Result<Self, Self::Error> {
        if !amount.is_finite() {
            return Err(PriceError::NotFinite);
        }
        if amount < 0.0 {
            return Err(PriceError::Negative);
        }
        // Normalize -0.0 so it serializes as 0
        Ok(Self(amount + 0.0))
    }
}
