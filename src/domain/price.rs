//! Positive decimal prices and guess parsing.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Error returned when a value cannot be used as a [`Price`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    /// The text is not a decimal number.
    #[error("not a decimal number: {0:?}")]
    NotANumber(String),

    /// The value is zero or negative.
    #[error("price must be positive, got {0}")]
    NotPositive(Decimal),
}

/// A strictly positive decimal price.
///
/// Backed by [`Decimal`] so that equality is exact: `10.0` and `10.00`
/// compare equal, and no binary floating point rounding leaks into the
/// duplicate-value and exact-match rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Creates a price, rejecting zero and negative values.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotPositive`] if `value <= 0`.
    pub fn new(value: Decimal) -> Result<Self, PriceError> {
        if value <= Decimal::ZERO {
            return Err(PriceError::NotPositive(value));
        }
        Ok(Self(value))
    }

    /// Parses a guess typed by a participant.
    ///
    /// Surrounding whitespace is ignored and a comma is accepted as the
    /// decimal separator (`"1,3"` parses as `1.3`).
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotANumber`] for non-numeric text and
    /// [`PriceError::NotPositive`] for zero or negative values.
    pub fn parse_guess(text: &str) -> Result<Self, PriceError> {
        let normalized = text.trim().replace(',', ".");
        let value = Decimal::from_str(&normalized)
            .map_err(|_| PriceError::NotANumber(text.trim().to_string()))?;
        Self::new(value)
    }

    /// Returns the inner decimal value.
    #[must_use]
    pub const fn get(&self) -> Decimal {
        self.0
    }

    /// Absolute distance between two prices.
    #[must_use]
    pub fn distance(&self, other: &Self) -> Decimal {
        (self.0 - other.0).abs()
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_guess(s)
    }
}

/// Renders with two decimal places (`9.9` → `9.90`).
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_period_and_comma() {
        assert_eq!(Price::parse_guess("5.7").map(|p| p.get()), Ok(dec!(5.7)));
        assert_eq!(Price::parse_guess("1,3").map(|p| p.get()), Ok(dec!(1.3)));
        assert_eq!(Price::parse_guess("  12 ").map(|p| p.get()), Ok(dec!(12)));
    }

    #[test]
    fn rejects_non_numeric() {
        assert!(matches!(
            Price::parse_guess("cheap"),
            Err(PriceError::NotANumber(_))
        ));
        assert!(matches!(
            Price::parse_guess(""),
            Err(PriceError::NotANumber(_))
        ));
        assert!(matches!(
            Price::parse_guess("1,2,3"),
            Err(PriceError::NotANumber(_))
        ));
    }

    #[test]
    fn rejects_zero_and_negative() {
        assert_eq!(
            Price::parse_guess("0"),
            Err(PriceError::NotPositive(dec!(0)))
        );
        assert!(matches!(
            Price::parse_guess("-4,5"),
            Err(PriceError::NotPositive(_))
        ));
    }

    #[test]
    fn equality_ignores_scale() {
        let Ok(a) = Price::parse_guess("10") else {
            panic!("valid price");
        };
        let Ok(b) = Price::parse_guess("10.00") else {
            panic!("valid price");
        };
        assert_eq!(a, b);
    }

    #[test]
    fn display_uses_two_decimals() {
        let Ok(p) = Price::new(dec!(9.9)) else {
            panic!("valid price");
        };
        assert_eq!(p.to_string(), "9.90");
    }

    #[test]
    fn deserialize_rejects_non_positive() {
        assert!(serde_json::from_str::<Price>("\"-1\"").is_err());
        let parsed = serde_json::from_str::<Price>("\"19.99\"");
        assert_eq!(parsed.ok().map(|p| p.get()), Some(dec!(19.99)));
    }

    #[test]
    fn distance_is_absolute() {
        let (Ok(a), Ok(b)) = (Price::new(dec!(10)), Price::new(dec!(12.5))) else {
            panic!("valid prices");
        };
        assert_eq!(a.distance(&b), dec!(2.5));
        assert_eq!(b.distance(&a), dec!(2.5));
    }
}
