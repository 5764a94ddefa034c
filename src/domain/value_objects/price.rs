//! # Price Value Object
//!
//! Strictly positive decimal amount of EUR.
//!
//! Market quotes are unit prices (EUR per unit of a good); lock offers carry
//! the total EUR for the whole locked quantity. Both use [`Price`].
//!
//! # Examples
//!
//! ```
//! use market_protocol::domain::value_objects::{Price, Quantity};
//! use rust_decimal::Decimal;
//!
//! let unit = Price::new(Decimal::new(105, 2)).unwrap();
//! let total = unit.total_for(Quantity::from_units(100)).unwrap();
//! assert_eq!(total, Decimal::new(105, 0));
//! assert!(Price::new(Decimal::ZERO).is_err());
//! ```

use crate::domain::value_objects::arithmetic::{
    ArithmeticError, ArithmeticResult, CheckedArithmetic,
};
use crate::domain::value_objects::quantity::Quantity;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A strictly positive EUR amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Exactly one EUR, the fixed price of the settlement currency.
    pub const ONE: Self = Self(Decimal::ONE);

    /// Creates a price, rejecting zero and negative values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::InvalidValue` if `value <= 0`.
    pub fn new(value: Decimal) -> ArithmeticResult<Self> {
        if value <= Decimal::ZERO {
            return Err(ArithmeticError::InvalidValue("price must be positive"));
        }
        Ok(Self(value.normalize()))
    }

    /// Returns the decimal value.
    #[inline]
    #[must_use]
    pub const fn get(&self) -> Decimal {
        self.0
    }

    /// Returns the EUR total for `quantity` units at this unit price.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` on overflow.
    pub fn total_for(&self, quantity: Quantity) -> ArithmeticResult<Decimal> {
        self.0.safe_mul(quantity.get())
    }

    /// Multiplies the price by `factor`, which must keep it positive.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` on overflow, or
    /// `ArithmeticError::InvalidValue` if the result is not positive.
    pub fn scaled(&self, factor: Decimal) -> ArithmeticResult<Self> {
        Self::new(self.0.safe_mul(factor)?)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = ArithmeticError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rejects_non_positive() {
        assert!(Price::new(dec!(0)).is_err());
        assert!(Price::new(dec!(-1.5)).is_err());
        assert!(Price::new(dec!(0.0001)).is_ok());
    }

    #[test]
    fn total_for_multiplies() {
        let price = Price::new(dec!(0.95)).unwrap();
        assert_eq!(price.total_for(Quantity::from_units(40)).unwrap(), dec!(38));
    }

    mod serde_format {
        use super::*;

        #[test]
        fn zero_and_negative_are_rejected() {
            assert!(serde_json::from_str::<Price>("\"0\"").is_err());
            assert!(serde_json::from_str::<Price>("\"-2.5\"").is_err());
        }

        #[test]
        fn fractional_roundtrip() {
            let price: Price = serde_json::from_str("\"1.5\"").unwrap();
            assert_eq!(price.get(), dec!(1.5));
            let json = serde_json::to_string(&price).unwrap();
            assert_eq!(serde_json::from_str::<Price>(&json).unwrap(), price);
        }
    }

    #[test]
    fn scaled_applies_factor() {
        let price = Price::new(dec!(1.05)).unwrap();
        assert_eq!(price.scaled(dec!(1.02)).unwrap().get(), dec!(1.071));
        assert!(price.scaled(dec!(0)).is_err());
    }
}
