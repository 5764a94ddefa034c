//! # Quantity Value Object
//!
//! Non-negative decimal amount of a good.
//!
//! A [`Quantity`] can never be negative: the constructor rejects negative
//! values and subtraction that would go below zero fails instead of wrapping.
//! Zero is a valid quantity (an emptied good).
//!
//! # Examples
//!
//! ```
//! use market_protocol::domain::value_objects::Quantity;
//! use rust_decimal::Decimal;
//!
//! let q = Quantity::new(Decimal::new(150, 0)).unwrap();
//! assert!(Quantity::new(Decimal::new(-1, 0)).is_err());
//! assert_eq!(q.get(), Decimal::new(150, 0));
//! ```

use crate::domain::value_objects::arithmetic::{
    ArithmeticError, ArithmeticResult, CheckedArithmetic,
};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A non-negative decimal quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct Quantity(Decimal);

impl Quantity {
    /// The zero quantity.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a quantity, rejecting negative values.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::InvalidValue` if `value` is negative.
    pub fn new(value: Decimal) -> ArithmeticResult<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(ArithmeticError::InvalidValue("quantity must not be negative"));
        }
        Ok(Self(value.normalize()))
    }

    /// Creates a quantity from a whole number of units.
    #[must_use]
    pub fn from_units(units: u64) -> Self {
        Self(Decimal::from(units))
    }

    /// Returns the decimal value.
    #[inline]
    #[must_use]
    pub const fn get(&self) -> Decimal {
        self.0
    }

    /// Returns true if the quantity is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Adds two quantities.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` on overflow.
    pub fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
        self.0.safe_add(rhs.0).map(Self)
    }

    /// Subtracts `rhs`, failing rather than going below zero.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Underflow` if `rhs > self`.
    pub fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self> {
        if rhs.0 > self.0 {
            return Err(ArithmeticError::Underflow);
        }
        self.0.safe_sub(rhs.0).map(Self)
    }

    /// Subtracts `rhs`, clamping at zero.
    #[must_use]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        self.safe_sub(rhs).unwrap_or(Self::ZERO)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<Decimal> for Quantity {
    type Error = ArithmeticError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for Decimal {
    fn from(q: Quantity) -> Self {
        q.0
    }
}

impl<'de> Deserialize<'de> for Quantity {
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
    fn rejects_negative() {
        assert_eq!(
            Quantity::new(dec!(-0.01)),
            Err(ArithmeticError::InvalidValue("quantity must not be negative"))
        );
    }

    #[test]
    fn accepts_zero() {
        let q = Quantity::new(Decimal::ZERO).unwrap();
        assert!(q.is_zero());
        assert_eq!(q, Quantity::ZERO);
    }

    #[test]
    fn sub_never_goes_negative() {
        let a = Quantity::from_units(5);
        let b = Quantity::from_units(7);
        assert_eq!(a.safe_sub(b), Err(ArithmeticError::Underflow));
        assert_eq!(a.saturating_sub(b), Quantity::ZERO);
        assert_eq!(b.safe_sub(a).unwrap(), Quantity::from_units(2));
    }

    #[test]
    fn equality_ignores_trailing_zeros() {
        assert_eq!(Quantity::new(dec!(1.50)).unwrap(), Quantity::new(dec!(1.5)).unwrap());
    }

    mod serde_format {
        use super::*;

        #[test]
        fn negative_is_rejected() {
            assert!(serde_json::from_str::<Quantity>("\"-1\"").is_err());
            assert!(serde_json::from_str::<Quantity>("\"-3\"").is_err());
        }

        #[test]
        fn zero_is_accepted() {
            let q: Quantity = serde_json::from_str("\"0\"").unwrap();
            assert!(q.is_zero());
        }

        #[test]
        fn fractional_roundtrip() {
            let q: Quantity = serde_json::from_str("\"1.5\"").unwrap();
            assert_eq!(q.get(), dec!(1.5));
            let json = serde_json::to_string(&q).unwrap();
            assert_eq!(serde_json::from_str::<Quantity>(&json).unwrap(), q);
        }
    }
}
