//! # Price Policy
//!
//! The protocol-wide pricing rule.
//!
//! [`PricePolicy`] turns the shared adjustment percentage into the two things
//! every market needs: the minimum total a lock offer must reach, and the
//! quote drift applied after a settlement.
//!
//! # Thresholds
//!
//! ```text
//! min buy offer  = buy_price  × quantity × (1 + pct)
//! min sell offer = sell_price × quantity × (1 − pct)
//! ```
//!
//! EUR trades settle 1:1: both minimums equal the quantity and EUR quotes
//! never move.
//!
//! # Examples
//!
//! ```
//! use market_protocol::domain::services::price_policy::PricePolicy;
//! use market_protocol::domain::value_objects::{GoodKind, Price, Quantity};
//! use rust_decimal::Decimal;
//!
//! let policy = PricePolicy::new(Decimal::new(2, 2));
//! let buy = Price::new(Decimal::new(105, 2)).unwrap();
//! let minimum = policy
//!     .min_buy_offer(GoodKind::Usd, buy, Quantity::from_units(100))
//!     .unwrap();
//! assert_eq!(minimum, Decimal::new(1071, 1));
//! ```

use crate::domain::value_objects::{
    ArithmeticResult, CheckedArithmetic, GoodKind, Price, ProtocolConstants, Quantity,
};
use rust_decimal::Decimal;

/// Pricing rule parameterised by the shared adjustment percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricePolicy {
    pct: Decimal,
}

impl PricePolicy {
    /// Creates a policy with a fractional adjustment percentage.
    #[must_use]
    pub const fn new(pct: Decimal) -> Self {
        Self { pct }
    }

    /// Creates the policy mandated by the protocol constants.
    #[must_use]
    pub const fn from_constants(constants: &ProtocolConstants) -> Self {
        Self::new(constants.price_adjustment_pct())
    }

    /// Returns the adjustment percentage.
    #[inline]
    #[must_use]
    pub const fn pct(&self) -> Decimal {
        self.pct
    }

    /// Minimum total EUR a buy offer for `quantity` units must reach.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` on overflow.
    pub fn min_buy_offer(
        &self,
        kind: GoodKind,
        buy_price: Price,
        quantity: Quantity,
    ) -> ArithmeticResult<Decimal> {
        if kind.is_default() {
            return Ok(quantity.get());
        }
        buy_price
            .total_for(quantity)?
            .safe_mul(Decimal::ONE.safe_add(self.pct)?)
    }

    /// Minimum total EUR a sell offer for `quantity` units must reach.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` on overflow.
    pub fn min_sell_offer(
        &self,
        kind: GoodKind,
        sell_price: Price,
        quantity: Quantity,
    ) -> ArithmeticResult<Decimal> {
        if kind.is_default() {
            return Ok(quantity.get());
        }
        sell_price
            .total_for(quantity)?
            .safe_mul(Decimal::ONE.safe_sub(self.pct)?)
    }

    /// Price after a completed buy: `p + p × pct`.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::Overflow` on overflow.
    pub fn raised(&self, price: Price) -> ArithmeticResult<Price> {
        price.scaled(Decimal::ONE.safe_add(self.pct)?)
    }

    /// Price after a completed sell: `p − p × pct`.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::InvalidValue` if `pct >= 1` would make the
    /// price non-positive.
    pub fn lowered(&self, price: Price) -> ArithmeticResult<Price> {
        price.scaled(Decimal::ONE.safe_sub(self.pct)?)
    }
}

impl Default for PricePolicy {
    fn default() -> Self {
        Self::from_constants(&ProtocolConstants::default())
    }
}
