//! # Protocol Constants
//!
//! Values every market implementation must agree on.
//!
//! The starting quantity of freshly constructed goods, the price-adjustment
//! percentage and the lock validity window are consumed by the core but
//! configured from outside (see `infrastructure::config`). Markets that used
//! different values would quote incomparable prices, so a single
//! [`ProtocolConstants`] value is shared by every market in a session.
//!
//! # Examples
//!
//! ```
//! use market_protocol::domain::value_objects::ProtocolConstants;
//! use rust_decimal::Decimal;
//!
//! let constants = ProtocolConstants::default();
//! assert_eq!(constants.price_adjustment_pct(), Decimal::new(2, 2));
//! assert_eq!(constants.lock_validity_window(), 10);
//! ```

use crate::domain::value_objects::arithmetic::{ArithmeticError, ArithmeticResult};
use crate::domain::value_objects::quantity::Quantity;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default starting quantity of a freshly constructed good.
pub const DEFAULT_STARTING_QUANTITY: u64 = 1000;

/// Default price-adjustment percentage (fractional, 0.02 = 2%).
pub const DEFAULT_PRICE_ADJUSTMENT_PCT: Decimal = Decimal::from_parts(2, 0, 0, false, 2);

/// Default number of market operations a lock may wait before it expires.
pub const DEFAULT_LOCK_VALIDITY_WINDOW: u64 = 10;

/// Protocol-wide constants shared by every market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConstants {
    /// Quantity given to goods built by the default constructors.
    starting_quantity: Quantity,
    /// Fractional price move applied after every settlement (0.02 = 2%).
    price_adjustment_pct: Decimal,
    /// Maximum number of intervening market operations a lock survives.
    lock_validity_window: u64,
}

impl ProtocolConstants {
    /// Creates validated constants.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::InvalidValue` if `starting_quantity` is zero,
    /// if `price_adjustment_pct` is outside `(0, 1)`, or if
    /// `lock_validity_window` is zero.
    pub fn new(
        starting_quantity: Quantity,
        price_adjustment_pct: Decimal,
        lock_validity_window: u64,
    ) -> ArithmeticResult<Self> {
        let constants = Self {
            starting_quantity,
            price_adjustment_pct,
            lock_validity_window,
        };
        constants.validate()?;
        Ok(constants)
    }

    /// Checks the invariants of deserialized constants.
    ///
    /// # Errors
    ///
    /// See [`ProtocolConstants::new`].
    pub fn validate(&self) -> ArithmeticResult<()> {
        if self.starting_quantity.is_zero() {
            return Err(ArithmeticError::InvalidValue(
                "starting quantity must be positive",
            ));
        }
        if self.price_adjustment_pct <= Decimal::ZERO || self.price_adjustment_pct >= Decimal::ONE
        {
            return Err(ArithmeticError::InvalidValue(
                "price adjustment percentage must be in (0, 1)",
            ));
        }
        if self.lock_validity_window == 0 {
            return Err(ArithmeticError::InvalidValue(
                "lock validity window must be at least one operation",
            ));
        }
        Ok(())
    }

    /// Returns the starting quantity of default-constructed goods.
    #[inline]
    #[must_use]
    pub const fn starting_quantity(&self) -> Quantity {
        self.starting_quantity
    }

    /// Returns the fractional price-adjustment percentage.
    #[inline]
    #[must_use]
    pub const fn price_adjustment_pct(&self) -> Decimal {
        self.price_adjustment_pct
    }

    /// Returns the lock validity window, in market operations.
    #[inline]
    #[must_use]
    pub const fn lock_validity_window(&self) -> u64 {
        self.lock_validity_window
    }
}

impl Default for ProtocolConstants {
    fn default() -> Self {
        Self {
            starting_quantity: Quantity::from_units(DEFAULT_STARTING_QUANTITY),
            price_adjustment_pct: DEFAULT_PRICE_ADJUSTMENT_PCT,
            lock_validity_window: DEFAULT_LOCK_VALIDITY_WINDOW,
        }
    }
}
