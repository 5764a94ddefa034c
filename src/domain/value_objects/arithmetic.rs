//! Overflow-checked decimal math for prices, quotes and stock levels.
//!
//! Quotes multiply a unit price by a quantity and then by `1 ± pct`;
//! settlements add and subtract stock. All of that goes through
//! [`CheckedArithmetic`], so a pathological quantity yields
//! [`ArithmeticError`] rather than a panic inside the market mutex.
//!
//! ```
//! use market_protocol::domain::value_objects::arithmetic::{ArithmeticError, CheckedArithmetic};
//! use rust_decimal::Decimal;
//!
//! let unit_price = Decimal::new(105, 2);
//! assert_eq!(unit_price.safe_mul(Decimal::from(100)), Ok(Decimal::from(105)));
//! assert_eq!(unit_price.safe_div(Decimal::ZERO), Err(ArithmeticError::DivisionByZero));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

/// Why a price or quantity computation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ArithmeticError {
    /// Result does not fit in a `Decimal`.
    #[error("arithmetic overflow")]
    Overflow,

    /// Subtraction went below what the type allows, e.g. taking more
    /// stock than a good holds.
    #[error("arithmetic underflow")]
    Underflow,

    /// A zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// A value outside its domain, such as a negative quantity or a
    /// non-positive price.
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
}

/// Result of a checked computation.
pub type ArithmeticResult<T> = Result<T, ArithmeticError>;

/// Decimal operations that report failure instead of panicking.
pub trait CheckedArithmetic: Sized {
    /// `self + rhs`.
    ///
    /// # Errors
    ///
    /// [`ArithmeticError::Overflow`].
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self>;

    /// `self - rhs`.
    ///
    /// # Errors
    ///
    /// [`ArithmeticError::Underflow`].
    fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self>;

    /// `self * rhs`.
    ///
    /// # Errors
    ///
    /// [`ArithmeticError::Overflow`].
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self>;

    /// `self / rhs`.
    ///
    /// # Errors
    ///
    /// [`ArithmeticError::DivisionByZero`] for a zero divisor,
    /// [`ArithmeticError::Overflow`] otherwise.
    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self>;
}

impl CheckedArithmetic for Decimal {
    #[inline]
    fn safe_add(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_add(rhs).ok_or(ArithmeticError::Overflow)
    }

    #[inline]
    fn safe_sub(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_sub(rhs).ok_or(ArithmeticError::Underflow)
    }

    #[inline]
    fn safe_mul(self, rhs: Self) -> ArithmeticResult<Self> {
        self.checked_mul(rhs).ok_or(ArithmeticError::Overflow)
    }

    #[inline]
    fn safe_div(self, rhs: Self) -> ArithmeticResult<Self> {
        if rhs.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        self.checked_div(rhs).ok_or(ArithmeticError::Overflow)
    }
}
