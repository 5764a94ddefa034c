//! # Domain Errors
//!
//! Error taxonomies of the exchange engine.
//!
//! ```text
//! MarketError
//! ├── NonExistentGood                  - kind not dealt by this market
//! ├── InsufficientGoodQuantity         - stock or delivery too small
//! ├── InsufficientDefaultGoodQuantity  - not enough EUR cash
//! ├── LockedGood                       - kind already has an outstanding lock
//! ├── GoodNotLocked                    - token matches no live lock
//! ├── OfferTooLow                      - offer below the minimum threshold
//! ├── Good(GoodError)                  - split/merge failure
//! └── General(String)                  - diagnostics outside the taxonomy
//!
//! GoodError
//! ├── NotEnoughQuantity
//! ├── DifferentKindsOfGood
//! └── Arithmetic(ArithmeticError)
//! ```
//!
//! # Examples
//!
//! ```
//! use market_protocol::domain::errors::GoodError;
//! use market_protocol::domain::value_objects::GoodKind;
//!
//! let err = GoodError::DifferentKindsOfGood {
//!     expected: GoodKind::Eur,
//!     found: GoodKind::Usd,
//! };
//! assert_eq!(err.to_string(), "cannot combine USD with EUR");
//! ```

use crate::domain::value_objects::{ArithmeticError, GoodKind, LockId, Quantity};
use rust_decimal::Decimal;
use thiserror::Error;

/// Error type for good operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoodError {
    /// The good does not hold strictly more than the requested quantity.
    #[error("not enough {kind}: requested {requested}, holding {available}")]
    NotEnoughQuantity {
        /// Kind of the good.
        kind: GoodKind,
        /// Quantity asked for.
        requested: Quantity,
        /// Quantity held.
        available: Quantity,
    },

    /// The two goods are of different kinds.
    #[error("cannot combine {found} with {expected}")]
    DifferentKindsOfGood {
        /// Kind of the receiving good.
        expected: GoodKind,
        /// Kind of the good handed in.
        found: GoodKind,
    },

    /// Quantity arithmetic overflowed.
    #[error("quantity arithmetic failed: {0}")]
    Arithmetic(#[from] ArithmeticError),
}

/// Result type for good operations.
pub type GoodResult<T> = Result<T, GoodError>;

/// Error type for market operations.
///
/// The taxonomy is closed so that traders written against one market can
/// handle failures from any other. [`MarketError::General`] is reserved for
/// conditions that none of the other variants describe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketError {
    /// The market does not deal in this kind of good.
    #[error("market does not deal in {0}")]
    NonExistentGood(GoodKind),

    /// The market (on a buy) or the trader (on a sell) holds the wrong
    /// quantity or kind of good.
    #[error("insufficient {kind}: requested {requested}, available {available}")]
    InsufficientGoodQuantity {
        /// Kind of the good.
        kind: GoodKind,
        /// Quantity required.
        requested: Quantity,
        /// Quantity actually available or delivered.
        available: Quantity,
    },

    /// Not enough EUR to settle.
    #[error("insufficient EUR: required {required}, available {available}")]
    InsufficientDefaultGoodQuantity {
        /// EUR required.
        required: Decimal,
        /// EUR available.
        available: Decimal,
    },

    /// The kind already has an outstanding lock.
    #[error("{0} is already locked")]
    LockedGood(GoodKind),

    /// No live lock matches the token (never granted, already settled,
    /// expired, or of the other side).
    #[error("no live lock for token {0}")]
    GoodNotLocked(LockId),

    /// The offered total is below the minimum the market accepts.
    #[error("offer for {kind} too low: offered {offered}, minimum {minimum}")]
    OfferTooLow {
        /// Kind of the good.
        kind: GoodKind,
        /// Total EUR offered.
        offered: Decimal,
        /// Minimum acceptable total EUR.
        minimum: Decimal,
    },

    /// A split or merge failed.
    #[error("good error: {0}")]
    Good(#[from] GoodError),

    /// Diagnostic outside the closed taxonomy.
    #[error("market error: {0}")]
    General(String),
}

impl MarketError {
    /// Creates a general error.
    #[must_use]
    pub fn general(message: impl Into<String>) -> Self {
        Self::General(message.into())
    }

    /// Returns true if retrying with different parameters (or later) may
    /// succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::LockedGood(_)
                | Self::OfferTooLow { .. }
                | Self::InsufficientGoodQuantity { .. }
                | Self::InsufficientDefaultGoodQuantity { .. }
        )
    }
}

impl From<ArithmeticError> for MarketError {
    fn from(err: ArithmeticError) -> Self {
        Self::General(format!("arithmetic failure: {err}"))
    }
}

/// Result type for market operations.
pub type MarketResult<T> = Result<T, MarketError>;
