//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`LockId`]: capability token of an outstanding lock
//! - [`EventId`]: domain event identifier
//!
//! ## Numeric Types
//!
//! - [`Price`]: strictly positive EUR amount
//! - [`Quantity`]: non-negative amount of a good
//!
//! ## Arithmetic
//!
//! - [`ArithmeticError`]: Error type for arithmetic failures
//! - [`CheckedArithmetic`]: Trait for safe arithmetic operations
//!
//! ## Domain Enums and States
//!
//! - [`GoodKind`]: EUR, USD, YEN, YUAN
//! - [`TradeSide`]: Buy or Sell
//! - [`LockState`]: Free / LockedForBuy / LockedForSell
//!
//! ## Configuration
//!
//! - [`ProtocolConstants`]: constants shared by every market

pub mod arithmetic;
pub mod enums;
pub mod ids;
pub mod lock_state;
pub mod price;
pub mod protocol_constants;
pub mod quantity;
pub mod timestamp;

pub use arithmetic::{ArithmeticError, ArithmeticResult, CheckedArithmetic};
pub use enums::{GoodKind, ParseEnumError, TradeSide};
pub use ids::{EventId, LockId};
pub use lock_state::{LockState, LockTicket};
pub use price::Price;
pub use protocol_constants::ProtocolConstants;
pub use quantity::Quantity;
pub use timestamp::Timestamp;
