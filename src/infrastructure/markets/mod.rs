//! # Markets
//!
//! The [`Market`] capability interface and its in-process implementations.
//!
//! - [`ExchangeMarket`]: single-owner market engine
//! - [`MarketBuilder`]: explicit allocations
//! - [`SharedMarket`]: thread-safe handle over any market

pub mod builder;
pub mod exchange;
pub mod shared;
pub mod traits;

pub use crate::domain::errors::{MarketError, MarketResult};
pub use builder::MarketBuilder;
pub use exchange::{ExchangeMarket, reference_quotes};
pub use shared::SharedMarket;
pub use traits::Market;
