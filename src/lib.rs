//! # Market Protocol
//!
//! Locked buy/sell protocol for exchanging currencies between independently
//! implemented markets and traders.
//!
//! A trader queries a market's quotes, locks a prospective trade to obtain a
//! token, then commits the lock by handing over goods. Markets never share
//! state; the [`Market`](infrastructure::markets::Market) trait is the only
//! contract between them.
//!
//! # Layout
//!
//! - [`domain`]: goods, quotes, lock state, pricing rule and records
//! - [`infrastructure`]: market engine, transaction history, configuration
//!
//! # Examples
//!
//! ```
//! use market_protocol::domain::entities::Good;
//! use market_protocol::domain::value_objects::{GoodKind, Price, ProtocolConstants, Quantity};
//! use market_protocol::infrastructure::markets::{ExchangeMarket, Market};
//! use rust_decimal::Decimal;
//!
//! let constants = ProtocolConstants::default();
//! let mut market = ExchangeMarket::debug("bazaar", constants).unwrap();
//!
//! let token = market
//!     .lock_buy_offer(
//!         GoodKind::Usd,
//!         Quantity::from_units(100),
//!         Price::new(Decimal::new(110, 0)).unwrap(),
//!         "restock",
//!     )
//!     .unwrap();
//!
//! let mut cash = Good::with_quantity(GoodKind::Eur, Quantity::from_units(110));
//! let dollars = market.buy(token, &mut cash).unwrap();
//! assert_eq!(dollars.quantity(), Quantity::from_units(100));
//! assert!(cash.is_empty());
//! ```

pub mod domain;
pub mod infrastructure;
