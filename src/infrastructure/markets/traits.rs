//! # Market Trait
//!
//! The trader-facing capability interface of a market.
//!
//! Every market, whatever its internals, implements [`Market`]; traders
//! depend on `dyn Market` only. The protocol is the four-step lock/commit
//! handshake:
//!
//! ```text
//! quote ──► lock_buy_offer ──► buy      (trader pays EUR, receives goods)
//! quote ──► lock_sell_offer ──► sell    (trader hands goods, receives EUR)
//! ```
//!
//! # Settlement rules
//!
//! - Lock prices are TOTAL EUR for the whole quantity, not unit prices.
//! - `buy` takes all of the trader's cash Good. **No change is given**: any
//!   EUR above the locked price stays with the market.
//! - `sell` requires exactly the locked kind and quantity.
//! - On failure nothing moves: the trader's Good and the lock are untouched.
//!
//! # Lock validity
//!
//! A lock is valid for [`Market::lock_validity_window`] subsequent
//! trader-facing calls on the same market. After that the lock silently
//! reverts to free and its token fails with
//! [`MarketError::GoodNotLocked`](crate::domain::errors::MarketError::GoodNotLocked).

use crate::domain::entities::{Good, GoodSnapshot};
use crate::domain::errors::MarketResult;
use crate::domain::value_objects::{GoodKind, LockId, Price, Quantity};
use rust_decimal::Decimal;
use std::fmt;

/// A market offering the locked buy/sell protocol.
///
/// All operations except [`name`](Market::name) and
/// [`lock_validity_window`](Market::lock_validity_window) count as one
/// market operation for lock expiry.
pub trait Market: Send + fmt::Debug {
    /// Returns the market's name.
    fn name(&self) -> &str;

    /// Returns how many operations a lock stays valid for.
    fn lock_validity_window(&self) -> u64;

    /// Returns the market's EUR holdings.
    fn budget(&mut self) -> GoodSnapshot;

    /// Returns the kind and quantity of every good held, sorted by kind.
    fn list_goods(&mut self) -> Vec<GoodSnapshot>;

    /// Returns the minimum total EUR a buy offer for `quantity` must reach.
    ///
    /// # Errors
    ///
    /// - `NonExistentGood` if the market does not deal in `kind`
    fn buy_quote(&mut self, kind: GoodKind, quantity: Quantity) -> MarketResult<Decimal>;

    /// Returns the minimum total EUR a sell offer for `quantity` must reach.
    ///
    /// # Errors
    ///
    /// - `NonExistentGood` if the market does not deal in `kind`
    fn sell_quote(&mut self, kind: GoodKind, quantity: Quantity) -> MarketResult<Decimal>;

    /// Locks `quantity` units of `kind` for a later [`buy`](Market::buy) at
    /// total `price` EUR.
    ///
    /// `justification` is free text recorded in the market's log only.
    ///
    /// # Errors
    ///
    /// In check order: `NonExistentGood`, `General` (zero quantity),
    /// `LockedGood`, `InsufficientGoodQuantity`, `OfferTooLow`.
    fn lock_buy_offer(
        &mut self,
        kind: GoodKind,
        quantity: Quantity,
        price: Price,
        justification: &str,
    ) -> MarketResult<LockId>;

    /// Settles a buy lock, taking all of `cash` and returning the goods.
    ///
    /// # Errors
    ///
    /// In check order: `GoodNotLocked`, `Good(DifferentKindsOfGood)` if
    /// `cash` is not EUR, `InsufficientDefaultGoodQuantity` if `cash` is
    /// below the locked price.
    fn buy(&mut self, token: LockId, cash: &mut Good) -> MarketResult<Good>;

    /// Locks a later [`sell`](Market::sell) of `quantity` units of `kind`
    /// for total `price` EUR.
    ///
    /// # Errors
    ///
    /// In check order: `NonExistentGood`, `General` (zero quantity),
    /// `LockedGood`, `InsufficientDefaultGoodQuantity`, `OfferTooLow`.
    fn lock_sell_offer(
        &mut self,
        kind: GoodKind,
        quantity: Quantity,
        price: Price,
    ) -> MarketResult<LockId>;

    /// Settles a sell lock, taking all of `good` and returning the EUR.
    ///
    /// # Errors
    ///
    /// In check order: `GoodNotLocked`, `InsufficientGoodQuantity` if `good`
    /// does not match the locked kind and quantity,
    /// `InsufficientDefaultGoodQuantity` if the reserve cannot pay.
    fn sell(&mut self, token: LockId, good: &mut Good) -> MarketResult<Good>;
}
