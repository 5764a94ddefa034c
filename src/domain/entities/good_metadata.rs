//! # Good Metadata
//!
//! Market-local quotes and lock state of one good kind.
//!
//! [`GoodMetadata`] never leaves the market that owns it: traders observe
//! it only through offer acceptance, quotes and price drift. Its transitions
//! are crate-internal and are driven exclusively by the owning market.

use crate::domain::errors::{MarketError, MarketResult};
use crate::domain::services::PricePolicy;
use crate::domain::value_objects::{
    ArithmeticResult, GoodKind, LockState, LockTicket, Price, TradeSide,
};
use serde::{Deserialize, Serialize};

/// Quotes and lock state of one good kind in one market.
///
/// # Invariants
///
/// - EUR quotes are exactly 1 and never change
/// - the lock moves only along `Free → Locked* → Free`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodMetadata {
    kind: GoodKind,
    buy_price: Price,
    sell_price: Price,
    lock: LockState,
}

impl GoodMetadata {
    /// Creates free metadata with the given unit quotes.
    ///
    /// EUR ignores the supplied quotes and is pinned at 1.
    #[must_use]
    pub fn new(kind: GoodKind, buy_price: Price, sell_price: Price) -> Self {
        let (buy_price, sell_price) = if kind.is_default() {
            (Price::ONE, Price::ONE)
        } else {
            (buy_price, sell_price)
        };
        Self {
            kind,
            buy_price,
            sell_price,
            lock: LockState::Free,
        }
    }

    /// Returns the kind this metadata describes.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> GoodKind {
        self.kind
    }

    /// Returns the unit price at which the market sells to traders.
    #[inline]
    #[must_use]
    pub const fn buy_price(&self) -> Price {
        self.buy_price
    }

    /// Returns the unit price at which the market buys from traders.
    #[inline]
    #[must_use]
    pub const fn sell_price(&self) -> Price {
        self.sell_price
    }

    /// Returns the current lock state.
    #[inline]
    #[must_use]
    pub const fn lock(&self) -> &LockState {
        &self.lock
    }

    fn transition_to(&mut self, target: LockState) -> MarketResult<()> {
        if !self.lock.can_transition_to(&target) {
            return Err(match target {
                LockState::Free => MarketError::general(format!(
                    "{} has no outstanding lock to release",
                    self.kind
                )),
                LockState::LockedForBuy(_) | LockState::LockedForSell(_) => {
                    MarketError::LockedGood(self.kind)
                }
            });
        }
        self.lock = target;
        Ok(())
    }

    /// Reserves the good for a buy.
    pub(crate) fn lock_for_buy(&mut self, ticket: LockTicket) -> MarketResult<()> {
        self.transition_to(LockState::LockedForBuy(ticket))
    }

    /// Reserves the good for a sell.
    pub(crate) fn lock_for_sell(&mut self, ticket: LockTicket) -> MarketResult<()> {
        self.transition_to(LockState::LockedForSell(ticket))
    }

    /// Releases the outstanding lock, returning its side and ticket.
    pub(crate) fn unlock(&mut self) -> MarketResult<(TradeSide, LockTicket)> {
        let released = match self.lock {
            LockState::Free => None,
            LockState::LockedForBuy(ticket) => Some((TradeSide::Buy, ticket)),
            LockState::LockedForSell(ticket) => Some((TradeSide::Sell, ticket)),
        };
        self.transition_to(LockState::Free)?;
        released.ok_or_else(|| MarketError::general("released a free good"))
    }

    /// Releases the lock if it outlived `window` operations at tick `now`.
    pub(crate) fn expire_if_due(
        &mut self,
        now: u64,
        window: u64,
    ) -> Option<(TradeSide, LockTicket)> {
        let due = self
            .lock
            .ticket()
            .is_some_and(|ticket| ticket.is_expired(now, window));
        if due { self.unlock().ok() } else { None }
    }

    /// Applies the post-buy price increase. EUR is exempt.
    pub(crate) fn adjust_price_after_buy(&mut self, policy: &PricePolicy) -> ArithmeticResult<()> {
        if self.kind.is_default() {
            return Ok(());
        }
        let buy_price = policy.raised(self.buy_price)?;
        let sell_price = policy.raised(self.sell_price)?;
        self.buy_price = buy_price;
        self.sell_price = sell_price;
        Ok(())
    }

    /// Applies the post-sell price decrease. EUR is exempt.
    pub(crate) fn adjust_price_after_sell(
        &mut self,
        policy: &PricePolicy,
    ) -> ArithmeticResult<()> {
        if self.kind.is_default() {
            return Ok(());
        }
        let buy_price = policy.lowered(self.buy_price)?;
        let sell_price = policy.lowered(self.sell_price)?;
        self.buy_price = buy_price;
        self.sell_price = sell_price;
        Ok(())
    }
}
