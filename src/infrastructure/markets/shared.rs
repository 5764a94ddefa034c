//! # Shared Market
//!
//! Thread-safe handle letting several in-process traders use one market.
//!
//! Each call holds a `parking_lot` mutex for its duration; the per-kind lock
//! state then serialises whole lock/commit pairs between traders.

use crate::domain::entities::{Good, GoodSnapshot};
use crate::domain::errors::MarketResult;
use crate::domain::value_objects::{GoodKind, LockId, Price, Quantity};
use crate::infrastructure::markets::traits::Market;
use parking_lot::{Mutex, MutexGuard};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Cloneable, thread-safe wrapper around any [`Market`].
///
/// # Examples
///
/// ```
/// use market_protocol::domain::value_objects::ProtocolConstants;
/// use market_protocol::infrastructure::markets::{ExchangeMarket, Market, SharedMarket};
///
/// let market = ExchangeMarket::debug("bazaar", ProtocolConstants::default()).unwrap();
/// let shared = SharedMarket::new(market);
///
/// let mut handle = shared.clone();
/// std::thread::spawn(move || handle.list_goods().len())
///     .join()
///     .unwrap();
/// assert_eq!(shared.name(), "bazaar");
/// ```
#[derive(Debug, Clone)]
pub struct SharedMarket {
    name: Arc<str>,
    lock_validity_window: u64,
    inner: Arc<Mutex<Box<dyn Market>>>,
}

impl SharedMarket {
    /// Wraps a market.
    #[must_use]
    pub fn new(market: impl Market + 'static) -> Self {
        Self::from_boxed(Box::new(market))
    }

    /// Wraps an already boxed market.
    #[must_use]
    pub fn from_boxed(market: Box<dyn Market>) -> Self {
        Self {
            name: Arc::from(market.name()),
            lock_validity_window: market.lock_validity_window(),
            inner: Arc::new(Mutex::new(market)),
        }
    }

    /// Locks the market for a sequence of calls without interleaving.
    pub fn guard(&self) -> MutexGuard<'_, Box<dyn Market>> {
        self.inner.lock()
    }
}

impl Market for SharedMarket {
    fn name(&self) -> &str {
        &self.name
    }

    fn lock_validity_window(&self) -> u64 {
        self.lock_validity_window
    }

    fn budget(&mut self) -> GoodSnapshot {
        self.inner.lock().budget()
    }

    fn list_goods(&mut self) -> Vec<GoodSnapshot> {
        self.inner.lock().list_goods()
    }

    fn buy_quote(&mut self, kind: GoodKind, quantity: Quantity) -> MarketResult<Decimal> {
        self.inner.lock().buy_quote(kind, quantity)
    }

    fn sell_quote(&mut self, kind: GoodKind, quantity: Quantity) -> MarketResult<Decimal> {
        self.inner.lock().sell_quote(kind, quantity)
    }

    fn lock_buy_offer(
        &mut self,
        kind: GoodKind,
        quantity: Quantity,
        price: Price,
        justification: &str,
    ) -> MarketResult<LockId> {
        self.inner
            .lock()
            .lock_buy_offer(kind, quantity, price, justification)
    }

    fn buy(&mut self, token: LockId, cash: &mut Good) -> MarketResult<Good> {
        self.inner.lock().buy(token, cash)
    }

    fn lock_sell_offer(
        &mut self,
        kind: GoodKind,
        quantity: Quantity,
        price: Price,
    ) -> MarketResult<LockId> {
        self.inner.lock().lock_sell_offer(kind, quantity, price)
    }

    fn sell(&mut self, token: LockId, good: &mut Good) -> MarketResult<Good> {
        self.inner.lock().sell(token, good)
    }
}
