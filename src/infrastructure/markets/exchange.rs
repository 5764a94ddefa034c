//! # Exchange Market
//!
//! In-process [`Market`] holding one good and one metadata record per kind.
//!
//! The market keeps a logical operation clock. Every trader-facing call
//! advances it by one and then sweeps expired locks back to free, so a
//! trader that locks and walks away can block a kind for at most
//! `lock_validity_window` operations.
//!
//! # Examples
//!
//! ```
//! use market_protocol::domain::entities::Good;
//! use market_protocol::domain::value_objects::{GoodKind, Price, ProtocolConstants, Quantity};
//! use market_protocol::infrastructure::markets::{ExchangeMarket, Market};
//! use rust_decimal::Decimal;
//!
//! let mut market = ExchangeMarket::debug("bazaar", ProtocolConstants::default()).unwrap();
//! let minimum = market.sell_quote(GoodKind::Usd, Quantity::from_units(50)).unwrap();
//!
//! let token = market
//!     .lock_sell_offer(GoodKind::Usd, Quantity::from_units(50), Price::new(minimum).unwrap())
//!     .unwrap();
//! let mut dollars = Good::with_quantity(GoodKind::Usd, Quantity::from_units(50));
//! let euros = market.sell(token, &mut dollars).unwrap();
//!
//! assert_eq!(euros.quantity().get(), minimum);
//! assert!(dollars.is_empty());
//! ```

use crate::domain::entities::{Good, GoodMetadata, GoodSnapshot};
use crate::domain::errors::{GoodError, GoodResult, MarketError, MarketResult};
use crate::domain::events::{TransactionOutcome, TransactionRecord};
use crate::domain::services::PricePolicy;
use crate::domain::value_objects::{
    CheckedArithmetic, GoodKind, LockId, LockState, LockTicket, Price, ProtocolConstants,
    Quantity, TradeSide,
};
use crate::infrastructure::history::TransactionSink;
use crate::infrastructure::markets::builder::MarketBuilder;
use crate::infrastructure::markets::traits::Market;
use rand::Rng;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reference unit quotes (buy, sell) in EUR used by the debug allocation.
#[must_use]
pub const fn reference_quotes(kind: GoodKind) -> (Decimal, Decimal) {
    match kind {
        GoodKind::Eur => (Decimal::ONE, Decimal::ONE),
        GoodKind::Usd => (
            Decimal::from_parts(105, 0, 0, false, 2),
            Decimal::from_parts(95, 0, 0, false, 2),
        ),
        GoodKind::Yen => (
            Decimal::from_parts(70, 0, 0, false, 4),
            Decimal::from_parts(65, 0, 0, false, 4),
        ),
        GoodKind::Yuan => (
            Decimal::from_parts(14, 0, 0, false, 2),
            Decimal::from_parts(13, 0, 0, false, 2),
        ),
    }
}

/// Stock and metadata of one kind.
#[derive(Debug)]
pub(crate) struct Holding {
    pub(crate) good: Good,
    pub(crate) metadata: GoodMetadata,
}

/// A market running the locked buy/sell protocol in process.
///
/// Build one with [`MarketBuilder`], [`ExchangeMarket::debug`] or
/// [`ExchangeMarket::randomized`].
#[derive(Debug)]
pub struct ExchangeMarket {
    name: String,
    constants: ProtocolConstants,
    policy: PricePolicy,
    holdings: BTreeMap<GoodKind, Holding>,
    clock: u64,
    sink: Option<Arc<dyn TransactionSink>>,
}

impl ExchangeMarket {
    pub(crate) fn from_parts(
        name: String,
        constants: ProtocolConstants,
        holdings: BTreeMap<GoodKind, Holding>,
        sink: Option<Arc<dyn TransactionSink>>,
    ) -> Self {
        Self {
            name,
            policy: PricePolicy::from_constants(&constants),
            constants,
            holdings,
            clock: 0,
            sink,
        }
    }

    /// Creates a market with the fixed debug allocation.
    ///
    /// Every kind holds `starting_quantity`; quotes are EUR 1/1,
    /// USD 1.05/0.95, YEN 0.0070/0.0065 and YUAN 0.14/0.13 EUR per unit.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::General` if `name` is blank or `constants` are
    /// invalid.
    pub fn debug(name: impl Into<String>, constants: ProtocolConstants) -> MarketResult<Self> {
        let start = constants.starting_quantity();
        let mut builder = MarketBuilder::new(name).constants(constants);
        for kind in GoodKind::ALL {
            let (buy, sell) = reference_quotes(kind);
            builder = builder.good(kind, start, Price::new(buy)?, Price::new(sell)?);
        }
        builder.build()
    }

    /// Creates a market with a random allocation.
    ///
    /// Each quantity is drawn in `[starting/2, starting*2]`; non-EUR quotes
    /// are the debug quotes jittered by up to ±10%.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::General` if `name` is blank, `constants` are
    /// invalid, or a drawn value overflows.
    pub fn randomized<R: Rng + ?Sized>(
        name: impl Into<String>,
        constants: ProtocolConstants,
        rng: &mut R,
    ) -> MarketResult<Self> {
        let start = constants.starting_quantity().get();
        let mut builder = MarketBuilder::new(name).constants(constants);
        for kind in GoodKind::ALL {
            let percent = Decimal::from(rng.random_range(50u32..=200));
            let quantity = Quantity::new(start.safe_mul(percent)?.safe_div(Decimal::ONE_HUNDRED)?)?;
            let jitter = Decimal::from(rng.random_range(90u32..=110)).safe_div(Decimal::ONE_HUNDRED)?;
            let (buy, sell) = reference_quotes(kind);
            builder = builder.good(
                kind,
                quantity,
                Price::new(buy.safe_mul(jitter)?)?,
                Price::new(sell.safe_mul(jitter)?)?,
            );
        }
        builder.build()
    }

    /// Attaches a transaction sink, replacing any previous one.
    pub fn attach_sink(&mut self, sink: Arc<dyn TransactionSink>) {
        self.sink = Some(sink);
    }

    /// Returns the constants this market runs with.
    #[inline]
    #[must_use]
    pub const fn constants(&self) -> &ProtocolConstants {
        &self.constants
    }

    /// Returns the number of trader-facing operations served so far.
    #[inline]
    #[must_use]
    pub const fn clock(&self) -> u64 {
        self.clock
    }

    /// Returns the metadata of `kind` without counting as an operation.
    ///
    /// Operator and test inspection only; traders go through [`Market`].
    #[must_use]
    pub fn metadata(&self, kind: GoodKind) -> Option<&GoodMetadata> {
        self.holdings.get(&kind).map(|holding| &holding.metadata)
    }

    fn tick(&mut self) {
        self.clock = self.clock.saturating_add(1);
        self.sweep_expired();
    }

    fn sweep_expired(&mut self) {
        let now = self.clock;
        let window = self.constants.lock_validity_window();
        let expired: Vec<_> = self
            .holdings
            .iter_mut()
            .filter_map(|(kind, holding)| {
                holding
                    .metadata
                    .expire_if_due(now, window)
                    .map(|(side, ticket)| (*kind, side, ticket))
            })
            .collect();

        for (kind, side, ticket) in expired {
            debug!(
                market = %self.name,
                kind = %kind,
                side = %side,
                lock_id = %ticket.id(),
                issued_at = ticket.issued_at(),
                now,
                "lock expired"
            );
            self.emit(TransactionRecord::new(
                self.name.as_str(),
                side,
                kind,
                ticket.quantity(),
                ticket.price(),
                TransactionOutcome::Expired,
            ));
        }
    }

    fn emit(&self, record: TransactionRecord) {
        if let Some(sink) = &self.sink {
            sink.record(&record);
        }
    }

    fn holding(&self, kind: GoodKind) -> MarketResult<&Holding> {
        self.holdings
            .get(&kind)
            .ok_or(MarketError::NonExistentGood(kind))
    }

    fn holding_mut(&mut self, kind: GoodKind) -> MarketResult<&mut Holding> {
        self.holdings
            .get_mut(&kind)
            .ok_or(MarketError::NonExistentGood(kind))
    }

    fn eur_reserve(&self) -> Quantity {
        self.holdings
            .get(&GoodKind::Eur)
            .map_or(Quantity::ZERO, |holding| holding.good.quantity())
    }

    /// EUR not promised to an outstanding sell payout or EUR buy lock.
    fn uncommitted_eur(&self) -> MarketResult<Decimal> {
        let mut committed = Decimal::ZERO;
        for (kind, holding) in &self.holdings {
            match holding.metadata.lock() {
                LockState::LockedForSell(ticket) => {
                    committed = committed.safe_add(ticket.price().get())?;
                }
                LockState::LockedForBuy(ticket) if kind.is_default() => {
                    committed = committed.safe_add(ticket.quantity().get())?;
                }
                LockState::LockedForBuy(_) | LockState::Free => {}
            }
        }
        Ok(self
            .eur_reserve()
            .get()
            .safe_sub(committed)?
            .max(Decimal::ZERO))
    }

    fn find_lock(&self, side: TradeSide, token: LockId) -> Option<(GoodKind, LockTicket)> {
        self.holdings.iter().find_map(|(kind, holding)| {
            let lock = holding.metadata.lock();
            let ticket = match side {
                TradeSide::Buy => lock.buy_ticket(token),
                TradeSide::Sell => lock.sell_ticket(token),
            };
            ticket.map(|ticket| (*kind, *ticket))
        })
    }

    fn check_lockable(&self, kind: GoodKind, quantity: Quantity) -> MarketResult<&Holding> {
        let holding = self.holding(kind)?;
        if quantity.is_zero() {
            return Err(MarketError::general(format!(
                "cannot lock a zero quantity of {kind}"
            )));
        }
        if !holding.metadata.lock().is_free() {
            return Err(MarketError::LockedGood(kind));
        }
        Ok(holding)
    }

    fn try_lock_buy(
        &mut self,
        kind: GoodKind,
        quantity: Quantity,
        price: Price,
    ) -> MarketResult<LockTicket> {
        let holding = self.check_lockable(kind, quantity)?;
        let available = if kind.is_default() {
            Quantity::new(self.uncommitted_eur()?)?
        } else {
            holding.good.quantity()
        };
        if quantity > available {
            return Err(MarketError::InsufficientGoodQuantity {
                kind,
                requested: quantity,
                available,
            });
        }
        let minimum = self
            .policy
            .min_buy_offer(kind, holding.metadata.buy_price(), quantity)?;
        check_offer(kind, price, minimum)?;

        let ticket = LockTicket::new(LockId::new_v4(), quantity, price, self.clock);
        self.holding_mut(kind)?.metadata.lock_for_buy(ticket)?;
        Ok(ticket)
    }

    fn try_lock_sell(
        &mut self,
        kind: GoodKind,
        quantity: Quantity,
        price: Price,
    ) -> MarketResult<LockTicket> {
        let holding = self.check_lockable(kind, quantity)?;
        let available = self.uncommitted_eur()?;
        if price.get() > available {
            return Err(MarketError::InsufficientDefaultGoodQuantity {
                required: price.get(),
                available,
            });
        }
        let minimum = self
            .policy
            .min_sell_offer(kind, holding.metadata.sell_price(), quantity)?;
        check_offer(kind, price, minimum)?;

        let ticket = LockTicket::new(LockId::new_v4(), quantity, price, self.clock);
        self.holding_mut(kind)?.metadata.lock_for_sell(ticket)?;
        Ok(ticket)
    }

    fn settle_buy(
        &mut self,
        kind: GoodKind,
        ticket: LockTicket,
        cash: &mut Good,
    ) -> MarketResult<Good> {
        if !cash.is_default() {
            return Err(GoodError::DifferentKindsOfGood {
                expected: GoodKind::Eur,
                found: cash.kind(),
            }
            .into());
        }
        let required = ticket.price().get();
        if cash.quantity().get() < required {
            return Err(MarketError::InsufficientDefaultGoodQuantity {
                required,
                available: cash.quantity().get(),
            });
        }
        let holding = self.holding(kind)?;
        if holding.good.quantity() < ticket.quantity() {
            return Err(MarketError::InsufficientGoodQuantity {
                kind,
                requested: ticket.quantity(),
                available: holding.good.quantity(),
            });
        }

        let mut metadata = holding.metadata.clone();
        metadata.unlock()?;
        metadata.adjust_price_after_buy(&self.policy)?;

        self.holding_mut(GoodKind::Eur)?.good.merge(cash)?;
        let holding = self.holding_mut(kind)?;
        let bought = take(&mut holding.good, ticket.quantity())?;
        holding.metadata = metadata;
        Ok(bought)
    }

    fn settle_sell(
        &mut self,
        kind: GoodKind,
        ticket: LockTicket,
        good: &mut Good,
    ) -> MarketResult<Good> {
        if good.kind() != kind || good.quantity() != ticket.quantity() {
            let delivered = if good.kind() == kind {
                good.quantity()
            } else {
                Quantity::ZERO
            };
            return Err(MarketError::InsufficientGoodQuantity {
                kind,
                requested: ticket.quantity(),
                available: delivered,
            });
        }
        let payout = Quantity::new(ticket.price().get())?;
        let reserve = self.eur_reserve();
        if reserve < payout {
            return Err(MarketError::InsufficientDefaultGoodQuantity {
                required: payout.get(),
                available: reserve.get(),
            });
        }

        let mut metadata = self.holding(kind)?.metadata.clone();
        metadata.unlock()?;
        metadata.adjust_price_after_sell(&self.policy)?;

        self.holding_mut(kind)?.good.merge(good)?;
        let paid = take(&mut self.holding_mut(GoodKind::Eur)?.good, payout)?;
        self.holding_mut(kind)?.metadata = metadata;
        Ok(paid)
    }

    fn commit<F>(&mut self, side: TradeSide, token: LockId, settle: F) -> MarketResult<Good>
    where
        F: FnOnce(&mut Self, GoodKind, LockTicket) -> MarketResult<Good>,
    {
        self.tick();
        let Some((kind, ticket)) = self.find_lock(side, token) else {
            let err = MarketError::GoodNotLocked(token);
            warn!(market = %self.name, side = %side, lock_id = %token, "commit without live lock");
            self.emit(TransactionRecord::unmatched(
                self.name.as_str(),
                side,
                err.to_string(),
            ));
            return Err(err);
        };

        let result = settle(self, kind, ticket);
        let outcome = match &result {
            Ok(_) => {
                info!(
                    market = %self.name,
                    side = %side,
                    kind = %kind,
                    quantity = %ticket.quantity(),
                    price = %ticket.price(),
                    lock_id = %token,
                    "settlement completed"
                );
                TransactionOutcome::Completed
            }
            Err(err) => {
                warn!(
                    market = %self.name,
                    side = %side,
                    kind = %kind,
                    lock_id = %token,
                    error = %err,
                    "settlement rejected"
                );
                TransactionOutcome::Rejected {
                    reason: err.to_string(),
                }
            }
        };
        self.emit(TransactionRecord::new(
            self.name.as_str(),
            side,
            kind,
            ticket.quantity(),
            ticket.price(),
            outcome,
        ));
        result
    }
}

/// Rejects offers below `minimum`; EUR offers must match it exactly.
fn check_offer(kind: GoodKind, price: Price, minimum: Decimal) -> MarketResult<()> {
    let offered = price.get();
    if offered < minimum {
        return Err(MarketError::OfferTooLow {
            kind,
            offered,
            minimum,
        });
    }
    if kind.is_default() && offered != minimum {
        return Err(MarketError::general(format!(
            "EUR trades at par: offered {offered} for {minimum} EUR"
        )));
    }
    Ok(())
}

/// Moves `quantity` out of `stock`, allowing the whole stock to go.
fn take(stock: &mut Good, quantity: Quantity) -> GoodResult<Good> {
    if stock.quantity() == quantity {
        stock.drain()
    } else {
        stock.split(quantity)
    }
}

impl Market for ExchangeMarket {
    fn name(&self) -> &str {
        &self.name
    }

    fn lock_validity_window(&self) -> u64 {
        self.constants.lock_validity_window()
    }

    fn budget(&mut self) -> GoodSnapshot {
        self.tick();
        GoodSnapshot {
            kind: GoodKind::Eur,
            quantity: self.eur_reserve(),
        }
    }

    fn list_goods(&mut self) -> Vec<GoodSnapshot> {
        self.tick();
        self.holdings
            .values()
            .map(|holding| holding.good.snapshot())
            .collect()
    }

    fn buy_quote(&mut self, kind: GoodKind, quantity: Quantity) -> MarketResult<Decimal> {
        self.tick();
        let holding = self.holding(kind)?;
        Ok(self
            .policy
            .min_buy_offer(kind, holding.metadata.buy_price(), quantity)?)
    }

    fn sell_quote(&mut self, kind: GoodKind, quantity: Quantity) -> MarketResult<Decimal> {
        self.tick();
        let holding = self.holding(kind)?;
        Ok(self
            .policy
            .min_sell_offer(kind, holding.metadata.sell_price(), quantity)?)
    }

    fn lock_buy_offer(
        &mut self,
        kind: GoodKind,
        quantity: Quantity,
        price: Price,
        justification: &str,
    ) -> MarketResult<LockId> {
        self.tick();
        match self.try_lock_buy(kind, quantity, price) {
            Ok(ticket) => {
                debug!(
                    market = %self.name,
                    kind = %kind,
                    quantity = %quantity,
                    price = %price,
                    lock_id = %ticket.id(),
                    justification,
                    "buy lock granted"
                );
                Ok(ticket.id())
            }
            Err(err) => {
                debug!(market = %self.name, kind = %kind, error = %err, "buy lock refused");
                Err(err)
            }
        }
    }

    fn buy(&mut self, token: LockId, cash: &mut Good) -> MarketResult<Good> {
        self.commit(TradeSide::Buy, token, |market, kind, ticket| {
            market.settle_buy(kind, ticket, cash)
        })
    }

    fn lock_sell_offer(
        &mut self,
        kind: GoodKind,
        quantity: Quantity,
        price: Price,
    ) -> MarketResult<LockId> {
        self.tick();
        match self.try_lock_sell(kind, quantity, price) {
            Ok(ticket) => {
                debug!(
                    market = %self.name,
                    kind = %kind,
                    quantity = %quantity,
                    price = %price,
                    lock_id = %ticket.id(),
                    "sell lock granted"
                );
                Ok(ticket.id())
            }
            Err(err) => {
                debug!(market = %self.name, kind = %kind, error = %err, "sell lock refused");
                Err(err)
            }
        }
    }

    fn sell(&mut self, token: LockId, good: &mut Good) -> MarketResult<Good> {
        self.commit(TradeSide::Sell, token, |market, kind, ticket| {
            market.settle_sell(kind, ticket, good)
        })
    }
}
