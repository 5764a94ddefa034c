//! End-to-end scenarios of the locked buy/sell protocol.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::thread;

use market_protocol::domain::entities::Good;
use market_protocol::domain::errors::{GoodError, MarketError};
use market_protocol::domain::events::TransactionOutcome;
use market_protocol::domain::value_objects::{GoodKind, Price, ProtocolConstants, Quantity};
use market_protocol::infrastructure::history::InMemoryTransactionLog;
use market_protocol::infrastructure::markets::{
    ExchangeMarket, Market, MarketBuilder, SharedMarket,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn units(n: u64) -> Quantity {
    Quantity::from_units(n)
}

fn price(value: Decimal) -> Price {
    Price::new(value).unwrap()
}

fn usd_market(cash: u64) -> ExchangeMarket {
    MarketBuilder::new("usd-desk")
        .cash(units(cash))
        .good(GoodKind::Usd, units(1000), price(dec!(1.05)), price(dec!(0.95)))
        .build()
        .unwrap()
}

fn usd_stock(market: &mut dyn Market) -> Quantity {
    market
        .list_goods()
        .into_iter()
        .find(|snapshot| snapshot.kind == GoodKind::Usd)
        .map(|snapshot| snapshot.quantity)
        .unwrap()
}

#[test]
fn buying_dollars_moves_stock_and_price() {
    let mut market = usd_market(1000);

    let token = market
        .lock_buy_offer(GoodKind::Usd, units(100), price(dec!(110)), "holiday")
        .unwrap();
    let mut cash = Good::with_quantity(GoodKind::Eur, units(110));
    let dollars = market.buy(token, &mut cash).unwrap();

    assert_eq!(dollars.kind(), GoodKind::Usd);
    assert_eq!(dollars.quantity(), units(100));
    assert_eq!(usd_stock(&mut market), units(900));
    let usd = market.metadata(GoodKind::Usd).unwrap();
    assert_eq!(usd.buy_price().get(), dec!(1.071));
    assert!(usd.lock().is_free());
}

#[test]
fn market_without_cash_cannot_lock_a_sell() {
    let mut market = usd_market(40);

    let result = market.lock_sell_offer(GoodKind::Usd, units(50), price(dec!(45)));

    assert!(matches!(
        result,
        Err(MarketError::InsufficientDefaultGoodQuantity { .. })
    ));
    assert!(market.metadata(GoodKind::Usd).unwrap().lock().is_free());
    assert_eq!(market.budget().quantity, units(40));
}

#[test]
fn abandoned_lock_expires_and_frees_the_kind() {
    let mut market = usd_market(1000);
    let window = market.lock_validity_window();

    let token = market
        .lock_buy_offer(GoodKind::Usd, units(10), price(dec!(20)), "walk away")
        .unwrap();
    for _ in 0..=window {
        market.budget();
    }

    let mut cash = Good::with_quantity(GoodKind::Eur, units(20));
    assert_eq!(
        market.buy(token, &mut cash),
        Err(MarketError::GoodNotLocked(token))
    );
    assert_eq!(cash.quantity(), units(20));

    let fresh = market
        .lock_buy_offer(GoodKind::Usd, units(10), price(dec!(20)), "retry")
        .unwrap();
    assert!(market.buy(fresh, &mut cash).is_ok());
}

#[test]
fn a_kind_cannot_be_locked_twice() {
    let mut market = ExchangeMarket::debug("bazaar", ProtocolConstants::default()).unwrap();

    market
        .lock_sell_offer(GoodKind::Yen, units(1000), price(dec!(7)))
        .unwrap();

    assert_eq!(
        market.lock_sell_offer(GoodKind::Yen, units(1000), price(dec!(7))),
        Err(MarketError::LockedGood(GoodKind::Yen))
    );
    assert_eq!(
        market.lock_buy_offer(GoodKind::Yen, units(10), price(dec!(1)), ""),
        Err(MarketError::LockedGood(GoodKind::Yen))
    );
    assert!(market
        .lock_buy_offer(GoodKind::Usd, units(10), price(dec!(20)), "")
        .is_ok());
}

#[test]
fn euro_trades_one_to_one() {
    let mut market = ExchangeMarket::debug("bazaar", ProtocolConstants::default()).unwrap();

    assert_eq!(market.buy_quote(GoodKind::Eur, units(25)).unwrap(), dec!(25));
    assert_eq!(market.sell_quote(GoodKind::Eur, units(25)).unwrap(), dec!(25));

    let token = market
        .lock_buy_offer(GoodKind::Eur, units(25), price(dec!(25)), "")
        .unwrap();
    let mut cash = Good::with_quantity(GoodKind::Eur, units(25));
    let euros = market.buy(token, &mut cash).unwrap();

    assert_eq!(euros.quantity(), units(25));
    let metadata = market.metadata(GoodKind::Eur).unwrap();
    assert_eq!(metadata.buy_price(), Price::ONE);
    assert_eq!(metadata.sell_price(), Price::ONE);
}

#[test]
fn euro_off_par_cannot_drain_cash() {
    let mut market = ExchangeMarket::debug("bazaar", ProtocolConstants::default()).unwrap();
    let cash = market.budget().quantity;

    assert!(matches!(
        market.lock_sell_offer(GoodKind::Eur, units(1), price(dec!(500))),
        Err(MarketError::General(_))
    ));
    assert!(matches!(
        market.lock_buy_offer(GoodKind::Eur, units(10), price(dec!(30)), ""),
        Err(MarketError::General(_))
    ));
    assert!(market.metadata(GoodKind::Eur).unwrap().lock().is_free());
    assert_eq!(market.budget().quantity, cash);
}

#[test]
fn commit_with_wrong_currency_leaves_everything_in_place() {
    let mut market = usd_market(1000);
    let token = market
        .lock_buy_offer(GoodKind::Usd, units(10), price(dec!(20)), "")
        .unwrap();

    let mut dollars = Good::with_quantity(GoodKind::Usd, units(100));
    let err = market.buy(token, &mut dollars).unwrap_err();

    assert!(matches!(
        err,
        MarketError::Good(GoodError::DifferentKindsOfGood { .. })
    ));
    assert_eq!(dollars.quantity(), units(100));
    assert_eq!(market.budget().quantity, units(1000));
    assert!(!market.metadata(GoodKind::Usd).unwrap().lock().is_free());
}

#[test]
fn trader_works_through_the_trait_object() {
    let constants = ProtocolConstants::default();
    let mut markets: Vec<Box<dyn Market>> = vec![
        Box::new(ExchangeMarket::debug("north", constants).unwrap()),
        Box::new(ExchangeMarket::debug("south", constants).unwrap()),
    ];

    let mut wallet = Good::new_default(&constants);
    let mut yuan = Good::empty(GoodKind::Yuan);
    for market in &mut markets {
        let quote = market.buy_quote(GoodKind::Yuan, units(100)).unwrap();
        let token = market
            .lock_buy_offer(GoodKind::Yuan, units(100), price(quote), "diversify")
            .unwrap();
        let mut cash = wallet.split(Quantity::new(quote).unwrap()).unwrap();
        let mut bought = market.buy(token, &mut cash).unwrap();
        yuan.merge(&mut bought).unwrap();
    }

    assert_eq!(yuan.quantity(), units(200));
    assert_eq!(wallet.quantity().get(), dec!(1000) - dec!(14.28) * dec!(2));
}

#[test]
fn history_sees_every_commit_and_expiry() {
    let log = InMemoryTransactionLog::new();
    let mut market = MarketBuilder::new("logged")
        .cash(units(1000))
        .good(GoodKind::Usd, units(1000), price(dec!(1.05)), price(dec!(0.95)))
        .sink(Arc::new(log.clone()))
        .build()
        .unwrap();

    let token = market
        .lock_sell_offer(GoodKind::Usd, units(10), price(dec!(10)))
        .unwrap();
    let mut short = Good::with_quantity(GoodKind::Usd, units(9));
    assert!(market.sell(token, &mut short).is_err());
    let mut exact = Good::with_quantity(GoodKind::Usd, units(10));
    assert!(market.sell(token, &mut exact).is_ok());

    market
        .lock_buy_offer(GoodKind::Usd, units(10), price(dec!(20)), "forgotten")
        .unwrap();
    for _ in 0..=market.lock_validity_window() + 1 {
        market.budget();
    }

    let records = log.for_market("logged");
    assert_eq!(records.len(), 3);
    assert!(matches!(
        records[0].outcome,
        TransactionOutcome::Rejected { .. }
    ));
    assert_eq!(records[1].outcome, TransactionOutcome::Completed);
    assert_eq!(records[2].outcome, TransactionOutcome::Expired);
    assert!(log
        .to_json_lines()
        .unwrap()
        .iter()
        .all(|line| line.contains("\"market\":\"logged\"")));
}

#[test]
fn concurrent_traders_cannot_both_lock_a_kind() {
    let shared = SharedMarket::new(ExchangeMarket::debug("bazaar", ProtocolConstants::default()).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let mut market = shared.clone();
            thread::spawn(move || {
                market
                    .lock_sell_offer(GoodKind::Usd, units(10), price(dec!(9.5)))
                    .is_ok()
            })
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .filter(|won| *won)
        .count();
    assert_eq!(winners, 1);
}
