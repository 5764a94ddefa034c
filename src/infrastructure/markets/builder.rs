//! # Market Builder
//!
//! Fluent construction of an [`ExchangeMarket`] with an explicit allocation.
//!
//! # Examples
//!
//! ```
//! use market_protocol::domain::value_objects::{GoodKind, Price, Quantity};
//! use market_protocol::infrastructure::markets::{Market, MarketBuilder};
//! use rust_decimal::Decimal;
//!
//! let mut market = MarketBuilder::new("corner-shop")
//!     .cash(Quantity::from_units(500))
//!     .good(
//!         GoodKind::Yuan,
//!         Quantity::from_units(2000),
//!         Price::new(Decimal::new(15, 2)).unwrap(),
//!         Price::new(Decimal::new(12, 2)).unwrap(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(market.list_goods().len(), 2);
//! ```

use crate::domain::entities::{Good, GoodMetadata};
use crate::domain::errors::{MarketError, MarketResult};
use crate::domain::value_objects::{GoodKind, Price, ProtocolConstants, Quantity};
use crate::infrastructure::history::TransactionSink;
use crate::infrastructure::markets::exchange::{ExchangeMarket, Holding};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Builder for [`ExchangeMarket`].
///
/// The market must hold EUR; adding a kind twice keeps the last allocation.
#[derive(Debug)]
pub struct MarketBuilder {
    name: String,
    constants: ProtocolConstants,
    allocation: BTreeMap<GoodKind, (Quantity, Price, Price)>,
    sink: Option<Arc<dyn TransactionSink>>,
}

impl MarketBuilder {
    /// Creates a builder for a market called `name` with default constants.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constants: ProtocolConstants::default(),
            allocation: BTreeMap::new(),
            sink: None,
        }
    }

    /// Sets the protocol constants.
    #[must_use]
    pub fn constants(mut self, constants: ProtocolConstants) -> Self {
        self.constants = constants;
        self
    }

    /// Sets the EUR reserve.
    #[must_use]
    pub fn cash(self, quantity: Quantity) -> Self {
        self.good(GoodKind::Eur, quantity, Price::ONE, Price::ONE)
    }

    /// Adds a kind with its stock and unit quotes.
    ///
    /// Quotes given for EUR are ignored.
    #[must_use]
    pub fn good(
        mut self,
        kind: GoodKind,
        quantity: Quantity,
        buy_price: Price,
        sell_price: Price,
    ) -> Self {
        self.allocation.insert(kind, (quantity, buy_price, sell_price));
        self
    }

    /// Attaches a transaction sink.
    #[must_use]
    pub fn sink(mut self, sink: Arc<dyn TransactionSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Builds the market.
    ///
    /// # Errors
    ///
    /// Returns `MarketError::General` if the name is blank, the constants
    /// are invalid, or no EUR reserve was allocated.
    pub fn build(self) -> MarketResult<ExchangeMarket> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(MarketError::general("market name cannot be blank"));
        }
        self.constants
            .validate()
            .map_err(|err| MarketError::general(format!("invalid protocol constants: {err}")))?;
        if !self.allocation.contains_key(&GoodKind::Eur) {
            return Err(MarketError::general(format!(
                "market {name} must hold a EUR reserve"
            )));
        }

        let holdings: BTreeMap<GoodKind, Holding> = self
            .allocation
            .into_iter()
            .map(|(kind, (quantity, buy_price, sell_price))| {
                let holding = Holding {
                    good: Good::with_quantity(kind, quantity),
                    metadata: GoodMetadata::new(kind, buy_price, sell_price),
                };
                (kind, holding)
            })
            .collect();

        info!(market = %name, kinds = holdings.len(), "market opened");
        Ok(ExchangeMarket::from_parts(
            name,
            self.constants,
            holdings,
            self.sink,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::markets::Market;
    use rust_decimal_macros::dec;

    #[test]
    fn blank_name_is_rejected() {
        let result = MarketBuilder::new("  ").cash(Quantity::from_units(1)).build();
        assert!(matches!(result, Err(MarketError::General(_))));
    }

    #[test]
    fn eur_reserve_is_required() {
        let result = MarketBuilder::new("no-cash")
            .good(
                GoodKind::Usd,
                Quantity::from_units(1),
                Price::new(dec!(1)).unwrap(),
                Price::new(dec!(1)).unwrap(),
            )
            .build();
        assert!(matches!(result, Err(MarketError::General(_))));
    }

    #[test]
    fn eur_quotes_are_pinned() {
        let market = MarketBuilder::new("pinned")
            .good(
                GoodKind::Eur,
                Quantity::from_units(10),
                Price::new(dec!(3)).unwrap(),
                Price::new(dec!(2)).unwrap(),
            )
            .build()
            .unwrap();
        assert_eq!(market.metadata(GoodKind::Eur).unwrap().buy_price(), Price::ONE);
    }

    #[test]
    fn name_is_trimmed_and_last_allocation_wins() {
        let mut market = MarketBuilder::new(" shop ")
            .cash(Quantity::from_units(10))
            .cash(Quantity::from_units(20))
            .build()
            .unwrap();
        assert_eq!(market.name(), "shop");
        assert_eq!(market.budget().quantity, Quantity::from_units(20));
    }
}
