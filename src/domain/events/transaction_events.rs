//! # Transaction Events
//!
//! Records of settlement attempts and lock expiries.
//!
//! Every `buy`/`sell` a market receives, successful or not, and every lock
//! that expires produces one [`TransactionRecord`]. Records are the only
//! thing the history/visualizer collaborator sees; how they are rendered is
//! its own concern.
//!
//! # Examples
//!
//! ```
//! use market_protocol::domain::events::{TransactionOutcome, TransactionRecord};
//! use market_protocol::domain::value_objects::{GoodKind, Price, Quantity, TradeSide};
//! use rust_decimal::Decimal;
//!
//! let record = TransactionRecord::completed(
//!     "bazaar",
//!     TradeSide::Buy,
//!     GoodKind::Usd,
//!     Quantity::from_units(100),
//!     Price::new(Decimal::new(110, 0)).unwrap(),
//! );
//! assert_eq!(record.outcome, TransactionOutcome::Completed);
//! assert!(record.to_json_line().unwrap().contains("\"USD\""));
//! ```

use crate::domain::events::domain_event::{DomainEvent, EventMetadata, EventType};
use crate::domain::value_objects::{EventId, GoodKind, Price, Quantity, Timestamp, TradeSide};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a settlement attempt ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionOutcome {
    /// Goods changed hands.
    Completed,
    /// The market refused the commit; nothing changed hands.
    Rejected {
        /// Human-readable rejection reason.
        reason: String,
    },
    /// The lock ran out of validity before being committed.
    Expired,
}

impl TransactionOutcome {
    /// Returns true for completed transactions.
    #[inline]
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for TransactionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "COMPLETED"),
            Self::Rejected { reason } => write!(f, "REJECTED({reason})"),
            Self::Expired => write!(f, "EXPIRED"),
        }
    }
}

/// One settlement attempt or expiry in one market.
///
/// `kind`, `quantity` and `price` are absent only when a commit presented a
/// token that matched no lock, so the market cannot tell what it was for.
/// `price` is the total EUR of the lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TransactionRecord {
    /// Event metadata.
    #[serde(flatten)]
    pub metadata: EventMetadata,
    /// Name of the market.
    pub market: String,
    /// Side, from the trader's point of view.
    pub side: TradeSide,
    /// Kind of the good traded.
    pub kind: Option<GoodKind>,
    /// Quantity of the good.
    pub quantity: Option<Quantity>,
    /// Total EUR of the lock.
    pub price: Option<Price>,
    /// Outcome.
    pub outcome: TransactionOutcome,
}

impl TransactionRecord {
    /// Creates a record for a lock that the market knows about.
    #[must_use]
    pub fn new(
        market: impl Into<String>,
        side: TradeSide,
        kind: GoodKind,
        quantity: Quantity,
        price: Price,
        outcome: TransactionOutcome,
    ) -> Self {
        Self {
            metadata: EventMetadata::new(),
            market: market.into(),
            side,
            kind: Some(kind),
            quantity: Some(quantity),
            price: Some(price),
            outcome,
        }
    }

    /// Creates a completed-settlement record.
    #[must_use]
    pub fn completed(
        market: impl Into<String>,
        side: TradeSide,
        kind: GoodKind,
        quantity: Quantity,
        price: Price,
    ) -> Self {
        Self::new(market, side, kind, quantity, price, TransactionOutcome::Completed)
    }

    /// Creates a record for a commit whose token matched no lock.
    #[must_use]
    pub fn unmatched(market: impl Into<String>, side: TradeSide, reason: impl Into<String>) -> Self {
        Self {
            metadata: EventMetadata::new(),
            market: market.into(),
            side,
            kind: None,
            quantity: None,
            price: None,
            outcome: TransactionOutcome::Rejected {
                reason: reason.into(),
            },
        }
    }

    /// Serialises the record as one line of JSON.
    ///
    /// # Errors
    ///
    /// Returns the serialisation error, if any.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl DomainEvent for TransactionRecord {
    fn event_id(&self) -> EventId {
        self.metadata.event_id
    }

    fn market(&self) -> &str {
        &self.market
    }

    fn timestamp(&self) -> Timestamp {
        self.metadata.timestamp
    }

    fn event_type(&self) -> EventType {
        match self.outcome {
            TransactionOutcome::Expired => EventType::Expiry,
            TransactionOutcome::Completed | TransactionOutcome::Rejected { .. } => {
                EventType::Settlement
            }
        }
    }

    fn event_name(&self) -> &'static str {
        match (&self.outcome, self.side) {
            (TransactionOutcome::Completed, TradeSide::Buy) => "BuyCompleted",
            (TransactionOutcome::Completed, TradeSide::Sell) => "SellCompleted",
            (TransactionOutcome::Rejected { .. }, TradeSide::Buy) => "BuyRejected",
            (TransactionOutcome::Rejected { .. }, TradeSide::Sell) => "SellRejected",
            (TransactionOutcome::Expired, _) => "LockExpired",
        }
    }
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} {}", self.metadata.timestamp, self.market, self.side)?;
        if let (Some(quantity), Some(kind), Some(price)) = (self.quantity, self.kind, self.price) {
            write!(f, " {quantity} {kind} for {price} EUR")?;
        }
        write!(f, ": {}", self.outcome)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(outcome: TransactionOutcome) -> TransactionRecord {
        TransactionRecord::new(
            "bazaar",
            TradeSide::Sell,
            GoodKind::Yen,
            Quantity::from_units(500),
            Price::new(dec!(3.2)).unwrap(),
            outcome,
        )
    }

    #[test]
    fn event_classification() {
        let done = record(TransactionOutcome::Completed);
        assert_eq!(done.event_type(), EventType::Settlement);
        assert_eq!(done.event_name(), "SellCompleted");

        let expired = record(TransactionOutcome::Expired);
        assert_eq!(expired.event_type(), EventType::Expiry);
        assert_eq!(expired.event_name(), "LockExpired");
        assert_eq!(expired.market(), "bazaar");
    }

    #[test]
    fn unmatched_has_no_terms() {
        let rec = TransactionRecord::unmatched("bazaar", TradeSide::Buy, "no live lock");
        assert!(rec.kind.is_none());
        assert_eq!(rec.event_name(), "BuyRejected");
        assert!(rec.to_string().ends_with("REJECTED(no live lock)"));
    }

    #[test]
    fn display_includes_terms() {
        let rec = record(TransactionOutcome::Completed);
        assert!(rec.to_string().contains("SELL 500 YEN for 3.2 EUR: COMPLETED"));
    }

    #[test]
    fn json_line_roundtrip() {
        let rec = record(TransactionOutcome::Rejected {
            reason: "quantity mismatch".to_string(),
        });
        let line = rec.to_json_line().unwrap();
        assert!(!line.contains('\n'));
        assert!(line.contains("\"status\":\"REJECTED\""));
        let back: TransactionRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(rec, back);
    }
}
