//! # Transaction Sink Trait
//!
//! Port through which markets hand [`TransactionRecord`]s to the
//! history/visualizer collaborator.
//!
//! Markets hold an optional `Arc<dyn TransactionSink>`; a market without a
//! sink still logs through `tracing` but keeps no history.

use crate::domain::events::TransactionRecord;
use std::fmt;
use std::sync::Arc;

/// Receiver of transaction records.
///
/// Implementations must not fail: recording is a side channel and a broken
/// history must never roll back a settlement.
pub trait TransactionSink: Send + Sync + fmt::Debug {
    /// Accepts one record.
    fn record(&self, record: &TransactionRecord);
}

/// Forwards every record to several sinks, in order.
#[derive(Debug, Default, Clone)]
pub struct FanOutSink {
    sinks: Vec<Arc<dyn TransactionSink>>,
}

impl FanOutSink {
    /// Creates a fan-out with no targets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a target sink.
    #[must_use]
    pub fn with(mut self, sink: Arc<dyn TransactionSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Returns the number of targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Returns true if there are no targets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl TransactionSink for FanOutSink {
    fn record(&self, record: &TransactionRecord) {
        for sink in &self.sinks {
            sink.record(record);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::TradeSide;
    use crate::infrastructure::history::InMemoryTransactionLog;

    #[test]
    fn fan_out_reaches_every_target() {
        let first = InMemoryTransactionLog::new();
        let second = InMemoryTransactionLog::new();
        let fan_out = FanOutSink::new()
            .with(Arc::new(first.clone()))
            .with(Arc::new(second.clone()));
        assert_eq!(fan_out.len(), 2);

        fan_out.record(&TransactionRecord::unmatched("m", TradeSide::Buy, "nope"));

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn empty_fan_out_is_a_no_op() {
        let fan_out = FanOutSink::new();
        assert!(fan_out.is_empty());
        fan_out.record(&TransactionRecord::unmatched("m", TradeSide::Sell, "nope"));
    }
}
