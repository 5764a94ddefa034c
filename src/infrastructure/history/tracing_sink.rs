//! Sink that turns every record into a structured `tracing` event.

use crate::domain::events::{DomainEvent, TransactionOutcome, TransactionRecord};
use crate::infrastructure::history::traits::TransactionSink;
use tracing::{debug, info, warn};

/// Emits one `tracing` event per record.
///
/// Completed settlements log at `info`, rejections at `warn` and expiries
/// at `debug`. Every line carries the event name, type and Unix-millis
/// stamp so log output can be joined with the JSON-lines history.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTransactionSink;

impl TracingTransactionSink {
    /// Creates the sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TransactionSink for TracingTransactionSink {
    fn record(&self, record: &TransactionRecord) {
        let event: &dyn DomainEvent = record;
        let kind = record.kind.map(|kind| kind.to_string()).unwrap_or_default();
        let quantity = record.quantity.map(|q| q.to_string()).unwrap_or_default();
        let price = record.price.map(|p| p.to_string()).unwrap_or_default();

        match &record.outcome {
            TransactionOutcome::Completed => info!(
                event = event.event_name(),
                event_type = %event.event_type(),
                event_id = %event.event_id(),
                at_ms = event.timestamp().timestamp_millis(),
                market = event.market(),
                side = %record.side,
                kind = %kind,
                quantity = %quantity,
                price = %price,
                "transaction completed"
            ),
            TransactionOutcome::Rejected { reason } => warn!(
                event = event.event_name(),
                event_type = %event.event_type(),
                event_id = %event.event_id(),
                at_ms = event.timestamp().timestamp_millis(),
                market = event.market(),
                side = %record.side,
                kind = %kind,
                reason = %reason,
                "transaction rejected"
            ),
            TransactionOutcome::Expired => debug!(
                event = event.event_name(),
                event_type = %event.event_type(),
                event_id = %event.event_id(),
                at_ms = event.timestamp().timestamp_millis(),
                market = event.market(),
                side = %record.side,
                kind = %kind,
                quantity = %quantity,
                "lock expired"
            ),
        }
    }
}
