//! # In-Memory Transaction Log
//!
//! Thread-safe, queryable [`TransactionSink`] for tests and simulations.

use crate::domain::events::{TransactionOutcome, TransactionRecord};
use crate::domain::value_objects::GoodKind;
use crate::infrastructure::history::traits::TransactionSink;
use parking_lot::RwLock;
use std::sync::Arc;

/// In-memory implementation of [`TransactionSink`].
///
/// Clones share the same storage, so a test can keep one handle while the
/// market owns another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransactionLog {
    storage: Arc<RwLock<Vec<TransactionRecord>>>,
}

impl InMemoryTransactionLog {
    /// Creates a new empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.read().len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every record.
    pub fn clear(&self) {
        self.storage.write().clear();
    }

    /// Returns all records in arrival order.
    #[must_use]
    pub fn all(&self) -> Vec<TransactionRecord> {
        self.storage.read().clone()
    }

    fn filtered(&self, predicate: impl Fn(&TransactionRecord) -> bool) -> Vec<TransactionRecord> {
        self.storage
            .read()
            .iter()
            .filter(|record| predicate(record))
            .cloned()
            .collect()
    }

    /// Returns the records of one market.
    #[must_use]
    pub fn for_market(&self, market: &str) -> Vec<TransactionRecord> {
        self.filtered(|record| record.market == market)
    }

    /// Returns the records concerning one good kind.
    #[must_use]
    pub fn for_kind(&self, kind: GoodKind) -> Vec<TransactionRecord> {
        self.filtered(|record| record.kind == Some(kind))
    }

    /// Returns completed settlements.
    #[must_use]
    pub fn completed(&self) -> Vec<TransactionRecord> {
        self.filtered(|record| record.outcome.is_completed())
    }

    /// Returns rejected commits.
    #[must_use]
    pub fn rejected(&self) -> Vec<TransactionRecord> {
        self.filtered(|record| matches!(record.outcome, TransactionOutcome::Rejected { .. }))
    }

    /// Returns lock expiries.
    #[must_use]
    pub fn expired(&self) -> Vec<TransactionRecord> {
        self.filtered(|record| record.outcome == TransactionOutcome::Expired)
    }

    /// Renders every record as a JSON line.
    ///
    /// # Errors
    ///
    /// Returns the first serialisation error.
    pub fn to_json_lines(&self) -> serde_json::Result<Vec<String>> {
        self.storage
            .read()
            .iter()
            .map(TransactionRecord::to_json_line)
            .collect()
    }
}

impl TransactionSink for InMemoryTransactionLog {
    fn record(&self, record: &TransactionRecord) {
        self.storage.write().push(record.clone());
    }
}
