//! # Domain Events
//!
//! Events emitted by markets for the history/visualizer collaborator.
//!
//! - [`TransactionRecord`]: one settlement attempt or lock expiry
//! - [`TransactionOutcome`]: completed, rejected or expired

pub mod domain_event;
pub mod transaction_events;

pub use domain_event::{DomainEvent, EventMetadata, EventType};
pub use transaction_events::{TransactionOutcome, TransactionRecord};
