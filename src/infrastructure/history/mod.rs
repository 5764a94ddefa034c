//! # Transaction History
//!
//! Sinks receiving the [`TransactionRecord`](crate::domain::events::TransactionRecord)s
//! markets emit.
//!
//! - [`InMemoryTransactionLog`]: thread-safe, queryable storage
//! - [`TracingTransactionSink`]: structured log events
//! - [`FanOutSink`]: forwards to several sinks

pub mod in_memory;
pub mod tracing_sink;
pub mod traits;

pub use in_memory::InMemoryTransactionLog;
pub use tracing_sink::TracingTransactionSink;
pub use traits::{FanOutSink, TransactionSink};
