//! What every market event exposes to history collaborators.
//!
//! Sinks only need to know which market produced an event, when, and
//! whether it was a settlement attempt or a lock running out.
//! [`DomainEvent`] is that view; [`EventMetadata`] holds the identity and
//! stamp shared by every record.

use crate::domain::value_objects::{EventId, Timestamp};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a market event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// A `buy` or `sell` commit was presented, accepted or not.
    Settlement,
    /// A lock outlived the validity window and was released.
    Expiry,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Settlement => write!(f, "SETTLEMENT"),
            Self::Expiry => write!(f, "EXPIRY"),
        }
    }
}

/// Read-only view of something that happened in a market.
///
/// Object safe, so sinks can take `&dyn DomainEvent`.
pub trait DomainEvent: Send + Sync + fmt::Debug {
    /// Identity of this event.
    fn event_id(&self) -> EventId;

    /// Market the event happened in.
    fn market(&self) -> &str;

    /// When the market observed it.
    fn timestamp(&self) -> Timestamp;

    /// Settlement or expiry.
    fn event_type(&self) -> EventType;

    /// Short name such as `BuyCompleted` or `LockExpired`.
    fn event_name(&self) -> &'static str;
}

/// Identity and stamp carried by every transaction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EventMetadata {
    /// Fresh v4 id per record.
    pub event_id: EventId,
    /// Moment the market produced the record.
    pub timestamp: Timestamp,
}

impl EventMetadata {
    /// Stamps a new record now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            event_id: EventId::new_v4(),
            timestamp: Timestamp::now(),
        }
    }
}

impl Default for EventMetadata {
    fn default() -> Self {
        Self::new()
    }
}
