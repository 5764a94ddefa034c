//! # Lock State
//!
//! Per-good lock state machine.
//!
//! This module provides the [`LockState`] enum describing whether a market's
//! good is free or reserved by an outstanding buy or sell offer, and the
//! [`LockTicket`] recording the reserved terms.
//!
//! # State Machine
//!
//! ```text
//! Free → LockedForBuy  → Free
//! Free → LockedForSell → Free
//! ```
//!
//! A locked good always returns to `Free` (commit or expiry) before it can be
//! locked again; there is no direct `LockedForBuy ↔ LockedForSell` edge.
//!
//! # Examples
//!
//! ```
//! use market_protocol::domain::value_objects::lock_state::{LockState, LockTicket};
//! use market_protocol::domain::value_objects::{LockId, Price, Quantity};
//! use rust_decimal::Decimal;
//!
//! let ticket = LockTicket::new(
//!     LockId::new_v4(),
//!     Quantity::from_units(100),
//!     Price::new(Decimal::new(110, 0)).unwrap(),
//!     7,
//! );
//! let locked = LockState::LockedForBuy(ticket);
//! assert!(LockState::Free.can_transition_to(&locked));
//! assert!(!locked.can_transition_to(&LockState::LockedForSell(ticket)));
//! ```

use crate::domain::value_objects::enums::TradeSide;
use crate::domain::value_objects::ids::LockId;
use crate::domain::value_objects::price::Price;
use crate::domain::value_objects::quantity::Quantity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Terms reserved by a granted lock.
///
/// `price` is the total EUR amount for the whole `quantity`, not a unit
/// price. `issued_at` is the market operation tick at which the lock was
/// granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LockTicket {
    id: LockId,
    quantity: Quantity,
    price: Price,
    issued_at: u64,
}

impl LockTicket {
    /// Creates a ticket.
    #[must_use]
    pub const fn new(id: LockId, quantity: Quantity, price: Price, issued_at: u64) -> Self {
        Self {
            id,
            quantity,
            price,
            issued_at,
        }
    }

    /// Returns the capability token of this lock.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> LockId {
        self.id
    }

    /// Returns the locked quantity.
    #[inline]
    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Returns the locked total price.
    #[inline]
    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    /// Returns the operation tick at which the lock was granted.
    #[inline]
    #[must_use]
    pub const fn issued_at(&self) -> u64 {
        self.issued_at
    }

    /// Returns true once more than `window` operations separate the grant
    /// from the operation at tick `now`.
    ///
    /// # Examples
    ///
    /// ```
    /// use market_protocol::domain::value_objects::lock_state::LockTicket;
    /// use market_protocol::domain::value_objects::{LockId, Price, Quantity};
    ///
    /// let ticket = LockTicket::new(LockId::new_v4(), Quantity::from_units(1), Price::ONE, 10);
    /// // Ticks 11..=13 are three intervening operations before tick 14.
    /// assert!(!ticket.is_expired(14, 3));
    /// assert!(ticket.is_expired(15, 3));
    /// ```
    #[must_use]
    pub const fn is_expired(&self, now: u64, window: u64) -> bool {
        now.saturating_sub(self.issued_at).saturating_sub(1) > window
    }
}

/// Lock state of one good in one market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "ticket", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockState {
    /// No outstanding offer.
    #[default]
    Free,
    /// A trader reserved the right to buy; the market waits for payment.
    LockedForBuy(LockTicket),
    /// A trader reserved the right to sell; the market waits for delivery.
    LockedForSell(LockTicket),
}

impl LockState {
    /// Returns true if the good is free.
    #[inline]
    #[must_use]
    pub const fn is_free(&self) -> bool {
        matches!(self, Self::Free)
    }

    /// Returns the outstanding ticket, if any.
    #[must_use]
    pub const fn ticket(&self) -> Option<&LockTicket> {
        match self {
            Self::Free => None,
            Self::LockedForBuy(ticket) | Self::LockedForSell(ticket) => Some(ticket),
        }
    }

    /// Returns the side of the outstanding lock, if any.
    #[must_use]
    pub const fn side(&self) -> Option<TradeSide> {
        match self {
            Self::Free => None,
            Self::LockedForBuy(_) => Some(TradeSide::Buy),
            Self::LockedForSell(_) => Some(TradeSide::Sell),
        }
    }

    /// Returns the ticket if this is a buy lock issued under `id`.
    #[must_use]
    pub fn buy_ticket(&self, id: LockId) -> Option<&LockTicket> {
        match self {
            Self::LockedForBuy(ticket) if ticket.id() == id => Some(ticket),
            _ => None,
        }
    }

    /// Returns the ticket if this is a sell lock issued under `id`.
    #[must_use]
    pub fn sell_ticket(&self, id: LockId) -> Option<&LockTicket> {
        match self {
            Self::LockedForSell(ticket) if ticket.id() == id => Some(ticket),
            _ => None,
        }
    }

    /// Returns true if this state can transition to the target state.
    ///
    /// - Free → LockedForBuy, LockedForSell
    /// - LockedForBuy → Free
    /// - LockedForSell → Free
    #[must_use]
    pub const fn can_transition_to(&self, target: &Self) -> bool {
        matches!(
            (self, target),
            (Self::Free, Self::LockedForBuy(_))
                | (Self::Free, Self::LockedForSell(_))
                | (Self::LockedForBuy(_), Self::Free)
                | (Self::LockedForSell(_), Self::Free)
        )
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => write!(f, "FREE"),
            Self::LockedForBuy(t) => write!(f, "LOCKED_FOR_BUY({} @ {})", t.quantity, t.price),
            Self::LockedForSell(t) => write!(f, "LOCKED_FOR_SELL({} @ {})", t.quantity, t.price),
        }
    }
}
