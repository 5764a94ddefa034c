//! # Domain Layer
//!
//! Goods, per-market metadata, the pricing rule and transaction records.
//!
//! Nothing in this layer performs I/O; the market engine in
//! [`infrastructure::markets`](crate::infrastructure::markets) drives it.

pub mod entities;
pub mod errors;
pub mod events;
pub mod services;
pub mod value_objects;
