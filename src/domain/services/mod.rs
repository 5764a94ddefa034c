//! # Domain Services
//!
//! Domain services encapsulating business rules that don't
//! naturally belong to a single entity or value object.
//!
//! ## Services
//!
//! - [`price_policy::PricePolicy`]: offer thresholds and post-trade price drift

pub mod price_policy;

pub use price_policy::PricePolicy;
