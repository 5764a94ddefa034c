//! # Infrastructure Layer
//!
//! Market engine, transaction history sinks and configuration loading.

pub mod config;
pub mod history;
pub mod markets;
