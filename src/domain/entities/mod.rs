//! # Domain Entities
//!
//! - [`Good`]: a quantity of one currency kind, moved by split/merge only
//! - [`GoodSnapshot`]: read-only copy of a good's kind and quantity
//! - [`GoodMetadata`]: market-local quotes and lock state of a good kind

pub mod good;
pub mod good_metadata;

pub use good::{Good, GoodSnapshot};
pub use good_metadata::GoodMetadata;
