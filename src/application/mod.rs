//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on the I/O boundary trait.

pub mod error;
pub mod query;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use query::InventoryQuery;
