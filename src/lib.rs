//! Client for the CED element database.
//!
//! Inventory queries plus a lazily fetched type hierarchy answering
//! "is this type a kind of that type" questions.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::services::{CedClient, Element, TypeTree};
pub use application::{ApplicationError, ApplicationResult, InventoryQuery};
pub use domain::{DomainError, TypeNode};
