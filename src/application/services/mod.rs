//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on the `Fetcher` I/O boundary trait but are themselves
//! concrete structs, not traits.

mod inventory;
mod type_tree;

pub use inventory::{CedClient, Element, INVENTORY_PATH};
pub use type_tree::{type_tree_url, TreeState, TypeTree, TYPE_TREE_PATH};
