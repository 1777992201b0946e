//! Domain layer: the type hierarchy and the searches over it
//!
//! This layer is independent of external concerns (no HTTP, no CLI, no config loading).

pub mod error;
pub mod type_tree;

pub use error::DomainError;
pub use type_tree::{same_type, TypeNode};
