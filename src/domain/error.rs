//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent lookups that cannot be answered from the tree.
/// These are independent of how the tree was obtained.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0} not found in CED hierarchy")]
    TypeNotFound(String),

    #[error("malformed type tree: expected a JSON object at the root, found {found}")]
    MalformedTree { found: String },
}
