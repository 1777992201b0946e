//! Application-level errors (wraps domain and infrastructure errors)

use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// Application errors wrap lower layers and add service-level failures.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("CED query failed: {message} (url: {url})")]
    Service { message: String, url: String },

    #[error("config error: {message}")]
    Config { message: String },
}

impl ApplicationError {
    /// True if the error is a caller mistake (unknown type name) rather than
    /// an infrastructure failure.
    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::Domain(DomainError::TypeNotFound(_)))
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
