//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),

    #[error("output failed: {0}")]
    Output(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Output(_) => crate::exitcode::SOFTWARE,
            CliError::Application(e) => match e {
                ApplicationError::Domain(DomainError::TypeNotFound(_)) => crate::exitcode::DATAERR,
                ApplicationError::Domain(DomainError::MalformedTree { .. }) => {
                    crate::exitcode::SOFTWARE
                }
                ApplicationError::Infra(InfraError::Transport { .. })
                | ApplicationError::Infra(InfraError::Status { .. }) => {
                    crate::exitcode::UNAVAILABLE
                }
                ApplicationError::Infra(InfraError::Decode { .. }) => crate::exitcode::SOFTWARE,
                ApplicationError::Service { .. } => crate::exitcode::SOFTWARE,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(CliError::Usage("x".into()), crate::exitcode::USAGE)]
    #[case(
        CliError::Application(DomainError::TypeNotFound("Foo".into()).into()),
        crate::exitcode::DATAERR
    )]
    #[case(
        CliError::Application(InfraError::Status { url: "u".into(), status: 500, snippet: String::new() }.into()),
        crate::exitcode::UNAVAILABLE
    )]
    #[case(
        CliError::Application(ApplicationError::Service { message: "m".into(), url: "u".into() }),
        crate::exitcode::SOFTWARE
    )]
    #[case(
        CliError::Application(ApplicationError::Config { message: "m".into() }),
        crate::exitcode::CONFIG
    )]
    fn given_error_when_exit_code_then_maps_to_sysexits(#[case] err: CliError, #[case] code: i32) {
        assert_eq!(err.exit_code(), code);
    }
}
