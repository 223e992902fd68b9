//! CLI-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Domain(e) => match e {
                DomainError::LevelOutOfRange { .. } | DomainError::NonPositiveId => {
                    crate::exitcode::USAGE
                }
                _ => crate::exitcode::SOFTWARE,
            },
            CliError::Config(_) => crate::exitcode::CONFIG,
        }
    }
}
