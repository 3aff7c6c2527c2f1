//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) | CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Selector { .. } => crate::exitcode::SOFTWARE,
                InfraError::Application(ApplicationError::InvalidInput { .. }) => {
                    crate::exitcode::DATAERR
                }
                InfraError::Application(ApplicationError::Config { .. }) => crate::exitcode::CONFIG,
                InfraError::Application(_) => crate::exitcode::SOFTWARE,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let invalid: CliError = ApplicationError::InvalidInput { raw: "x".into() }.into();
        assert_eq!(invalid.exit_code(), crate::exitcode::DATAERR);
        let config: CliError = ApplicationError::Config {
            message: "bad".into(),
        }
        .into();
        assert_eq!(config.exit_code(), crate::exitcode::CONFIG);
        assert_eq!(
            CliError::Usage("x".into()).exit_code(),
            crate::exitcode::USAGE
        );
    }
}
