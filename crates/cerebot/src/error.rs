//! Application error types.

use chat_gateway::GatewayError;
use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Invalid argument pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Duplicate command: {0}")]
    DuplicateCommand(String),
}

/// Result type alias for application errors.
pub type AppResult<T> = Result<T, AppError>;

/// Failure of a single command invocation.
///
/// `User` errors are shown to the caller verbatim. `Fault`s are logged and
/// the caller only sees a generic reply.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{0}")]
    User(String),

    #[error(transparent)]
    Fault(#[from] anyhow::Error),
}

impl CommandError {
    pub fn user(message: impl Into<String>) -> Self {
        Self::User(message.into())
    }
}

impl From<GatewayError> for CommandError {
    fn from(e: GatewayError) -> Self {
        Self::Fault(anyhow::Error::new(e))
    }
}

/// Result of a command handler.
pub type CommandResult = Result<(), CommandError>;
