//! Command handler error types.

use crate::{GatewayError, RegistryError, StatsError, StoreError};

/// Command handler failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum CommandErrorKind {
    /// The handler gave up with a message.
    #[display("Command failed: {}", _0)]
    Failed(String),
    /// The handler did not finish within the dispatcher's bound.
    #[display("Command timed out after {} seconds", seconds)]
    Timeout {
        /// Configured bound in seconds
        seconds: u64,
    },
    /// A collaborator the handler called failed.
    #[display("Upstream failure: {}", _0)]
    Upstream(String),
}

/// Command handler error with source location tracking.
///
/// # Examples
///
/// ```
/// use statbot_error::{CommandError, CommandErrorKind};
///
/// let err = CommandError::new(CommandErrorKind::Failed("boom".into()));
/// assert!(format!("{}", err).contains("boom"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Command Error: {} at line {} in {}", kind, line, file)]
pub struct CommandError {
    /// The kind of error that occurred
    pub kind: CommandErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl CommandError {
    /// Create a new CommandError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CommandErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CommandErrorKind {
        &self.kind
    }
}

impl From<GatewayError> for CommandError {
    #[track_caller]
    fn from(err: GatewayError) -> Self {
        CommandError::new(CommandErrorKind::Upstream(err.kind.to_string()))
    }
}

impl From<StoreError> for CommandError {
    #[track_caller]
    fn from(err: StoreError) -> Self {
        CommandError::new(CommandErrorKind::Upstream(err.kind.to_string()))
    }
}

impl From<StatsError> for CommandError {
    #[track_caller]
    fn from(err: StatsError) -> Self {
        CommandError::new(CommandErrorKind::Upstream(err.kind.to_string()))
    }
}

impl From<RegistryError> for CommandError {
    #[track_caller]
    fn from(err: RegistryError) -> Self {
        CommandError::new(CommandErrorKind::Failed(err.kind.to_string()))
    }
}

/// Result type for command handlers.
pub type CommandResult<T> = Result<T, CommandError>;
