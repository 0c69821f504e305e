//! Messaging gateway error types.

/// Messaging gateway error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GatewayErrorKind {
    /// Message failed to send.
    #[display("Message send failed: {}", _0)]
    SendFailed(String),
    /// Message failed to edit.
    #[display("Message edit failed: {}", _0)]
    EditFailed(String),
    /// Target context or message id could not be used.
    #[display("Invalid target: {}", _0)]
    InvalidTarget(String),
    /// The platform connection could not be established or was lost.
    #[display("Gateway connection failed: {}", _0)]
    Connection(String),
}

/// Messaging gateway error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gateway Error: {} at line {} in {}", kind, line, file)]
pub struct GatewayError {
    /// The kind of error that occurred
    pub kind: GatewayErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GatewayError {
    /// Create a new GatewayError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GatewayErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for messaging gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
