//! Command registry error types.

/// Command registry error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum RegistryErrorKind {
    /// A canonical name or alias is already bound in the registry.
    #[display("Command name or alias already registered: {}", _0)]
    RegistrationConflict(String),
    /// A descriptor failed validation before reaching the registry.
    #[display("Invalid descriptor '{}': {}", name, reason)]
    InvalidDescriptor {
        /// Canonical name of the rejected descriptor
        name: String,
        /// Why it was rejected
        reason: String,
    },
    /// The module loader could not produce a usable descriptor.
    #[display("Reload of '{}' failed: {}", name, reason)]
    ReloadFailure {
        /// Command being reloaded
        name: String,
        /// Loader or validation failure
        reason: String,
    },
    /// No command is registered under the name.
    #[display("Unknown command: {}", _0)]
    UnknownCommand(String),
}

/// Command registry error with source location tracking.
///
/// # Examples
///
/// ```
/// use statbot_error::{RegistryError, RegistryErrorKind};
///
/// let err = RegistryError::new(RegistryErrorKind::UnknownCommand("nope".into()));
/// assert!(format!("{}", err).contains("Unknown command"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Registry Error: {} at line {} in {}", kind, line, file)]
pub struct RegistryError {
    /// The kind of error that occurred
    pub kind: RegistryErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl RegistryError {
    /// Create a new RegistryError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RegistryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &RegistryErrorKind {
        &self.kind
    }
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
