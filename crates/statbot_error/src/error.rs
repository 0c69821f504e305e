//! Top-level error wrapper types.

use crate::{CommandError, ConfigError, GatewayError, RegistryError, StatsError, StoreError};

/// Every error a statbot crate can surface.
///
/// # Examples
///
/// ```
/// use statbot_error::{StatbotError, ConfigError};
///
/// let err: StatbotError = ConfigError::new("missing token").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StatbotErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Command registry error
    #[from(RegistryError)]
    Registry(RegistryError),
    /// Configuration store error
    #[from(StoreError)]
    Store(StoreError),
    /// Messaging gateway error
    #[from(GatewayError)]
    Gateway(GatewayError),
    /// Stats API error
    #[from(StatsError)]
    Stats(StatsError),
    /// Command handler error
    #[from(CommandError)]
    Command(CommandError),
}

/// Statbot error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Statbot Error: {}", _0)]
pub struct StatbotError(Box<StatbotErrorKind>);

impl StatbotError {
    /// Create a new error from a kind.
    pub fn new(kind: StatbotErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StatbotErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to StatbotErrorKind
impl<T> From<T> for StatbotError
where
    T: Into<StatbotErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for statbot operations.
pub type StatbotResult<T> = std::result::Result<T, StatbotError>;
