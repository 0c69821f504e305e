//! Configuration store error types.

/// Configuration store error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StoreErrorKind {
    /// Connection failed
    #[display("Store connection error: {}", _0)]
    Connection(String),
    /// Query execution failed
    #[display("Store query error: {}", _0)]
    Query(String),
    /// Record not found
    #[display("Record not found")]
    NotFound,
    /// Stored row could not be mapped to a domain value
    #[display("Serialization error: {}", _0)]
    Serialization(String),
}

/// Configuration store error with source location tracking.
///
/// # Examples
///
/// ```
/// use statbot_error::{StoreError, StoreErrorKind};
///
/// let err = StoreError::new(StoreErrorKind::NotFound);
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Store Error: {} at line {} in {}", kind, line, file)]
pub struct StoreError {
    /// The kind of error that occurred
    pub kind: StoreErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StoreError {
    /// Create a new StoreError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoreErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for configuration store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(feature = "database")]
impl From<diesel::result::Error> for StoreError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => StoreError::new(StoreErrorKind::NotFound),
            _ => StoreError::new(StoreErrorKind::Query(err.to_string())),
        }
    }
}

#[cfg(feature = "database")]
impl From<diesel::ConnectionError> for StoreError {
    fn from(err: diesel::ConnectionError) -> Self {
        StoreError::new(StoreErrorKind::Connection(err.to_string()))
    }
}

#[cfg(feature = "database")]
impl From<diesel::r2d2::PoolError> for StoreError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        StoreError::new(StoreErrorKind::Connection(err.to_string()))
    }
}
