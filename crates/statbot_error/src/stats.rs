//! Stats API error types.

/// Stats API error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StatsErrorKind {
    /// No player with that name on that platform.
    #[display("Player not found: {} on {}", name, platform)]
    PlayerNotFound {
        /// Player name as queried
        name: String,
        /// Platform as queried
        platform: String,
    },
    /// The upstream API returned an error.
    #[display("Stats API error: {}", _0)]
    Upstream(String),
    /// The upstream API is rate limiting us.
    #[display("Stats API rate limited: retry after {} seconds", _0)]
    RateLimited(u64),
}

/// Stats API error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Stats Error: {} at line {} in {}", kind, line, file)]
pub struct StatsError {
    /// The kind of error that occurred
    pub kind: StatsErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StatsError {
    /// Create a new StatsError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StatsErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for stats API operations.
pub type StatsResult<T> = Result<T, StatsError>;
