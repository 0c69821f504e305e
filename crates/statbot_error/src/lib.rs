//! Error types for statbot.
//!
//! This crate provides the foundation error types used throughout the statbot workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use statbot_error::{RegistryError, RegistryErrorKind, StatbotResult};
//!
//! fn register() -> StatbotResult<()> {
//!     Err(RegistryError::new(RegistryErrorKind::RegistrationConflict(
//!         "stats".to_string(),
//!     )))?
//! }
//!
//! assert!(register().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod command;
mod config;
mod error;
mod gateway;
mod registry;
mod stats;
mod store;

pub use command::{CommandError, CommandErrorKind, CommandResult};
pub use config::ConfigError;
pub use error::{StatbotError, StatbotErrorKind, StatbotResult};
pub use gateway::{GatewayError, GatewayErrorKind, GatewayResult};
pub use registry::{RegistryError, RegistryErrorKind, RegistryResult};
pub use stats::{StatsError, StatsErrorKind, StatsResult};
pub use store::{StoreError, StoreErrorKind, StoreResult};
