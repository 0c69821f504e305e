//! Guild configuration persistence for statbot.
//!
//! This crate provides [`ConfigStore`](statbot_interface::ConfigStore)
//! implementations:
//!
//! - [`InMemoryConfigStore`] - process-local map, always available
//! - `PostgresConfigStore` - diesel-backed PostgreSQL store (requires the
//!   `postgres` feature)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod memory;

#[cfg(feature = "postgres")]
mod models;
#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "postgres")]
pub mod schema;

pub use memory::InMemoryConfigStore;

#[cfg(feature = "postgres")]
pub use models::{GuildConfigChangeset, GuildConfigRow, NewGuildConfigRow};
#[cfg(feature = "postgres")]
pub use postgres::{PostgresConfigStore, establish_connection};
