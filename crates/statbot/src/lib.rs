//! Statbot - chat bot answering prefixed game-stats commands
//!
//! Statbot turns chat messages into permission-checked command invocations.
//! Each guild chooses its own command prefix and stats defaults; commands
//! can be reloaded one at a time without restarting the bot.
//!
//! # Features
//!
//! - **Cache-aside memoization**: TTL cache with prefix invalidation in front
//!   of every expensive lookup
//! - **Per-guild configuration**: prefix and stats defaults, cached over a
//!   persistent store
//! - **Command registry**: aliases, help metadata and atomic hot reload
//! - **Guarded dispatch**: handler panics, errors and timeouts never take
//!   down the bot
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use statbot::{BotConfig, ConsoleGateway, InMemoryConfigStore, StatbotApp, UnconfiguredStatsApi};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BotConfig::load(None)?;
//!     let app = StatbotApp::build(
//!         config,
//!         Arc::new(InMemoryConfigStore::new()),
//!         Arc::new(ConsoleGateway::new()),
//!         Arc::new(UnconfiguredStatsApi),
//!     )
//!     .await?;
//!     let outcome = app
//!         .dispatcher()
//!         .dispatch(&statbot::InboundEvent::private("!ping", "me", "console"))
//!         .await;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `discord` - Discord gateway and event handler
//! - `postgres` - PostgreSQL guild configuration store
//! - `observability` - OpenTelemetry span export
//! - `all` - Enable all features
//!
//! # Architecture
//!
//! - `statbot_error` - Error types
//! - `statbot_cache` - Cache-aside primitive
//! - `statbot_interface` - Domain types and collaborator traits
//! - `statbot_database` - Guild configuration stores
//! - `statbot_social` - Registry, resolver, dispatcher and built-in commands
//!
//! This crate (`statbot`) re-exports everything for convenience.

#![warn(missing_docs)]

mod app;
mod config;
mod console;
pub mod observability;

pub use app::{StatbotApp, UnconfiguredStatsApi, open_store};
pub use config::{BotConfig, BotSection, CommandsSection, DispatcherSection, ENV_PREFIX};
pub use console::ConsoleGateway;

pub use statbot_cache::*;
pub use statbot_error::*;
pub use statbot_interface::*;

pub use statbot_database::InMemoryConfigStore;
#[cfg(feature = "postgres")]
pub use statbot_database::{PostgresConfigStore, establish_connection};

pub use statbot_social::{
    CatalogModuleLoader, CommandCatalog, CommandContext, CommandDescriptor, CommandHandler,
    CommandHelp, CommandOutcome, CommandOverrides, CommandRegistry, DenyReason, DispatchOutcome,
    Dispatcher, DispatcherConfig, GuildConfigResolver, IgnoreReason, ModuleLoader,
    PermissionElevation, builtin_catalog,
};
#[cfg(feature = "discord")]
pub use statbot_social::{DiscordClient, GuildRoles, SerenityGateway};
