//! Message dispatch engine for statbot.
//!
//! This crate turns raw chat events into permission-checked command
//! invocations.
//!
//! # Dispatch Pipeline
//!
//! - `GuildConfigResolver` - Per-guild prefix and stats defaults, cached over a `ConfigStore`
//! - `PermissionElevation` - Permission level from the event's role metadata
//! - `CommandRegistry` - Commands by canonical name and alias, with atomic reload
//! - `Dispatcher` - Prefix resolution, command lookup, eligibility checks and guarded execution
//!
//! # Commands
//!
//! Commands are `CommandDescriptor`s carrying a `CommandHandler`. The
//! built-in set (`help`, `ping`, `reload`, `setdefaults`, `stats`) is
//! available through [`builtin_catalog`], which feeds a
//! `CatalogModuleLoader` so that `reload` rebuilds commands from their
//! definitions and the operator overrides file.
//!
//! # Platform Support
//!
//! - `discord` - serenity event handler and messaging gateway (requires `discord` feature)

#![warn(missing_docs)]

mod command;
mod commands;
mod dispatcher;
mod guild_config;
mod loader;
mod params;
mod permission;
mod registry;
mod tokenize;

#[cfg(feature = "discord")]
mod discord;

pub use command::{
    CommandContext, CommandDescriptor, CommandDescriptorBuilder, CommandDescriptorBuilderError,
    CommandHandler, CommandHelp, CommandOutcome,
};
pub use commands::{
    DefaultField, HelpCommand, PingCommand, ReloadCommand, SetDefaultsCommand, StatsCommand,
    builtin_catalog,
};
pub use dispatcher::{
    DenyReason, DispatchContext, DispatchOutcome, Dispatcher, DispatcherConfig,
    DispatcherConfigBuilder, IgnoreReason,
};
pub use guild_config::GuildConfigResolver;
pub use loader::{CatalogModuleLoader, CommandCatalog, CommandFactory, CommandOverride, CommandOverrides};
pub use params::{ParamError, StatsParams};
pub use permission::PermissionElevation;
pub use registry::{CommandRegistry, ModuleLoader};
pub use tokenize::tokenize;

#[cfg(feature = "discord")]
pub use discord::{DiscordClient, GuildRoles, SerenityGateway, StatbotHandler};
