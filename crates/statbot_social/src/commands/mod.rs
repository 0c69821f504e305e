//! Built-in commands.
//!
//! Each command module exposes a `descriptor` function building its
//! [`CommandDescriptor`](crate::CommandDescriptor). [`builtin_catalog`] wires
//! them into a [`CommandCatalog`] so they can be registered at start-up and
//! rebuilt on reload.

mod help;
mod ping;
mod reload;
mod set_defaults;
mod stats;

pub use help::HelpCommand;
pub use ping::PingCommand;
pub use reload::ReloadCommand;
pub use set_defaults::{DefaultField, SetDefaultsCommand};
pub use stats::StatsCommand;

use crate::CommandCatalog;
use statbot_cache::CacheAside;
use statbot_interface::{PlayerSummary, StatsApi};
use std::sync::Arc;

/// Catalog of every built-in command.
///
/// The stats command shares `stats_cache` across reloads so a reload does
/// not throw away memoized lookups.
pub fn builtin_catalog(
    stats_api: Arc<dyn StatsApi>,
    stats_cache: Arc<CacheAside<PlayerSummary>>,
) -> CommandCatalog {
    CommandCatalog::new()
        .with("help", help::descriptor)
        .with("ping", ping::descriptor)
        .with("reload", reload::descriptor)
        .with("setdefaults", set_defaults::descriptor)
        .with("stats", move || {
            stats::descriptor(Arc::clone(&stats_api), Arc::clone(&stats_cache))
        })
}
