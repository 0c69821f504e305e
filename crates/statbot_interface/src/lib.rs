//! Domain types and collaborator traits for statbot.
//!
//! The dispatcher core only talks to the outside world through the traits
//! defined here:
//! - [`MessagingGateway`] delivers replies and notices to a chat context
//! - [`ConfigStore`] persists per-guild configuration
//! - [`StatsApi`] answers game-stats queries
//!
//! Everything else in this crate is plain data that crosses those seams.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod event;
mod guild;
mod ids;
mod permission;
mod stats;
mod traits;

pub use event::{InboundEvent, InboundEventBuilder, RoleMetadata};
pub use guild::{GuildConfig, GuildConfigUpdate, GuildConfigUpdateBuilder};
pub use ids::{ContextId, GuildId, MessageHandle, UserId};
pub use permission::PermissionLevel;
pub use stats::{GameMode, Platform, PlayerSummary, Region, StatsDefaults, StatsQuery, CURRENT_SEASON};
pub use traits::{ConfigStore, MessagingGateway, StatsApi};
