//! Discord adapter built on serenity.
//!
//! - [`SerenityGateway`] implements [`MessagingGateway`](statbot_interface::MessagingGateway)
//!   over the Discord HTTP API
//! - [`StatbotHandler`] turns gateway messages into
//!   [`InboundEvent`](statbot_interface::InboundEvent)s and dispatches each on
//!   its own task
//! - [`DiscordClient`] connects the two

mod client;
mod gateway;
mod handler;

pub use client::DiscordClient;
pub use gateway::SerenityGateway;
pub use handler::{GuildRoles, StatbotHandler};
