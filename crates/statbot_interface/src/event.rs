//! Inbound chat events.

use crate::{ContextId, GuildId, UserId};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Role and permission facts the platform attached to an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleMetadata {
    /// The author holds an administrator-equivalent role or owns the guild
    #[serde(default)]
    pub administrator: bool,
    /// Platform role ids held by the author
    #[serde(default)]
    pub role_ids: Vec<String>,
}

impl RoleMetadata {
    /// Metadata for an administrator.
    pub fn administrator() -> Self {
        Self {
            administrator: true,
            role_ids: Vec::new(),
        }
    }
}

/// One message received from the platform.
///
/// # Example
///
/// ```
/// use statbot_interface::{GuildId, InboundEventBuilder};
///
/// let event = InboundEventBuilder::default()
///     .text("!stats john")
///     .author_id("42")
///     .context_id("channel-1")
///     .guild_id(Some(GuildId::from("guild-1")))
///     .build()
///     .unwrap();
/// assert!(event.is_group_context());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct InboundEvent {
    /// Raw message text
    text: String,
    /// Message author
    author_id: UserId,
    /// Conversation the message arrived in
    context_id: ContextId,
    /// Guild the conversation belongs to; `None` for private conversations
    #[builder(default)]
    guild_id: Option<GuildId>,
    /// Author's role metadata within the guild
    #[builder(default)]
    role_metadata: RoleMetadata,
}

impl InboundEvent {
    /// A message in a private one-to-one conversation.
    pub fn private(
        text: impl Into<String>,
        author_id: impl Into<UserId>,
        context_id: impl Into<ContextId>,
    ) -> Self {
        Self {
            text: text.into(),
            author_id: author_id.into(),
            context_id: context_id.into(),
            guild_id: None,
            role_metadata: RoleMetadata::default(),
        }
    }

    /// A message in a guild channel.
    pub fn group(
        text: impl Into<String>,
        author_id: impl Into<UserId>,
        context_id: impl Into<ContextId>,
        guild_id: impl Into<GuildId>,
        role_metadata: RoleMetadata,
    ) -> Self {
        Self {
            text: text.into(),
            author_id: author_id.into(),
            context_id: context_id.into(),
            guild_id: Some(guild_id.into()),
            role_metadata,
        }
    }

    /// Whether the event comes from a multi-user guild context.
    pub fn is_group_context(&self) -> bool {
        self.guild_id.is_some()
    }
}
