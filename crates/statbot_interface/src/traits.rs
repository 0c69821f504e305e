//! Collaborator traits consumed by the dispatcher core.

use crate::{ContextId, GuildConfig, GuildConfigUpdate, GuildId, MessageHandle, PlayerSummary, StatsQuery};
use async_trait::async_trait;
use statbot_error::{GatewayResult, StatsResult, StoreResult};

/// Delivers messages to chat contexts.
///
/// The dispatcher uses this for denial and failure notices; command handlers
/// use it for their own replies.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Send `content` to `target` and return a handle to the new message.
    async fn send(&self, target: &ContextId, content: &str) -> GatewayResult<MessageHandle>;

    /// Replace the content of a message the bot sent earlier.
    async fn edit(&self, handle: &MessageHandle, content: &str) -> GatewayResult<()>;
}

/// Persistent storage for guild configuration.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Fetch the stored config, `None` if the guild has never been seen.
    async fn get_config(&self, guild_id: &GuildId) -> StoreResult<Option<GuildConfig>>;

    /// Insert or update the fields present in `update`.
    ///
    /// A guild without a row gets one built from `base` with `update` applied.
    async fn upsert_config(
        &self,
        guild_id: &GuildId,
        base: &GuildConfig,
        update: &GuildConfigUpdate,
    ) -> StoreResult<()>;
}

/// External game-stats API.
#[async_trait]
pub trait StatsApi: Send + Sync {
    /// Look up headline stats for a player.
    async fn player_summary(&self, query: &StatsQuery) -> StatsResult<PlayerSummary>;
}
