//! In-memory configuration store.

use async_trait::async_trait;
use parking_lot::RwLock;
use statbot_error::StoreResult;
use statbot_interface::{ConfigStore, GuildConfig, GuildConfigUpdate, GuildId};
use std::collections::HashMap;
use tracing::instrument;

/// Process-local [`ConfigStore`].
///
/// Used when no database is configured and in tests. Contents are lost on
/// restart.
#[derive(Debug, Default)]
pub struct InMemoryConfigStore {
    configs: RwLock<HashMap<GuildId, GuildConfig>>,
}

impl InMemoryConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of guilds with a stored config.
    pub fn len(&self) -> usize {
        self.configs.read().len()
    }

    /// Whether no guild has a stored config.
    pub fn is_empty(&self) -> bool {
        self.configs.read().is_empty()
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    #[instrument(skip(self), fields(guild_id = %guild_id))]
    async fn get_config(&self, guild_id: &GuildId) -> StoreResult<Option<GuildConfig>> {
        Ok(self.configs.read().get(guild_id).cloned())
    }

    #[instrument(skip(self, base, update), fields(guild_id = %guild_id))]
    async fn upsert_config(
        &self,
        guild_id: &GuildId,
        base: &GuildConfig,
        update: &GuildConfigUpdate,
    ) -> StoreResult<()> {
        let mut configs = self.configs.write();
        configs
            .entry(guild_id.clone())
            .or_insert_with(|| base.clone())
            .apply(update);
        tracing::debug!("Upserted guild config");
        Ok(())
    }
}
