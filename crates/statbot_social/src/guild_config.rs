//! Per-guild configuration resolution.

use parking_lot::Mutex;
use statbot_cache::CacheAside;
use statbot_error::StoreResult;
use statbot_interface::{ConfigStore, GuildConfig, GuildConfigUpdate, GuildId, StatsDefaults};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Resolves and mutates guild configuration through a cache-aside layer over
/// a [`ConfigStore`].
///
/// Reads are memoized per guild. Writes go to the store and then invalidate
/// the guild's cache key, so the next read recomputes from the store.
///
/// Each guild carries a write generation. A read whose store lookup overlaps
/// an update drops the entry it just cached, so a config fetched before the
/// write never outlives it.
pub struct GuildConfigResolver {
    store: Arc<dyn ConfigStore>,
    cache: CacheAside<GuildConfig>,
    generations: Mutex<HashMap<GuildId, u64>>,
    default_prefix: String,
    defaults: StatsDefaults,
    ttl: Option<Duration>,
}

impl GuildConfigResolver {
    /// Create a resolver.
    ///
    /// `default_prefix` must not be blank; configuration loading rejects
    /// blank prefixes before this point.
    pub fn new(
        store: Arc<dyn ConfigStore>,
        cache: CacheAside<GuildConfig>,
        default_prefix: impl Into<String>,
        defaults: StatsDefaults,
    ) -> Self {
        Self {
            store,
            cache,
            generations: Mutex::new(HashMap::new()),
            default_prefix: default_prefix.into(),
            defaults,
            ttl: None,
        }
    }

    /// Use `ttl` for cached configs instead of the cache's default.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Platform-wide default prefix.
    pub fn default_prefix(&self) -> &str {
        &self.default_prefix
    }

    /// Platform-wide stats defaults.
    pub fn platform_defaults(&self) -> &StatsDefaults {
        &self.defaults
    }

    /// The underlying cache.
    pub fn cache(&self) -> &CacheAside<GuildConfig> {
        &self.cache
    }

    /// Cache key for a guild's config.
    pub fn cache_key(guild_id: &GuildId) -> String {
        format!("guild.config-{}", guild_id)
    }

    fn platform_config(&self, guild_id: &GuildId) -> GuildConfig {
        GuildConfig::new(guild_id.clone(), self.default_prefix.clone(), self.defaults)
    }

    fn generation(&self, guild_id: &GuildId) -> u64 {
        self.generations.lock().get(guild_id).copied().unwrap_or(0)
    }

    fn bump_generation(&self, guild_id: &GuildId) {
        *self.generations.lock().entry(guild_id.clone()).or_insert(0) += 1;
    }

    /// Return the guild's config, provisioning a default row for unseen guilds.
    #[instrument(skip(self), fields(guild_id = %guild_id))]
    pub async fn get_or_create(&self, guild_id: &GuildId) -> StoreResult<GuildConfig> {
        let store = &self.store;
        let fallback = self.platform_config(guild_id);
        let key = Self::cache_key(guild_id);
        let generation = self.generation(guild_id);

        let resolved: StoreResult<GuildConfig> = self
            .cache
            .get(
                &key,
                || async move {
                    match store.get_config(guild_id).await? {
                        Some(config) => Ok(config),
                        None => {
                            info!("Provisioning default config for new guild");
                            store
                                .upsert_config(guild_id, &fallback, &GuildConfigUpdate::default())
                                .await?;
                            Ok(fallback)
                        }
                    }
                },
                self.ttl,
            )
            .await;

        if self.generation(guild_id) != generation {
            debug!("Config changed during lookup, dropping cached copy");
            self.cache.del(&key);
        }

        let mut config = resolved?;
        if config.prefix.trim().is_empty() {
            warn!("Stored prefix is blank, using default prefix");
            config.prefix = self.default_prefix.clone();
        }
        Ok(config)
    }

    /// Write the fields present in `update`, then invalidate the cached config.
    ///
    /// An empty or whitespace-only prefix is dropped and the current prefix
    /// is kept.
    /// Platform defaults seed the row of a guild the store has never seen;
    /// an existing row only receives the supplied fields.
    #[instrument(skip(self, update), fields(guild_id = %guild_id))]
    pub async fn update(&self, guild_id: &GuildId, update: GuildConfigUpdate) -> StoreResult<()> {
        let requested_prefix = update.prefix.is_some();
        let update = update.sanitized();
        if requested_prefix && update.prefix.is_none() {
            warn!("Rejected blank prefix, keeping the current one");
        }
        if update.is_empty() {
            debug!("Nothing to update");
            return Ok(());
        }

        let base = self.platform_config(guild_id);
        self.store.upsert_config(guild_id, &base, &update).await?;
        self.bump_generation(guild_id);
        self.cache.del(&Self::cache_key(guild_id));
        info!(?update, "Updated guild config");
        Ok(())
    }
}
