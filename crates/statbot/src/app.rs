//! Application wiring.

use crate::BotConfig;
use async_trait::async_trait;
use statbot_cache::CacheAside;
use statbot_database::InMemoryConfigStore;
use statbot_error::{StatbotResult, StatsError, StatsErrorKind, StatsResult};
use statbot_interface::{ConfigStore, MessagingGateway, PlayerSummary, StatsApi, StatsQuery};
use statbot_social::{
    CatalogModuleLoader, CommandRegistry, Dispatcher, GuildConfigResolver, PermissionElevation,
    builtin_catalog,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, instrument};

/// [`StatsApi`] used when no stats backend is wired in.
///
/// Every lookup fails upstream, which the `stats` command reports as a
/// handler failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredStatsApi;

#[async_trait]
impl StatsApi for UnconfiguredStatsApi {
    async fn player_summary(&self, _query: &StatsQuery) -> StatsResult<PlayerSummary> {
        Err(StatsError::new(StatsErrorKind::Upstream(
            "stats API not configured".to_string(),
        )))
    }
}

/// Open the guild configuration store named by `config`.
///
/// Postgres is used when the `postgres` feature is enabled and
/// `database_url` is set; otherwise configuration lives in memory for the
/// life of the process.
#[instrument(skip_all)]
pub async fn open_store(config: &BotConfig) -> StatbotResult<Arc<dyn ConfigStore>> {
    #[cfg(feature = "postgres")]
    if let Some(url) = &config.database_url {
        let conn = statbot_database::establish_connection(url)?;
        let store = statbot_database::PostgresConfigStore::new(conn);
        store.run_migrations().await?;
        info!("Using PostgreSQL guild config store");
        return Ok(Arc::new(store));
    }

    #[cfg(not(feature = "postgres"))]
    if config.database_url.is_some() {
        tracing::warn!("database_url is set but the postgres feature is disabled, using in-memory store");
    }

    info!("Using in-memory guild config store");
    Ok(Arc::new(InMemoryConfigStore::new()))
}

/// A fully wired bot: registry, resolver and dispatcher over the given
/// collaborators.
pub struct StatbotApp {
    config: BotConfig,
    dispatcher: Arc<Dispatcher>,
    resolver: Arc<GuildConfigResolver>,
    stats_cache: Arc<CacheAside<PlayerSummary>>,
    sweeper: JoinHandle<()>,
}

impl StatbotApp {
    /// Wire the bot and register the built-in commands.
    ///
    /// A conflict between built-in names and aliases from the overrides file
    /// is fatal. Must be called inside a tokio runtime; the stats cache
    /// sweeper is spawned here.
    #[instrument(skip_all)]
    pub async fn build(
        config: BotConfig,
        store: Arc<dyn ConfigStore>,
        gateway: Arc<dyn MessagingGateway>,
        stats_api: Arc<dyn StatsApi>,
    ) -> StatbotResult<Self> {
        let dispatcher_config = config.dispatcher_config()?;

        let stats_cache = Arc::new(CacheAside::new(config.cache.clone()));
        let sweeper = stats_cache.spawn_sweeper();

        let loader = Arc::new(CatalogModuleLoader::new(
            builtin_catalog(stats_api, Arc::clone(&stats_cache)),
            config.commands.overrides_path.clone(),
        ));
        let registry = Arc::new(CommandRegistry::new(loader.clone()));
        registry.register_all(loader.load_all().await?)?;

        let resolver = Arc::new(GuildConfigResolver::new(
            store,
            CacheAside::new(config.guild_cache.clone()),
            config.bot.default_prefix.clone(),
            config.defaults,
        ));

        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&registry),
            Arc::clone(&resolver),
            gateway,
            PermissionElevation::new(config.bot.administrator_level),
            dispatcher_config,
        ));

        info!(
            commands = registry.len(),
            prefix = %config.bot.default_prefix,
            "Statbot wired"
        );

        Ok(Self {
            config,
            dispatcher,
            resolver,
            stats_cache,
            sweeper,
        })
    }

    /// Loaded configuration.
    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// The dispatcher, shareable across event tasks.
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// The command registry.
    pub fn registry(&self) -> &Arc<CommandRegistry> {
        self.dispatcher.registry()
    }

    /// The guild configuration resolver.
    pub fn resolver(&self) -> &Arc<GuildConfigResolver> {
        &self.resolver
    }

    /// Cache in front of the stats API.
    pub fn stats_cache(&self) -> &Arc<CacheAside<PlayerSummary>> {
        &self.stats_cache
    }
}

impl Drop for StatbotApp {
    fn drop(&mut self) {
        self.sweeper.abort();
    }
}
