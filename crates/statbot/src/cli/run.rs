//! Discord bot command handler.

use statbot::{BotConfig, StatbotResult};

/// Connect to Discord and dispatch messages until the connection ends.
#[cfg(feature = "discord")]
#[tracing::instrument(skip_all)]
pub async fn run_bot(config: BotConfig) -> StatbotResult<()> {
    use statbot::{
        CacheAside, ConfigError, DiscordClient, SerenityGateway, StatbotApp, UnconfiguredStatsApi,
        open_store,
    };
    use std::sync::Arc;

    let token = config.discord_token.clone().ok_or_else(|| {
        ConfigError::new("discord_token is not set (STATBOT_DISCORD_TOKEN or DISCORD_TOKEN)")
    })?;

    let store = open_store(&config).await?;
    let gateway = Arc::new(SerenityGateway::new(DiscordClient::http(&token)));
    let roles = CacheAside::new(config.guild_cache.clone());
    let app = StatbotApp::build(config, store, gateway, Arc::new(UnconfiguredStatsApi)).await?;

    let mut client = DiscordClient::new(&token, Arc::clone(app.dispatcher()), roles).await?;
    client.start().await
}

/// Without the `discord` feature there is no platform to connect to.
#[cfg(not(feature = "discord"))]
pub async fn run_bot(_config: BotConfig) -> StatbotResult<()> {
    Err(statbot::ConfigError::new(
        "statbot was built without the discord feature; try `statbot console`",
    )
    .into())
}
