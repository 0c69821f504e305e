//! Interactive console command handler.

use statbot::{
    BotConfig, ConsoleGateway, GatewayError, GatewayErrorKind, InboundEvent, RoleMetadata,
    StatbotApp, StatbotResult, UnconfiguredStatsApi, open_store,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, instrument};

const CONSOLE_USER: &str = "console-user";
const CONSOLE_CONTEXT: &str = "console";

/// Dispatch each stdin line as a chat message until end of input.
#[instrument(skip(config))]
pub async fn run_console(config: BotConfig, guild: Option<String>, admin: bool) -> StatbotResult<()> {
    let store = open_store(&config).await?;
    let app = StatbotApp::build(
        config,
        store,
        Arc::new(ConsoleGateway::new()),
        Arc::new(UnconfiguredStatsApi),
    )
    .await?;

    println!(
        "statbot console (prefix `{}`, help `{}`). End input to quit.",
        app.config().bot.default_prefix,
        app.config().bot.global_help_token
    );

    let roles = if admin {
        RoleMetadata::administrator()
    } else {
        RoleMetadata::default()
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.map_err(|e| {
        GatewayError::new(GatewayErrorKind::Connection(format!(
            "Failed to read stdin: {}",
            e
        )))
    })? {
        let event = match &guild {
            Some(guild_id) => InboundEvent::group(
                line,
                CONSOLE_USER,
                CONSOLE_CONTEXT,
                guild_id.as_str(),
                roles.clone(),
            ),
            None => InboundEvent::private(line, CONSOLE_USER, CONSOLE_CONTEXT),
        };
        let outcome = app.dispatcher().dispatch(&event).await;
        debug!(?outcome, "Console line dispatched");
    }

    Ok(())
}
