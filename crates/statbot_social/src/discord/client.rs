use super::{GuildRoles, SerenityGateway, StatbotHandler};
use crate::Dispatcher;
use serenity::Client;
use serenity::http::Http;
use statbot_cache::CacheAside;
use statbot_error::{GatewayError, GatewayErrorKind, StatbotResult};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Discord connection wrapping a serenity [`Client`].
///
/// # Example
///
/// ```rust,ignore
/// let gateway = Arc::new(SerenityGateway::new(DiscordClient::http(&token)));
/// let dispatcher = Arc::new(Dispatcher::new(registry, resolver, gateway, elevation, config));
/// DiscordClient::new(&token, dispatcher, roles).await?.start().await?;
/// ```
pub struct DiscordClient {
    client: Client,
}

impl DiscordClient {
    /// An HTTP client for building a [`SerenityGateway`] before connecting.
    pub fn http(token: &str) -> Arc<Http> {
        Arc::new(Http::new(token))
    }

    /// Build the client around a dispatcher.
    #[instrument(skip_all)]
    pub async fn new(
        token: &str,
        dispatcher: Arc<Dispatcher>,
        roles: CacheAside<GuildRoles>,
    ) -> StatbotResult<Self> {
        let handler = StatbotHandler::new(dispatcher, roles);
        let client = Client::builder(token, StatbotHandler::intents())
            .event_handler(handler)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to create Discord client");
                GatewayError::new(GatewayErrorKind::Connection(format!(
                    "Failed to create Discord client: {}",
                    e
                )))
            })?;
        info!("Discord client created");
        Ok(Self { client })
    }

    /// The client's own HTTP handle.
    pub fn gateway(&self) -> SerenityGateway {
        SerenityGateway::new(Arc::clone(&self.client.http))
    }

    /// Connect and process events until the connection ends.
    pub async fn start(&mut self) -> StatbotResult<()> {
        info!("Starting Discord client");
        self.client.start().await.map_err(|e| {
            error!(error = %e, "Discord client stopped");
            GatewayError::new(GatewayErrorKind::Connection(e.to_string()))
        })?;
        Ok(())
    }
}
