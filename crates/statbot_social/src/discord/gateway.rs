use async_trait::async_trait;
use serenity::builder::EditMessage;
use serenity::http::Http;
use serenity::model::id::{ChannelId, MessageId};
use statbot_error::{GatewayError, GatewayErrorKind, GatewayResult};
use statbot_interface::{ContextId, MessageHandle, MessagingGateway};
use std::sync::Arc;
use tracing::{debug, instrument};

/// [`MessagingGateway`] over the Discord HTTP API.
///
/// Context ids are Discord channel snowflakes in decimal form.
#[derive(Clone)]
pub struct SerenityGateway {
    http: Arc<Http>,
}

impl SerenityGateway {
    /// Create a gateway over an authenticated HTTP client.
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

fn snowflake(raw: &str) -> GatewayResult<u64> {
    raw.parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .ok_or_else(|| GatewayError::new(GatewayErrorKind::InvalidTarget(raw.to_string())))
}

#[async_trait]
impl MessagingGateway for SerenityGateway {
    #[instrument(skip(self, content), fields(len = content.len()))]
    async fn send(&self, target: &ContextId, content: &str) -> GatewayResult<MessageHandle> {
        let channel = ChannelId::new(snowflake(target.as_str())?);
        let message = channel
            .say(&self.http, content)
            .await
            .map_err(|e| GatewayError::new(GatewayErrorKind::SendFailed(e.to_string())))?;
        debug!(message_id = %message.id, "Message sent");
        Ok(MessageHandle::new(target.clone(), message.id.to_string()))
    }

    #[instrument(skip(self, content), fields(len = content.len()))]
    async fn edit(&self, handle: &MessageHandle, content: &str) -> GatewayResult<()> {
        let channel = ChannelId::new(snowflake(handle.context_id.as_str())?);
        let message = MessageId::new(snowflake(&handle.message_id)?);
        channel
            .edit_message(&self.http, message, EditMessage::new().content(content))
            .await
            .map_err(|e| GatewayError::new(GatewayErrorKind::EditFailed(e.to_string())))?;
        Ok(())
    }
}
