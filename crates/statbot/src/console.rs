//! Terminal messaging gateway.

use async_trait::async_trait;
use statbot_error::GatewayResult;
use statbot_interface::{ContextId, MessageHandle, MessagingGateway};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// [`MessagingGateway`] that prints replies to stdout.
///
/// Message ids are sequence numbers, so edits can be matched to the line
/// they replace.
#[derive(Debug, Default)]
pub struct ConsoleGateway {
    next_id: AtomicU64,
}

impl ConsoleGateway {
    /// Create a gateway numbering messages from 1.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessagingGateway for ConsoleGateway {
    async fn send(&self, target: &ContextId, content: &str) -> GatewayResult<MessageHandle> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(target_context = %target, message_id = id, "Console send");
        println!("[{} #{}] {}", target, id, content);
        Ok(MessageHandle::new(target.clone(), id.to_string()))
    }

    async fn edit(&self, handle: &MessageHandle, content: &str) -> GatewayResult<()> {
        debug!(target_context = %handle.context_id, message_id = %handle.message_id, "Console edit");
        println!(
            "[{} #{} edited] {}",
            handle.context_id, handle.message_id, content
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_message_ids_increase() {
        let gateway = ConsoleGateway::new();
        let target = ContextId::from("console");

        let first = gateway.send(&target, "one").await.unwrap();
        let second = gateway.send(&target, "two").await.unwrap();

        assert_eq!(first.message_id, "1");
        assert_eq!(second.message_id, "2");
        assert!(gateway.edit(&first, "uno").await.is_ok());
    }
}
