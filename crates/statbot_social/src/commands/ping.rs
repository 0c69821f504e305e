use crate::{CommandContext, CommandDescriptor, CommandHandler, CommandHelp, CommandOutcome};
use async_trait::async_trait;
use statbot_error::CommandResult;
use statbot_interface::{InboundEvent, PermissionLevel};
use tokio::time::Instant;

/// Replies, then edits the reply with the round-trip time.
pub struct PingCommand;

#[async_trait]
impl CommandHandler for PingCommand {
    async fn run(
        &self,
        ctx: &CommandContext,
        event: &InboundEvent,
        _args: &[String],
        _level: PermissionLevel,
    ) -> CommandResult<CommandOutcome> {
        let started = Instant::now();
        let handle = ctx.reply(event, "Pinging...").await?;
        let elapsed = started.elapsed().as_millis();
        ctx.gateway()
            .edit(&handle, &format!("Pong! Round trip took {} ms.", elapsed))
            .await?;
        Ok(CommandOutcome::Completed)
    }
}

pub(super) fn descriptor() -> CommandDescriptor {
    CommandDescriptor::new("ping", PingCommand)
        .with_help(CommandHelp::new("Check that the bot is responsive", "ping"))
}
