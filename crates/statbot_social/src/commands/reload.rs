use crate::{CommandContext, CommandDescriptor, CommandHandler, CommandHelp, CommandOutcome};
use async_trait::async_trait;
use statbot_error::CommandResult;
use statbot_interface::{InboundEvent, PermissionLevel};
use tracing::info;

/// Reloads one command through the registry's module loader.
pub struct ReloadCommand;

#[async_trait]
impl CommandHandler for ReloadCommand {
    async fn run(
        &self,
        ctx: &CommandContext,
        event: &InboundEvent,
        args: &[String],
        _level: PermissionLevel,
    ) -> CommandResult<CommandOutcome> {
        let Some(name) = args.first() else {
            return Ok(CommandOutcome::InvalidUsage(
                "A command name is required".to_string(),
            ));
        };

        let reply = match ctx.registry().reload(name).await {
            Ok(descriptor) => {
                info!(command = %descriptor.name(), author_id = %event.author_id(), "Command reloaded on request");
                format!("Reloaded `{}`.", descriptor.name())
            }
            Err(e) => format!("Could not reload `{}`: {}", name, e.kind),
        };
        ctx.reply(event, &reply).await?;
        Ok(CommandOutcome::Completed)
    }
}

pub(super) fn descriptor() -> CommandDescriptor {
    CommandDescriptor::new("reload", ReloadCommand)
        .with_required_level(PermissionLevel::ADMINISTRATOR)
        .with_help(
            CommandHelp::new("Reload a command's definition and settings", "reload <command>")
                .example("reload stats"),
        )
}
