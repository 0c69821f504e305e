use crate::{CommandContext, CommandDescriptor, CommandHandler, CommandHelp, CommandOutcome};
use async_trait::async_trait;
use statbot_error::CommandResult;
use statbot_interface::{InboundEvent, PermissionLevel};
use std::fmt::Write;

/// Lists commands, or explains one.
pub struct HelpCommand;

fn visible(descriptor: &CommandDescriptor, level: PermissionLevel) -> bool {
    *descriptor.enabled() && level >= *descriptor.required_level()
}

fn overview(ctx: &CommandContext, level: PermissionLevel) -> String {
    let prefix = ctx.prefix();
    let mut out = format!("Commands (prefix `{}`):\n", prefix);
    for descriptor in ctx.registry().descriptors() {
        if visible(&descriptor, level) {
            let _ = writeln!(
                out,
                "`{}{}` - {}",
                prefix,
                descriptor.name(),
                descriptor.help().description
            );
        }
    }
    let _ = write!(out, "Use `{}help <command>` for details.", prefix);
    out
}

fn detail(prefix: &str, descriptor: &CommandDescriptor) -> String {
    let help = descriptor.help();
    let mut out = format!("`{}{}`\n{}", prefix, help.usage, help.description);
    if !descriptor.aliases().is_empty() {
        let aliases: Vec<&str> = descriptor.aliases().iter().map(String::as_str).collect();
        let _ = write!(out, "\nAliases: {}", aliases.join(", "));
    }
    if *descriptor.group_only() {
        out.push_str("\nOnly available in server channels.");
    }
    if !help.examples.is_empty() {
        out.push_str("\nExamples:");
        for example in &help.examples {
            let _ = write!(out, "\n  `{}{}`", prefix, example);
        }
    }
    out
}

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn run(
        &self,
        ctx: &CommandContext,
        event: &InboundEvent,
        args: &[String],
        level: PermissionLevel,
    ) -> CommandResult<CommandOutcome> {
        let reply = match args.first() {
            None => overview(ctx, level),
            Some(token) => match ctx.registry().resolve(token) {
                Some(descriptor) if visible(&descriptor, level) => detail(ctx.prefix(), &descriptor),
                _ => {
                    return Ok(CommandOutcome::InvalidUsage(format!(
                        "No command named '{}'",
                        token
                    )));
                }
            },
        };
        ctx.reply(event, &reply).await?;
        Ok(CommandOutcome::Completed)
    }
}

pub(super) fn descriptor() -> CommandDescriptor {
    CommandDescriptor::new("help", HelpCommand)
        .with_alias("h")
        .with_alias("commands")
        .with_help(
            CommandHelp::new("List commands or show how to use one", "help [command]")
                .example("help")
                .example("help stats"),
        )
}
