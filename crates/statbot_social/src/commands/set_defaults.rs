use crate::{CommandContext, CommandDescriptor, CommandHandler, CommandHelp, CommandOutcome};
use async_trait::async_trait;
use statbot_error::CommandResult;
use statbot_interface::{
    CURRENT_SEASON, GameMode, GuildConfigUpdate, InboundEvent, PermissionLevel, Platform, Region,
};
use std::str::FromStr;
use strum::IntoEnumIterator;

/// Guild setting changed by `setdefaults`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DefaultField {
    /// Command prefix
    Prefix,
    /// Default platform
    Platform,
    /// Default region
    Region,
    /// Default season
    Season,
    /// Default game mode
    Mode,
}

impl DefaultField {
    /// Build the update that sets this field to `value`.
    pub fn update(self, value: &str) -> Result<GuildConfigUpdate, String> {
        fn parse<T: FromStr>(field: DefaultField, value: &str) -> Result<T, String> {
            T::from_str(value).map_err(|_| format!("'{}' is not a valid {}", value, field))
        }

        let mut update = GuildConfigUpdate::default();
        match self {
            Self::Prefix => {
                if value.trim().is_empty() {
                    return Err("The prefix cannot be blank".to_string());
                }
                update.prefix = Some(value.to_string());
            }
            Self::Platform => update.platform = Some(parse::<Platform>(self, value)?),
            Self::Region => update.region = Some(parse::<Region>(self, value)?),
            Self::Season => {
                update.season = Some(if value.eq_ignore_ascii_case("current") {
                    CURRENT_SEASON
                } else {
                    parse::<u16>(self, value)?.into()
                })
            }
            Self::Mode => update.mode = Some(parse::<GameMode>(self, value)?),
        }
        Ok(update)
    }
}

/// Changes the guild's prefix or stats defaults.
pub struct SetDefaultsCommand;

#[async_trait]
impl CommandHandler for SetDefaultsCommand {
    async fn run(
        &self,
        ctx: &CommandContext,
        event: &InboundEvent,
        args: &[String],
        _level: PermissionLevel,
    ) -> CommandResult<CommandOutcome> {
        let fields = || {
            DefaultField::iter()
                .map(|field| field.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let (Some(field), Some(value)) = (args.first(), args.get(1)) else {
            return Ok(CommandOutcome::InvalidUsage(format!(
                "A setting and a value are required; settings: {}",
                fields()
            )));
        };
        if args.len() > 2 {
            return Ok(CommandOutcome::InvalidUsage(
                "Too many arguments; quote values that contain spaces".to_string(),
            ));
        }
        let Ok(field) = DefaultField::from_str(field) else {
            return Ok(CommandOutcome::InvalidUsage(format!(
                "Unknown setting '{}'; settings: {}",
                field,
                fields()
            )));
        };
        let update = match field.update(value) {
            Ok(update) => update,
            Err(reason) => return Ok(CommandOutcome::InvalidUsage(reason)),
        };
        let Some(guild_id) = event.guild_id() else {
            return Ok(CommandOutcome::InvalidUsage(
                "Defaults can only be set in a server".to_string(),
            ));
        };

        ctx.guild_configs().update(guild_id, update).await?;
        ctx.reply(event, &format!("Default {} set to `{}`.", field, value))
            .await?;
        Ok(CommandOutcome::Completed)
    }
}

pub(super) fn descriptor() -> CommandDescriptor {
    CommandDescriptor::new("setdefaults", SetDefaultsCommand)
        .with_alias("setdefault")
        .with_group_only(true)
        .with_required_level(PermissionLevel::ADMINISTRATOR)
        .with_help(
            CommandHelp::new(
                "Change this server's prefix or default stats options",
                "setdefaults <prefix|platform|region|season|mode> <value>",
            )
            .example("setdefaults prefix ?p-")
            .example("setdefaults region ncsa")
            .example("setdefaults season current"),
        )
}
