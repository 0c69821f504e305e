//! Command descriptors and the handler contract.

use crate::{CommandRegistry, GuildConfigResolver};
use async_trait::async_trait;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use statbot_error::{CommandResult, GatewayResult, RegistryError, RegistryErrorKind, RegistryResult};
use statbot_interface::{
    GuildConfig, InboundEvent, MessageHandle, MessagingGateway, PermissionLevel, StatsDefaults,
};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// What a handler reports back to the dispatcher when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command ran and replied on its own.
    Completed,
    /// The arguments did not resolve; the dispatcher replies with usage.
    InvalidUsage(String),
}

/// Executes one command.
///
/// Handlers receive the per-dispatch [`CommandContext`], the raw event, the
/// tokenized arguments (command token excluded) and the caller's permission
/// level. Expected validation failures are reported through
/// [`CommandOutcome::InvalidUsage`]; errors and panics are caught by the
/// dispatcher and turned into a generic failure notice.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Run the command.
    async fn run(
        &self,
        ctx: &CommandContext,
        event: &InboundEvent,
        args: &[String],
        level: PermissionLevel,
    ) -> CommandResult<CommandOutcome>;
}

/// Help text attached to a descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandHelp {
    /// One-line summary
    pub description: String,
    /// Usage line without the prefix, e.g. `stats <player> [--platform p]`
    pub usage: String,
    /// Example invocations without the prefix
    #[serde(default)]
    pub examples: Vec<String>,
}

impl CommandHelp {
    /// Help with a description and usage line.
    pub fn new(description: impl Into<String>, usage: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            usage: usage.into(),
            examples: Vec::new(),
        }
    }

    /// Add an example invocation.
    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }
}

/// One invocable command.
///
/// Descriptors are immutable once registered; the registry replaces them
/// wholesale on reload.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use statbot_error::CommandResult;
/// use statbot_interface::{InboundEvent, PermissionLevel};
/// use statbot_social::{CommandContext, CommandDescriptorBuilder, CommandHandler, CommandOutcome};
///
/// struct Echo;
///
/// #[async_trait]
/// impl CommandHandler for Echo {
///     async fn run(
///         &self,
///         ctx: &CommandContext,
///         event: &InboundEvent,
///         args: &[String],
///         _level: PermissionLevel,
///     ) -> CommandResult<CommandOutcome> {
///         ctx.reply(event, &args.join(" ")).await?;
///         Ok(CommandOutcome::Completed)
///     }
/// }
///
/// let descriptor = CommandDescriptorBuilder::default()
///     .name("echo")
///     .alias("say")
///     .handler(Echo)
///     .build()
///     .unwrap();
/// assert!(descriptor.validate().is_ok());
/// ```
#[derive(Clone, Getters, derive_setters::Setters, derive_builder::Builder)]
#[setters(prefix = "with_")]
#[builder(pattern = "owned")]
pub struct CommandDescriptor {
    /// Canonical name
    #[builder(setter(into))]
    name: String,
    /// Alternate invocation tokens
    #[builder(setter(custom), default)]
    aliases: BTreeSet<String>,
    /// Disabled commands are never executed
    #[builder(default = "true")]
    enabled: bool,
    /// Refused in private conversations
    #[builder(default)]
    group_only: bool,
    /// Minimum permission level
    #[builder(default)]
    required_level: PermissionLevel,
    /// Help text
    #[builder(default)]
    help: CommandHelp,
    /// The handler
    #[builder(setter(custom))]
    handler: Arc<dyn CommandHandler>,
}

impl CommandDescriptorBuilder {
    /// Add one alias.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases
            .get_or_insert_with(BTreeSet::new)
            .insert(alias.into());
        self
    }

    /// Add several aliases.
    pub fn aliases<I, S>(self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        aliases.into_iter().fold(self, |builder, alias| builder.alias(alias))
    }

    /// Set the handler.
    pub fn handler(self, handler: impl CommandHandler + 'static) -> Self {
        self.shared_handler(Arc::new(handler))
    }

    /// Set a handler that is shared with other descriptors.
    pub fn shared_handler(mut self, handler: Arc<dyn CommandHandler>) -> Self {
        self.handler = Some(handler);
        self
    }
}

fn check_token(name: &str, token: &str, what: &str) -> RegistryResult<()> {
    let reason = if token.is_empty() {
        Some(format!("{} is empty", what))
    } else if token.chars().any(char::is_whitespace) {
        Some(format!("{} '{}' contains whitespace", what, token))
    } else if token.chars().any(char::is_uppercase) {
        Some(format!("{} '{}' is not lowercase", what, token))
    } else {
        None
    };

    match reason {
        Some(reason) => Err(RegistryError::new(RegistryErrorKind::InvalidDescriptor {
            name: name.to_string(),
            reason,
        })),
        None => Ok(()),
    }
}

impl CommandDescriptor {
    /// An enabled command with no aliases, open to every level.
    ///
    /// Use the `with_*` setters for the rest of the metadata.
    pub fn new(name: impl Into<String>, handler: impl CommandHandler + 'static) -> Self {
        Self {
            name: name.into(),
            aliases: BTreeSet::new(),
            enabled: true,
            group_only: false,
            required_level: PermissionLevel::BASE,
            help: CommandHelp::default(),
            handler: Arc::new(handler),
        }
    }

    /// Add one alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.insert(alias.into());
        self
    }

    /// Reject descriptors that could never be dispatched correctly.
    ///
    /// Names and aliases must be non-empty, lowercase and free of whitespace,
    /// and no alias may repeat the canonical name.
    pub fn validate(&self) -> RegistryResult<()> {
        check_token(&self.name, &self.name, "name")?;
        for alias in &self.aliases {
            check_token(&self.name, alias, "alias")?;
            if alias == &self.name {
                return Err(RegistryError::new(RegistryErrorKind::InvalidDescriptor {
                    name: self.name.clone(),
                    reason: format!("alias '{}' repeats the canonical name", alias),
                }));
            }
        }
        Ok(())
    }

    /// Every token that resolves to this descriptor.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("enabled", &self.enabled)
            .field("group_only", &self.group_only)
            .field("required_level", &self.required_level)
            .finish_non_exhaustive()
    }
}

/// Client handle passed to every handler invocation.
///
/// Built by the dispatcher per event; cloning is cheap.
#[derive(Clone, Getters)]
pub struct CommandContext {
    /// Outbound messaging
    gateway: Arc<dyn MessagingGateway>,
    /// Command registry, for help and reload
    registry: Arc<CommandRegistry>,
    /// Guild configuration, for commands that change it
    guild_configs: Arc<GuildConfigResolver>,
    /// Prefix the command was invoked with in this context
    prefix: String,
    /// Resolved guild configuration; `None` in private conversations
    guild_config: Option<GuildConfig>,
    /// Stats defaults in effect for this context
    stats_defaults: StatsDefaults,
}

impl CommandContext {
    /// Assemble a context.
    pub fn new(
        gateway: Arc<dyn MessagingGateway>,
        registry: Arc<CommandRegistry>,
        guild_configs: Arc<GuildConfigResolver>,
        prefix: impl Into<String>,
        guild_config: Option<GuildConfig>,
    ) -> Self {
        let stats_defaults = guild_config
            .as_ref()
            .map(|config| config.defaults)
            .unwrap_or_else(|| *guild_configs.platform_defaults());
        Self {
            gateway,
            registry,
            guild_configs,
            prefix: prefix.into(),
            guild_config,
            stats_defaults,
        }
    }

    /// Send `content` to the conversation `event` came from.
    pub async fn reply(&self, event: &InboundEvent, content: &str) -> GatewayResult<MessageHandle> {
        self.gateway.send(event.context_id(), content).await
    }
}
