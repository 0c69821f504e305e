//! Inbound message dispatch.
//!
//! Every event walks the same path:
//!
//! 1. parse context: group events resolve the guild config and permission
//!    level, private events use the default prefix and the base level
//! 2. strip the prefix (the global help token bypasses this step)
//! 3. tokenize and resolve the command
//! 4. check eligibility: enabled, group-only, then required level
//! 5. execute the handler inside an error boundary
//!
//! Nothing escapes a dispatch. Handler errors, panics and timeouts are
//! logged once and answered with a generic notice.

use crate::{
    CommandContext, CommandDescriptor, CommandOutcome, CommandRegistry, GuildConfigResolver,
    PermissionElevation, tokenize,
};
use derive_getters::Getters;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use statbot_interface::{GuildConfig, InboundEvent, MessagingGateway, PermissionLevel};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// Dispatcher settings.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
#[builder(default, setter(into))]
#[serde(default)]
pub struct DispatcherConfig {
    /// Prefix used in private conversations and for guilds without one
    default_prefix: String,
    /// Token that reaches help regardless of the guild prefix
    global_help_token: String,
    /// Canonical name of the help command
    help_command: String,
    /// Upper bound on handler execution; `None` waits forever
    handler_timeout_secs: Option<u64>,
    /// Reply when a group-only command is used in private
    group_only_notice: String,
    /// Reply when the caller's level is too low
    insufficient_permission_notice: String,
    /// Reply when a handler fails
    failure_notice: String,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            default_prefix: "!".to_string(),
            global_help_token: "!help".to_string(),
            help_command: "help".to_string(),
            handler_timeout_secs: None,
            group_only_notice: "This command can only be used in a server channel.".to_string(),
            insufficient_permission_notice: "You do not have permission to use this command."
                .to_string(),
            failure_notice: "Something went wrong while running that command.".to_string(),
        }
    }
}

impl DispatcherConfig {
    /// Handler timeout as a duration.
    pub fn handler_timeout(&self) -> Option<Duration> {
        self.handler_timeout_secs.map(Duration::from_secs)
    }

    /// If `text` is the global help token, optionally followed by help
    /// arguments, return the text after the token.
    pub fn strip_global_help<'a>(&self, text: &'a str) -> Option<&'a str> {
        let text = text.trim_start();
        let rest = text.strip_prefix(self.global_help_token.as_str())?;
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            Some(rest)
        } else {
            None
        }
    }
}

/// Per-event working state, discarded once the event is handled.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct DispatchContext {
    /// Message text as received
    raw_text: String,
    /// Whether the event came from a guild
    is_group_context: bool,
    /// Prefix in effect for the event
    resolved_prefix: String,
    /// Command token, lowercased
    command_token: String,
    /// Arguments after the command token
    args: Vec<String>,
    /// Caller's permission level
    permission_level: PermissionLevel,
}

/// Why an event was ignored without a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum IgnoreReason {
    /// Text does not start with the prefix
    #[display("missing prefix")]
    MissingPrefix,
    /// Prefix with nothing after it
    #[display("empty command")]
    EmptyCommand,
    /// Token is not a registered name or alias
    #[display("unknown command")]
    UnknownCommand,
}

/// Why an eligible-looking command was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum DenyReason {
    /// Command is disabled; no notice is sent
    #[display("disabled")]
    Disabled,
    /// Group-only command used in a private conversation
    #[display("group only")]
    GroupOnly,
    /// Caller's level is below the required level
    #[display("insufficient permission")]
    InsufficientPermission,
}

/// How a dispatch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No reply and no handler call.
    Ignored(IgnoreReason),
    /// Refused before execution.
    Denied {
        /// Canonical command name
        command: String,
        /// Why
        reason: DenyReason,
    },
    /// The handler completed.
    Executed {
        /// Canonical command name
        command: String,
    },
    /// The handler rejected its arguments; usage was sent.
    InvalidUsage {
        /// Canonical command name
        command: String,
        /// Resolution failure reported by the handler
        reason: String,
    },
    /// The handler failed, panicked or timed out; the failure notice was sent.
    Failed {
        /// Canonical command name
        command: String,
    },
    /// Guild configuration could not be resolved.
    ContextUnavailable,
}

/// Turns inbound events into permission-checked handler invocations.
///
/// The dispatcher owns no per-conversation state. Concurrent dispatches
/// share only the registry and the resolver's cache.
pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    guild_configs: Arc<GuildConfigResolver>,
    gateway: Arc<dyn MessagingGateway>,
    elevation: PermissionElevation,
    config: DispatcherConfig,
}

struct ParsedContext {
    prefix: String,
    guild_config: Option<GuildConfig>,
    level: PermissionLevel,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

impl Dispatcher {
    /// Create a dispatcher.
    pub fn new(
        registry: Arc<CommandRegistry>,
        guild_configs: Arc<GuildConfigResolver>,
        gateway: Arc<dyn MessagingGateway>,
        elevation: PermissionElevation,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            registry,
            guild_configs,
            gateway,
            elevation,
            config,
        }
    }

    /// Dispatcher settings.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// The command registry.
    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    /// Handle one event on a new task.
    pub fn spawn_dispatch(self: &Arc<Self>, event: InboundEvent) -> JoinHandle<DispatchOutcome> {
        let dispatcher = Arc::clone(self);
        tokio::spawn(async move { dispatcher.dispatch(&event).await })
    }

    /// Handle one event on a new task nobody awaits.
    ///
    /// A dispatch task that dies outside the handler boundary is logged here,
    /// once, instead of vanishing with its dropped join handle.
    pub fn spawn_detached(self: &Arc<Self>, event: InboundEvent) -> JoinHandle<()> {
        let context_id = event.context_id().to_string();
        let task = self.spawn_dispatch(event);
        tokio::spawn(async move {
            match task.await {
                Ok(outcome) => debug!(context_id = %context_id, ?outcome, "Dispatch finished"),
                Err(e) => error!(context_id = %context_id, error = %e, "Dispatch task failed"),
            }
        })
    }

    /// Handle one event.
    #[instrument(
        skip(self, event),
        fields(
            guild_id = ?event.guild_id(),
            context_id = %event.context_id(),
            author_id = %event.author_id(),
        )
    )]
    pub async fn dispatch(&self, event: &InboundEvent) -> DispatchOutcome {
        if let Some(rest) = self.config.strip_global_help(event.text()) {
            return self.dispatch_global_help(event, rest).await;
        }

        let parsed = match self.parse_context(event).await {
            Some(parsed) => parsed,
            None => return DispatchOutcome::ContextUnavailable,
        };

        let Some(body) = event.text().strip_prefix(parsed.prefix.as_str()) else {
            return DispatchOutcome::Ignored(IgnoreReason::MissingPrefix);
        };

        let mut tokens = tokenize(body).into_iter();
        let Some(token) = tokens.next() else {
            return DispatchOutcome::Ignored(IgnoreReason::EmptyCommand);
        };

        let dispatch = DispatchContext {
            raw_text: event.text().clone(),
            is_group_context: event.is_group_context(),
            resolved_prefix: parsed.prefix,
            command_token: token.to_lowercase(),
            args: tokens.collect(),
            permission_level: parsed.level,
        };
        self.run_command(event, dispatch, parsed.guild_config).await
    }

    async fn dispatch_global_help(&self, event: &InboundEvent, rest: &str) -> DispatchOutcome {
        debug!("Global help token matched");
        let (prefix, guild_config, level) = match event.guild_id() {
            Some(guild_id) => {
                let level = self.elevation.compute_level(event);
                match self.guild_configs.get_or_create(guild_id).await {
                    Ok(config) => (config.prefix.clone(), Some(config), level),
                    Err(e) => {
                        warn!(error = %e, "Guild config unavailable, showing help with defaults");
                        (self.config.default_prefix.clone(), None, level)
                    }
                }
            }
            None => (self.config.default_prefix.clone(), None, PermissionLevel::BASE),
        };

        let dispatch = DispatchContext {
            raw_text: event.text().clone(),
            is_group_context: event.is_group_context(),
            resolved_prefix: prefix,
            command_token: self.config.help_command.clone(),
            args: tokenize(rest),
            permission_level: level,
        };
        self.run_command(event, dispatch, guild_config).await
    }

    async fn parse_context(&self, event: &InboundEvent) -> Option<ParsedContext> {
        let Some(guild_id) = event.guild_id() else {
            return Some(ParsedContext {
                prefix: self.config.default_prefix.clone(),
                guild_config: None,
                level: PermissionLevel::BASE,
            });
        };

        match self.guild_configs.get_or_create(guild_id).await {
            Ok(config) => Some(ParsedContext {
                prefix: config.prefix.clone(),
                guild_config: Some(config),
                level: self.elevation.compute_level(event),
            }),
            Err(e) => {
                error!(error = %e, "Failed to resolve guild config");
                None
            }
        }
    }

    async fn run_command(
        &self,
        event: &InboundEvent,
        dispatch: DispatchContext,
        guild_config: Option<GuildConfig>,
    ) -> DispatchOutcome {
        let Some(descriptor) = self.registry.resolve(&dispatch.command_token) else {
            debug!(token = %dispatch.command_token, "Ignoring unknown command");
            return DispatchOutcome::Ignored(IgnoreReason::UnknownCommand);
        };

        if let Err(reason) = self.check_eligibility(&descriptor, &dispatch) {
            return self.deny(event, &descriptor, reason).await;
        }

        let ctx = CommandContext::new(
            Arc::clone(&self.gateway),
            Arc::clone(&self.registry),
            Arc::clone(&self.guild_configs),
            dispatch.resolved_prefix.clone(),
            guild_config,
        );
        self.execute(event, &descriptor, &ctx, &dispatch).await
    }

    fn check_eligibility(
        &self,
        descriptor: &CommandDescriptor,
        dispatch: &DispatchContext,
    ) -> Result<(), DenyReason> {
        if !*descriptor.enabled() {
            return Err(DenyReason::Disabled);
        }
        if *descriptor.group_only() && !dispatch.is_group_context {
            return Err(DenyReason::GroupOnly);
        }
        if dispatch.permission_level < *descriptor.required_level() {
            return Err(DenyReason::InsufficientPermission);
        }
        Ok(())
    }

    async fn deny(
        &self,
        event: &InboundEvent,
        descriptor: &CommandDescriptor,
        reason: DenyReason,
    ) -> DispatchOutcome {
        debug!(command = %descriptor.name(), %reason, "Command denied");
        let notice = match reason {
            DenyReason::Disabled => None,
            DenyReason::GroupOnly => Some(&self.config.group_only_notice),
            DenyReason::InsufficientPermission => Some(&self.config.insufficient_permission_notice),
        };
        if let Some(notice) = notice {
            self.notify(event, notice).await;
        }
        DispatchOutcome::Denied {
            command: descriptor.name().clone(),
            reason,
        }
    }

    #[instrument(skip_all, fields(command = %descriptor.name()))]
    async fn execute(
        &self,
        event: &InboundEvent,
        descriptor: &CommandDescriptor,
        ctx: &CommandContext,
        dispatch: &DispatchContext,
    ) -> DispatchOutcome {
        debug!(args = dispatch.args.len(), "Executing command");
        let handler = Arc::clone(descriptor.handler());
        let run = AssertUnwindSafe(async {
            handler
                .run(ctx, event, &dispatch.args, dispatch.permission_level)
                .await
        })
        .catch_unwind();

        let result = match self.config.handler_timeout() {
            Some(limit) => match tokio::time::timeout(limit, run).await {
                Ok(result) => result.map_err(|payload| panic_message(payload.as_ref())),
                Err(_) => Ok(Err(statbot_error::CommandError::new(
                    statbot_error::CommandErrorKind::Timeout {
                        seconds: limit.as_secs(),
                    },
                ))),
            },
            None => run
                .await
                .map_err(|payload| panic_message(payload.as_ref())),
        };

        let command = descriptor.name().clone();
        let failure = match result {
            Ok(Ok(CommandOutcome::Completed)) => {
                info!("Command completed");
                return DispatchOutcome::Executed { command };
            }
            Ok(Ok(CommandOutcome::InvalidUsage(reason))) => {
                debug!(%reason, "Invalid command usage");
                let usage = format!(
                    "{}\nUsage: {}{}",
                    reason,
                    dispatch.resolved_prefix,
                    descriptor.help().usage
                );
                self.notify(event, &usage).await;
                return DispatchOutcome::InvalidUsage { command, reason };
            }
            Ok(Err(e)) => e.kind.to_string(),
            Err(panic) => format!("handler panicked: {}", panic),
        };

        error!(
            guild_id = ?event.guild_id(),
            context_id = %event.context_id(),
            author_id = %event.author_id(),
            command = %command,
            error = %failure,
            "Command handler failed"
        );
        self.notify(event, &self.config.failure_notice).await;
        DispatchOutcome::Failed { command }
    }

    async fn notify(&self, event: &InboundEvent, content: &str) {
        if let Err(e) = self.gateway.send(event.context_id(), content).await {
            warn!(error = %e, "Failed to deliver notice");
        }
    }
}
