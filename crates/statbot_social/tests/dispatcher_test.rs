mod common;

use async_trait::async_trait;
use common::{
    CountingHandler, ErrorCounter, FailingHandler, HangingHandler, Harness, PanickingHandler,
    RecordingGateway, Shared, StubLoader,
};
use statbot_cache::{CacheAside, CacheConfig};
use statbot_error::{CommandResult, StoreResult};
use statbot_interface::{
    ConfigStore, GuildConfig, GuildConfigUpdate, GuildId, InboundEvent, PermissionLevel,
    RoleMetadata, StatsDefaults,
};
use statbot_social::{
    CommandContext, CommandDescriptor, CommandHandler, CommandHelp, CommandOutcome,
    CommandRegistry, DenyReason, DispatchOutcome, Dispatcher, DispatcherConfig,
    GuildConfigResolver, IgnoreReason, PermissionElevation,
};
use std::sync::Arc;

fn group(text: &str) -> InboundEvent {
    InboundEvent::group(text, "user-1", "channel-1", "guild-1", RoleMetadata::default())
}

fn admin(text: &str) -> InboundEvent {
    InboundEvent::group(
        text,
        "user-1",
        "channel-1",
        "guild-1",
        RoleMetadata::administrator(),
    )
}

fn private(text: &str) -> InboundEvent {
    InboundEvent::private(text, "user-1", "dm-1")
}

fn counting(harness: &Harness, name: &str) -> Arc<CountingHandler> {
    let handler = Arc::new(CountingHandler::default());
    harness
        .registry
        .register(CommandDescriptor::new(name, Shared(handler.clone())))
        .unwrap();
    handler
}

fn executed(command: &str) -> DispatchOutcome {
    DispatchOutcome::Executed {
        command: command.to_string(),
    }
}

struct UsageHandler;

#[async_trait]
impl CommandHandler for UsageHandler {
    async fn run(
        &self,
        _ctx: &CommandContext,
        _event: &InboundEvent,
        _args: &[String],
        _level: PermissionLevel,
    ) -> CommandResult<CommandOutcome> {
        Ok(CommandOutcome::InvalidUsage(
            "a player name is required".to_string(),
        ))
    }
}

#[tokio::test]
async fn test_group_only_command_in_private_is_denied_without_running() {
    let harness = Harness::with_defaults();
    let handler = Arc::new(CountingHandler::default());
    harness
        .registry
        .register(CommandDescriptor::new("setup", Shared(handler.clone())).with_group_only(true))
        .unwrap();

    let outcome = harness.dispatcher.dispatch(&private("!setup")).await;

    assert_eq!(
        outcome,
        DispatchOutcome::Denied {
            command: "setup".to_string(),
            reason: DenyReason::GroupOnly
        }
    );
    assert_eq!(
        harness.gateway.sent(),
        vec![DispatcherConfig::default().group_only_notice().clone()]
    );
    assert_eq!(handler.calls(), 0);
}

#[tokio::test]
async fn test_panicking_handler_is_contained() {
    let errors = ErrorCounter::default();
    let _guard = errors.install();

    let harness = Harness::with_defaults();
    harness
        .registry
        .register(CommandDescriptor::new("boom", PanickingHandler))
        .unwrap();
    let ping = counting(&harness, "ping");

    let outcome = harness.dispatcher.dispatch(&group("!boom")).await;
    assert_eq!(
        outcome,
        DispatchOutcome::Failed {
            command: "boom".to_string()
        }
    );
    assert_eq!(errors.count(), 1);
    assert_eq!(
        harness.gateway.sent(),
        vec![DispatcherConfig::default().failure_notice().clone()]
    );

    let outcome = harness.dispatcher.dispatch(&group("!ping")).await;
    assert_eq!(outcome, executed("ping"));
    assert_eq!(ping.calls(), 1);
    assert_eq!(errors.count(), 1);
    assert_eq!(harness.gateway.sent().len(), 1);
}

#[tokio::test]
async fn test_failing_handler_logs_once_and_sends_notice() {
    let errors = ErrorCounter::default();
    let _guard = errors.install();

    let harness = Harness::with_defaults();
    harness
        .registry
        .register(CommandDescriptor::new("stats", FailingHandler))
        .unwrap();

    let outcome = harness.dispatcher.dispatch(&private("!stats john")).await;

    assert!(matches!(outcome, DispatchOutcome::Failed { .. }));
    assert_eq!(errors.count(), 1);
    assert_eq!(harness.gateway.sent().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_hung_handler_times_out() {
    let config = DispatcherConfig::default().with_handler_timeout_secs(Some(5));
    let harness = Harness::new(Arc::new(StubLoader::default()), config);
    harness
        .registry
        .register(CommandDescriptor::new("hang", HangingHandler))
        .unwrap();

    let outcome = harness.dispatcher.dispatch(&group("!hang")).await;

    assert!(matches!(outcome, DispatchOutcome::Failed { .. }));
    assert_eq!(
        harness.gateway.sent(),
        vec![DispatcherConfig::default().failure_notice().clone()]
    );
}

#[tokio::test]
async fn test_global_help_bypasses_custom_prefix() {
    let config = DispatcherConfig::default().with_default_prefix("?".to_string());
    let harness = Harness::new(Arc::new(StubLoader::default()), config);
    let help = counting(&harness, "help");

    let outcome = harness.dispatcher.dispatch(&group("!help")).await;
    assert_eq!(outcome, executed("help"));
    assert_eq!(help.calls(), 1);
    assert!(help.last_args().is_empty());

    harness
        .resolver
        .update(&GuildId::from("guild-1"), GuildConfigUpdate::prefix("$"))
        .await
        .unwrap();
    let outcome = harness.dispatcher.dispatch(&group("!help stats")).await;
    assert_eq!(outcome, executed("help"));
    assert_eq!(help.last_args(), vec!["stats".to_string()]);

    let outcome = harness.dispatcher.dispatch(&private("!help")).await;
    assert_eq!(outcome, executed("help"));
    assert_eq!(help.calls(), 3);
}

#[tokio::test]
async fn test_unprefixed_and_unknown_text_is_ignored() {
    let harness = Harness::with_defaults();
    counting(&harness, "stats");

    for (text, reason) in [
        ("hello there", IgnoreReason::MissingPrefix),
        ("!", IgnoreReason::EmptyCommand),
        ("!   ", IgnoreReason::EmptyCommand),
        ("!dance", IgnoreReason::UnknownCommand),
    ] {
        let outcome = harness.dispatcher.dispatch(&group(text)).await;
        assert_eq!(outcome, DispatchOutcome::Ignored(reason), "text {text:?}");
    }
    assert!(harness.gateway.sent().is_empty());
}

#[tokio::test]
async fn test_permission_level_gates_execution() {
    let harness = Harness::with_defaults();
    let handler = Arc::new(CountingHandler::default());
    harness
        .registry
        .register(
            CommandDescriptor::new("purge", Shared(handler.clone()))
                .with_required_level(PermissionLevel::ADMINISTRATOR),
        )
        .unwrap();

    let outcome = harness.dispatcher.dispatch(&group("!purge")).await;
    assert_eq!(
        outcome,
        DispatchOutcome::Denied {
            command: "purge".to_string(),
            reason: DenyReason::InsufficientPermission
        }
    );
    assert_eq!(handler.calls(), 0);
    assert_eq!(
        harness.gateway.sent(),
        vec![
            DispatcherConfig::default()
                .insufficient_permission_notice()
                .clone()
        ]
    );

    let outcome = harness.dispatcher.dispatch(&admin("!purge")).await;
    assert_eq!(outcome, executed("purge"));
    assert_eq!(handler.last_level(), Some(PermissionLevel::ADMINISTRATOR));
}

#[tokio::test]
async fn test_private_events_get_base_level() {
    let harness = Harness::with_defaults();
    let handler = Arc::new(CountingHandler::default());
    harness
        .registry
        .register(
            CommandDescriptor::new("purge", Shared(handler.clone()))
                .with_required_level(PermissionLevel::ADMINISTRATOR),
        )
        .unwrap();

    let event = InboundEvent::private("!purge", "user-1", "dm-1");
    let outcome = harness.dispatcher.dispatch(&event).await;

    assert!(matches!(
        outcome,
        DispatchOutcome::Denied {
            reason: DenyReason::InsufficientPermission,
            ..
        }
    ));
}

#[tokio::test]
async fn test_disabled_command_is_silently_denied() {
    let harness = Harness::with_defaults();
    let handler = Arc::new(CountingHandler::default());
    harness
        .registry
        .register(CommandDescriptor::new("ping", Shared(handler.clone())).with_enabled(false))
        .unwrap();

    let outcome = harness.dispatcher.dispatch(&admin("!ping")).await;

    assert_eq!(
        outcome,
        DispatchOutcome::Denied {
            command: "ping".to_string(),
            reason: DenyReason::Disabled
        }
    );
    assert_eq!(handler.calls(), 0);
    assert!(harness.gateway.sent().is_empty());
}

#[tokio::test]
async fn test_invalid_usage_replies_with_usage_line() {
    let errors = ErrorCounter::default();
    let _guard = errors.install();

    let harness = Harness::with_defaults();
    harness
        .registry
        .register(
            CommandDescriptor::new("stats", UsageHandler)
                .with_help(CommandHelp::new("Show stats", "stats <player>")),
        )
        .unwrap();

    let outcome = harness.dispatcher.dispatch(&group("!stats")).await;

    assert!(matches!(outcome, DispatchOutcome::InvalidUsage { .. }));
    assert_eq!(
        harness.gateway.sent(),
        vec!["a player name is required\nUsage: !stats <player>".to_string()]
    );
    assert_eq!(errors.count(), 0);
}

#[tokio::test]
async fn test_guild_prefix_and_quoted_arguments() {
    let harness = Harness::with_defaults();
    let stats = counting(&harness, "stats");
    harness
        .resolver
        .update(&GuildId::from("guild-1"), GuildConfigUpdate::prefix("?p-"))
        .await
        .unwrap();

    let outcome = harness.dispatcher.dispatch(&group("!stats john")).await;
    assert_eq!(outcome, DispatchOutcome::Ignored(IgnoreReason::MissingPrefix));

    let outcome = harness
        .dispatcher
        .dispatch(&group(r#"?p-STATS "john doe" -p psn"#))
        .await;
    assert_eq!(outcome, executed("stats"));
    assert_eq!(stats.last_args(), vec!["john doe", "-p", "psn"]);

    let outcome = harness.dispatcher.dispatch(&private("!stats jane")).await;
    assert_eq!(outcome, executed("stats"));
    assert_eq!(stats.last_args(), vec!["jane"]);
}

#[tokio::test]
async fn test_spawned_dispatches_run_independently() {
    let harness = Harness::with_defaults();
    let ping = counting(&harness, "ping");
    let dispatcher = Arc::new(harness.dispatcher);

    let handles: Vec<_> = (0..8)
        .map(|_| dispatcher.spawn_dispatch(group("!ping")))
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap(), executed("ping"));
    }
    assert_eq!(ping.calls(), 8);
}

/// Store that panics on every read.
struct PanickingStore;

#[async_trait]
impl ConfigStore for PanickingStore {
    async fn get_config(&self, _guild_id: &GuildId) -> StoreResult<Option<GuildConfig>> {
        panic!("store driver crashed")
    }

    async fn upsert_config(
        &self,
        _guild_id: &GuildId,
        _base: &GuildConfig,
        _update: &GuildConfigUpdate,
    ) -> StoreResult<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_detached_dispatch_logs_task_failure() {
    let errors = ErrorCounter::default();
    let _guard = errors.install();

    let gateway = Arc::new(RecordingGateway::default());
    let resolver = Arc::new(GuildConfigResolver::new(
        Arc::new(PanickingStore),
        CacheAside::new(CacheConfig::default()),
        "!",
        StatsDefaults::default(),
    ));
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(CommandRegistry::new(Arc::new(StubLoader::default()))),
        resolver,
        gateway.clone(),
        PermissionElevation::default(),
        DispatcherConfig::default(),
    ));

    assert!(dispatcher.spawn_dispatch(group("!ping")).await.is_err());
    assert_eq!(errors.count(), 0);

    dispatcher.spawn_detached(group("!ping")).await.unwrap();
    assert_eq!(errors.count(), 1);
    assert!(gateway.sent().is_empty());
}
