//! Shared stubs for dispatcher integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use statbot_cache::{CacheAside, CacheConfig};
use statbot_database::InMemoryConfigStore;
use statbot_error::{
    CommandError, CommandErrorKind, CommandResult, GatewayResult, RegistryError,
    RegistryErrorKind, RegistryResult, StatsError, StatsErrorKind, StatsResult,
};
use statbot_interface::{
    ContextId, InboundEvent, MessageHandle, MessagingGateway, PermissionLevel, PlayerSummary,
    StatsApi, StatsDefaults, StatsQuery,
};
use statbot_social::{
    CommandContext, CommandDescriptor, CommandHandler, CommandOutcome, CommandRegistry, Dispatcher,
    DispatcherConfig, GuildConfigResolver, ModuleLoader, PermissionElevation,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Gateway that records every send and edit.
#[derive(Default)]
pub struct RecordingGateway {
    sent: Mutex<Vec<(String, String)>>,
    edits: Mutex<Vec<(MessageHandle, String)>>,
}

impl RecordingGateway {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().iter().map(|(_, content)| content.clone()).collect()
    }

    pub fn targets(&self) -> Vec<String> {
        self.sent.lock().iter().map(|(target, _)| target.clone()).collect()
    }

    pub fn edits(&self) -> Vec<String> {
        self.edits.lock().iter().map(|(_, content)| content.clone()).collect()
    }
}

#[async_trait]
impl MessagingGateway for RecordingGateway {
    async fn send(&self, target: &ContextId, content: &str) -> GatewayResult<MessageHandle> {
        let mut sent = self.sent.lock();
        sent.push((target.to_string(), content.to_string()));
        Ok(MessageHandle::new(target.clone(), sent.len().to_string()))
    }

    async fn edit(&self, handle: &MessageHandle, content: &str) -> GatewayResult<()> {
        self.edits.lock().push((handle.clone(), content.to_string()));
        Ok(())
    }
}

/// Handler that counts invocations and remembers the last arguments.
#[derive(Default)]
pub struct CountingHandler {
    calls: AtomicUsize,
    last_args: Mutex<Vec<String>>,
    last_level: Mutex<Option<PermissionLevel>>,
}

impl CountingHandler {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_args(&self) -> Vec<String> {
        self.last_args.lock().clone()
    }

    pub fn last_level(&self) -> Option<PermissionLevel> {
        *self.last_level.lock()
    }
}

#[async_trait]
impl CommandHandler for CountingHandler {
    async fn run(
        &self,
        _ctx: &CommandContext,
        _event: &InboundEvent,
        args: &[String],
        level: PermissionLevel,
    ) -> CommandResult<CommandOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_args.lock() = args.to_vec();
        *self.last_level.lock() = Some(level);
        Ok(CommandOutcome::Completed)
    }
}

/// Forwards to a shared [`CountingHandler`] so tests keep a handle on it.
pub struct Shared(pub Arc<CountingHandler>);

#[async_trait]
impl CommandHandler for Shared {
    async fn run(
        &self,
        ctx: &CommandContext,
        event: &InboundEvent,
        args: &[String],
        level: PermissionLevel,
    ) -> CommandResult<CommandOutcome> {
        self.0.run(ctx, event, args, level).await
    }
}

/// Handler that panics as soon as it runs.
pub struct PanickingHandler;

#[async_trait]
impl CommandHandler for PanickingHandler {
    async fn run(
        &self,
        _ctx: &CommandContext,
        _event: &InboundEvent,
        _args: &[String],
        _level: PermissionLevel,
    ) -> CommandResult<CommandOutcome> {
        panic!("handler exploded");
    }
}

/// Handler that returns an error.
pub struct FailingHandler;

#[async_trait]
impl CommandHandler for FailingHandler {
    async fn run(
        &self,
        _ctx: &CommandContext,
        _event: &InboundEvent,
        _args: &[String],
        _level: PermissionLevel,
    ) -> CommandResult<CommandOutcome> {
        Err(CommandError::new(CommandErrorKind::Failed("upstream down".into())))
    }
}

/// Handler that never finishes.
pub struct HangingHandler;

#[async_trait]
impl CommandHandler for HangingHandler {
    async fn run(
        &self,
        _ctx: &CommandContext,
        _event: &InboundEvent,
        _args: &[String],
        _level: PermissionLevel,
    ) -> CommandResult<CommandOutcome> {
        std::future::pending::<()>().await;
        Ok(CommandOutcome::Completed)
    }
}

/// Loader serving descriptors from a swappable map.
#[derive(Default)]
pub struct StubLoader {
    descriptors: Mutex<HashMap<String, CommandDescriptor>>,
    loads: AtomicUsize,
}

impl StubLoader {
    pub fn serve(&self, descriptor: CommandDescriptor) {
        self.descriptors
            .lock()
            .insert(descriptor.name().clone(), descriptor);
    }

    pub fn serve_as(&self, name: &str, descriptor: CommandDescriptor) {
        self.descriptors.lock().insert(name.to_string(), descriptor);
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModuleLoader for StubLoader {
    async fn load(&self, name: &str) -> RegistryResult<CommandDescriptor> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.descriptors.lock().get(name).cloned().ok_or_else(|| {
            RegistryError::new(RegistryErrorKind::UnknownCommand(name.to_string()))
        })
    }
}

/// Loader that always fails.
pub struct FailingLoader;

#[async_trait]
impl ModuleLoader for FailingLoader {
    async fn load(&self, name: &str) -> RegistryResult<CommandDescriptor> {
        Err(RegistryError::new(RegistryErrorKind::InvalidDescriptor {
            name: name.to_string(),
            reason: "syntax error in definition".to_string(),
        }))
    }
}

/// Stats API answering from a fixed table and counting calls.
#[derive(Default)]
pub struct StubStatsApi {
    players: HashMap<String, PlayerSummary>,
    calls: AtomicUsize,
}

impl StubStatsApi {
    pub fn with_player(mut self, summary: PlayerSummary) -> Self {
        self.players.insert(summary.name.to_lowercase(), summary);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatsApi for StubStatsApi {
    async fn player_summary(&self, query: &StatsQuery) -> StatsResult<PlayerSummary> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.players
            .get(&query.name.to_lowercase())
            .cloned()
            .ok_or_else(|| {
                StatsError::new(StatsErrorKind::PlayerNotFound {
                    name: query.name.clone(),
                    platform: query.platform.to_string(),
                })
            })
    }
}

/// Layer counting ERROR events.
#[derive(Clone, Default)]
pub struct ErrorCounter(Arc<AtomicUsize>);

impl ErrorCounter {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    /// Install as the thread's default subscriber until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::set_default(subscriber)
    }
}

impl<S: Subscriber> Layer<S> for ErrorCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::ERROR {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Everything a dispatcher test needs.
pub struct Harness {
    pub gateway: Arc<RecordingGateway>,
    pub store: Arc<InMemoryConfigStore>,
    pub registry: Arc<CommandRegistry>,
    pub resolver: Arc<GuildConfigResolver>,
    pub dispatcher: Dispatcher,
}

impl Harness {
    pub fn new(loader: Arc<dyn ModuleLoader>, config: DispatcherConfig) -> Self {
        let gateway = Arc::new(RecordingGateway::default());
        let store = Arc::new(InMemoryConfigStore::new());
        let registry = Arc::new(CommandRegistry::new(loader));
        let resolver = Arc::new(GuildConfigResolver::new(
            store.clone(),
            CacheAside::new(CacheConfig::default()),
            config.default_prefix().clone(),
            StatsDefaults::default(),
        ));
        let dispatcher = Dispatcher::new(
            registry.clone(),
            resolver.clone(),
            gateway.clone(),
            PermissionElevation::default(),
            config,
        );
        Self {
            gateway,
            store,
            registry,
            resolver,
            dispatcher,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(Arc::new(StubLoader::default()), DispatcherConfig::default())
    }
}
