//! Command registry with atomic single-command reload.
//!
//! The registry maps canonical names to [`CommandDescriptor`]s and aliases to
//! canonical names. It is constructed once at start-up and shared with the
//! dispatcher; the only mutation after start-up is [`CommandRegistry::reload`].
//!
//! # Invariants
//!
//! - every alias maps to a canonical name that is present
//! - a token is bound at most once, either as a name or as an alias
//! - a failed reload leaves the registry exactly as it was

use crate::CommandDescriptor;
use async_trait::async_trait;
use parking_lot::RwLock;
use statbot_error::{RegistryError, RegistryErrorKind, RegistryResult};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Produces fresh descriptors for [`CommandRegistry::reload`].
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    /// Build a new descriptor for the command named `name`.
    async fn load(&self, name: &str) -> RegistryResult<CommandDescriptor>;
}

#[derive(Clone, Default)]
struct RegistryState {
    commands: BTreeMap<String, Arc<CommandDescriptor>>,
    aliases: HashMap<String, String>,
}

impl RegistryState {
    fn is_bound(&self, token: &str) -> bool {
        self.commands.contains_key(token) || self.aliases.contains_key(token)
    }

    fn insert(&mut self, descriptor: CommandDescriptor) -> RegistryResult<()> {
        if let Some(token) = descriptor.tokens().find(|token| self.is_bound(token)) {
            return Err(RegistryError::new(RegistryErrorKind::RegistrationConflict(
                token.to_string(),
            )));
        }

        let name = descriptor.name().clone();
        for alias in descriptor.aliases() {
            self.aliases.insert(alias.clone(), name.clone());
        }
        self.commands.insert(name, Arc::new(descriptor));
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Option<Arc<CommandDescriptor>> {
        let descriptor = self.commands.remove(name)?;
        for alias in descriptor.aliases() {
            self.aliases.remove(alias);
        }
        Some(descriptor)
    }

    fn canonical<'a>(&'a self, token: &'a str) -> Option<&'a str> {
        if self.commands.contains_key(token) {
            Some(token)
        } else {
            self.aliases.get(token).map(String::as_str)
        }
    }
}

/// Registry of invocable commands.
///
/// # Example
///
/// ```rust,ignore
/// let registry = CommandRegistry::new(Arc::new(loader));
/// registry.register(help_descriptor)?;
///
/// let help = registry.resolve("h").expect("alias resolves");
/// registry.reload("help").await?;
/// ```
pub struct CommandRegistry {
    state: RwLock<RegistryState>,
    loader: Arc<dyn ModuleLoader>,
}

impl CommandRegistry {
    /// Create an empty registry that reloads through `loader`.
    pub fn new(loader: Arc<dyn ModuleLoader>) -> Self {
        debug!("Creating new CommandRegistry");
        Self {
            state: RwLock::new(RegistryState::default()),
            loader,
        }
    }

    /// Register a descriptor under its name and aliases.
    ///
    /// # Errors
    ///
    /// - `InvalidDescriptor` if the descriptor fails validation
    /// - `RegistrationConflict` if the name or any alias is already bound
    #[instrument(skip(self, descriptor), fields(command = %descriptor.name()))]
    pub fn register(&self, descriptor: CommandDescriptor) -> RegistryResult<()> {
        descriptor.validate()?;
        let aliases = descriptor.aliases().len();
        self.state.write().insert(descriptor)?;
        info!(aliases, "Registered command");
        Ok(())
    }

    /// Register every descriptor, stopping at the first failure.
    pub fn register_all<I>(&self, descriptors: I) -> RegistryResult<()>
    where
        I: IntoIterator<Item = CommandDescriptor>,
    {
        descriptors
            .into_iter()
            .try_for_each(|descriptor| self.register(descriptor))
    }

    /// Look up a command by canonical name or alias.
    ///
    /// Tokens are matched case-insensitively.
    pub fn resolve(&self, token: &str) -> Option<Arc<CommandDescriptor>> {
        let token = token.to_lowercase();
        let state = self.state.read();
        let name = state.canonical(&token)?;
        state.commands.get(name).cloned()
    }

    /// Replace one command with a freshly loaded descriptor.
    ///
    /// `name` may be the canonical name or an alias. The loader runs before
    /// anything is touched; the old descriptor and its aliases are swapped
    /// out in a single write only once the new one has loaded, validated and
    /// been checked for conflicts. On any failure the registry is unchanged.
    #[instrument(skip(self))]
    pub async fn reload(&self, name: &str) -> RegistryResult<Arc<CommandDescriptor>> {
        let canonical = self
            .resolve(name)
            .map(|descriptor| descriptor.name().clone())
            .ok_or_else(|| {
                RegistryError::new(RegistryErrorKind::UnknownCommand(name.to_string()))
            })?;

        let reload_failure = |reason: String| {
            error!(command = %canonical, %reason, "Command reload failed");
            RegistryError::new(RegistryErrorKind::ReloadFailure {
                name: canonical.clone(),
                reason,
            })
        };

        let fresh = self
            .loader
            .load(&canonical)
            .await
            .map_err(|e| reload_failure(e.kind.to_string()))?;

        if fresh.name() != &canonical {
            return Err(reload_failure(format!(
                "loader returned '{}'",
                fresh.name()
            )));
        }
        fresh
            .validate()
            .map_err(|e| reload_failure(e.kind.to_string()))?;

        let mut state = self.state.write();
        let mut next = state.clone();
        next.remove(&canonical);
        next.insert(fresh)
            .map_err(|e| reload_failure(e.kind.to_string()))?;
        *state = next;

        let reloaded = state
            .commands
            .get(&canonical)
            .cloned()
            .ok_or_else(|| reload_failure("descriptor vanished during swap".to_string()))?;
        info!(aliases = reloaded.aliases().len(), "Reloaded command");
        Ok(reloaded)
    }

    /// All registered descriptors, ordered by name.
    pub fn descriptors(&self) -> Vec<Arc<CommandDescriptor>> {
        self.state.read().commands.values().cloned().collect()
    }

    /// All canonical names, ordered.
    pub fn names(&self) -> Vec<String> {
        self.state.read().commands.keys().cloned().collect()
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.state.read().commands.len()
    }

    /// Check if no command is registered.
    pub fn is_empty(&self) -> bool {
        self.state.read().commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CommandContext, CommandDescriptorBuilder, CommandHandler, CommandOutcome};
    use statbot_error::CommandResult;
    use statbot_interface::{InboundEvent, PermissionLevel};

    struct Noop;

    #[async_trait]
    impl CommandHandler for Noop {
        async fn run(
            &self,
            _ctx: &CommandContext,
            _event: &InboundEvent,
            _args: &[String],
            _level: PermissionLevel,
        ) -> CommandResult<CommandOutcome> {
            Ok(CommandOutcome::Completed)
        }
    }

    struct NoLoader;

    #[async_trait]
    impl ModuleLoader for NoLoader {
        async fn load(&self, name: &str) -> RegistryResult<CommandDescriptor> {
            Err(RegistryError::new(RegistryErrorKind::UnknownCommand(
                name.to_string(),
            )))
        }
    }

    fn descriptor(name: &str, aliases: &[&str]) -> CommandDescriptor {
        CommandDescriptorBuilder::default()
            .name(name)
            .aliases(aliases.iter().copied())
            .handler(Noop)
            .build()
            .unwrap()
    }

    #[test]
    fn test_alias_conflict_leaves_registry_untouched() {
        let registry = CommandRegistry::new(Arc::new(NoLoader));
        registry.register(descriptor("stats", &["s"])).unwrap();

        let err = registry
            .register(descriptor("season", &["x", "s"]))
            .unwrap_err();
        assert_eq!(err.kind, RegistryErrorKind::RegistrationConflict("s".into()));
        assert!(registry.resolve("season").is_none());
        assert!(registry.resolve("x").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_name_may_not_shadow_alias() {
        let registry = CommandRegistry::new(Arc::new(NoLoader));
        registry.register(descriptor("stats", &["s"])).unwrap();

        let err = registry.register(descriptor("s", &[])).unwrap_err();
        assert!(matches!(err.kind, RegistryErrorKind::RegistrationConflict(_)));
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let registry = CommandRegistry::new(Arc::new(NoLoader));
        registry.register(descriptor("stats", &["s"])).unwrap();

        assert!(registry.resolve("STATS").is_some());
        assert!(registry.resolve("S").is_some());
    }

    #[tokio::test]
    async fn test_reload_unknown_command() {
        let registry = CommandRegistry::new(Arc::new(NoLoader));
        let err = registry.reload("nope").await.unwrap_err();
        assert_eq!(err.kind, RegistryErrorKind::UnknownCommand("nope".into()));
    }
}
