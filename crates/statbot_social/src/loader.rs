//! Catalog-backed module loader.
//!
//! Commands are defined in code as factories. Operators can tweak the
//! dispatch metadata of any command (enabled, aliases, group-only, required
//! level) in an overrides TOML file; the file is re-read on every load, so
//! `reload <command>` picks up edits without a restart.
//!
//! ```toml
//! [commands.stats]
//! aliases = ["s", "r6"]
//!
//! [commands.ping]
//! enabled = false
//! ```

use crate::{CommandDescriptor, ModuleLoader};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use statbot_error::{RegistryError, RegistryErrorKind, RegistryResult};
use statbot_interface::PermissionLevel;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Builds a descriptor from its static definition.
pub type CommandFactory = Arc<dyn Fn() -> CommandDescriptor + Send + Sync>;

/// Static command definitions keyed by canonical name.
#[derive(Clone, Default)]
pub struct CommandCatalog {
    factories: BTreeMap<String, CommandFactory>,
}

impl CommandCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command definition.
    pub fn with<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> CommandDescriptor + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
        self
    }

    /// Build the descriptor for `name` from its definition.
    pub fn build(&self, name: &str) -> Option<CommandDescriptor> {
        self.factories.get(name).map(|factory| factory())
    }

    /// Names of all defined commands.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

/// Operator overrides for one command. Absent fields keep the definition's value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOverride {
    /// Enable or disable the command
    pub enabled: Option<bool>,
    /// Replace the alias set
    pub aliases: Option<BTreeSet<String>>,
    /// Refuse or allow in private conversations
    pub group_only: Option<bool>,
    /// Minimum permission level
    pub required_level: Option<PermissionLevel>,
}

impl CommandOverride {
    fn apply(&self, mut descriptor: CommandDescriptor) -> CommandDescriptor {
        if let Some(enabled) = self.enabled {
            descriptor = descriptor.with_enabled(enabled);
        }
        if let Some(aliases) = &self.aliases {
            descriptor = descriptor.with_aliases(aliases.clone());
        }
        if let Some(group_only) = self.group_only {
            descriptor = descriptor.with_group_only(group_only);
        }
        if let Some(level) = self.required_level {
            descriptor = descriptor.with_required_level(level);
        }
        descriptor
    }
}

/// Contents of the overrides file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOverrides {
    /// Overrides keyed by canonical command name
    #[serde(default)]
    pub commands: BTreeMap<String, CommandOverride>,
}

impl CommandOverrides {
    /// Parse overrides from TOML text.
    pub fn from_toml(content: &str) -> RegistryResult<Self> {
        toml::from_str(content).map_err(|e| {
            RegistryError::new(RegistryErrorKind::InvalidDescriptor {
                name: "overrides".to_string(),
                reason: format!("Failed to parse command overrides: {}", e),
            })
        })
    }

    /// Read overrides from a TOML file.
    pub async fn from_file(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let content = tokio::fs::read_to_string(path.as_ref()).await.map_err(|e| {
            RegistryError::new(RegistryErrorKind::InvalidDescriptor {
                name: "overrides".to_string(),
                reason: format!(
                    "Failed to read command overrides {}: {}",
                    path.as_ref().display(),
                    e
                ),
            })
        })?;
        Self::from_toml(&content)
    }

    fn apply(&self, descriptor: CommandDescriptor) -> CommandDescriptor {
        match self.commands.get(descriptor.name()) {
            Some(overrides) => overrides.apply(descriptor),
            None => descriptor,
        }
    }
}

/// [`ModuleLoader`] that rebuilds descriptors from a [`CommandCatalog`] and
/// applies the current overrides file.
pub struct CatalogModuleLoader {
    catalog: CommandCatalog,
    overrides_path: Option<PathBuf>,
}

impl CatalogModuleLoader {
    /// Create a loader; `overrides_path` is optional.
    pub fn new(catalog: CommandCatalog, overrides_path: Option<PathBuf>) -> Self {
        Self {
            catalog,
            overrides_path,
        }
    }

    async fn overrides(&self) -> RegistryResult<CommandOverrides> {
        match &self.overrides_path {
            Some(path) => CommandOverrides::from_file(path).await,
            None => Ok(CommandOverrides::default()),
        }
    }

    /// Build every catalog command with overrides applied, for start-up registration.
    #[instrument(skip(self))]
    pub async fn load_all(&self) -> RegistryResult<Vec<CommandDescriptor>> {
        let overrides = self.overrides().await?;
        let descriptors: Vec<_> = self
            .catalog
            .names()
            .filter_map(|name| self.catalog.build(name))
            .map(|descriptor| overrides.apply(descriptor))
            .collect();
        debug!(count = descriptors.len(), "Loaded command catalog");
        Ok(descriptors)
    }
}

#[async_trait]
impl ModuleLoader for CatalogModuleLoader {
    #[instrument(skip(self))]
    async fn load(&self, name: &str) -> RegistryResult<CommandDescriptor> {
        let descriptor = self.catalog.build(name).ok_or_else(|| {
            RegistryError::new(RegistryErrorKind::UnknownCommand(name.to_string()))
        })?;
        let overrides = self.overrides().await?;
        Ok(overrides.apply(descriptor))
    }
}
