//! Bot configuration.

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use statbot_cache::CacheConfig;
use statbot_error::{ConfigError, StatbotError, StatbotResult};
use statbot_interface::{PermissionLevel, StatsDefaults};
use statbot_social::{DispatcherConfig, DispatcherConfigBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../statbot.toml");

/// Prefix of environment variables overriding configuration values.
pub const ENV_PREFIX: &str = "STATBOT";

/// Prefix and help settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotSection {
    /// Prefix for private conversations and guilds without their own
    pub default_prefix: String,
    /// Token that reaches help regardless of the guild prefix
    pub global_help_token: String,
    /// Level granted to guild administrators
    pub administrator_level: PermissionLevel,
}

fn administrator_level() -> PermissionLevel {
    PermissionLevel::ADMINISTRATOR
}

impl Default for BotSection {
    fn default() -> Self {
        Self {
            default_prefix: "!".to_string(),
            global_help_token: "!help".to_string(),
            administrator_level: administrator_level(),
        }
    }
}

/// Handler execution and notice settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherSection {
    /// Upper bound on handler execution in seconds
    pub handler_timeout_secs: Option<u64>,
    /// Reply when a group-only command is used in private
    pub group_only_notice: Option<String>,
    /// Reply when the caller's level is too low
    pub insufficient_permission_notice: Option<String>,
    /// Reply when a handler fails
    pub failure_notice: Option<String>,
}

/// Command loading settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsSection {
    /// TOML file with per-command overrides, re-read on every reload
    pub overrides_path: Option<PathBuf>,
}

/// Complete bot configuration.
///
/// # Example
///
/// ```
/// use statbot::BotConfig;
///
/// let config = BotConfig::from_toml(
///     r#"
///     [bot]
///     default_prefix = "?"
///     global_help_token = "?help"
///     "#,
/// )
/// .unwrap();
/// assert_eq!(config.bot.default_prefix, "?");
/// assert_eq!(config.cache.default_ttl_secs(), &300);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Prefix and help settings
    pub bot: BotSection,
    /// Platform-wide stats defaults
    pub defaults: StatsDefaults,
    /// Stats lookup cache
    pub cache: CacheConfig,
    /// Guild configuration cache
    pub guild_cache: CacheConfig,
    /// Handler execution and notices
    pub dispatcher: DispatcherSection,
    /// Command loading
    pub commands: CommandsSection,
    /// PostgreSQL connection string; the in-memory store is used when absent
    pub database_url: Option<String>,
    /// Discord bot token
    pub discord_token: Option<String>,
}

fn config_error(message: String) -> StatbotError {
    StatbotError::from(ConfigError::new(message))
}

impl BotConfig {
    /// Load configuration with precedence, later sources overriding earlier ones:
    ///
    /// 1. bundled defaults
    /// 2. `~/.config/statbot/statbot.toml` (optional)
    /// 3. `./statbot.toml` (optional)
    /// 4. `path`, when given (required)
    /// 5. `STATBOT_*` environment variables, `__` separating sections
    ///
    /// `DATABASE_URL` and `DISCORD_TOKEN` fill in secrets that none of the
    /// above set.
    #[instrument(skip_all, fields(path = ?path.map(Path::display)))]
    pub fn load(path: Option<&Path>) -> StatbotResult<Self> {
        debug!("Loading configuration");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/statbot/statbot.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }
        builder = builder.add_source(File::with_name("statbot").required(false));

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: Self = builder
            .build()
            .map_err(|e| config_error(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| config_error(format!("Failed to parse configuration: {}", e)))?;

        if config.database_url.is_none() {
            config.database_url = std::env::var("DATABASE_URL").ok();
        }
        if config.discord_token.is_none() {
            config.discord_token = std::env::var("DISCORD_TOKEN").ok();
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text, without other sources.
    pub fn from_toml(content: &str) -> StatbotResult<Self> {
        let config: Self = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()
            .map_err(|e| config_error(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| config_error(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the dispatcher cannot work with.
    pub fn validate(&self) -> StatbotResult<()> {
        if self.bot.default_prefix.trim().is_empty() {
            return Err(config_error("bot.default_prefix must not be blank".to_string()));
        }
        let token = &self.bot.global_help_token;
        if token.is_empty() || token.chars().any(char::is_whitespace) {
            return Err(config_error(format!(
                "bot.global_help_token must be a single non-empty word, got {:?}",
                token
            )));
        }
        if self.dispatcher.handler_timeout_secs == Some(0) {
            return Err(config_error(
                "dispatcher.handler_timeout_secs must be positive".to_string(),
            ));
        }
        for (section, cache) in [("cache", &self.cache), ("guild_cache", &self.guild_cache)] {
            if *cache.sweep_interval_secs() == 0 {
                return Err(config_error(format!(
                    "{}.sweep_interval_secs must be positive",
                    section
                )));
            }
        }
        Ok(())
    }

    /// Dispatcher settings derived from this configuration.
    pub fn dispatcher_config(&self) -> StatbotResult<DispatcherConfig> {
        let defaults = DispatcherConfig::default();
        let section = &self.dispatcher;
        DispatcherConfigBuilder::default()
            .default_prefix(self.bot.default_prefix.clone())
            .global_help_token(self.bot.global_help_token.clone())
            .handler_timeout_secs(section.handler_timeout_secs)
            .group_only_notice(
                section
                    .group_only_notice
                    .clone()
                    .unwrap_or_else(|| defaults.group_only_notice().clone()),
            )
            .insufficient_permission_notice(
                section
                    .insufficient_permission_notice
                    .clone()
                    .unwrap_or_else(|| defaults.insufficient_permission_notice().clone()),
            )
            .failure_notice(
                section
                    .failure_notice
                    .clone()
                    .unwrap_or_else(|| defaults.failure_notice().clone()),
            )
            .build()
            .map_err(|e| config_error(format!("Invalid dispatcher configuration: {}", e)))
    }
}
