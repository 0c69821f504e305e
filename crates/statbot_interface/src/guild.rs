//! Per-guild configuration.

use crate::{GameMode, GuildId, Platform, Region, StatsDefaults};
use serde::{Deserialize, Serialize};

/// Settings for one guild.
///
/// `prefix` is never empty: blank prefixes are dropped before they reach a
/// config (see [`GuildConfigUpdate::sanitized`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildConfig {
    /// Guild the settings belong to
    pub guild_id: GuildId,
    /// Command prefix
    pub prefix: String,
    /// Stats defaults applied to omitted command parameters
    pub defaults: StatsDefaults,
}

impl GuildConfig {
    /// Config for a guild that has never changed anything.
    pub fn new(guild_id: GuildId, prefix: impl Into<String>, defaults: StatsDefaults) -> Self {
        Self {
            guild_id,
            prefix: prefix.into(),
            defaults,
        }
    }

    /// Apply the fields present in `update`.
    pub fn apply(&mut self, update: &GuildConfigUpdate) {
        if let Some(prefix) = update.prefix.as_deref().filter(|p| !p.trim().is_empty()) {
            self.prefix = prefix.to_string();
        }
        if let Some(platform) = update.platform {
            self.defaults.platform = platform;
        }
        if let Some(region) = update.region {
            self.defaults.region = region;
        }
        if let Some(season) = update.season {
            self.defaults.season = season;
        }
        if let Some(mode) = update.mode {
            self.defaults.mode = mode;
        }
    }
}

/// Partial change to a [`GuildConfig`]; absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(default, setter(strip_option))]
pub struct GuildConfigUpdate {
    /// New command prefix
    #[builder(setter(into, strip_option))]
    pub prefix: Option<String>,
    /// New default platform
    pub platform: Option<Platform>,
    /// New default region
    pub region: Option<Region>,
    /// New default season
    pub season: Option<i32>,
    /// New default queue
    pub mode: Option<GameMode>,
}

impl GuildConfigUpdate {
    /// Only change the prefix.
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Self::default()
        }
    }

    /// Drop an empty or whitespace-only prefix.
    ///
    /// Other prefixes are kept verbatim, trailing spaces included, so that
    /// word prefixes such as `"r6 "` keep working.
    pub fn sanitized(mut self) -> Self {
        self.prefix = self.prefix.filter(|p| !p.trim().is_empty());
        self
    }

    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.prefix.is_none()
            && self.platform.is_none()
            && self.region.is_none()
            && self.season.is_none()
            && self.mode.is_none()
    }
}
