//! Diesel row types for guild configuration.

use crate::schema::guild_configs;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use statbot_error::{StoreError, StoreErrorKind};
use statbot_interface::{GuildConfig, GuildConfigUpdate, StatsDefaults};
use std::str::FromStr;

/// A stored guild configuration row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = guild_configs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GuildConfigRow {
    /// Guild id
    pub guild_id: String,
    /// Command prefix
    pub prefix: String,
    /// Default platform
    pub platform: String,
    /// Default region
    pub region: String,
    /// Default season
    pub season: i32,
    /// Default queue
    pub mode: String,
    /// When the row was first inserted
    pub created_at: NaiveDateTime,
    /// When the row last changed
    pub updated_at: NaiveDateTime,
}

fn parse_column<T: FromStr>(column: &str, value: &str) -> Result<T, StoreError> {
    T::from_str(value).map_err(|_| {
        StoreError::new(StoreErrorKind::Serialization(format!(
            "invalid {} '{}'",
            column, value
        )))
    })
}

impl TryFrom<GuildConfigRow> for GuildConfig {
    type Error = StoreError;

    fn try_from(row: GuildConfigRow) -> Result<Self, Self::Error> {
        let defaults = StatsDefaults {
            platform: parse_column("platform", &row.platform)?,
            region: parse_column("region", &row.region)?,
            season: row.season,
            mode: parse_column("mode", &row.mode)?,
        };
        Ok(GuildConfig::new(row.guild_id.into(), row.prefix, defaults))
    }
}

/// Insertable guild configuration.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = guild_configs)]
pub struct NewGuildConfigRow {
    /// Guild id
    pub guild_id: String,
    /// Command prefix
    pub prefix: String,
    /// Default platform
    pub platform: String,
    /// Default region
    pub region: String,
    /// Default season
    pub season: i32,
    /// Default queue
    pub mode: String,
}

impl From<&GuildConfig> for NewGuildConfigRow {
    fn from(config: &GuildConfig) -> Self {
        Self {
            guild_id: config.guild_id.to_string(),
            prefix: config.prefix.clone(),
            platform: config.defaults.platform.to_string(),
            region: config.defaults.region.to_string(),
            season: config.defaults.season,
            mode: config.defaults.mode.to_string(),
        }
    }
}

/// Partial update; `None` columns are left untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = guild_configs)]
pub struct GuildConfigChangeset {
    /// New command prefix
    pub prefix: Option<String>,
    /// New default platform
    pub platform: Option<String>,
    /// New default region
    pub region: Option<String>,
    /// New default season
    pub season: Option<i32>,
    /// New default queue
    pub mode: Option<String>,
}

impl From<&GuildConfigUpdate> for GuildConfigChangeset {
    fn from(update: &GuildConfigUpdate) -> Self {
        Self {
            prefix: update.prefix.clone(),
            platform: update.platform.map(|p| p.to_string()),
            region: update.region.map(|r| r.to_string()),
            season: update.season,
            mode: update.mode.map(|m| m.to_string()),
        }
    }
}
