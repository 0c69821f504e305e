//! Game-stats domain values exchanged with the stats API.

use serde::{Deserialize, Serialize};

/// Season number meaning "whatever season is current upstream".
pub const CURRENT_SEASON: i32 = -1;

/// Gaming platform a player account lives on.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Platform {
    /// Personal computer
    #[default]
    #[strum(to_string = "pc", serialize = "uplay")]
    Pc,
    /// Xbox
    #[strum(to_string = "xbox", serialize = "xbl", serialize = "xone")]
    Xbox,
    /// PlayStation
    #[strum(to_string = "psn", serialize = "ps4", serialize = "playstation")]
    Psn,
}

/// Matchmaking region.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Region {
    /// Europe, Middle East and Africa
    #[default]
    Emea,
    /// North, Central and South America
    Ncsa,
    /// Asia Pacific
    Apac,
}

/// Queue the stats are reported for.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum GameMode {
    /// Ranked queue
    #[default]
    Ranked,
    /// Unranked queue
    Unranked,
    /// Casual queue
    Casual,
}

/// Stats parameters a guild applies when a command omits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsDefaults {
    /// Default platform
    #[serde(default)]
    pub platform: Platform,
    /// Default region
    #[serde(default)]
    pub region: Region,
    /// Default season, [`CURRENT_SEASON`] for the live one
    #[serde(default = "current_season")]
    pub season: i32,
    /// Default queue
    #[serde(default)]
    pub mode: GameMode,
}

fn current_season() -> i32 {
    CURRENT_SEASON
}

impl Default for StatsDefaults {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            region: Region::default(),
            season: CURRENT_SEASON,
            mode: GameMode::default(),
        }
    }
}

/// A fully resolved player lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatsQuery {
    /// Player name as typed
    pub name: String,
    /// Platform to search
    pub platform: Platform,
    /// Region for ranked data
    pub region: Region,
    /// Season number or [`CURRENT_SEASON`]
    pub season: i32,
    /// Queue
    pub mode: GameMode,
}

impl StatsQuery {
    /// Prefix shared by every cached lookup about one player account.
    ///
    /// ```
    /// use statbot_interface::{Platform, StatsQuery};
    ///
    /// assert_eq!(
    ///     StatsQuery::player_key_prefix("John", Platform::Pc),
    ///     "stats.player.getPlayer-john-pc-"
    /// );
    /// ```
    ///
    /// The trailing separator keeps `john` on `pc` from matching a player
    /// whose name starts with `john-pc`.
    pub fn player_key_prefix(name: &str, platform: Platform) -> String {
        format!("stats.player.getPlayer-{}-{}-", name.to_lowercase(), platform)
    }

    /// Cache key for this exact query.
    pub fn cache_key(&self) -> String {
        format!(
            "{}{}-{}-{}",
            Self::player_key_prefix(&self.name, self.platform),
            self.region,
            self.season,
            self.mode
        )
    }
}

/// Headline numbers for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
    /// Display name as reported upstream
    pub name: String,
    /// Platform of the account
    pub platform: Platform,
    /// Clearance level
    pub level: u32,
    /// Kills in the queried mode and season
    pub kills: u64,
    /// Deaths in the queried mode and season
    pub deaths: u64,
    /// Wins in the queried mode and season
    pub wins: u64,
    /// Losses in the queried mode and season
    pub losses: u64,
}

impl PlayerSummary {
    /// Kill/death ratio; kills alone when there are no deaths.
    pub fn kd(&self) -> f64 {
        if self.deaths == 0 {
            self.kills as f64
        } else {
            self.kills as f64 / self.deaths as f64
        }
    }

    /// Win percentage in `0.0..=100.0`.
    pub fn win_rate(&self) -> f64 {
        let played = self.wins + self.losses;
        if played == 0 {
            0.0
        } else {
            self.wins as f64 * 100.0 / played as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_platform_aliases_parse() {
        assert_eq!(Platform::from_str("PS4").unwrap(), Platform::Psn);
        assert_eq!(Platform::from_str("xbl").unwrap(), Platform::Xbox);
        assert_eq!(Platform::from_str("pc").unwrap(), Platform::Pc);
        assert!(Platform::from_str("switch").is_err());
        assert_eq!(Platform::Psn.to_string(), "psn");
    }

    #[test]
    fn test_cache_key_extends_player_prefix() {
        let query = StatsQuery {
            name: "Jane".to_string(),
            platform: Platform::Pc,
            region: Region::Ncsa,
            season: 12,
            mode: GameMode::Casual,
        };
        let key = query.cache_key();
        assert!(key.starts_with(&StatsQuery::player_key_prefix("jane", Platform::Pc)));
        assert_eq!(key, "stats.player.getPlayer-jane-pc-ncsa-12-casual");
    }

    #[test]
    fn test_player_prefix_does_not_match_longer_names() {
        let other = StatsQuery {
            name: "john-pc".to_string(),
            platform: Platform::Xbox,
            region: Region::Emea,
            season: CURRENT_SEASON,
            mode: GameMode::Ranked,
        };
        let prefix = StatsQuery::player_key_prefix("john", Platform::Pc);
        assert!(!other.cache_key().starts_with(&prefix));

        let own = StatsQuery {
            name: "john".to_string(),
            ..other
        };
        assert!(!own.cache_key().starts_with(&prefix));
        assert!(
            StatsQuery {
                platform: Platform::Pc,
                ..own
            }
            .cache_key()
            .starts_with(&prefix)
        );
    }

    #[test]
    fn test_summary_ratios() {
        let summary = PlayerSummary {
            name: "john".to_string(),
            platform: Platform::Pc,
            level: 120,
            kills: 300,
            deaths: 150,
            wins: 30,
            losses: 10,
        };
        assert!((summary.kd() - 2.0).abs() < f64::EPSILON);
        assert!((summary.win_rate() - 75.0).abs() < f64::EPSILON);
    }
}
