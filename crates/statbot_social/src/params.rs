//! Parameter resolution for stats commands.
//!
//! Handlers resolve their arguments into a fixed shape before doing any I/O.
//! Resolution returns a `Result`; the handler turns a [`ParamError`] into
//! [`CommandOutcome::InvalidUsage`](crate::CommandOutcome::InvalidUsage) so
//! the dispatcher can answer with usage help.

use statbot_interface::{CURRENT_SEASON, GameMode, Platform, Region, StatsDefaults, StatsQuery};
use std::str::FromStr;

/// Why arguments could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParamError {
    /// No player name was given.
    #[display("a player name is required")]
    MissingPlayer,
    /// A flag was given without its value.
    #[display("{} needs a value", _0)]
    MissingValue(#[error(not(source))] String),
    /// A flag value did not parse.
    #[display("'{}' is not a valid {}", value, flag)]
    InvalidValue {
        /// Flag name without dashes
        flag: String,
        /// The rejected value
        value: String,
    },
    /// A flag nobody understands.
    #[display("unknown option {}", _0)]
    UnknownFlag(#[error(not(source))] String),
    /// More positional arguments than the command takes.
    #[display("unexpected argument '{}'", _0)]
    UnexpectedArgument(#[error(not(source))] String),
}

/// Resolved arguments of a stats lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsParams {
    /// The lookup to run
    pub query: StatsQuery,
    /// Bypass the cache and refresh the stored result
    pub refresh: bool,
}

fn parse_flag<T: FromStr>(flag: &str, value: &str) -> Result<T, ParamError> {
    T::from_str(value).map_err(|_| ParamError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
    })
}

fn parse_season(value: &str) -> Result<i32, ParamError> {
    if value.eq_ignore_ascii_case("current") {
        return Ok(CURRENT_SEASON);
    }
    match value.parse::<i32>() {
        Ok(season) if season >= 0 => Ok(season),
        _ => Err(ParamError::InvalidValue {
            flag: "season".to_string(),
            value: value.to_string(),
        }),
    }
}

impl StatsParams {
    /// Resolve `args` against the defaults in effect for the context.
    ///
    /// Grammar: `<player> [--platform|-p P] [--region|-r R] [--season|-s N]
    /// [--mode|-m M] [--refresh]`. Options may appear before or after the
    /// player name.
    ///
    /// ```
    /// use statbot_interface::{Platform, StatsDefaults};
    /// use statbot_social::StatsParams;
    ///
    /// let args = vec!["john doe".to_string(), "-p".to_string(), "psn".to_string()];
    /// let params = StatsParams::resolve(&args, &StatsDefaults::default()).unwrap();
    /// assert_eq!(params.query.name, "john doe");
    /// assert_eq!(params.query.platform, Platform::Psn);
    /// ```
    pub fn resolve(args: &[String], defaults: &StatsDefaults) -> Result<Self, ParamError> {
        let mut name: Option<String> = None;
        let mut platform = defaults.platform;
        let mut region = defaults.region;
        let mut season = defaults.season;
        let mut mode = defaults.mode;
        let mut refresh = false;

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let flag = match arg.as_str() {
                "--platform" | "-p" => "platform",
                "--region" | "-r" => "region",
                "--season" | "-s" => "season",
                "--mode" | "-m" => "mode",
                "--refresh" => {
                    refresh = true;
                    continue;
                }
                other if other.starts_with("--") => {
                    return Err(ParamError::UnknownFlag(other.to_string()));
                }
                other => {
                    if name.is_some() {
                        return Err(ParamError::UnexpectedArgument(other.to_string()));
                    }
                    name = Some(other.to_string());
                    continue;
                }
            };

            let value = iter
                .next()
                .ok_or_else(|| ParamError::MissingValue(arg.clone()))?;
            match flag {
                "platform" => platform = parse_flag::<Platform>(flag, value)?,
                "region" => region = parse_flag::<Region>(flag, value)?,
                "season" => season = parse_season(value)?,
                _ => mode = parse_flag::<GameMode>(flag, value)?,
            }
        }

        let name = name
            .filter(|name| !name.trim().is_empty())
            .ok_or(ParamError::MissingPlayer)?;

        Ok(Self {
            query: StatsQuery {
                name,
                platform,
                region,
                season,
                mode,
            },
            refresh,
        })
    }
}
