use crate::{CommandContext, CommandDescriptor, CommandHandler, CommandHelp, CommandOutcome, StatsParams};
use async_trait::async_trait;
use statbot_cache::CacheAside;
use statbot_error::{CommandResult, StatsErrorKind, StatsResult};
use statbot_interface::{InboundEvent, PermissionLevel, PlayerSummary, StatsApi, StatsQuery};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Looks up a player's headline stats, memoized per query.
pub struct StatsCommand {
    api: Arc<dyn StatsApi>,
    cache: Arc<CacheAside<PlayerSummary>>,
}

impl StatsCommand {
    /// Create the command over a stats API and a shared result cache.
    pub fn new(api: Arc<dyn StatsApi>, cache: Arc<CacheAside<PlayerSummary>>) -> Self {
        Self { api, cache }
    }

    #[instrument(skip(self), fields(key = %query.cache_key()))]
    async fn lookup(&self, query: &StatsQuery, refresh: bool) -> StatsResult<PlayerSummary> {
        let key = query.cache_key();
        let api = &self.api;
        let compute = || async move { api.player_summary(query).await };
        if refresh {
            let removed = self
                .cache
                .del_starting_with(&StatsQuery::player_key_prefix(&query.name, query.platform));
            debug!(removed, "Dropped cached lookups for player");
            self.cache.put(&key, compute, None).await
        } else {
            self.cache.get(&key, compute, None).await
        }
    }
}

fn render(summary: &PlayerSummary, query: &StatsQuery) -> String {
    let season = if query.season < 0 {
        "current season".to_string()
    } else {
        format!("season {}", query.season)
    };
    format!(
        "**{}** ({}, level {})\n{} {} in {}\nK/D {:.2} ({} kills, {} deaths)\nWin rate {:.1}% ({} W / {} L)",
        summary.name,
        summary.platform,
        summary.level,
        query.region,
        query.mode,
        season,
        summary.kd(),
        summary.kills,
        summary.deaths,
        summary.win_rate(),
        summary.wins,
        summary.losses,
    )
}

#[async_trait]
impl CommandHandler for StatsCommand {
    async fn run(
        &self,
        ctx: &CommandContext,
        event: &InboundEvent,
        args: &[String],
        _level: PermissionLevel,
    ) -> CommandResult<CommandOutcome> {
        let params = match StatsParams::resolve(args, ctx.stats_defaults()) {
            Ok(params) => params,
            Err(e) => return Ok(CommandOutcome::InvalidUsage(e.to_string())),
        };

        match self.lookup(&params.query, params.refresh).await {
            Ok(summary) => {
                ctx.reply(event, &render(&summary, &params.query)).await?;
            }
            Err(e) => match &e.kind {
                StatsErrorKind::PlayerNotFound { name, platform } => {
                    ctx.reply(event, &format!("No player named `{}` on {}.", name, platform))
                        .await?;
                }
                _ => return Err(e.into()),
            },
        }
        Ok(CommandOutcome::Completed)
    }
}

pub(super) fn descriptor(
    api: Arc<dyn StatsApi>,
    cache: Arc<CacheAside<PlayerSummary>>,
) -> CommandDescriptor {
    CommandDescriptor::new("stats", StatsCommand::new(api, cache))
        .with_alias("s")
        .with_alias("r6")
        .with_help(
            CommandHelp::new(
                "Show a player's stats",
                "stats <player> [--platform p] [--region r] [--season n|current] [--mode m] [--refresh]",
            )
            .example("stats john")
            .example("stats \"john doe\" --platform psn --mode casual")
            .example("stats john --season 12 --refresh"),
        )
}
