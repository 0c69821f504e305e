use crate::Dispatcher;
use serenity::async_trait;
use serenity::client::{Context, EventHandler};
use serenity::model::channel::Message;
use serenity::model::gateway::{GatewayIntents, Ready};
use serenity::model::id::GuildId as DiscordGuildId;
use statbot_cache::CacheAside;
use statbot_interface::{InboundEvent, RoleMetadata};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Facts about a guild needed to decide who is an administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildRoles {
    /// Guild owner
    pub owner_id: u64,
    /// Roles granting the administrator permission
    pub admin_roles: HashSet<u64>,
}

impl GuildRoles {
    /// Whether a member with `role_ids` is an administrator.
    pub fn is_administrator(&self, user_id: u64, role_ids: &[u64]) -> bool {
        user_id == self.owner_id || role_ids.iter().any(|id| self.admin_roles.contains(id))
    }
}

/// Serenity event handler feeding the dispatcher.
pub struct StatbotHandler {
    dispatcher: Arc<Dispatcher>,
    roles: CacheAside<GuildRoles>,
}

impl StatbotHandler {
    /// Create a handler; `roles` memoizes per-guild role lookups.
    pub fn new(dispatcher: Arc<Dispatcher>, roles: CacheAside<GuildRoles>) -> Self {
        Self { dispatcher, roles }
    }

    /// Gateway intents the bot needs.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT
    }

    async fn guild_roles(
        &self,
        ctx: &Context,
        guild_id: DiscordGuildId,
    ) -> serenity::Result<GuildRoles> {
        let http = Arc::clone(&ctx.http);
        self.roles
            .get(
                &format!("discord.guild.roles-{}", guild_id),
                || async move {
                    let guild = guild_id.to_partial_guild(&http).await?;
                    Ok(GuildRoles {
                        owner_id: guild.owner_id.get(),
                        admin_roles: guild
                            .roles
                            .values()
                            .filter(|role| role.permissions.administrator())
                            .map(|role| role.id.get())
                            .collect(),
                    })
                },
                None,
            )
            .await
    }

    async fn to_event(&self, ctx: &Context, msg: &Message) -> InboundEvent {
        let author_id = msg.author.id.to_string();
        let context_id = msg.channel_id.to_string();
        let Some(guild_id) = msg.guild_id else {
            return InboundEvent::private(msg.content.clone(), author_id, context_id);
        };

        let role_ids: Vec<u64> = msg
            .member
            .as_ref()
            .map(|member| member.roles.iter().map(|id| id.get()).collect())
            .unwrap_or_default();
        let administrator = match self.guild_roles(ctx, guild_id).await {
            Ok(roles) => roles.is_administrator(msg.author.id.get(), &role_ids),
            Err(e) => {
                warn!(guild_id = %guild_id, error = %e, "Failed to fetch guild roles");
                false
            }
        };

        InboundEvent::group(
            msg.content.clone(),
            author_id,
            context_id,
            guild_id.to_string(),
            RoleMetadata {
                administrator,
                role_ids: role_ids.iter().map(u64::to_string).collect(),
            },
        )
    }
}

#[async_trait]
impl EventHandler for StatbotHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            user = %ready.user.name,
            guilds = ready.guilds.len(),
            "Connected to Discord"
        );
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let event = self.to_event(&ctx, &msg).await;
        debug!(message_id = %msg.id, "Dispatching message");
        self.dispatcher.spawn_detached(event);
    }
}
