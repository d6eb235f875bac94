//! serenity-backed platform operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use gallery_core::{
    ChannelId, ChannelInfo, ChannelInfoBuilder, ChannelPermissions, GalleryPlatform, GuildId,
    Member, Message, MessageBuilder, MessageId, Reaction, UserId,
};
use gallery_error::{PlatformError, PlatformErrorKind, PlatformResult};
use serenity::all::{
    Cache, Channel, GetMessages, GuildChannel, Http, ReactionType, RoleId,
    ChannelId as DiscordChannelId, GuildId as DiscordGuildId, Message as DiscordMessage,
    MessageId as DiscordMessageId, UserId as DiscordUserId,
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

/// Milliseconds between the Unix epoch and the first Discord snowflake.
pub const DISCORD_EPOCH_MS: i64 = 1_420_070_400_000;

/// Largest page the history and reaction endpoints return.
const PAGE_SIZE: u8 = 100;

/// The smallest snowflake created at or after `time`.
pub fn snowflake_at(time: DateTime<Utc>) -> u64 {
    let ms = (time.timestamp_millis() - DISCORD_EPOCH_MS).max(0) as u64;
    (ms << 22).max(1)
}

/// When the entity with this snowflake was created.
pub fn snowflake_time(id: u64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis((id >> 22) as i64 + DISCORD_EPOCH_MS).unwrap_or_default()
}

fn platform_error(err: serenity::Error) -> PlatformError {
    let status = match &err {
        serenity::Error::Http(http) => http.status_code().map(|s| s.as_u16()),
        _ => None,
    };
    let kind = match status {
        Some(401) => PlatformErrorKind::InvalidToken,
        Some(403) => PlatformErrorKind::InsufficientPermissions(err.to_string()),
        Some(429) => PlatformErrorKind::RateLimited(0),
        _ => PlatformErrorKind::Api(err.to_string()),
    };
    PlatformError::new(kind)
}

fn is_not_found(err: &serenity::Error) -> bool {
    matches!(err, serenity::Error::Http(http) if http.status_code().map(|s| s.as_u16()) == Some(404))
}

fn reaction_name(reaction: &ReactionType) -> String {
    match reaction {
        ReactionType::Unicode(emoji) => emoji.clone(),
        other => other.to_string(),
    }
}

fn to_gallery_message(message: &DiscordMessage) -> PlatformResult<Message> {
    let reactions = message
        .reactions
        .iter()
        .map(|r| {
            Reaction::new(
                reaction_name(&r.reaction_type),
                u32::try_from(r.count).unwrap_or(u32::MAX),
            )
        })
        .collect::<Vec<_>>();

    MessageBuilder::default()
        .id(MessageId(message.id.get()))
        .channel_id(ChannelId(message.channel_id.get()))
        .author(UserId(message.author.id.get()))
        .timestamp(snowflake_time(message.id.get()))
        .pinned(message.pinned)
        .has_attachment_or_embed(!message.attachments.is_empty() || !message.embeds.is_empty())
        .content(message.content.clone())
        .reactions(reactions)
        .build()
        .map_err(|e| PlatformError::new(PlatformErrorKind::Api(e.to_string())))
}

/// Discord as seen by the curator.
#[derive(Clone)]
pub struct DiscordPlatform {
    http: Arc<Http>,
    cache: Arc<Cache>,
    ready: watch::Receiver<bool>,
}

impl std::fmt::Debug for DiscordPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordPlatform")
            .field("ready", &*self.ready.borrow())
            .finish_non_exhaustive()
    }
}

impl DiscordPlatform {
    /// Wrap a connected client's HTTP handle and cache.
    ///
    /// `ready` is flipped by the gateway handler as the connection comes and goes.
    pub fn new(http: Arc<Http>, cache: Arc<Cache>, ready: watch::Receiver<bool>) -> Self {
        Self { http, cache, ready }
    }

    async fn guild_channel(&self, id: ChannelId) -> PlatformResult<Option<GuildChannel>> {
        match self.http.get_channel(DiscordChannelId::new(id.0)).await {
            Ok(Channel::Guild(channel)) => Ok(Some(channel)),
            Ok(_) => Ok(None),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(platform_error(e)),
        }
    }

    /// A user's permissions in a channel.
    #[instrument(skip(self))]
    pub async fn permissions_for(
        &self,
        channel: ChannelId,
        user: UserId,
    ) -> PlatformResult<ChannelPermissions> {
        let Some(channel) = self.guild_channel(channel).await? else {
            return Ok(ChannelPermissions::default());
        };
        let perms = channel
            .permissions_for_user(&self.cache, DiscordUserId::new(user.0))
            .map_err(platform_error)?;
        Ok(ChannelPermissions {
            read_messages: perms.view_channel(),
            read_message_history: perms.read_message_history(),
            manage_messages: perms.manage_messages(),
        })
    }

    /// The bot's own user id.
    pub fn current_user(&self) -> UserId {
        UserId(self.cache.current_user().id.get())
    }

    /// Every role in a guild as `(id, name)`, from the cache when possible.
    #[instrument(skip(self))]
    pub async fn guild_roles(&self, guild: GuildId) -> PlatformResult<Vec<(u64, String)>> {
        let guild_id = DiscordGuildId::new(guild.0);
        let cached: Option<Vec<(u64, String)>> = self.cache.guild(guild_id).map(|g| {
            g.roles
                .values()
                .map(|role| (role.id.get(), role.name.clone()))
                .collect()
        });
        if let Some(roles) = cached {
            return Ok(roles);
        }

        debug!("Guild not cached, fetching roles over HTTP");
        let roles = self
            .http
            .get_guild_roles(guild_id)
            .await
            .map_err(platform_error)?;
        Ok(roles
            .into_iter()
            .map(|role| (role.id.get(), role.name))
            .collect())
    }

    async fn role_names(&self, guild: GuildId, roles: &[RoleId]) -> PlatformResult<Vec<String>> {
        let all = self.guild_roles(guild).await?;
        Ok(roles
            .iter()
            .filter_map(|id| {
                all.iter()
                    .find(|(role_id, _)| *role_id == id.get())
                    .map(|(_, name)| name.clone())
            })
            .collect())
    }
}

#[async_trait]
impl GalleryPlatform for DiscordPlatform {
    async fn wait_until_ready(&self) {
        let mut ready = self.ready.clone();
        if ready.wait_for(|ready| *ready).await.is_err() {
            warn!("Readiness signal closed, continuing without it");
        }
    }

    #[instrument(skip(self))]
    async fn channel(&self, id: ChannelId) -> PlatformResult<Option<ChannelInfo>> {
        let channel = match self.http.get_channel(DiscordChannelId::new(id.0)).await {
            Ok(channel) => channel,
            Err(e) if is_not_found(&e) => return Ok(None),
            Err(e) => return Err(platform_error(e)),
        };

        let info = match channel {
            Channel::Guild(channel) => {
                let guild_name = self.cache.guild(channel.guild_id).map(|g| g.name.clone());
                ChannelInfoBuilder::default()
                    .id(id)
                    .name(channel.name.clone())
                    .guild_id(Some(GuildId(channel.guild_id.get())))
                    .guild_name(guild_name)
                    .build()
            }
            _ => ChannelInfoBuilder::default()
                .id(id)
                .name("direct-message")
                .build(),
        };
        info.map(Some)
            .map_err(|e| PlatformError::new(PlatformErrorKind::Api(e.to_string())))
    }

    async fn permissions(&self, channel: &ChannelInfo) -> PlatformResult<ChannelPermissions> {
        if channel.guild_id().is_none() {
            return Ok(ChannelPermissions::default());
        }
        self.permissions_for(*channel.id(), self.current_user()).await
    }

    fn history(
        &self,
        channel: ChannelId,
        before: DateTime<Utc>,
        after: DateTime<Utc>,
    ) -> BoxStream<'_, PlatformResult<Message>> {
        let channel_id = DiscordChannelId::new(channel.0);
        let start = snowflake_at(before);

        stream::try_unfold(Some(start), move |cursor| async move {
            let Some(cursor) = cursor else {
                return Ok(None);
            };

            let page = channel_id
                .messages(
                    &*self.http,
                    GetMessages::new()
                        .before(DiscordMessageId::new(cursor))
                        .limit(PAGE_SIZE),
                )
                .await
                .map_err(platform_error)?;
            debug!(channel_id = %channel, fetched = page.len(), "Fetched history page");

            let mut messages = Vec::with_capacity(page.len());
            let mut reached_end = page.len() < PAGE_SIZE as usize;
            for message in &page {
                if snowflake_time(message.id.get()) <= after {
                    reached_end = true;
                    break;
                }
                messages.push(to_gallery_message(message));
            }

            let next = match page.last() {
                Some(oldest) if !reached_end => Some(oldest.id.get()),
                _ => None,
            };
            Ok(Some((stream::iter(messages), next)))
        })
        .try_flatten()
        .boxed()
    }

    #[instrument(skip(self, message), fields(message_id = %message.id()))]
    async fn reacting_users(&self, message: &Message, emoji: &str) -> PlatformResult<Vec<UserId>> {
        let channel = DiscordChannelId::new(message.channel_id().0);
        let message_id = DiscordMessageId::new(message.id().0);
        let reaction = ReactionType::Unicode(emoji.to_string());

        let mut users = Vec::new();
        let mut after: Option<DiscordUserId> = None;
        loop {
            let page = channel
                .reaction_users(&self.http, message_id, reaction.clone(), Some(PAGE_SIZE), after)
                .await
                .map_err(platform_error)?;
            let full = page.len() == PAGE_SIZE as usize;
            after = page.last().map(|user| user.id);
            users.extend(page.into_iter().map(|user| UserId(user.id.get())));
            if !full || after.is_none() {
                break;
            }
        }
        Ok(users)
    }

    #[instrument(skip(self))]
    async fn resolve_member(&self, guild: GuildId, user: UserId) -> PlatformResult<Option<Member>> {
        let member = match self
            .http
            .get_member(DiscordGuildId::new(guild.0), DiscordUserId::new(user.0))
            .await
        {
            Ok(member) => member,
            Err(e) if is_not_found(&e) => return Ok(None),
            Err(e) => return Err(platform_error(e)),
        };
        let roles = self.role_names(guild, &member.roles).await?;
        Ok(Some(Member::new(user, roles)))
    }

    #[instrument(skip(self, messages), fields(count = messages.len()))]
    async fn bulk_delete(&self, channel: ChannelId, messages: &[MessageId]) -> PlatformResult<()> {
        let ids: Vec<String> = messages.iter().map(|m| m.0.to_string()).collect();
        let body = serde_json::json!({ "messages": ids });
        self.http
            .delete_messages(DiscordChannelId::new(channel.0), &body, None)
            .await
            .map_err(platform_error)
    }

    #[instrument(skip(self))]
    async fn delete_one(&self, channel: ChannelId, message: MessageId) -> PlatformResult<()> {
        self.http
            .delete_message(
                DiscordChannelId::new(channel.0),
                DiscordMessageId::new(message.0),
                None,
            )
            .await
            .map_err(platform_error)
    }
}
