//! Serenity event handler for the Gallery bot.

use super::DiscordPlatform;
use crate::{CommandContext, SettingsCommand, SettingsCommands, USAGE, strip_command};
use gallery_core::{ChannelId, GalleryPlatform, GuildId, UserId};
use gallery_curator::CurationOptions;
use gallery_error::{CommandErrorKind, GalleryErrorKind, GalleryResult};
use gallery_storage::SettingsHandle;
use regex::Regex;
use serenity::all::{
    ConnectionStage, Context, EventHandler, GatewayIntents, GuildChannel, Message, Ready,
    ResumedEvent, ShardStageUpdateEvent,
};
use serenity::async_trait;
use std::sync::LazyLock;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

static ROLE_MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<@&(\d+)>$").expect("role mention pattern is valid"));

/// Event handler for the Gallery bot.
///
/// Tracks gateway readiness for the curation loop, drops settings for
/// deleted channels, and answers `galset` commands.
pub struct GalleryHandler {
    settings: SettingsHandle,
    commands: SettingsCommands,
    options: CurationOptions,
    prefix: String,
    ready: watch::Sender<bool>,
}

impl GalleryHandler {
    /// Create a handler that reports readiness through `ready`.
    pub fn new(
        settings: SettingsHandle,
        options: CurationOptions,
        prefix: impl Into<String>,
        ready: watch::Sender<bool>,
    ) -> Self {
        let commands = SettingsCommands::new(settings.clone(), *options.poll_interval());
        Self {
            settings,
            commands,
            options,
            prefix: prefix.into(),
            ready,
        }
    }

    /// Required gateway intents for the bot.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MEMBERS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::GUILD_MESSAGE_REACTIONS
            | GatewayIntents::MESSAGE_CONTENT
    }

    fn platform(&self, ctx: &Context) -> DiscordPlatform {
        DiscordPlatform::new(ctx.http.clone(), ctx.cache.clone(), self.ready.subscribe())
    }

    /// Whether the user may change settings: staff, or allowed to manage messages.
    async fn authorized(
        &self,
        platform: &DiscordPlatform,
        guild: GuildId,
        channel: ChannelId,
        user: UserId,
    ) -> GalleryResult<bool> {
        if platform.permissions_for(channel, user).await?.manage_messages {
            return Ok(true);
        }
        let staff = self.options.staff_roles_for(guild);
        let names = [staff.admin().to_lowercase(), staff.moderator().to_lowercase()];
        let is_staff = platform
            .resolve_member(guild, user)
            .await?
            .is_some_and(|member| member.has_any_role(names.iter().map(String::as_str)));
        Ok(is_staff)
    }

    /// Turn a role mention or name into the role's exact name.
    async fn resolve_role(
        &self,
        platform: &DiscordPlatform,
        guild: GuildId,
        arg: &str,
    ) -> GalleryResult<Option<String>> {
        let roles = platform.guild_roles(guild).await?;
        let mentioned = ROLE_MENTION
            .captures(arg)
            .and_then(|caps| caps.get(1))
            .and_then(|id| id.as_str().parse::<u64>().ok());

        let found = match mentioned {
            Some(id) => roles.into_iter().find(|(role_id, _)| *role_id == id),
            None => roles
                .into_iter()
                .find(|(_, name)| name.eq_ignore_ascii_case(arg)),
        };
        Ok(found.map(|(_, name)| name))
    }

    #[instrument(skip(self, ctx, msg, args), fields(channel_id = %msg.channel_id, author = %msg.author.id))]
    async fn handle_command(&self, ctx: &Context, msg: &Message, args: &str) -> GalleryResult<String> {
        let Some(guild_id) = msg.guild_id else {
            return Ok(CommandErrorKind::NotInGuild.to_string());
        };
        let guild = GuildId(guild_id.get());
        let channel = ChannelId(msg.channel_id.get());
        let platform = self.platform(ctx);

        if !self.authorized(&platform, guild, channel, UserId(msg.author.id.get())).await? {
            debug!("Ignoring settings command from unauthorized user");
            return Ok(String::new());
        }

        let command = match SettingsCommand::parse(args) {
            Ok(SettingsCommand::Role(Some(arg))) => {
                match self.resolve_role(&platform, guild, &arg).await? {
                    Some(name) => SettingsCommand::Role(Some(name)),
                    None => return Ok(format!("Role \"{}\" not found.", arg)),
                }
            }
            Ok(command) => command,
            Err(e) => {
                return Ok(match e.kind {
                    CommandErrorKind::UnknownSubcommand(_) => USAGE.to_string(),
                    kind => format!("Error: {}", kind),
                });
            }
        };

        let bot_perms = platform
            .permissions_for(channel, platform.current_user())
            .await?;
        let context =
            CommandContext::new(channel, format!("<#{}>", channel), bot_perms.manage_messages);

        self.commands.execute(&context, command)
    }
}

#[async_trait]
impl EventHandler for GalleryHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            bot_name = %ready.user.name,
            guild_count = ready.guilds.len(),
            "Gallery bot connected"
        );
        self.ready.send_replace(true);
    }

    async fn resume(&self, _ctx: Context, _event: ResumedEvent) {
        debug!("Gateway session resumed");
        self.ready.send_replace(true);
    }

    async fn shard_stage_update(&self, _ctx: Context, event: ShardStageUpdateEvent) {
        let connected = matches!(event.new, ConnectionStage::Connected);
        if !connected && *self.ready.borrow() {
            warn!(stage = ?event.new, "Gateway connection lost");
        }
        self.ready.send_replace(connected);
    }

    async fn channel_delete(
        &self,
        _ctx: Context,
        channel: GuildChannel,
        _messages: Option<Vec<Message>>,
    ) {
        match self.settings.remove(ChannelId(channel.id.get())) {
            Ok(true) => info!(channel_id = %channel.id, "Dropped settings for deleted channel"),
            Ok(false) => {}
            Err(e) => error!(channel_id = %channel.id, error = %e, "Failed to drop channel settings"),
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let Some(args) = strip_command(&msg.content, &self.prefix) else {
            return;
        };

        let reply = match self.handle_command(&ctx, &msg, args).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, "Settings command failed");
                match e.kind() {
                    GalleryErrorKind::Storage(_) => "Error: could not save settings.".to_string(),
                    _ => "Error: something went wrong, please try again.".to_string(),
                }
            }
        };

        if reply.is_empty() {
            return;
        }
        if let Err(e) = msg.channel_id.say(&ctx.http, reply).await {
            error!(channel_id = %msg.channel_id, error = %e, "Failed to send reply");
        }
    }
}
