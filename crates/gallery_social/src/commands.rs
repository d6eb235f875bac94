//! The `galset` settings command family.
//!
//! Commands are parsed from the text following the command name and run
//! against a [`SettingsHandle`]. Validation problems come back as ordinary
//! replies; only storage failures are errors.

use derive_getters::Getters;
use gallery_core::{ChannelId, DurationStyle, format_duration, parse_duration};
use gallery_error::{CommandError, CommandErrorKind, GalleryResult};
use gallery_storage::SettingsHandle;
use std::time::Duration;
use tracing::{debug, instrument};
use unicode_segmentation::UnicodeSegmentation;

/// Name the command family answers to.
pub const COMMAND_NAME: &str = "galset";

/// Reply sent for unknown subcommands.
pub const USAGE: &str = "Usage: galset [turn|emotes|privonly|pinsonly|age|role] [value]";

/// Bulk deletes stop working past two weeks.
const MAX_EXPIRATION_SECS: u64 = 14 * 24 * 60 * 60;

const ERROR_MARK: &str = "\u{1F6AB}";
const WARNING_MARK: &str = "\u{26A0}";

/// A parsed `galset` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsCommand {
    /// Show every setting for the channel
    Show,
    /// Show or set whether curation runs
    Turn(Option<bool>),
    /// Show or replace the pin emojis
    Emotes(Vec<String>),
    /// Show or set privileged-only mode
    PrivOnly(Option<bool>),
    /// Show or set pinned-only mode
    PinsOnly(Option<bool>),
    /// Show or set the maximum message age, as typed
    Age(Option<String>),
    /// Show or set the artist role name
    Role(Option<String>),
}

impl SettingsCommand {
    /// Parse the arguments following `galset`.
    ///
    /// # Examples
    ///
    /// ```
    /// use gallery_social::SettingsCommand;
    ///
    /// assert_eq!(SettingsCommand::parse("").unwrap(), SettingsCommand::Show);
    /// assert_eq!(SettingsCommand::parse("turn on").unwrap(), SettingsCommand::Turn(Some(true)));
    /// assert_eq!(
    ///     SettingsCommand::parse("age 1 day and 2 hours").unwrap(),
    ///     SettingsCommand::Age(Some("1 day and 2 hours".to_string()))
    /// );
    /// ```
    pub fn parse(args: &str) -> Result<Self, CommandError> {
        let args = args.trim();
        let (sub, rest) = match args.split_once(char::is_whitespace) {
            Some((sub, rest)) => (sub, rest.trim()),
            None => (args, ""),
        };
        let rest = (!rest.is_empty()).then_some(rest);

        match sub.to_lowercase().as_str() {
            "" => Ok(Self::Show),
            "turn" => Ok(Self::Turn(rest.map(bool_arg).transpose()?)),
            "emotes" => Ok(Self::Emotes(
                rest.map(|r| r.split_whitespace().map(str::to_string).collect())
                    .unwrap_or_default(),
            )),
            "privonly" => Ok(Self::PrivOnly(rest.map(bool_arg).transpose()?)),
            "pinsonly" => Ok(Self::PinsOnly(rest.map(bool_arg).transpose()?)),
            "age" => Ok(Self::Age(rest.map(str::to_string))),
            "role" => Ok(Self::Role(rest.map(str::to_string))),
            other => Err(CommandError::new(CommandErrorKind::UnknownSubcommand(
                other.to_string(),
            ))),
        }
    }
}

/// Interpret a yes/no style argument.
///
/// Accepts on/off, yes/no, y/n, true/false, enable/disable and 1/0 in any case.
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "on" | "yes" | "y" | "true" | "t" | "enable" | "enabled" | "1" => Some(true),
        "off" | "no" | "n" | "false" | "f" | "disable" | "disabled" | "0" => Some(false),
        _ => None,
    }
}

fn bool_arg(text: &str) -> Result<bool, CommandError> {
    parse_bool(text).ok_or_else(|| {
        CommandError::new(CommandErrorKind::InvalidArgument {
            arg: text.to_string(),
            reason: "expected on or off".to_string(),
        })
    })
}

/// Split `<prefix>galset ...` into its argument text.
///
/// # Examples
///
/// ```
/// use gallery_social::strip_command;
///
/// assert_eq!(strip_command("!galset age 2d", "!"), Some("age 2d"));
/// assert_eq!(strip_command("!galset", "!"), Some(""));
/// assert_eq!(strip_command("!galsettings", "!"), None);
/// assert_eq!(strip_command("galset turn on", "!"), None);
/// ```
pub fn strip_command<'a>(content: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = content.trim_start().strip_prefix(prefix)?.strip_prefix(COMMAND_NAME)?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

/// Where a command was issued.
#[derive(Debug, Clone, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct CommandContext {
    /// Channel the command targets
    channel: ChannelId,
    /// How to refer to the channel in replies, e.g. `<#123>`
    mention: String,
    /// The bot may delete messages in the channel
    #[builder(default)]
    bot_can_manage_messages: bool,
}

impl CommandContext {
    /// Context for a command issued in `channel`.
    pub fn new(channel: ChannelId, mention: impl Into<String>, bot_can_manage_messages: bool) -> Self {
        Self {
            channel,
            mention: mention.into(),
            bot_can_manage_messages,
        }
    }
}

/// Runs settings commands against the live settings.
#[derive(Debug, Clone)]
pub struct SettingsCommands {
    settings: SettingsHandle,
    poll_interval: Duration,
}

impl SettingsCommands {
    /// Create an executor; `poll_interval` is quoted when a short age is set.
    pub fn new(settings: SettingsHandle, poll_interval: Duration) -> Self {
        Self {
            settings,
            poll_interval,
        }
    }

    /// Run a command and produce the reply text.
    ///
    /// # Errors
    ///
    /// Returns an error only when a changed setting could not be saved.
    #[instrument(skip(self, ctx), fields(channel = %ctx.channel))]
    pub fn execute(&self, ctx: &CommandContext, command: SettingsCommand) -> GalleryResult<String> {
        debug!(?command, "Executing settings command");
        match command {
            SettingsCommand::Show => Ok(self.show(ctx)),
            SettingsCommand::Turn(on_off) => self.turn(ctx, on_off),
            SettingsCommand::Emotes(emotes) => self.emotes(ctx, emotes),
            SettingsCommand::PrivOnly(on_off) => self.privonly(ctx, on_off),
            SettingsCommand::PinsOnly(on_off) => self.pinsonly(ctx, on_off),
            SettingsCommand::Age(text) => self.age(ctx, text),
            SettingsCommand::Role(role) => self.role(ctx, role),
        }
    }

    fn show(&self, ctx: &CommandContext) -> String {
        if !self.settings.is_configured(ctx.channel) {
            return format!("Settings for {}: not configured.", ctx.mention);
        }

        let config = self.settings.config_for(ctx.channel);
        let role = if config.artist_role().is_empty() {
            "(not set)"
        } else {
            config.artist_role().as_str()
        };
        let lines = [
            format!("Enabled          : {}", yes_no(*config.enabled())),
            format!("Artist role name : {}", role),
            format!(
                "Max message age  : {}",
                format_duration(*config.expiration_secs(), DurationStyle::Long)
            ),
            format!("Pin emojis       : {}", config.pin_emojis().join(", ")),
            format!("Pins only        : {}", yes_no(*config.pinned_only())),
            format!("Privileged only  : {}", yes_no(*config.privileged_only())),
        ];
        format!("Settings for {}:\n```\n{}\n```", ctx.mention, lines.join("\n"))
    }

    fn turn(&self, ctx: &CommandContext, on_off: Option<bool>) -> GalleryResult<String> {
        let current = self.settings.config_for(ctx.channel);
        let Some(on) = on_off else {
            return Ok(format!(
                "Gallery curation is {} in this channel.",
                enabled_word(*current.enabled())
            ));
        };

        let enabled_in = self.settings.is_configured(ctx.channel) && *current.enabled();
        if enabled_in == on {
            return Ok(format!("Already {}.", enabled_word(on)));
        }
        if on && !ctx.bot_can_manage_messages {
            return Ok(
                "I need the \"Manage messages\" permission in this channel to work.".to_string(),
            );
        }

        self.settings.update(ctx.channel, |c| c.set_enabled(on))?;
        Ok(format!("Gallery curation {}.", enabled_word(on)))
    }

    fn emotes(&self, ctx: &CommandContext, emotes: Vec<String>) -> GalleryResult<String> {
        if emotes.is_empty() {
            let config = self.settings.config_for(ctx.channel);
            return Ok(format!(
                "Pin emotes for this channel: {}",
                config.pin_emojis().join(" ")
            ));
        }

        if emotes.iter().any(|e| e.graphemes(true).count() != 1) {
            return Ok("Error: You can only use unicode emotes.".to_string());
        }

        self.settings.update(ctx.channel, |c| c.set_pin_emojis(emotes))?;
        Ok("Updated pin emotes for this channel.".to_string())
    }

    fn privonly(&self, ctx: &CommandContext, on_off: Option<bool>) -> GalleryResult<String> {
        let current = *self.settings.config_for(ctx.channel).privileged_only();
        let (adj, on) = self.toggle(ctx, current, on_off, |c, on| c.set_privileged_only(on))?;
        let who = if on { "privileged users" } else { "anyone" };
        Ok(format!("{} content posted by {} will be kept.", adj, who))
    }

    fn pinsonly(&self, ctx: &CommandContext, on_off: Option<bool>) -> GalleryResult<String> {
        let current = *self.settings.config_for(ctx.channel).pinned_only();
        let (adj, on) = self.toggle(ctx, current, on_off, |c, on| c.set_pinned_only(on))?;
        let what = if on {
            "only pinned messages"
        } else {
            "all messages with content"
        };
        Ok(format!("{} {} will be kept.", adj, what))
    }

    fn toggle<F>(
        &self,
        ctx: &CommandContext,
        current: bool,
        requested: Option<bool>,
        apply: F,
    ) -> GalleryResult<(&'static str, bool)>
    where
        F: FnOnce(&mut gallery_core::ChannelConfig, bool),
    {
        match requested {
            None => Ok(("Currently,", current)),
            Some(on) if on == current => Ok(("No change:", on)),
            Some(on) => {
                self.settings.update(ctx.channel, |c| apply(c, on))?;
                Ok(("Updated:", on))
            }
        }
    }

    fn age(&self, ctx: &CommandContext, text: Option<String>) -> GalleryResult<String> {
        let Some(text) = text else {
            let secs = *self.settings.config_for(ctx.channel).expiration_secs();
            return Ok(format!(
                "Current maximum age is {}.",
                format_duration(secs, DurationStyle::Long)
            ));
        };

        let secs = match parse_duration(&text) {
            Ok(secs) => secs,
            Err(e) => return Ok(format!("{} {}", ERROR_MARK, e.kind())),
        };

        if secs >= MAX_EXPIRATION_SECS {
            return Ok(format!(
                "{} Discord limits bulk deletes to messages posted within two weeks. \
                 Please choose a maximum age shorter than that.",
                ERROR_MARK
            ));
        }

        self.settings
            .update(ctx.channel, |c| c.set_expiration_secs(secs))?;
        let mut reply = format!(
            "Maximum post age set to {}.",
            format_duration(secs, DurationStyle::Long)
        );

        let poll_secs = self.poll_interval.as_secs();
        if secs < poll_secs {
            reply.push_str(&format!(
                "\n\n{} Note: message history is only checked every {}.",
                WARNING_MARK,
                format_duration(poll_secs, DurationStyle::Long)
            ));
        }
        Ok(reply)
    }

    fn role(&self, ctx: &CommandContext, role: Option<String>) -> GalleryResult<String> {
        let Some(role) = role else {
            let config = self.settings.config_for(ctx.channel);
            return Ok(format!(
                "Artist role name is currently {}.",
                config.artist_role()
            ));
        };

        self.settings.update(ctx.channel, |c| c.set_artist_role(role))?;
        Ok("Artist role set.".to_string())
    }
}

fn yes_no(on: bool) -> &'static str {
    if on { "yes" } else { "no" }
}

fn enabled_word(on: bool) -> &'static str {
    if on { "enabled" } else { "disabled" }
}
