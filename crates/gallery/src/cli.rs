//! CLI command definitions and the non-bot command handlers.

use clap::{Parser, Subcommand, ValueEnum};
use gallery_core::{ChannelId, DurationStyle, GalleryConfig, format_duration, parse_duration};
use gallery_error::{GalleryResult, StorageError, StorageErrorKind};
use gallery_storage::{JsonSettingsStore, SettingsStore};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Gallery - keeps pinned art and clears expired chatter from gallery channels
#[derive(Parser, Debug)]
#[command(name = "gallery")]
#[command(about = "Curate Discord gallery channels", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Extra configuration file, layered over the defaults
    #[arg(short, long, global = true, env = "GALLERY_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect to Discord and run the curation loop
    Run {
        /// Override the settings document location
        #[arg(long)]
        settings: Option<PathBuf>,
    },

    /// Duration helpers
    #[command(subcommand)]
    Duration(DurationCommands),

    /// Settings document inspection
    #[command(subcommand)]
    Settings(SettingsCommands),
}

/// Duration subcommands
#[derive(Subcommand, Debug)]
pub enum DurationCommands {
    /// Parse an expression such as `1h30m` into seconds
    Parse {
        /// The duration expression
        text: String,
    },

    /// Render a number of seconds
    Format {
        /// Seconds to render
        seconds: u64,

        /// Unit spelling
        #[arg(long, default_value = "long")]
        style: StyleArg,
    },
}

/// Settings subcommands
#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Print the settings document, or one channel's effective settings
    Show {
        /// Override the settings document location
        #[arg(long)]
        path: Option<PathBuf>,

        /// Only show this channel
        #[arg(long)]
        channel: Option<u64>,
    },
}

/// Duration spelling selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StyleArg {
    /// `2 days and 3 hours`
    Long,
    /// `2dys and 3hrs`
    Short,
    /// `2d3h`
    Micro,
}

impl From<StyleArg> for DurationStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Long => DurationStyle::Long,
            StyleArg::Short => DurationStyle::Short,
            StyleArg::Micro => DurationStyle::Micro,
        }
    }
}

/// Run a duration subcommand and return what it prints.
///
/// # Errors
///
/// Returns the parse error for an invalid expression.
pub fn handle_duration_command(cmd: &DurationCommands) -> GalleryResult<String> {
    match cmd {
        DurationCommands::Parse { text } => {
            let seconds = parse_duration(text)?;
            Ok(format!(
                "{} ({})",
                seconds,
                format_duration(seconds, DurationStyle::Long)
            ))
        }
        DurationCommands::Format { seconds, style } => {
            Ok(format_duration(*seconds, (*style).into()))
        }
    }
}

/// Render the settings document at `path`.
///
/// With a channel, that channel's effective settings are shown, defaults
/// included. Otherwise the whole document is printed as stored.
///
/// # Errors
///
/// Returns a storage error when the file is missing or not valid JSON.
#[instrument(skip(path), fields(path = %path.display()))]
pub fn show_settings(path: &Path, channel: Option<u64>) -> GalleryResult<String> {
    let settings = JsonSettingsStore::new(path).load()?;
    debug!(channels = settings.len(), "Loaded settings document");

    let Some(channel) = channel else {
        let json = serde_json::to_string_pretty(&settings)
            .map_err(|e| StorageError::new(StorageErrorKind::Serialization(e.to_string())))?;
        return Ok(json);
    };

    let channel = ChannelId(channel);
    let config = settings.config_for(channel);
    let configured = if settings.is_configured(channel) {
        ""
    } else {
        " (not configured, defaults shown)"
    };
    let lines = [
        format!("Channel {}{}", channel, configured),
        format!("  enabled:         {}", config.enabled()),
        format!("  artist role:     {}", config.artist_role()),
        format!(
            "  maximum age:     {}",
            format_duration(*config.expiration_secs(), DurationStyle::Long)
        ),
        format!("  pin emotes:      {}", config.pin_emojis().join(" ")),
        format!("  privileged only: {}", config.privileged_only()),
        format!("  pins only:       {}", config.pinned_only()),
    ];
    Ok(lines.join("\n"))
}

/// The settings document location: an explicit override, else the configured path.
pub fn settings_path(config: &GalleryConfig, explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.settings_path().clone())
}
