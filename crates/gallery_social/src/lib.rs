//! Chat-facing surfaces for Gallery.
//!
//! - [`SettingsCommand`] / [`SettingsCommands`]: the `galset` command family
//! - `discord` (feature `discord`): the serenity-backed platform, event
//!   handler and bot client

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod commands;

#[cfg(feature = "discord")]
pub mod discord;

pub use commands::{
    COMMAND_NAME, CommandContext, CommandContextBuilder, SettingsCommand, SettingsCommands,
    USAGE, parse_bool, strip_command,
};

#[cfg(feature = "discord")]
pub use discord::{DiscordPlatform, GalleryBot, GalleryHandler};
