//! Gallery - Discord gallery channel curation
//!
//! Gallery keeps art channels tidy. On a fixed schedule it walks the history of
//! every enabled channel and deletes messages that have aged past the
//! channel's retention limit, unless they carry an attachment or were pinned
//! by a privileged member. Staff tune each channel with the `galset` command
//! family.
//!
//! # Crates
//!
//! - [`gallery_core`]: identifiers, the message model, channel settings,
//!   duration parsing and the layered service configuration
//! - [`gallery_storage`]: the JSON settings document and its shared handle
//! - [`gallery_curator`]: the retention predicate, channel scanner, batch
//!   purger and the periodic curation loop
//! - [`gallery_social`]: the settings commands and, with `discord`, the
//!   serenity integration
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use gallery::{GalleryBot, GalleryConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GalleryConfig::load()?;
//!     let bot = GalleryBot::new(std::env::var("DISCORD_TOKEN")?, &config).await?;
//!     bot.start().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `discord` (default) - the serenity-backed bot and the `run` command

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;

pub use gallery_core::{
    ChannelConfig, ChannelId, DurationStyle, GalleryConfig, GallerySettings, format_duration,
    parse_duration,
};
pub use gallery_curator::{CurationHandle, CurationOptions, CurationService, CycleReport};
pub use gallery_error::{GalleryError, GalleryErrorKind, GalleryResult};
pub use gallery_social::{SettingsCommand, SettingsCommands};
pub use gallery_storage::{JsonSettingsStore, SettingsHandle, SettingsStore};

#[cfg(feature = "discord")]
pub use gallery_social::{DiscordPlatform, GalleryBot};
