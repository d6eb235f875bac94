//! Core data types for the Gallery channel curation service.
//!
//! This crate provides the foundation shared by every Gallery crate:
//! - Identifier newtypes and the read-only message model
//! - Per-channel retention configuration and the typed settings map
//! - Human duration parsing and formatting
//! - The `GalleryPlatform` trait the curator calls into
//! - Layered service configuration

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod channel_config;
mod config;
mod ids;
mod message;
mod platform;
mod timespec;

pub use channel_config::{
    ChannelConfig, ChannelConfigBuilder, DEFAULT_ARTIST_ROLE, DEFAULT_EXPIRATION_SECS,
    DEFAULT_PIN_EMOJIS, GallerySettings,
};
pub use config::{GalleryConfig, ScheduleSettings, StaffRoles};
pub use ids::{ChannelId, GuildId, MessageId, UserId};
pub use message::{
    ChannelInfo, ChannelInfoBuilder, ChannelPermissions, Member, Message, MessageBuilder,
    Reaction,
};
pub use platform::GalleryPlatform;
pub use timespec::{DurationStyle, UNIT_TABLE, format_duration, parse_duration};
