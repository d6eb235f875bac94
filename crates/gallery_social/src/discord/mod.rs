//! Discord integration built on serenity.
//!
//! - [`DiscordPlatform`]: `GalleryPlatform` over serenity's HTTP client and cache
//! - [`GalleryHandler`]: gateway events (readiness, channel deletion, `galset`)
//! - [`GalleryBot`]: client setup and lifecycle alongside the curation loop

mod client;
mod handler;
mod platform;

pub use client::GalleryBot;
pub use handler::GalleryHandler;
pub use platform::{DISCORD_EPOCH_MS, DiscordPlatform, snowflake_at, snowflake_time};
