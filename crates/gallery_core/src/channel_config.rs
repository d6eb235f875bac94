//! Per-channel retention configuration.
//!
//! Records persist under the historical document keys (`ENABLED`,
//! `ARTIST_ROLE`, ...) and every absent key falls back to its default, so a
//! partial or empty record always yields a complete `ChannelConfig`.

use crate::ChannelId;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Artist role name used when a channel has not configured one.
pub const DEFAULT_ARTIST_ROLE: &str = "artist";

/// Two days.
pub const DEFAULT_EXPIRATION_SECS: u64 = 60 * 60 * 24 * 2;

/// Artist palette and pushpin.
pub const DEFAULT_PIN_EMOJIS: [&str; 2] = ["\u{1F3A8}", "\u{1F4CC}"];

/// Retention settings for a single channel.
///
/// # Examples
///
/// ```
/// use gallery_core::ChannelConfig;
///
/// let config: ChannelConfig = serde_json::from_str(r#"{"ENABLED": true}"#).unwrap();
/// assert!(*config.enabled());
/// assert_eq!(config.artist_role(), "artist");
/// assert_eq!(*config.expiration_secs(), 172_800);
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder,
)]
#[builder(default, setter(into))]
#[serde(default)]
pub struct ChannelConfig {
    /// Curation runs in this channel
    #[serde(rename = "ENABLED")]
    enabled: bool,

    /// Name of the role whose members count as privileged artists
    #[serde(rename = "ARTIST_ROLE")]
    artist_role: String,

    /// Messages younger than this are never touched
    #[serde(rename = "EXPIRATION")]
    expiration_secs: u64,

    /// Emojis that pin a message, by reaction or in a privileged author's text
    #[serde(rename = "PIN_EMOTES")]
    pin_emojis: Vec<String>,

    /// Only privileged authors' content is kept
    #[serde(rename = "PRIV_ONLY")]
    privileged_only: bool,

    /// Only pinned messages are kept
    #[serde(rename = "PINS_ONLY")]
    pinned_only: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            artist_role: DEFAULT_ARTIST_ROLE.to_string(),
            expiration_secs: DEFAULT_EXPIRATION_SECS,
            pin_emojis: DEFAULT_PIN_EMOJIS.iter().map(|e| e.to_string()).collect(),
            privileged_only: false,
            pinned_only: false,
        }
    }
}

impl ChannelConfig {
    /// Creates a new channel config builder.
    pub fn builder() -> ChannelConfigBuilder {
        ChannelConfigBuilder::default()
    }

    /// Turn curation on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Replace the artist role name.
    pub fn set_artist_role(&mut self, role: impl Into<String>) {
        self.artist_role = role.into();
    }

    /// Replace the maximum message age.
    pub fn set_expiration_secs(&mut self, secs: u64) {
        self.expiration_secs = secs;
    }

    /// Replace the pin emojis, dropping duplicates while keeping first-seen order.
    pub fn set_pin_emojis<I, S>(&mut self, emojis: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for emoji in emojis.into_iter().map(Into::into) {
            if !unique.contains(&emoji) {
                unique.push(emoji);
            }
        }
        self.pin_emojis = unique;
    }

    /// Keep only privileged authors' content.
    pub fn set_privileged_only(&mut self, on: bool) {
        self.privileged_only = on;
    }

    /// Keep only pinned messages.
    pub fn set_pinned_only(&mut self, on: bool) {
        self.pinned_only = on;
    }
}

/// Channel configurations keyed by channel.
///
/// The typed replacement for "look the channel up, fall back to a default".
/// [`GallerySettings::config_for`] is the single place that merge happens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GallerySettings {
    channels: BTreeMap<ChannelId, ChannelConfig>,
}

impl GallerySettings {
    /// An empty settings map.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored record for a channel, or the defaults when none exists.
    pub fn config_for(&self, channel: ChannelId) -> ChannelConfig {
        self.channels.get(&channel).cloned().unwrap_or_default()
    }

    /// Whether a record exists for the channel.
    pub fn is_configured(&self, channel: ChannelId) -> bool {
        self.channels.contains_key(&channel)
    }

    /// Whether the channel is configured and enabled.
    pub fn enabled_in(&self, channel: ChannelId) -> bool {
        self.channels.get(&channel).is_some_and(|c| c.enabled)
    }

    /// Channels with curation switched on, in id order.
    pub fn enabled_channels(&self) -> impl Iterator<Item = (ChannelId, &ChannelConfig)> {
        self.channels
            .iter()
            .filter(|(_, config)| config.enabled)
            .map(|(id, config)| (*id, config))
    }

    /// Every configured channel, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ChannelId, &ChannelConfig)> {
        self.channels.iter().map(|(id, config)| (*id, config))
    }

    /// Mutable access to a channel's record, creating it from defaults first.
    pub fn entry(&mut self, channel: ChannelId) -> &mut ChannelConfig {
        self.channels.entry(channel).or_default()
    }

    /// Insert or replace a channel's record.
    pub fn insert(&mut self, channel: ChannelId, config: ChannelConfig) -> Option<ChannelConfig> {
        self.channels.insert(channel, config)
    }

    /// Drop a channel's record.
    pub fn remove(&mut self, channel: ChannelId) -> Option<ChannelConfig> {
        self.channels.remove(&channel)
    }

    /// Number of configured channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// True when no channel is configured.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
