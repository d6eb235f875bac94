//! Read-only views of platform entities consumed by the curator.

use crate::{ChannelId, GuildId, MessageId, UserId};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// An emoji reaction attached to a message.
///
/// The reacting users are not carried here; they are enumerated through
/// the platform only when a reaction is relevant to the retention policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct Reaction {
    emoji: String,
    count: u32,
}

impl Reaction {
    /// Create a reaction record.
    pub fn new(emoji: impl Into<String>, count: u32) -> Self {
        Self {
            emoji: emoji.into(),
            count,
        }
    }
}

/// A chat message as seen by the curator.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use gallery_core::{ChannelId, MessageBuilder, MessageId, Reaction, UserId};
///
/// let message = MessageBuilder::default()
///     .id(MessageId(1))
///     .channel_id(ChannelId(10))
///     .author(UserId(7))
///     .timestamp(Utc::now())
///     .content("look at this 🎨")
///     .reactions(vec![Reaction::new("📌", 2)])
///     .build()
///     .unwrap();
///
/// assert!(!message.pinned());
/// assert_eq!(message.reactions().len(), 1);
/// ```
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct Message {
    /// Message identifier
    id: MessageId,
    /// Channel the message was posted in
    channel_id: ChannelId,
    /// Author of the message
    author: UserId,
    /// When the message was posted
    timestamp: DateTime<Utc>,
    /// Natively pinned on the platform
    #[builder(default)]
    pinned: bool,
    /// Carries at least one attachment or embed
    #[builder(default)]
    has_attachment_or_embed: bool,
    /// Text content
    #[builder(default)]
    content: String,
    /// Reactions in platform order
    #[builder(default)]
    reactions: Vec<Reaction>,
}

/// A server member resolved at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Member {
    id: UserId,
    role_names: Vec<String>,
}

impl Member {
    /// Create a member with the names of the roles they hold.
    pub fn new(id: UserId, role_names: Vec<String>) -> Self {
        Self { id, role_names }
    }

    /// Whether the member holds any of the given lowercase role names.
    pub fn has_any_role<'a>(&self, lowercase_names: impl IntoIterator<Item = &'a str>) -> bool {
        let wanted: Vec<&str> = lowercase_names.into_iter().collect();
        self.role_names
            .iter()
            .any(|name| wanted.contains(&name.to_lowercase().as_str()))
    }
}

/// A channel resolved on the host.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct ChannelInfo {
    /// Channel identifier
    id: ChannelId,
    /// Channel name without the leading '#'
    name: String,
    /// Owning server, absent for direct messages
    #[builder(default)]
    guild_id: Option<GuildId>,
    /// Owning server name
    #[builder(default)]
    guild_name: Option<String>,
}

impl ChannelInfo {
    /// Human label used in logs, e.g. `Art Club #gallery`.
    pub fn label(&self) -> String {
        match &self.guild_name {
            Some(guild) => format!("{} #{}", guild, self.name),
            None => format!("#{}", self.name),
        }
    }
}

/// The bot's own permissions in a channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelPermissions {
    /// Can see the channel
    pub read_messages: bool,
    /// Can read message history
    pub read_message_history: bool,
    /// Can delete other users' messages
    pub manage_messages: bool,
}

impl ChannelPermissions {
    /// All three permissions the curator needs.
    pub fn can_curate(&self) -> bool {
        self.read_messages && self.read_message_history && self.manage_messages
    }
}
