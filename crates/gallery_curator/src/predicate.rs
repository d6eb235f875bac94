//! The keep-or-delete decision for a single message.

use crate::{PrivilegeCache, RoleSet};
use gallery_core::{ChannelConfig, GalleryPlatform, GuildId, Message, StaffRoles, UserId};
use gallery_error::PlatformResult;
use tracing::{instrument, trace};

/// Reactions that let staff force a message out regardless of pins.
pub const REMOVE_EMOJIS: [&str; 1] = ["\u{274C}"];

/// A channel's retention rules, resolved against its server's roles.
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    guild: GuildId,
    config: ChannelConfig,
    roles: RoleSet,
}

impl RetentionPolicy {
    /// Build the policy for a channel in `guild`.
    pub fn new(guild: GuildId, config: ChannelConfig, staff: &StaffRoles) -> Self {
        let roles = RoleSet::new(staff, config.artist_role());
        Self {
            guild,
            config,
            roles,
        }
    }

    /// The channel configuration this policy applies.
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Start a classifier with an empty privilege memo.
    ///
    /// Create one per channel scan and drop it with the scan.
    pub fn check<'a, P>(&'a self, platform: &'a P) -> MessageCheck<'a, P>
    where
        P: GalleryPlatform + ?Sized,
    {
        MessageCheck {
            policy: self,
            platform,
            cache: PrivilegeCache::new(),
        }
    }

    fn is_pin_emoji(&self, emoji: &str) -> bool {
        self.config.pin_emojis().iter().any(|pin| pin == emoji)
    }

    fn has_content_pin(&self, content: &str) -> bool {
        self.config
            .pin_emojis()
            .iter()
            .any(|pin| !pin.is_empty() && content.contains(pin.as_str()))
    }
}

/// Every intermediate fact behind a decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetentionVerdict {
    /// Author held a privileged role
    pub author_privileged: bool,
    /// A pin emoji appears in the text
    pub content_pin: bool,
    /// A privileged member reacted with a pin emoji
    pub reaction_pin: bool,
    /// Staff reacted with a remove emoji
    pub force_remove: bool,
    /// Pinned by reaction, natively, or by a privileged author's text
    pub pinned: bool,
    /// Content that survives on its own merits
    pub keep: bool,
    /// Final decision
    pub delete: bool,
}

/// Classifier for one scan of one channel.
pub struct MessageCheck<'a, P: ?Sized> {
    policy: &'a RetentionPolicy,
    platform: &'a P,
    cache: PrivilegeCache,
}

impl<P: ?Sized> std::fmt::Debug for MessageCheck<'_, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageCheck")
            .field("policy", &self.policy)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl<P> MessageCheck<'_, P>
where
    P: GalleryPlatform + ?Sized,
{
    /// What this scan has learned about roles so far.
    pub fn cache(&self) -> &PrivilegeCache {
        &self.cache
    }

    /// True when the message should be deleted.
    pub async fn should_delete(&mut self, message: &Message) -> PlatformResult<bool> {
        Ok(self.evaluate(message).await?.delete)
    }

    /// Classify a message.
    ///
    /// Reacting users are only enumerated for reactions that could change
    /// the outcome.
    #[instrument(skip(self, message), fields(message_id = %message.id()))]
    pub async fn evaluate(&mut self, message: &Message) -> PlatformResult<RetentionVerdict> {
        let policy = self.policy;
        let config = policy.config();

        let author_privileged = self.author_privileged(*message.author()).await?;
        let content_pin = policy.has_content_pin(message.content());

        let mut reaction_pin = false;
        let mut force_remove = false;

        for reaction in message.reactions() {
            if force_remove {
                break;
            }
            let emoji = reaction.emoji().as_str();

            if REMOVE_EMOJIS.contains(&emoji) {
                force_remove = self.staff_reacted(message, emoji).await?;
            } else if policy.is_pin_emoji(emoji) {
                if reaction_pin || *message.pinned() || (content_pin && author_privileged) {
                    continue;
                }
                reaction_pin = self.privileged_reacted(message, emoji).await?;
            }
        }

        let pinned = reaction_pin || *message.pinned() || (content_pin && author_privileged);
        let content_keep = *message.has_attachment_or_embed() && !*config.pinned_only();
        let keep = content_keep && !(*config.privileged_only() && !author_privileged);
        let delete = force_remove || !(pinned || keep);

        trace!(
            author_privileged,
            content_pin,
            reaction_pin,
            force_remove,
            pinned,
            keep,
            delete,
            "Classified message"
        );

        Ok(RetentionVerdict {
            author_privileged,
            content_pin,
            reaction_pin,
            force_remove,
            pinned,
            keep,
            delete,
        })
    }

    async fn author_privileged(&mut self, author: UserId) -> PlatformResult<bool> {
        if let Some(privileged) = self.cache.privileged(author) {
            return Ok(privileged);
        }
        match self.platform.resolve_member(self.policy.guild, author).await? {
            Some(member) => {
                let privileged = self.policy.roles.is_privileged(&member);
                self.cache.record_privileged(author, privileged);
                Ok(privileged)
            }
            None => Ok(false),
        }
    }

    async fn staff_reacted(&mut self, message: &Message, emoji: &str) -> PlatformResult<bool> {
        for user in self.platform.reacting_users(message, emoji).await? {
            match self.cache.admin(user) {
                Some(true) => return Ok(true),
                Some(false) => continue,
                None => {}
            }
            let Some(member) = self.platform.resolve_member(self.policy.guild, user).await? else {
                continue;
            };
            let admin = self.policy.roles.is_staff(&member);
            self.cache.record_admin(user, admin);
            if admin {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn privileged_reacted(&mut self, message: &Message, emoji: &str) -> PlatformResult<bool> {
        for user in self.platform.reacting_users(message, emoji).await? {
            match self.cache.privileged(user) {
                Some(true) => return Ok(true),
                Some(false) => continue,
                None => {}
            }
            let Some(member) = self.platform.resolve_member(self.policy.guild, user).await? else {
                continue;
            };
            let privileged = self.policy.roles.is_privileged(&member);
            self.cache.record_privileged(user, privileged);
            if privileged {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
