//! The chat platform seam.

use crate::{ChannelId, ChannelInfo, ChannelPermissions, GuildId, Member, Message, MessageId, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use gallery_error::PlatformResult;

/// Host platform operations the curator depends on.
///
/// Implementations wrap a live chat client (see the Discord adapter in
/// `gallery_social`) or an in-memory fake for tests. Every method may be
/// called concurrently from several channel scans.
#[async_trait]
pub trait GalleryPlatform: Send + Sync {
    /// Resolve once the host connection is ready to serve requests.
    async fn wait_until_ready(&self);

    /// Look a channel up on the host.
    ///
    /// Returns `Ok(None)` when the channel no longer exists or is not visible.
    async fn channel(&self, id: ChannelId) -> PlatformResult<Option<ChannelInfo>>;

    /// The bot's own permissions in a channel.
    async fn permissions(&self, channel: &ChannelInfo) -> PlatformResult<ChannelPermissions>;

    /// Lazily page through messages posted strictly between `after` and `before`.
    ///
    /// Implementations must fetch pages on demand rather than loading the
    /// whole window up front.
    fn history(
        &self,
        channel: ChannelId,
        before: DateTime<Utc>,
        after: DateTime<Utc>,
    ) -> BoxStream<'_, PlatformResult<Message>>;

    /// Every user that reacted to `message` with `emoji`.
    async fn reacting_users(&self, message: &Message, emoji: &str) -> PlatformResult<Vec<UserId>>;

    /// Resolve a user to a current member of the guild.
    ///
    /// Returns `Ok(None)` for users that left the server or cannot be found.
    async fn resolve_member(&self, guild: GuildId, user: UserId) -> PlatformResult<Option<Member>>;

    /// Delete between two and one hundred messages in one call.
    async fn bulk_delete(&self, channel: ChannelId, messages: &[MessageId]) -> PlatformResult<()>;

    /// Delete a single message.
    async fn delete_one(&self, channel: ChannelId, message: MessageId) -> PlatformResult<()>;
}
