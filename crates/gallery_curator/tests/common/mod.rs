//! In-memory platform shared by the curator tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use futures::stream::{self, BoxStream, StreamExt};
use gallery_core::{
    ChannelId, ChannelInfo, ChannelInfoBuilder, ChannelPermissions, GalleryPlatform, GuildId,
    Member, Message, MessageBuilder, MessageId, Reaction, UserId,
};
use gallery_error::{PlatformError, PlatformErrorKind, PlatformResult};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration as StdDuration;

pub const GUILD: GuildId = GuildId(1);

/// A delete call observed by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteCall {
    Bulk(ChannelId, Vec<MessageId>),
    Single(ChannelId, MessageId),
}

/// Mock platform for testing.
#[derive(Default)]
pub struct MockPlatform {
    channels: HashMap<ChannelId, ChannelInfo>,
    permissions: HashMap<ChannelId, ChannelPermissions>,
    history: HashMap<ChannelId, Vec<Message>>,
    reactions: HashMap<(MessageId, String), Vec<UserId>>,
    members: HashMap<UserId, Member>,
    failing_lookup: HashSet<ChannelId>,
    failing_history: HashSet<ChannelId>,
    panicking_history: HashSet<ChannelId>,
    stalled_history: HashSet<ChannelId>,
    history_delay: Option<StdDuration>,
    fail_deletes: bool,
    pub deletes: Mutex<Vec<DeleteCall>>,
    pub history_requests: Mutex<Vec<ChannelId>>,
    pub member_lookups: AtomicUsize,
    pub reaction_lookups: AtomicUsize,
    pub ready_waits: AtomicUsize,
    pub reads_in_flight: AtomicUsize,
    pub peak_reads_in_flight: AtomicUsize,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// A readable, manageable channel in [`GUILD`].
    pub fn with_channel(mut self, id: u64, name: &str) -> Self {
        let info = ChannelInfoBuilder::default()
            .id(ChannelId(id))
            .name(name)
            .guild_id(Some(GUILD))
            .guild_name(Some("Art Club".to_string()))
            .build()
            .expect("Valid channel");
        self.channels.insert(ChannelId(id), info);
        self.permissions.insert(
            ChannelId(id),
            ChannelPermissions {
                read_messages: true,
                read_message_history: true,
                manage_messages: true,
            },
        );
        self
    }

    /// A channel that exists outside any server.
    pub fn with_private_channel(mut self, id: u64) -> Self {
        let info = ChannelInfoBuilder::default()
            .id(ChannelId(id))
            .name("dm")
            .build()
            .expect("Valid channel");
        self.channels.insert(ChannelId(id), info);
        self
    }

    pub fn with_permissions(mut self, id: u64, permissions: ChannelPermissions) -> Self {
        self.permissions.insert(ChannelId(id), permissions);
        self
    }

    pub fn with_messages(mut self, id: u64, messages: Vec<Message>) -> Self {
        self.history.entry(ChannelId(id)).or_default().extend(messages);
        self
    }

    pub fn with_reaction_users(mut self, message: u64, emoji: &str, users: &[u64]) -> Self {
        self.reactions.insert(
            (MessageId(message), emoji.to_string()),
            users.iter().map(|u| UserId(*u)).collect(),
        );
        self
    }

    pub fn with_member(mut self, user: u64, roles: &[&str]) -> Self {
        self.members.insert(
            UserId(user),
            Member::new(UserId(user), roles.iter().map(|r| r.to_string()).collect()),
        );
        self
    }

    pub fn with_failing_lookup(mut self, id: u64) -> Self {
        self.failing_lookup.insert(ChannelId(id));
        self
    }

    pub fn with_failing_history(mut self, id: u64) -> Self {
        self.failing_history.insert(ChannelId(id));
        self
    }

    pub fn with_panicking_history(mut self, id: u64) -> Self {
        self.panicking_history.insert(ChannelId(id));
        self
    }

    /// History for this channel never yields and never ends.
    pub fn with_stalled_history(mut self, id: u64) -> Self {
        self.stalled_history.insert(ChannelId(id));
        self
    }

    /// Every history read takes `delay` before its first message.
    pub fn with_history_delay(mut self, delay: StdDuration) -> Self {
        self.history_delay = Some(delay);
        self
    }

    pub fn with_failing_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    pub fn deleted_ids(&self) -> Vec<MessageId> {
        self.deletes
            .lock()
            .iter()
            .flat_map(|call| match call {
                DeleteCall::Bulk(_, ids) => ids.clone(),
                DeleteCall::Single(_, id) => vec![*id],
            })
            .collect()
    }
}

#[async_trait]
impl GalleryPlatform for MockPlatform {
    async fn wait_until_ready(&self) {
        self.ready_waits.fetch_add(1, Ordering::SeqCst);
    }

    async fn channel(&self, id: ChannelId) -> PlatformResult<Option<ChannelInfo>> {
        if self.failing_lookup.contains(&id) {
            return Err(PlatformError::new(PlatformErrorKind::Api(
                "lookup failed".to_string(),
            )));
        }
        Ok(self.channels.get(&id).cloned())
    }

    async fn permissions(&self, channel: &ChannelInfo) -> PlatformResult<ChannelPermissions> {
        Ok(self.permissions.get(channel.id()).copied().unwrap_or_default())
    }

    fn history(
        &self,
        channel: ChannelId,
        before: DateTime<Utc>,
        after: DateTime<Utc>,
    ) -> BoxStream<'_, PlatformResult<Message>> {
        self.history_requests.lock().push(channel);

        if self.panicking_history.contains(&channel) {
            panic!("history exploded for {}", channel);
        }
        if self.failing_history.contains(&channel) {
            return stream::once(async {
                Err(PlatformError::new(PlatformErrorKind::Api(
                    "history failed".to_string(),
                )))
            })
            .boxed();
        }
        if self.stalled_history.contains(&channel) {
            return stream::pending::<PlatformResult<Message>>().boxed();
        }

        let mut messages: Vec<Message> = self
            .history
            .get(&channel)
            .map(|all| {
                all.iter()
                    .filter(|m| *m.timestamp() < before && *m.timestamp() > after)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        messages.sort_by(|a, b| b.timestamp().cmp(a.timestamp()));

        let Some(delay) = self.history_delay else {
            return stream::iter(messages.into_iter().map(Ok)).boxed();
        };
        let read = async move {
            let now = self.reads_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_reads_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            self.reads_in_flight.fetch_sub(1, Ordering::SeqCst);
            stream::iter(messages.into_iter().map(Ok))
        };
        stream::once(read).flatten().boxed()
    }

    async fn reacting_users(&self, message: &Message, emoji: &str) -> PlatformResult<Vec<UserId>> {
        self.reaction_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .reactions
            .get(&(*message.id(), emoji.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn resolve_member(&self, _guild: GuildId, user: UserId) -> PlatformResult<Option<Member>> {
        self.member_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.members.get(&user).cloned())
    }

    async fn bulk_delete(&self, channel: ChannelId, messages: &[MessageId]) -> PlatformResult<()> {
        if self.fail_deletes {
            return Err(PlatformError::new(PlatformErrorKind::InsufficientPermissions(
                "manage messages".to_string(),
            )));
        }
        assert!(messages.len() >= 2 && messages.len() <= 100, "bad bulk size");
        self.deletes
            .lock()
            .push(DeleteCall::Bulk(channel, messages.to_vec()));
        Ok(())
    }

    async fn delete_one(&self, channel: ChannelId, message: MessageId) -> PlatformResult<()> {
        if self.fail_deletes {
            return Err(PlatformError::new(PlatformErrorKind::InsufficientPermissions(
                "manage messages".to_string(),
            )));
        }
        self.deletes.lock().push(DeleteCall::Single(channel, message));
        Ok(())
    }
}

/// A plain text message `hours_ago` hours old.
pub fn text_message(id: u64, channel: u64, author: u64, hours_ago: i64) -> MessageBuilder {
    let mut builder = MessageBuilder::default();
    builder
        .id(MessageId(id))
        .channel_id(ChannelId(channel))
        .author(UserId(author))
        .timestamp(Utc::now() - Duration::hours(hours_ago));
    builder
}

/// Build a message, panicking on missing fields.
pub fn build(builder: &MessageBuilder) -> Message {
    builder.build().expect("Valid message")
}

/// A reaction record.
pub fn reaction(emoji: &str, count: u32) -> Reaction {
    Reaction::new(emoji, count)
}
