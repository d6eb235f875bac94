//! Walks the deletable window of a channel's history.

use crate::RetentionPolicy;
use chrono::{DateTime, Duration, Utc};
use derive_getters::Getters;
use futures::StreamExt;
use gallery_core::{ChannelId, GalleryPlatform, MessageId};
use gallery_error::PlatformResult;
use tracing::{debug, instrument};

/// How far back the platform accepts bulk deletes.
pub const BULK_DELETE_WINDOW: Duration = Duration::days(14);

/// Safety margin kept inside the bulk-delete window.
pub const WINDOW_MARGIN: Duration = Duration::seconds(30);

/// The slice of history a scan may delete from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    /// Newest timestamp considered (exclusive); younger messages are kept
    pub before: DateTime<Utc>,
    /// Oldest timestamp considered (exclusive)
    pub after: DateTime<Utc>,
}

impl ScanWindow {
    /// The window for a channel with the given expiration, or `None` when
    /// the expiration reaches past the bulk-delete bound.
    pub fn at(now: DateTime<Utc>, expiration_secs: u64) -> Option<Self> {
        let expiration = Duration::try_seconds(i64::try_from(expiration_secs).ok()?)?;
        let before = now.checked_sub_signed(expiration)?;
        let after = Self::lower_bound(now);
        (before > after).then_some(Self { before, after })
    }

    /// Oldest timestamp that can still be bulk deleted at `now`, with margin.
    pub fn lower_bound(now: DateTime<Utc>) -> DateTime<Utc> {
        now - BULK_DELETE_WINDOW + WINDOW_MARGIN
    }

    /// Whether `timestamp` lies strictly inside the window.
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp > self.after && timestamp < self.before
    }
}

/// Result of scanning one channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct ScanOutcome {
    /// Messages classified
    examined: usize,
    /// Messages to delete, newest first
    deletions: Vec<MessageId>,
}

impl ScanOutcome {
    /// Consume the outcome, keeping the deletion list.
    pub fn into_deletions(self) -> Vec<MessageId> {
        self.deletions
    }
}

/// Classify every message in the channel's deletable window.
///
/// History is pulled lazily, one page at a time. A fresh privilege memo is
/// used for this call only. Matches that have aged out of the bulk-delete
/// window by the time traversal ends are dropped.
#[instrument(skip(platform, policy), fields(expiration_secs = *policy.config().expiration_secs()))]
pub async fn scan_channel<P>(
    platform: &P,
    channel: ChannelId,
    policy: &RetentionPolicy,
    now: DateTime<Utc>,
) -> PlatformResult<ScanOutcome>
where
    P: GalleryPlatform + ?Sized,
{
    let Some(window) = ScanWindow::at(now, *policy.config().expiration_secs()) else {
        debug!("Expiration reaches past the bulk-delete window, nothing to scan");
        return Ok(ScanOutcome::default());
    };

    let mut check = policy.check(platform);
    let mut history = platform.history(channel, window.before, window.after);
    let mut examined = 0;
    let mut doomed = Vec::new();

    while let Some(message) = history.next().await {
        let message = message?;
        if !window.contains(*message.timestamp()) {
            continue;
        }
        examined += 1;
        if check.should_delete(&message).await? {
            doomed.push(message);
        }
    }

    let bound = ScanWindow::lower_bound(now.max(Utc::now()));
    doomed.retain(|message| *message.timestamp() > bound);

    debug!(examined, matched = doomed.len(), "Channel scanned");
    Ok(ScanOutcome {
        examined,
        deletions: doomed.into_iter().map(|message| *message.id()).collect(),
    })
}
