//! Batched deletion.

use derive_getters::Getters;
use gallery_core::{ChannelId, GalleryPlatform, MessageId};
use gallery_error::PlatformResult;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Most messages one bulk delete call accepts.
pub const MAX_BULK_DELETE: usize = 100;

/// Default pause between delete batches.
pub const DEFAULT_PURGE_PACING: Duration = Duration::from_secs(1);

/// What a purge did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters)]
pub struct PurgeReport {
    /// Messages deleted
    deleted: usize,
    /// Delete calls issued
    batches: usize,
}

/// Deletes message lists in platform-safe batches.
#[derive(Debug, Clone, Copy)]
pub struct BatchPurger {
    pacing: Duration,
}

impl Default for BatchPurger {
    fn default() -> Self {
        Self::new(DEFAULT_PURGE_PACING)
    }
}

impl BatchPurger {
    /// A purger pausing `pacing` between batches.
    pub fn new(pacing: Duration) -> Self {
        Self { pacing }
    }

    /// Delete `messages`, up to one hundred per call.
    ///
    /// A lone trailing message goes through the single-delete call, since bulk
    /// delete needs at least two. The first failure aborts the purge.
    #[instrument(skip(self, platform, messages), fields(count = messages.len()))]
    pub async fn purge<P>(
        &self,
        platform: &P,
        channel: ChannelId,
        messages: &[MessageId],
    ) -> PlatformResult<PurgeReport>
    where
        P: GalleryPlatform + ?Sized,
    {
        let mut report = PurgeReport::default();

        for batch in messages.chunks(MAX_BULK_DELETE) {
            if report.batches > 0 {
                tokio::time::sleep(self.pacing).await;
            }

            match batch {
                [single] => platform.delete_one(channel, *single).await?,
                _ => platform.bulk_delete(channel, batch).await?,
            }

            report.deleted += batch.len();
            report.batches += 1;
            debug!(batch = report.batches, size = batch.len(), "Deleted batch");
        }

        if report.deleted > 0 {
            info!(deleted = report.deleted, batches = report.batches, "Purged messages");
        }
        Ok(report)
    }
}
