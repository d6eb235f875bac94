//! The periodic curation loop.

use crate::{BatchPurger, DEFAULT_PURGE_PACING, RetentionPolicy, scan_channel};
use chrono::Utc;
use derive_getters::Getters;
use gallery_core::{ChannelId, GalleryConfig, GalleryPlatform, GuildId, StaffRoles};
use gallery_error::{ChannelScanError, PlatformError, PlatformErrorKind, PlatformResult};
use gallery_storage::SettingsHandle;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// Scheduler tuning.
#[derive(Debug, Clone, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct CurationOptions {
    /// Time between the start of two cycles
    #[builder(default = "Duration::from_secs(300)")]
    poll_interval: Duration,

    /// Channels scanned at once
    #[builder(default = "4")]
    parallel_scans: usize,

    /// Pause between delete batches
    #[builder(default = "DEFAULT_PURGE_PACING")]
    purge_pacing: Duration,

    /// Staff role names for servers without an override
    #[builder(default)]
    staff_roles: StaffRoles,

    /// Per-server staff role names
    #[builder(default)]
    guild_roles: HashMap<GuildId, StaffRoles>,
}

impl Default for CurationOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(300),
            parallel_scans: 4,
            purge_pacing: DEFAULT_PURGE_PACING,
            staff_roles: StaffRoles::default(),
            guild_roles: HashMap::new(),
        }
    }
}

impl CurationOptions {
    /// Creates a new options builder.
    pub fn builder() -> CurationOptionsBuilder {
        CurationOptionsBuilder::default()
    }

    /// Options taken from the service configuration.
    pub fn from_config(config: &GalleryConfig) -> Self {
        Self {
            poll_interval: config.schedule().poll_interval(),
            parallel_scans: *config.schedule().parallel_scans(),
            purge_pacing: config.schedule().purge_pacing(),
            staff_roles: config.roles().clone(),
            guild_roles: config.guild_role_overrides(),
        }
    }

    /// Staff role names in effect for `guild`.
    pub fn staff_roles_for(&self, guild: GuildId) -> &StaffRoles {
        self.guild_roles.get(&guild).unwrap_or(&self.staff_roles)
    }
}

/// Outcome of one pass over the enabled channels.
#[derive(Debug, Default, Getters)]
pub struct CycleReport {
    /// Channels whose scan completed
    scanned: usize,
    /// Channels skipped as missing or lacking permissions
    skipped: usize,
    /// Messages deleted across all channels
    deleted: usize,
    /// Channels whose resolution, scan or purge failed
    failures: Vec<ChannelScanError>,
    /// The cycle stopped early on cancellation
    cancelled: bool,
}

struct PendingScan {
    channel: ChannelId,
    label: String,
    task: JoinHandle<PlatformResult<usize>>,
}

/// Periodically scans and purges every enabled channel.
pub struct CurationService<P> {
    platform: Arc<P>,
    settings: SettingsHandle,
    options: CurationOptions,
    limiter: Arc<Semaphore>,
    cancel: CancellationToken,
}

impl<P> std::fmt::Debug for CurationService<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurationService")
            .field("options", &self.options)
            .field("available_permits", &self.limiter.available_permits())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl<P> CurationService<P>
where
    P: GalleryPlatform + 'static,
{
    /// Create a service; nothing runs until [`CurationService::run`] or
    /// [`CurationHandle::start`].
    pub fn new(platform: Arc<P>, settings: SettingsHandle, options: CurationOptions) -> Self {
        let limiter = Arc::new(Semaphore::new(options.parallel_scans.max(1)));
        Self {
            platform,
            settings,
            options,
            limiter,
            cancel: CancellationToken::new(),
        }
    }

    /// Token that stops the loop when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// The scheduler's tuning.
    pub fn options(&self) -> &CurationOptions {
        &self.options
    }

    /// Loop until cancelled: wait for readiness, run a cycle, sleep out the
    /// rest of the interval.
    #[instrument(skip(self), fields(poll_interval = ?self.options.poll_interval))]
    pub async fn run(&self) {
        info!("Curation loop started");

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = self.platform.wait_until_ready() => {}
            }

            let started = Instant::now();
            let report = self.run_cycle().await;
            if report.cancelled {
                break;
            }

            let remaining = self.options.poll_interval.saturating_sub(started.elapsed());
            debug!(?remaining, "Sleeping until next cycle");
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(remaining) => {}
            }
        }

        info!("Curation loop stopped");
    }

    /// Scan every enabled channel once.
    ///
    /// Channel failures are collected into the report and logged; they never
    /// stop the other channels.
    #[instrument(skip(self))]
    pub async fn run_cycle(&self) -> CycleReport {
        let settings = self.settings.snapshot();
        let mut report = CycleReport::default();
        let mut pending = Vec::new();

        for (channel, config) in settings.enabled_channels() {
            if self.cancel.is_cancelled() {
                break;
            }

            let info = match self.platform.channel(channel).await {
                Ok(Some(info)) => info,
                Ok(None) => {
                    warn!(channel_id = %channel, "Attempted to curate missing channel");
                    report.skipped += 1;
                    continue;
                }
                Err(e) => {
                    report
                        .failures
                        .push(ChannelScanError::new(channel.0, channel.to_string(), e));
                    continue;
                }
            };

            let Some(guild) = *info.guild_id() else {
                warn!(channel_id = %channel, "Attempted to curate channel outside a server");
                report.skipped += 1;
                continue;
            };

            match self.platform.permissions(&info).await {
                Ok(perms) if perms.can_curate() => {}
                Ok(_) => {
                    warn!(
                        channel_id = %channel,
                        channel = %info.label(),
                        "Missing permissions to read or manage messages"
                    );
                    report.skipped += 1;
                    continue;
                }
                Err(e) => {
                    report
                        .failures
                        .push(ChannelScanError::new(channel.0, info.label(), e));
                    continue;
                }
            }

            let policy =
                RetentionPolicy::new(guild, config.clone(), self.options.staff_roles_for(guild));
            pending.push(PendingScan {
                channel,
                label: info.label(),
                task: self.spawn_scan(channel, policy),
            });
        }

        self.collect(pending, &mut report).await;

        for failure in &report.failures {
            error!(
                channel_id = failure.channel_id(),
                channel = %failure.channel(),
                error = %failure.source(),
                "Exception cleaning channel"
            );
        }
        info!(
            scanned = report.scanned,
            skipped = report.skipped,
            deleted = report.deleted,
            failed = report.failures.len(),
            "Curation cycle finished"
        );
        report
    }

    fn spawn_scan(&self, channel: ChannelId, policy: RetentionPolicy) -> JoinHandle<PlatformResult<usize>> {
        let platform = Arc::clone(&self.platform);
        let limiter = Arc::clone(&self.limiter);
        let purger = BatchPurger::new(self.options.purge_pacing);

        tokio::spawn(async move {
            let _permit = limiter
                .acquire_owned()
                .await
                .map_err(|e| PlatformError::new(PlatformErrorKind::TaskFailed(e.to_string())))?;

            let outcome = scan_channel(platform.as_ref(), channel, &policy, Utc::now()).await?;
            let purged = purger
                .purge(platform.as_ref(), channel, outcome.deletions())
                .await?;
            Ok(*purged.deleted())
        })
    }

    async fn collect(&self, pending: Vec<PendingScan>, report: &mut CycleReport) {
        let aborts: Vec<AbortHandle> = pending.iter().map(|scan| scan.task.abort_handle()).collect();

        for scan in pending {
            let joined = tokio::select! {
                _ = self.cancel.cancelled() => {
                    aborts.iter().for_each(AbortHandle::abort);
                    report.cancelled = true;
                    debug!("Cycle cancelled, outstanding scans aborted");
                    return;
                }
                joined = scan.task => joined,
            };

            match joined {
                Ok(Ok(deleted)) => {
                    report.scanned += 1;
                    report.deleted += deleted;
                }
                Ok(Err(e)) => report
                    .failures
                    .push(ChannelScanError::new(scan.channel.0, scan.label, e)),
                Err(join_error) => {
                    let cause = PlatformError::new(PlatformErrorKind::TaskFailed(join_error.to_string()));
                    report
                        .failures
                        .push(ChannelScanError::new(scan.channel.0, scan.label, cause));
                }
            }
        }

        report.cancelled = self.cancel.is_cancelled();
    }
}

/// A running curation loop.
#[derive(Debug)]
pub struct CurationHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl CurationHandle {
    /// Spawn the service's loop onto the runtime.
    pub fn start<P>(service: CurationService<P>) -> Self
    where
        P: GalleryPlatform + 'static,
    {
        let cancel = service.cancellation_token();
        let task = tokio::spawn(async move { service.run().await });
        info!("Curation service started");
        Self { cancel, task }
    }

    /// Whether the loop has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancel the loop and wait for it to exit.
    pub async fn stop(self) -> PlatformResult<()> {
        self.cancel.cancel();
        self.task
            .await
            .map_err(|e| PlatformError::new(PlatformErrorKind::TaskFailed(e.to_string())))?;
        info!("Curation service stopped");
        Ok(())
    }
}
