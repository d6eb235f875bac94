//! Shared, persisted settings.

use crate::SettingsStore;
use gallery_core::{ChannelConfig, ChannelId, GallerySettings};
use gallery_error::StorageError;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Cloneable handle to the live settings document.
///
/// Readers take cheap snapshots; writers mutate under the lock and persist
/// the result before releasing it, so saves land in the order they were made.
#[derive(Clone)]
pub struct SettingsHandle {
    settings: Arc<RwLock<GallerySettings>>,
    store: Arc<dyn SettingsStore>,
}

impl std::fmt::Debug for SettingsHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsHandle")
            .field("channels", &self.settings.read().len())
            .finish_non_exhaustive()
    }
}

impl SettingsHandle {
    /// Load the document from `store` and wrap it.
    pub fn open(store: Arc<dyn SettingsStore>) -> Result<Self, StorageError> {
        let settings = store.load()?;
        Ok(Self {
            settings: Arc::new(RwLock::new(settings)),
            store,
        })
    }

    /// Wrap an already loaded document without reading the store.
    pub fn with_settings(settings: GallerySettings, store: Arc<dyn SettingsStore>) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
            store,
        }
    }

    /// A point-in-time copy of every channel's settings.
    pub fn snapshot(&self) -> GallerySettings {
        self.settings.read().clone()
    }

    /// The effective configuration for one channel.
    pub fn config_for(&self, channel: ChannelId) -> ChannelConfig {
        self.settings.read().config_for(channel)
    }

    /// Whether the channel has a stored record.
    pub fn is_configured(&self, channel: ChannelId) -> bool {
        self.settings.read().is_configured(channel)
    }

    /// Apply `f` to the channel's record (created from defaults if absent),
    /// then persist. Returns the updated record.
    #[instrument(skip(self, f), fields(channel = %channel))]
    pub fn update<F>(&self, channel: ChannelId, f: F) -> Result<ChannelConfig, StorageError>
    where
        F: FnOnce(&mut ChannelConfig),
    {
        let mut settings = self.settings.write();
        f(settings.entry(channel));
        let updated = settings.config_for(channel);
        self.store.save(&settings)?;
        debug!("Channel settings updated");
        Ok(updated)
    }

    /// Drop the channel's record, persisting only if one existed.
    #[instrument(skip(self), fields(channel = %channel))]
    pub fn remove(&self, channel: ChannelId) -> Result<bool, StorageError> {
        let mut settings = self.settings.write();
        if settings.remove(channel).is_none() {
            return Ok(false);
        }
        self.store.save(&settings)?;
        debug!("Channel settings removed");
        Ok(true)
    }
}
