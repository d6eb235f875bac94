//! Settings document backends.

use gallery_core::GallerySettings;
use gallery_error::{StorageError, StorageErrorKind};
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Load and save the whole settings document.
pub trait SettingsStore: Send + Sync {
    /// Read the current document.
    fn load(&self) -> Result<GallerySettings, StorageError>;

    /// Replace the stored document.
    fn save(&self, settings: &GallerySettings) -> Result<(), StorageError>;
}

/// Settings kept in a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    file_path: PathBuf,
}

impl JsonSettingsStore {
    /// Create a store backed by `file_path`.
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Make sure the file holds a valid document, writing `{}` when it is
    /// missing or unreadable as JSON.
    #[instrument(skip(self), fields(path = %self.file_path.display()))]
    pub fn ensure_exists(&self) -> Result<(), StorageError> {
        if self.file_path.exists() {
            let text = fs::read_to_string(&self.file_path).map_err(|e| {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    self.file_path.display(),
                    e
                )))
            })?;
            if serde_json::from_str::<GallerySettings>(&text).is_ok() {
                return Ok(());
            }
            warn!("Settings file is not a valid document, replacing it with an empty one");
        } else {
            info!("Settings file missing, creating an empty one");
        }
        self.save(&GallerySettings::new())
    }
}

impl SettingsStore for JsonSettingsStore {
    #[instrument(skip(self), fields(path = %self.file_path.display()))]
    fn load(&self) -> Result<GallerySettings, StorageError> {
        debug!("Loading settings");
        let text = fs::read_to_string(&self.file_path).map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                self.file_path.display(),
                e
            )))
        })?;
        let settings: GallerySettings = serde_json::from_str(&text)
            .map_err(|e| StorageError::new(StorageErrorKind::Serialization(e.to_string())))?;
        info!(channels = settings.len(), "Settings loaded");
        Ok(settings)
    }

    #[instrument(skip(self, settings), fields(path = %self.file_path.display(), channels = settings.len()))]
    fn save(&self, settings: &GallerySettings) -> Result<(), StorageError> {
        if let Some(parent) = self.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| StorageError::new(StorageErrorKind::Serialization(e.to_string())))?;
        fs::write(&self.file_path, json).map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                self.file_path.display(),
                e
            )))
        })?;
        debug!("Settings saved");
        Ok(())
    }
}

/// Settings held in memory only.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    document: Mutex<GallerySettings>,
    saves: Mutex<usize>,
}

impl MemorySettingsStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store preloaded with `settings`.
    pub fn with_settings(settings: GallerySettings) -> Self {
        Self {
            document: Mutex::new(settings),
            saves: Mutex::new(0),
        }
    }

    /// How many times the document has been saved.
    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<GallerySettings, StorageError> {
        Ok(self.document.lock().clone())
    }

    fn save(&self, settings: &GallerySettings) -> Result<(), StorageError> {
        *self.document.lock() = settings.clone();
        *self.saves.lock() += 1;
        Ok(())
    }
}
