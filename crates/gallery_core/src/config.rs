//! Service configuration.
//!
//! Configuration sources in order of precedence (later sources override earlier):
//! 1. Bundled defaults (`gallery.toml` shipped with the library)
//! 2. User config in home directory (`~/.config/gallery/gallery.toml`)
//! 3. User config in current directory (`./gallery.toml`)
//! 4. An explicit file passed by the caller

use crate::GuildId;
use config::{Config, File, FileFormat};
use derive_getters::Getters;
use gallery_error::{ConfigError, GalleryResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../gallery.toml");

/// Scan cycle timing and parallelism.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ScheduleSettings {
    /// Seconds between the start of two scan cycles
    #[serde(default = "default_poll_interval")]
    poll_interval_secs: u64,

    /// Channels scanned concurrently
    #[serde(default = "default_parallel_scans")]
    parallel_scans: usize,

    /// Pause between delete batches, in milliseconds
    #[serde(default = "default_purge_pacing")]
    purge_pacing_ms: u64,
}

fn default_poll_interval() -> u64 {
    5 * 60
}

fn default_parallel_scans() -> usize {
    4
}

fn default_purge_pacing() -> u64 {
    1000
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            parallel_scans: default_parallel_scans(),
            purge_pacing_ms: default_purge_pacing(),
        }
    }
}

impl ScheduleSettings {
    /// Create schedule settings from explicit values.
    pub fn new(poll_interval_secs: u64, parallel_scans: usize, purge_pacing_ms: u64) -> Self {
        Self {
            poll_interval_secs,
            parallel_scans,
            purge_pacing_ms,
        }
    }

    /// Interval between cycle starts.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Pause between delete batches.
    pub fn purge_pacing(&self) -> Duration {
        Duration::from_millis(self.purge_pacing_ms)
    }
}

/// Names of the server roles that grant moderation rights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct StaffRoles {
    /// Administrator role name
    admin: String,
    /// Moderator role name
    moderator: String,
}

impl StaffRoles {
    /// Create a staff role pair.
    pub fn new(admin: impl Into<String>, moderator: impl Into<String>) -> Self {
        Self {
            admin: admin.into(),
            moderator: moderator.into(),
        }
    }
}

impl Default for StaffRoles {
    fn default() -> Self {
        Self::new("admin", "moderator")
    }
}

/// Top-level service configuration.
///
/// # Example
///
/// ```no_run
/// use gallery_core::GalleryConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = GalleryConfig::load()?;
/// println!("Polling every {:?}", config.schedule().poll_interval());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct GalleryConfig {
    /// Path of the channel settings document
    settings_path: PathBuf,

    /// Prefix for chat commands, e.g. `!` for `!galset`
    #[serde(default = "default_prefix")]
    command_prefix: String,

    /// Scan cycle timing
    #[serde(default)]
    schedule: ScheduleSettings,

    /// Staff role names used when a server has no override
    #[serde(default)]
    roles: StaffRoles,

    /// Staff role overrides keyed by guild id
    #[serde(default)]
    guild_roles: HashMap<String, StaffRoles>,
}

fn default_prefix() -> String {
    "!".to_string()
}

impl GalleryConfig {
    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> GalleryResult<Self> {
        Self::load_with(None)
    }

    /// Like [`GalleryConfig::load`], with an explicit file layered on top.
    #[instrument]
    pub fn load_with(explicit: Option<&Path>) -> GalleryResult<Self> {
        debug!("Loading configuration with precedence: explicit > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/gallery/gallery.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("gallery").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path));
        }

        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single TOML file, without the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or fails validation.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> GalleryResult<Self> {
        debug!("Loading configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                ))
            })?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the scheduler cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schedule.poll_interval_secs == 0 {
            return Err(ConfigError::new("schedule.poll_interval_secs must be positive"));
        }
        if self.schedule.parallel_scans == 0 {
            return Err(ConfigError::new("schedule.parallel_scans must be positive"));
        }
        if let Some(key) = self.guild_roles.keys().find(|k| k.parse::<u64>().is_err()) {
            return Err(ConfigError::new(format!(
                "guild_roles key '{}' is not a guild id",
                key
            )));
        }
        Ok(())
    }

    /// Staff role names for a guild, falling back to the global pair.
    pub fn staff_roles_for(&self, guild: GuildId) -> &StaffRoles {
        self.guild_roles
            .get(&guild.to_string())
            .unwrap_or(&self.roles)
    }

    /// Staff role overrides keyed by typed guild id.
    pub fn guild_role_overrides(&self) -> HashMap<GuildId, StaffRoles> {
        self.guild_roles
            .iter()
            .filter_map(|(key, roles)| key.parse::<u64>().ok().map(|id| (GuildId(id), roles.clone())))
            .collect()
    }

    /// Replace the settings document path.
    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = path.into();
        self
    }
}
