//! Top-level error wrapper types.

use crate::{
    ChannelScanError, CommandError, ConfigError, PlatformError, StorageError, TimeSpecError,
};

/// The foundation error enum covering every Gallery crate.
///
/// # Examples
///
/// ```
/// use gallery_error::{GalleryError, ConfigError};
///
/// let err: GalleryError = ConfigError::new("missing token").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum GalleryErrorKind {
    /// Duration expression error
    #[from(TimeSpecError)]
    TimeSpec(TimeSpecError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Settings storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Chat platform error
    #[from(PlatformError)]
    Platform(PlatformError),
    /// Channel scan failure
    #[from(ChannelScanError)]
    Scan(ChannelScanError),
    /// Settings command error
    #[from(CommandError)]
    Command(CommandError),
}

/// Gallery error with kind discrimination.
///
/// # Examples
///
/// ```
/// use gallery_error::{GalleryErrorKind, GalleryResult, ConfigError};
///
/// fn might_fail() -> GalleryResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), GalleryErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Gallery Error: {}", _0)]
pub struct GalleryError(Box<GalleryErrorKind>);

impl GalleryError {
    /// Create a new error from a kind.
    pub fn new(kind: GalleryErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &GalleryErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to GalleryErrorKind
impl<T> From<T> for GalleryError
where
    T: Into<GalleryErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Gallery operations.
pub type GalleryResult<T> = std::result::Result<T, GalleryError>;
