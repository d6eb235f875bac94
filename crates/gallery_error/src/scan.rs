//! Per-channel scan failures.

use crate::PlatformError;
use derive_getters::Getters;

/// A failure while scanning or purging one channel.
///
/// Carries the channel identity alongside the underlying cause so the
/// scheduler can report it without stopping sibling scans.
///
/// # Examples
///
/// ```
/// use gallery_error::{ChannelScanError, PlatformError, PlatformErrorKind};
///
/// let cause = PlatformError::new(PlatformErrorKind::Api("503".to_string()));
/// let err = ChannelScanError::new(42, "art-server #gallery", cause);
/// assert_eq!(*err.channel_id(), 42);
/// assert!(err.to_string().contains("#gallery"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error, Getters)]
#[display("Exception cleaning in {} ({}): {}", channel, channel_id, source)]
pub struct ChannelScanError {
    channel_id: u64,
    channel: String,
    source: PlatformError,
}

impl ChannelScanError {
    /// Wrap a platform failure with the identity of the channel it happened in.
    pub fn new(channel_id: u64, channel: impl Into<String>, source: PlatformError) -> Self {
        Self {
            channel_id,
            channel: channel.into(),
            source,
        }
    }
}
