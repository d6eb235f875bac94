//! Gallery channel curation.
//!
//! Scans recent history in configured channels and deletes messages that do
//! not meet the channel's retention rules.
//!
//! # Architecture
//!
//! - [`RetentionPolicy`] / [`MessageCheck`]: the per-message keep-or-delete
//!   decision, with a privilege memo scoped to one channel scan
//! - [`scan_channel`]: walks the deletable window of a channel's history
//! - [`BatchPurger`]: deletes the results in platform-sized batches
//! - [`CurationService`]: the periodic loop fanning scans out over channels
//!
//! # Example
//!
//! ```rust,ignore
//! use gallery_curator::{CurationHandle, CurationOptions, CurationService};
//!
//! let service = CurationService::new(platform, settings, CurationOptions::from_config(&config));
//! let handle = CurationHandle::start(service);
//! // ...
//! handle.stop().await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod predicate;
mod privilege;
mod purger;
mod scanner;
mod service;

pub use predicate::{MessageCheck, REMOVE_EMOJIS, RetentionPolicy, RetentionVerdict};
pub use privilege::{PrivilegeCache, RoleSet};
pub use purger::{BatchPurger, DEFAULT_PURGE_PACING, MAX_BULK_DELETE, PurgeReport};
pub use scanner::{BULK_DELETE_WINDOW, ScanOutcome, ScanWindow, WINDOW_MARGIN, scan_channel};
pub use service::{
    CurationHandle, CurationOptions, CurationOptionsBuilder, CurationService, CycleReport,
};
