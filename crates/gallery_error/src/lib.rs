//! Error types for the Gallery curation service.
//!
//! This crate provides the foundation error types used throughout the Gallery workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use gallery_error::{GalleryResult, TimeSpecError, TimeSpecErrorKind};
//!
//! fn parse() -> GalleryResult<u64> {
//!     Err(TimeSpecError::new(TimeSpecErrorKind::InvalidUnit("fortnights".into())))?
//! }
//!
//! match parse() {
//!     Ok(secs) => println!("Got: {}", secs),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod command;
mod config;
mod error;
mod platform;
mod scan;
mod storage;
mod timespec;

pub use command::{CommandError, CommandErrorKind};
pub use config::ConfigError;
pub use error::{GalleryError, GalleryErrorKind, GalleryResult};
pub use platform::{PlatformError, PlatformErrorKind, PlatformResult};
pub use scan::ChannelScanError;
pub use storage::{StorageError, StorageErrorKind};
pub use timespec::{TimeSpecError, TimeSpecErrorKind};
