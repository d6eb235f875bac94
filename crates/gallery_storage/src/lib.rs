//! Channel settings persistence.
//!
//! The settings document is a single JSON object keyed by channel id. Every
//! mutation goes through [`SettingsHandle`], which rewrites the whole document
//! before returning so a crash never loses an acknowledged change.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod handle;
mod store;

pub use handle::SettingsHandle;
pub use store::{JsonSettingsStore, MemorySettingsStore, SettingsStore};
