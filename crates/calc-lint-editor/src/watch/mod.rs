//! Re-checking stylesheets when they change on disk.
//!
//! This module is only available with the `watch` feature.

mod watcher;

pub use watcher::{ChangeKind, StylesheetChangeEvent, StylesheetWatcher};
