//! File-system watching and dispatch for metapack
//!
//! This crate provides:
//! - The change event model
//! - A notification source abstraction (testable without a real watcher)
//! - The event filter chain between the notification thread and the
//!   drain loop
//! - A single-slot coalescing mailbox

pub mod filter;
pub mod mailbox;
pub mod source;

pub use filter::{ChangeWatcher, Job};
pub use mailbox::Mailbox;
pub use source::{EventSource, NotifySource};

use std::path::PathBuf;

/// File system event forwarded by a notification source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Path that changed
    pub path: PathBuf,
    /// Type of change
    pub kind: EventKind,
}

/// Type of file system event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// File created
    Create,
    /// File modified
    Modify,
    /// File deleted
    Delete,
    /// File renamed
    Rename,
}
