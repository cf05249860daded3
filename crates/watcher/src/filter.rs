//! Event filtering between the notification thread and the mailbox
//!
//! Every raw event passes the same chain before it can schedule work:
//! the automatic-mode gate, the editor-noise filter, self-generated
//! paths (staging copies, the archive itself), and the run guard.
//! Survivors post a [`Job`] to the mailbox; archive work itself never
//! runs on the notification thread.

use crate::mailbox::Mailbox;
use crate::ChangeEvent;
use crossbeam_channel::Receiver;
use mpk_core::RunGuard;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Work item scheduled onto the drain loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    Compress,
}

/// Filter chain feeding the compression mailbox
pub struct ChangeWatcher {
    staging_dir: PathBuf,
    archive_path: PathBuf,
    auto_mode: Arc<AtomicBool>,
    guard: Arc<RunGuard>,
    mailbox: Arc<Mailbox<Job>>,
}

impl ChangeWatcher {
    pub fn new(
        staging_dir: PathBuf,
        archive_path: PathBuf,
        auto_mode: Arc<AtomicBool>,
        guard: Arc<RunGuard>,
        mailbox: Arc<Mailbox<Job>>,
    ) -> Self {
        Self {
            staging_dir,
            archive_path,
            auto_mode,
            guard,
            mailbox,
        }
    }

    /// Apply the filter chain to one event
    ///
    /// Returns whether the event scheduled work.
    pub fn observe(&self, event: &ChangeEvent) -> bool {
        if !self.auto_mode.load(Ordering::Relaxed) {
            return false;
        }

        if is_editor_noise(&event.path) {
            trace!(path = %event.path.display(), "ignoring editor noise");
            return false;
        }

        if event.path.starts_with(&self.staging_dir) {
            trace!(path = %event.path.display(), "ignoring staging copy");
            return false;
        }

        if event.path == self.archive_path {
            trace!("ignoring archive write");
            return false;
        }

        if self.guard.is_held() {
            debug!(path = %event.path.display(), "pass in progress; dropping event");
            return false;
        }

        debug!(
            path = %event.path.display(),
            kind = ?event.kind,
            "change detected; scheduling compression"
        );
        if self.mailbox.post(Job::Compress) {
            trace!("replaced pending job");
        }
        true
    }

    /// Consume a notification receiver until it disconnects
    ///
    /// Runs on its own thread so the notify callback stays cheap.
    pub fn run(&self, events: &Receiver<ChangeEvent>) {
        for event in events.iter() {
            self.observe(&event);
        }
        debug!("notification stream closed");
    }
}

/// Editor temp files and OS droppings that never warrant a pass
///
/// Covers: Vim swap/backup files, Emacs auto-save and lock files,
/// macOS and Windows system files.
fn is_editor_noise(path: &Path) -> bool {
    let filename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

    // Vim swap files (.swp, .swo) and backup files (~)
    if filename.ends_with(".swp") || filename.ends_with(".swo") || filename.ends_with('~') {
        return true;
    }

    // Emacs auto-save (#*#) and lock files (.#*)
    if (filename.starts_with('#') && filename.ends_with('#')) || filename.starts_with(".#") {
        return true;
    }

    // MacOS system files
    if filename == ".DS_Store" || filename.starts_with("._") {
        return true;
    }

    // Windows system files
    if filename == "Thumbs.db" || filename == "desktop.ini" {
        return true;
    }

    false
}
