//! Notification sources
//!
//! The filter chain consumes [`ChangeEvent`]s from a plain channel, so
//! anything that can feed one works as a source. Production uses
//! notify's recommended platform watcher; tests inject a synthetic
//! sender.

use crate::{ChangeEvent, EventKind};
use anyhow::{Context, Result};
use crossbeam_channel::{unbounded, Receiver};
use notify::{Config as NotifyConfig, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use tracing::{info, warn};

/// Capability interface over a recursive file-system notification feed
pub trait EventSource {
    /// Start delivering events for everything under `root`
    ///
    /// Events flow until the source is dropped, which disconnects the
    /// returned receiver.
    fn subscribe(&mut self, root: &Path) -> Result<Receiver<ChangeEvent>>;
}

/// Production source backed by notify's recommended platform watcher
///
/// The notify callback runs on the notification thread; it only maps
/// and forwards events, never performs archive work.
pub struct NotifySource {
    watcher: Option<RecommendedWatcher>,
}

impl NotifySource {
    pub fn new() -> Self {
        Self { watcher: None }
    }
}

impl Default for NotifySource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for NotifySource {
    fn subscribe(&mut self, root: &Path) -> Result<Receiver<ChangeEvent>> {
        let (tx, rx) = unbounded();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let Some(kind) = map_kind(&event.kind) else {
                        return;
                    };
                    for path in event.paths {
                        // Receiver dropped means we are shutting down
                        let _ = tx.send(ChangeEvent { path, kind });
                    }
                }
                Err(err) => {
                    warn!(%err, "file watcher error");
                }
            },
            NotifyConfig::default(),
        )
        .context("Failed to create file system watcher")?;

        watcher
            .watch(root, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch {}", root.display()))?;

        info!(root = %root.display(), "watching for file changes");
        self.watcher = Some(watcher);
        Ok(rx)
    }
}

/// Map notify's event taxonomy onto the four kinds the filter cares about
fn map_kind(kind: &notify::EventKind) -> Option<EventKind> {
    use notify::event::ModifyKind;

    match kind {
        notify::EventKind::Create(_) => Some(EventKind::Create),
        notify::EventKind::Remove(_) => Some(EventKind::Delete),
        notify::EventKind::Modify(ModifyKind::Name(_)) => Some(EventKind::Rename),
        notify::EventKind::Modify(_) => Some(EventKind::Modify),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, MetadataKind, ModifyKind, RenameMode};

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            map_kind(&notify::EventKind::Create(CreateKind::File)),
            Some(EventKind::Create)
        );
        assert_eq!(
            map_kind(&notify::EventKind::Modify(ModifyKind::Data(
                DataChange::Content
            ))),
            Some(EventKind::Modify)
        );
        assert_eq!(
            map_kind(&notify::EventKind::Modify(ModifyKind::Name(RenameMode::Any))),
            Some(EventKind::Rename)
        );
        assert_eq!(
            map_kind(&notify::EventKind::Remove(notify::event::RemoveKind::File)),
            Some(EventKind::Delete)
        );

        assert_eq!(
            map_kind(&notify::EventKind::Modify(ModifyKind::Metadata(
                MetadataKind::Any
            ))),
            Some(EventKind::Modify)
        );

        // Access events are not forwarded
        assert_eq!(
            map_kind(&notify::EventKind::Access(notify::event::AccessKind::Any)),
            None
        );
    }
}
