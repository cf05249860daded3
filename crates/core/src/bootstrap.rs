//! One-shot hydration of a freshly checked-out project
//!
//! A fresh checkout ships only the compressed archive, not the raw
//! metadata files. Before the watcher takes over, the archive is
//! extracted exactly once, tracked by a label on the archive asset.

use crate::ops::Organizer;
use tracing::{debug, info, warn};

/// Label marking a checkout whose archive has been extracted
pub const HYDRATED_LABEL: &str = "hydrated";

/// Extract the archive once per fresh checkout
///
/// Runs synchronously before the notification source is subscribed, so
/// no watcher event can race the initial extraction. Returns whether a
/// hydration pass was attempted.
///
/// Setting the label on a missing archive is a logged no-op, so a
/// project without an archive simply retries on the next start.
pub fn ensure_hydrated(org: &Organizer) -> bool {
    let archive_rel = org.layout().archive_rel_path();

    match org.labels().has_label(&archive_rel, HYDRATED_LABEL) {
        Ok(true) => {
            debug!("checkout already hydrated");
            return false;
        }
        Ok(false) => {}
        Err(err) => {
            warn!(%err, "label check failed; assuming checkout is not hydrated");
        }
    }

    info!("first run for this checkout; extracting metadata archive");
    org.extract();

    if let Err(err) = org.labels().add_label(&archive_rel, HYDRATED_LABEL) {
        warn!(%err, "failed to record hydration label");
    }

    org.reimport();
    true
}
