//! Top-level operation boundary
//!
//! [`Organizer`] owns the layout, the configuration snapshot, the run
//! guard, and the host collaborators, and exposes each user-facing
//! operation as a terminal error boundary: failures are logged and
//! folded into a status value, never propagated upward.

use crate::config::Config;
use crate::engine::{self, CompressOutcome, ExtractOutcome};
use crate::guard::RunGuard;
use crate::host::{AssetLabels, AssetRefresher};
use crate::layout::Layout;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Outcome of a guarded compression request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressStatus {
    Archived(usize),
    NoMatches,
    AlreadyRunning,
    Failed,
}

/// Outcome of an extraction request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractStatus {
    Extracted(usize),
    NotFound,
    AlreadyRunning,
    Failed,
}

/// Outcome of a delete-all request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanStatus {
    Removed(usize),
    AlreadyRunning,
    Failed,
}

/// Shared context for all archive operations
pub struct Organizer {
    layout: Layout,
    config: Config,
    guard: Arc<RunGuard>,
    labels: Box<dyn AssetLabels>,
    refresher: Box<dyn AssetRefresher>,
}

impl Organizer {
    pub fn new(
        layout: Layout,
        config: Config,
        guard: Arc<RunGuard>,
        labels: Box<dyn AssetLabels>,
        refresher: Box<dyn AssetRefresher>,
    ) -> Self {
        Self {
            layout,
            config,
            guard,
            labels,
            refresher,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn guard(&self) -> &Arc<RunGuard> {
        &self.guard
    }

    pub fn labels(&self) -> &dyn AssetLabels {
        self.labels.as_ref()
    }

    /// Run one compression pass, holding the run guard for its duration
    pub fn compress(&self) -> CompressStatus {
        let Some(_permit) = self.guard.try_enter() else {
            info!("compression already running; skipping");
            return CompressStatus::AlreadyRunning;
        };

        match engine::compress(
            self.layout.asset_root(),
            self.layout.archive_path(),
            self.layout.staging_dir(),
            &self.config.archive.extension,
        ) {
            Ok(CompressOutcome::Archived { files }) => CompressStatus::Archived(files),
            Ok(CompressOutcome::NoMatches) => CompressStatus::NoMatches,
            Err(err) => {
                error!(%err, "compression pass failed");
                CompressStatus::Failed
            }
        }
    }

    /// Extract the archive into the asset root
    ///
    /// Checks the run guard but does not hold it.
    pub fn extract(&self) -> ExtractStatus {
        if self.guard.is_held() {
            info!("compression already running; skipping extraction");
            return ExtractStatus::AlreadyRunning;
        }

        match engine::extract(self.layout.archive_path(), self.layout.asset_root()) {
            Ok(ExtractOutcome::Extracted { files }) => ExtractStatus::Extracted(files),
            Ok(ExtractOutcome::NotFound) => {
                error!(
                    archive = %self.layout.archive_path().display(),
                    "archive not found"
                );
                ExtractStatus::NotFound
            }
            Err(err) => {
                error!(%err, "extraction failed");
                ExtractStatus::Failed
            }
        }
    }

    /// Delete every matching metadata file
    ///
    /// Checks the run guard but does not hold it.
    pub fn clean(&self) -> CleanStatus {
        if self.guard.is_held() {
            info!("compression already running; skipping delete");
            return CleanStatus::AlreadyRunning;
        }

        match engine::delete_all(
            self.layout.asset_root(),
            self.layout.staging_dir(),
            &self.config.archive.extension,
        ) {
            Ok(removed) => CleanStatus::Removed(removed),
            Err(err) => {
                error!(%err, "delete failed");
                CleanStatus::Failed
            }
        }
    }

    /// Fire the host asset-refresh collaborator
    ///
    /// Returns whether the refresh ran cleanly; failures are logged.
    pub fn reimport(&self) -> bool {
        match self.refresher.refresh_all() {
            Ok(()) => true,
            Err(err) => {
                error!(%err, "asset refresh failed");
                false
            }
        }
    }

    /// Count of files the next compression pass would bundle
    pub fn match_count(&self) -> usize {
        engine::matching_files(
            self.layout.asset_root(),
            self.layout.staging_dir(),
            &self.config.archive.extension,
        )
        .map(|files| files.len())
        .unwrap_or_else(|err| {
            warn!(%err, "failed to enumerate matching files");
            0
        })
    }
}
