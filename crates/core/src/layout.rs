//! Project layout discovery and derived paths

use crate::config::Config;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Name of the tool state directory at the project root
pub const TOOL_DIR: &str = ".mpk";

/// Resolved paths for one project
///
/// Computed once at startup from the project root and the loaded
/// configuration; immutable afterwards.
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
    asset_root: PathBuf,
    staging_dir: PathBuf,
    archive_path: PathBuf,
}

impl Layout {
    /// Derive the layout for a project root
    pub fn new(root: impl Into<PathBuf>, config: &Config) -> Self {
        let root = root.into();
        let asset_root = root.join(&config.archive.asset_dir);
        let staging_dir = tool_dir(&root).join("staging");
        let archive_path = asset_root.join(&config.archive.archive_name);

        Self {
            root,
            asset_root,
            staging_dir,
            archive_path,
        }
    }

    /// Project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Watched asset tree
    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    /// Scratch directory for staging copies during a compression pass
    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// The single compressed bundle
    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    /// Archive path relative to the project root (label-store key)
    pub fn archive_rel_path(&self) -> PathBuf {
        self.archive_path
            .strip_prefix(&self.root)
            .unwrap_or(&self.archive_path)
            .to_path_buf()
    }
}

/// Tool state directory for a project root
pub fn tool_dir(root: &Path) -> PathBuf {
    root.join(TOOL_DIR)
}

/// Find the project root by walking up from cwd to find .mpk/
pub fn find_project_root() -> Result<PathBuf> {
    let mut current = std::env::current_dir().context("Failed to get current directory")?;

    loop {
        let marker = current.join(TOOL_DIR);
        if marker.exists() && marker.is_dir() {
            return Ok(current);
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => anyhow::bail!("Not a metapack project (no {} directory found)", TOOL_DIR),
        }
    }
}
