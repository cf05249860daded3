//! Host-editor collaborator interfaces
//!
//! The asset pipeline that owns imports, labels, and refreshes lives
//! outside this tool. The core only talks to it through the narrow
//! traits below; the bundled implementations persist labels in a JSON
//! state file and delegate refreshes to an optional shell hook.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Asset label get/set, keyed by project-relative path
pub trait AssetLabels: Send + Sync {
    fn has_label(&self, asset: &Path, label: &str) -> Result<bool>;

    /// Attach a label to an asset
    ///
    /// Labeling a path whose file does not exist is a logged no-op,
    /// matching the host pipeline's missing-asset behavior.
    fn add_label(&self, asset: &Path, label: &str) -> Result<()>;
}

/// Recursive asset-reimport trigger
pub trait AssetRefresher: Send + Sync {
    fn refresh_all(&self) -> Result<()>;
}

/// Label store persisted at .mpk/labels.json
pub struct FsLabels {
    root: PathBuf,
    store_path: PathBuf,
}

type LabelMap = BTreeMap<String, Vec<String>>;

impl FsLabels {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            store_path: crate::layout::tool_dir(root).join("labels.json"),
        }
    }

    fn load(&self) -> Result<LabelMap> {
        if !self.store_path.exists() {
            return Ok(LabelMap::new());
        }

        let raw = std::fs::read_to_string(&self.store_path)
            .with_context(|| format!("Failed to read {}", self.store_path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", self.store_path.display()))
    }

    fn save(&self, labels: &LabelMap) -> Result<()> {
        if let Some(parent) = self.store_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let raw = serde_json::to_string_pretty(labels).context("Failed to serialize labels")?;
        std::fs::write(&self.store_path, raw)
            .with_context(|| format!("Failed to write {}", self.store_path.display()))
    }

    fn key(asset: &Path) -> String {
        asset.to_string_lossy().replace('\\', "/")
    }
}

impl AssetLabels for FsLabels {
    fn has_label(&self, asset: &Path, label: &str) -> Result<bool> {
        let labels = self.load()?;
        Ok(labels
            .get(&Self::key(asset))
            .map_or(false, |set| set.iter().any(|l| l == label)))
    }

    fn add_label(&self, asset: &Path, label: &str) -> Result<()> {
        if !self.root.join(asset).exists() {
            warn!(asset = %asset.display(), "no asset at path; label not applied");
            return Ok(());
        }

        let mut labels = self.load()?;
        let set = labels.entry(Self::key(asset)).or_default();
        if set.iter().any(|l| l == label) {
            debug!(asset = %asset.display(), label, "label already present");
            return Ok(());
        }

        set.push(label.to_string());
        self.save(&labels)?;
        info!(asset = %asset.display(), label, "label added");
        Ok(())
    }
}

/// Refresh trigger backed by an optional user-configured shell command
pub struct HookRefresher {
    command: Option<String>,
}

impl HookRefresher {
    pub fn new(command: Option<String>) -> Self {
        Self { command }
    }
}

impl AssetRefresher for HookRefresher {
    fn refresh_all(&self) -> Result<()> {
        let Some(command) = &self.command else {
            info!("no refresh hook configured; asset reimport is up to the host editor");
            return Ok(());
        };

        info!(command, "running refresh hook");
        let output = std::process::Command::new("sh")
            .arg("-c")
            .arg(command)
            .output()
            .with_context(|| format!("Failed to run refresh hook: {command}"))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            info!(output = %stdout.trim(), "refresh hook output");
        }

        if !output.status.success() {
            anyhow::bail!(
                "refresh hook exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_label_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let asset = Path::new("Assets/bundle.tar.gz");
        std::fs::create_dir_all(temp_dir.path().join("Assets")).unwrap();
        std::fs::write(temp_dir.path().join(asset), b"archive").unwrap();

        let labels = FsLabels::new(temp_dir.path());
        assert!(!labels.has_label(asset, "hydrated").unwrap());

        labels.add_label(asset, "hydrated").unwrap();
        assert!(labels.has_label(asset, "hydrated").unwrap());

        // Adding again is a no-op, not a duplicate
        labels.add_label(asset, "hydrated").unwrap();
        let store: LabelMap = serde_json::from_str(
            &std::fs::read_to_string(temp_dir.path().join(".mpk/labels.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(store["Assets/bundle.tar.gz"], vec!["hydrated"]);
    }

    #[test]
    fn test_labels_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let asset = Path::new("a.meta");
        std::fs::write(temp_dir.path().join(asset), b"guid: 1").unwrap();

        FsLabels::new(temp_dir.path())
            .add_label(asset, "pinned")
            .unwrap();

        let reopened = FsLabels::new(temp_dir.path());
        assert!(reopened.has_label(asset, "pinned").unwrap());
        assert!(!reopened.has_label(asset, "other").unwrap());
    }

    #[test]
    fn test_missing_asset_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let labels = FsLabels::new(temp_dir.path());

        labels
            .add_label(Path::new("Assets/ghost.tar.gz"), "hydrated")
            .unwrap();

        assert!(!labels
            .has_label(Path::new("Assets/ghost.tar.gz"), "hydrated")
            .unwrap());
        assert!(!temp_dir.path().join(".mpk/labels.json").exists());
    }

    #[test]
    fn test_hook_refresher_without_command() {
        let refresher = HookRefresher::new(None);
        assert!(refresher.refresh_all().is_ok());
    }

    #[test]
    fn test_hook_refresher_runs_command() {
        let temp_dir = TempDir::new().unwrap();
        let marker = temp_dir.path().join("refreshed");

        let refresher = HookRefresher::new(Some(format!("touch {}", marker.display())));
        refresher.refresh_all().unwrap();
        assert!(marker.exists());
    }

    #[test]
    fn test_hook_refresher_surfaces_failure() {
        let refresher = HookRefresher::new(Some("exit 3".to_string()));
        assert!(refresher.refresh_all().is_err());
    }
}
