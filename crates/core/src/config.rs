//! Persisted configuration under .mpk/config.toml

use crate::layout;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tool configuration, loaded with defaults when absent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub archive: ArchiveConfig,

    #[serde(default)]
    pub hooks: HookConfig,
}

/// Watch loop settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Forward change events to the compression scheduler (default: false)
    #[serde(default)]
    pub auto_compress: bool,

    /// Drain tick interval in milliseconds (default: 500)
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

/// Archive location and matching rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Watched directory, relative to the project root (default: "Assets")
    #[serde(default = "default_asset_dir")]
    pub asset_dir: String,

    /// Archive file name inside the asset directory
    #[serde(default = "default_archive_name")]
    pub archive_name: String,

    /// File extension selecting the metadata files to bundle (no dot)
    #[serde(default = "default_extension")]
    pub extension: String,
}

/// Optional host integration hooks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookConfig {
    /// Shell command fired by `mpk reimport` and after bootstrap extraction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_command: Option<String>,

    /// Interpreter for `mpk script` (default: "python3")
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            auto_compress: false,
            tick_ms: default_tick_ms(),
        }
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            asset_dir: default_asset_dir(),
            archive_name: default_archive_name(),
            extension: default_extension(),
        }
    }
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            refresh_command: None,
            interpreter: default_interpreter(),
        }
    }
}

impl Config {
    /// Load configuration for a project root, falling back to defaults
    /// when no config file exists yet
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::path(root);
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Write configuration back to .mpk/config.toml
    pub fn save(&self, root: &Path) -> Result<()> {
        let path = Self::path(root);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let raw = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(&path, raw).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Config file path for a project root
    pub fn path(root: &Path) -> PathBuf {
        layout::tool_dir(root).join("config.toml")
    }
}

fn default_tick_ms() -> u64 {
    500
}

fn default_asset_dir() -> String {
    "Assets".to_string()
}

fn default_archive_name() -> String {
    "meta-archive.tar.gz".to_string()
}

fn default_extension() -> String {
    "meta".to_string()
}

fn default_interpreter() -> String {
    "python3".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load(temp_dir.path()).unwrap();

        assert!(!config.watch.auto_compress);
        assert_eq!(config.watch.tick_ms, 500);
        assert_eq!(config.archive.asset_dir, "Assets");
        assert_eq!(config.archive.extension, "meta");
        assert_eq!(config.hooks.interpreter, "python3");
        assert!(config.hooks.refresh_command.is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();

        let mut config = Config::default();
        config.watch.auto_compress = true;
        config.watch.tick_ms = 250;
        config.archive.extension = "import".to_string();
        config.save(temp_dir.path()).unwrap();

        let reloaded = Config::load(temp_dir.path()).unwrap();
        assert!(reloaded.watch.auto_compress);
        assert_eq!(reloaded.watch.tick_ms, 250);
        assert_eq!(reloaded.archive.extension, "import");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let tool_dir = layout::tool_dir(temp_dir.path());
        std::fs::create_dir_all(&tool_dir).unwrap();
        std::fs::write(
            tool_dir.join("config.toml"),
            "[watch]\nauto_compress = true\n",
        )
        .unwrap();

        let config = Config::load(temp_dir.path()).unwrap();
        assert!(config.watch.auto_compress);
        assert_eq!(config.watch.tick_ms, 500);
        assert_eq!(config.archive.archive_name, "meta-archive.tar.gz");
    }
}
