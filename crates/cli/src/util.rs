//! Shared utilities for CLI commands

use anyhow::Result;
use mpk_core::{layout, Config, FsLabels, HookRefresher, Layout, Organizer, RunGuard};
use std::path::Path;
use std::sync::Arc;

/// Open the organizer for the project containing cwd
pub fn open_organizer() -> Result<Organizer> {
    let root = layout::find_project_root()?;
    build_organizer(&root)
}

/// Wire an organizer for an explicit project root
pub fn build_organizer(root: &Path) -> Result<Organizer> {
    let config = Config::load(root)?;
    let layout = Layout::new(root, &config);
    let labels = FsLabels::new(root);
    let refresher = HookRefresher::new(config.hooks.refresh_command.clone());

    Ok(Organizer::new(
        layout,
        config,
        Arc::new(RunGuard::new()),
        Box::new(labels),
        Box::new(refresher),
    ))
}

/// Format file size in human-readable format
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1024 * 1024), "1.00 MB");
    }
}
