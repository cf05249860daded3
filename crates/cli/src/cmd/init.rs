//! Initialize metapack in the current project

use anyhow::{Context, Result};
use mpk_core::{layout, Config};
use owo_colors::OwoColorize;

pub async fn run() -> Result<()> {
    let root = std::env::current_dir().context("Failed to get current directory")?;
    let tool_dir = layout::tool_dir(&root);

    if tool_dir.exists() {
        println!(
            "{}",
            format!("Already initialized ({})", tool_dir.display()).yellow()
        );
        return Ok(());
    }

    std::fs::create_dir_all(&tool_dir)
        .with_context(|| format!("Failed to create {}", tool_dir.display()))?;

    let config = Config::default();
    config.save(&root)?;

    println!("{}", "Initialized metapack project".green().bold());
    println!("  Config:  {}", Config::path(&root).display());
    println!("  Watched: {}", root.join(&config.archive.asset_dir).display());
    println!();
    println!("{}", "Tip: enable automatic mode with 'mpk auto on'".dimmed());

    Ok(())
}
