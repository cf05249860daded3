//! Show project and archive status

use crate::util;
use anyhow::Result;
use mpk_core::bootstrap::HYDRATED_LABEL;
use owo_colors::OwoColorize;

pub async fn run() -> Result<()> {
    // 1. Open the project
    let organizer = util::open_organizer()?;
    let layout = organizer.layout();
    let config = organizer.config();

    // 2. Gather archive and hydration state
    let archive_path = layout.archive_path();
    let archive_meta = std::fs::metadata(archive_path).ok();
    let hydrated = organizer
        .labels()
        .has_label(&layout.archive_rel_path(), HYDRATED_LABEL)
        .unwrap_or(false);
    let matches = organizer.match_count();

    // 3. Display output
    println!("{}", "Project Status".bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();

    println!(
        "Project:       {}",
        layout.root().display().to_string().cyan()
    );
    println!("Watched tree:  {}", layout.asset_root().display());
    println!(
        "Match rule:    *.{} ({} files currently)",
        config.archive.extension, matches
    );
    println!();

    print!("Archive:       ");
    match archive_meta {
        Some(meta) => {
            println!("{}", "Present ✓".green());
            println!("  Path:        {}", archive_path.display());
            println!("  Size:        {}", util::format_size(meta.len()));
            println!(
                "  Hydrated:    {}",
                if hydrated {
                    "yes".green().to_string()
                } else {
                    "no".yellow().to_string()
                }
            );
        }
        None => {
            println!("{}", "Missing".yellow());
            println!(
                "  {}",
                "Tip: build one with 'mpk compress'".dimmed()
            );
        }
    }
    println!();

    print!("Automatic:     ");
    if config.watch.auto_compress {
        println!(
            "{} (tick every {} ms)",
            "Enabled".green(),
            config.watch.tick_ms
        );
    } else {
        println!("{}", "Disabled".yellow());
        println!("  {}", "Tip: enable with 'mpk auto on'".dimmed());
    }

    Ok(())
}
