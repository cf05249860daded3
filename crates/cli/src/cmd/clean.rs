//! Delete every matching metadata file

use crate::util;
use anyhow::{Context, Result};
use mpk_core::CleanStatus;
use owo_colors::OwoColorize;
use std::io::Write;

pub async fn run(yes: bool) -> Result<()> {
    let organizer = util::open_organizer()?;

    let count = organizer.match_count();
    if count == 0 {
        println!("{}", "No matching metadata files to delete".dimmed());
        return Ok(());
    }

    if !yes && !confirm(count)? {
        println!("Aborted");
        return Ok(());
    }

    match organizer.clean() {
        CleanStatus::Removed(removed) => {
            println!(
                "{} {} metadata files deleted",
                "SUCCESS:".green().bold(),
                removed
            );
            Ok(())
        }
        CleanStatus::AlreadyRunning => {
            println!("{}", "A compression pass is already running".yellow());
            Ok(())
        }
        CleanStatus::Failed => anyhow::bail!("Delete failed (see log output)"),
    }
}

fn confirm(count: usize) -> Result<bool> {
    print!(
        "Delete {} metadata files? This cannot be undone. [y/N] ",
        count
    );
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;

    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
