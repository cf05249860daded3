//! Rebuild the metadata archive now

use crate::util;
use anyhow::Result;
use mpk_core::CompressStatus;
use owo_colors::OwoColorize;

pub async fn run() -> Result<()> {
    let organizer = util::open_organizer()?;

    match organizer.compress() {
        CompressStatus::Archived(files) => {
            println!(
                "{} {} files archived into {}",
                "SUCCESS:".green().bold(),
                files,
                organizer.layout().archive_path().display()
            );
            Ok(())
        }
        CompressStatus::NoMatches => {
            println!(
                "{}",
                "No matching metadata files found. Ignoring request.".dimmed()
            );
            Ok(())
        }
        CompressStatus::AlreadyRunning => {
            println!("{}", "A compression pass is already running".yellow());
            Ok(())
        }
        CompressStatus::Failed => anyhow::bail!("Compression failed (see log output)"),
    }
}
