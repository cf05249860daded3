//! Extract the metadata archive onto disk

use crate::util;
use anyhow::Result;
use mpk_core::ExtractStatus;
use owo_colors::OwoColorize;

pub async fn run() -> Result<()> {
    let organizer = util::open_organizer()?;

    match organizer.extract() {
        ExtractStatus::Extracted(files) => {
            println!(
                "{} {} files extracted into {}",
                "SUCCESS:".green().bold(),
                files,
                organizer.layout().asset_root().display()
            );
            Ok(())
        }
        ExtractStatus::NotFound => anyhow::bail!(
            "Archive not found: {}",
            organizer.layout().archive_path().display()
        ),
        ExtractStatus::AlreadyRunning => {
            println!("{}", "A compression pass is already running".yellow());
            Ok(())
        }
        ExtractStatus::Failed => anyhow::bail!("Extraction failed (see log output)"),
    }
}
