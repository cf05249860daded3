//! Enable or disable automatic compression

use anyhow::Result;
use mpk_core::{layout, Config};
use owo_colors::OwoColorize;

pub async fn run(enable: bool) -> Result<()> {
    let root = layout::find_project_root()?;

    let mut config = Config::load(&root)?;
    config.watch.auto_compress = enable;
    config.save(&root)?;

    if enable {
        println!("Automatic compression {}", "enabled".green().bold());
        println!(
            "{}",
            "Note: automatic compression may slow down large imports".dimmed()
        );
    } else {
        println!("Automatic compression {}", "disabled".yellow());
    }

    Ok(())
}
