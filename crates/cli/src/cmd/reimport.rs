//! Trigger the host asset-refresh hook

use crate::util;
use anyhow::Result;
use owo_colors::OwoColorize;

pub async fn run() -> Result<()> {
    let organizer = util::open_organizer()?;

    if organizer.reimport() {
        println!("{}", "Asset refresh triggered".green());
        Ok(())
    } else {
        anyhow::bail!("Asset refresh failed (see log output)")
    }
}
