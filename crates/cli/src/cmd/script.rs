//! Run an auxiliary script through the configured interpreter

use crate::{interp, util};
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;

pub async fn run(path: &Path) -> Result<()> {
    let organizer = util::open_organizer()?;
    let interpreter = &organizer.config().hooks.interpreter;

    let result = interp::run_script(interpreter, path)?;

    if !result.stdout.trim().is_empty() {
        println!("{}", result.stdout.trim_end());
    }

    if result.exit_code == 0 {
        println!("{}", "Script finished".green());
        Ok(())
    } else {
        anyhow::bail!("Script exited with code {}", result.exit_code)
    }
}
