//! External interpreter invocation for auxiliary scripts
//!
//! Legacy processing path: some projects keep their metadata tooling as
//! interpreter scripts. The core never depends on this; the CLI merely
//! launches the interpreter, blocks on its exit, and relays stdout.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::info;

/// Captured result of one script run
pub struct ScriptOutput {
    pub exit_code: i32,
    pub stdout: String,
}

/// Run `script` under `interpreter`, blocking until it exits
pub fn run_script(interpreter: &str, script: &Path) -> Result<ScriptOutput> {
    anyhow::ensure!(script.exists(), "script not found: {}", script.display());

    info!(interpreter, script = %script.display(), "running auxiliary script");

    let output = Command::new(interpreter)
        .arg(script)
        .stdout(Stdio::piped())
        .output()
        .with_context(|| format!("Failed to launch {interpreter}"))?;

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if !stdout.trim().is_empty() {
        info!(output = %stdout.trim(), "script output");
    }

    Ok(ScriptOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_captures_stdout_and_exit_code() {
        let temp_dir = TempDir::new().unwrap();
        let script = temp_dir.path().join("hello.sh");
        std::fs::write(&script, "echo compressed 42 files\n").unwrap();

        let result = run_script("sh", &script).unwrap();
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout.trim(), "compressed 42 files");
    }

    #[test]
    fn test_nonzero_exit_is_reported_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let script = temp_dir.path().join("fail.sh");
        std::fs::write(&script, "exit 3\n").unwrap();

        let result = run_script("sh", &script).unwrap();
        assert_eq!(result.exit_code, 3);
    }

    #[test]
    fn test_missing_script() {
        assert!(run_script("sh", Path::new("/nonexistent/script.py")).is_err());
    }
}
