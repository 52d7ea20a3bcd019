//! Data-directory resolution with a cross-platform fallback chain.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Resolve the directory holding the timer collection and config.
///
/// Priority order:
/// 1. Explicit override from config (testing/CI)
/// 2. `~/.multitimer`
/// 3. Platform data directory (XDG on Linux, AppData on Windows)
/// 4. Current working directory as a last resort
///
/// Each candidate is probed for write access before being selected.
pub fn get_data_dir(override_dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        ensure_writable(dir)?;
        return Ok(dir.clone());
    }

    if let Some(home) = home::home_dir() {
        let dir = home.join(".multitimer");
        if ensure_writable(&dir).is_ok() {
            return Ok(dir);
        }
        eprintln!(
            "Warning: Cannot write to {}. Trying fallback locations.",
            dir.display()
        );
    }

    if let Some(data) = dirs::data_local_dir() {
        let dir = data.join("multitimer");
        if ensure_writable(&dir).is_ok() {
            return Ok(dir);
        }
    }

    let dir = PathBuf::from(".multitimer");
    ensure_writable(&dir).context(
        "Cannot create a data directory in any location. \
         Check file permissions or set storage.data_dir_override in config.",
    )?;
    Ok(dir)
}

/// Create `dir` if needed and verify the current user can write into it.
pub fn ensure_writable(dir: &PathBuf) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let probe = dir.join(".write_test");
    fs::write(&probe, b"test")
        .with_context(|| format!("Directory {} is not writable", dir.display()))?;
    // Cleanup can fail (antivirus holding the file on Windows); not fatal.
    let _ = fs::remove_file(&probe);

    Ok(())
}
