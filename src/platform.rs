//! Cross-platform data directory resolution.
//!
//! Trips, expenses, the converter session and the rate cache all live in
//! one directory, chosen through a permission fallback chain.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_DIR_NAME: &str = ".trip-planner";

/// Config file location, `~/.trip-planner/config.toml`.
pub fn config_path() -> Result<PathBuf> {
    let home = home::home_dir().context("Could not find home directory")?;
    Ok(home.join(APP_DIR_NAME).join("config.toml"))
}

/// Get the data directory with cross-platform fallback chain.
///
/// Priority order:
/// 1. Explicit override (config `storage.data_dir_override`, tests)
/// 2. Home directory (~/.trip-planner)
/// 3. Platform-specific data directory (XDG on Linux, AppData on Windows)
/// 4. Current working directory (last resort)
///
/// Each directory is validated for write access before being selected.
pub fn get_data_dir(override_dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        ensure_writable(dir)?;
        return Ok(dir.clone());
    }

    if let Some(home) = home::home_dir() {
        let dir = home.join(APP_DIR_NAME);
        if ensure_writable(&dir).is_ok() {
            return Ok(dir);
        }
        tracing::warn!(
            "cannot write to {}, trying fallback locations",
            dir.display()
        );
    }

    // - Linux: ~/.local/share/trip-planner
    // - macOS: ~/Library/Application Support/trip-planner
    // - Windows: C:\Users\<User>\AppData\Local\trip-planner
    if let Some(data) = dirs::data_local_dir() {
        let dir = data.join("trip-planner");
        if ensure_writable(&dir).is_ok() {
            return Ok(dir);
        }
    }

    let dir = PathBuf::from(APP_DIR_NAME);
    ensure_writable(&dir).context(
        "Cannot create data directory in any location. \
         Check file permissions or set storage.data_dir_override in config.",
    )?;
    Ok(dir)
}

/// Ensure a directory exists and is writable by the current user.
pub fn ensure_writable(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let test_path = dir.join(".write_test");
    fs::write(&test_path, b"test")
        .with_context(|| format!("Directory {} is not writable", dir.display()))?;

    // File might be held by antivirus on Windows
    let _ = fs::remove_file(&test_path);

    Ok(())
}
