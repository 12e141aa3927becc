//! Settings file management.
//!
//! Handles loading and creating the TOML settings file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AppConfig, AppError, Result};

/// Default settings file content.
const DEFAULT_SETTINGS: &str = r#"# subs-export settings
# Auto-generated - edit as needed

[api]
# Data API base URL
base_url = "https://www.googleapis.com/youtube/v3"

# Items per page (1-50)
page_size = 50

# Per-request timeout in seconds
timeout_secs = 30

[credentials]
# JSON file with {"api_key": ...} or {"installed": {"client_secret": ...}}
file = "config.json"

# Environment variable that overrides the secret in the file.
# For OAuth this must hold an access token, not the client secret.
secret_env = "SUBS_EXPORT_SECRET"

# Fail when the environment variable is not set
require_env = false

[paths]
# Snapshot written by `sync` and read by `extract`
snapshot = "subscriptions.json"

# Base directory for relative `snapshot` and `[credentials] file` paths
# (optional, relative paths resolve against the working directory otherwise)
# data_dir = "/custom/path"
"#;

/// Load settings from `path`, or the default location when `None`.
/// A missing file yields defaults.
///
/// # Errors
/// Returns error if the file exists but cannot be read or parsed.
pub fn load_settings(path: Option<&Path>) -> Result<AppConfig> {
    let path = path.map_or_else(settings_file_path, Path::to_path_buf);

    if path.exists() {
        load_settings_from_file(&path)
    } else {
        tracing::debug!(path = %path.display(), "No settings file, using defaults");
        Ok(AppConfig::default())
    }
}

/// Load settings from a specific file.
///
/// # Errors
/// Returns error if file cannot be read or parsed.
pub fn load_settings_from_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read settings file: {}", path.display()), e))?;

    let mut config: AppConfig = toml::from_str(&content).map_err(|e| AppError::Config {
        message: format!("Failed to parse settings file {}: {e}", path.display()),
    })?;
    config.resolve_relative_paths();

    Ok(config)
}

/// Create the default settings file if it doesn't exist.
/// Returns whether a file was written.
///
/// # Errors
/// Returns error if file cannot be created.
pub fn ensure_settings_exist(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::io("Failed to create settings directory", e))?;
    }

    fs::write(path, DEFAULT_SETTINGS)
        .map_err(|e| AppError::io("Failed to create default settings", e))?;

    tracing::info!(path = %path.display(), "Created default settings");

    Ok(true)
}

/// Get the default path to the settings file.
#[must_use]
pub fn settings_file_path() -> PathBuf {
    AppConfig::default_settings_path()
}
