//! Application settings.
//!
//! Everything here is optional on disk; each section falls back to defaults
//! so a missing or partial `settings.toml` still yields a usable config.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Largest page size the subscriptions endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Remote API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the Data API, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Items requested per page (1-50).
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

const fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

const fn default_timeout() -> u64 {
    30
}

/// Where credentials are resolved from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// JSON credentials file.
    #[serde(default = "default_credentials_file")]
    pub file: PathBuf,

    /// Environment variable that overrides the secret.
    #[serde(default = "default_secret_env")]
    pub secret_env: String,

    /// Fail with `MissingSecret` when the variable is unset.
    #[serde(default)]
    pub require_env: bool,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            file: default_credentials_file(),
            secret_env: default_secret_env(),
            require_env: false,
        }
    }
}

fn default_credentials_file() -> PathBuf {
    PathBuf::from("config.json")
}

fn default_secret_env() -> String {
    "SUBS_EXPORT_SECRET".to_string()
}

/// Path configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    /// Base for relative `snapshot` and `credentials.file` paths.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Snapshot file written by `sync` and read by `extract`.
    #[serde(default = "default_snapshot")]
    pub snapshot: PathBuf,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            snapshot: default_snapshot(),
        }
    }
}

fn default_snapshot() -> PathBuf {
    PathBuf::from("subscriptions.json")
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub credentials: CredentialsConfig,

    #[serde(default)]
    pub paths: PathConfig,
}

impl AppConfig {
    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".subs-export")
    }

    /// Default location of `settings.toml`.
    #[must_use]
    pub fn default_settings_path() -> PathBuf {
        Self::default_data_dir().join("settings.toml")
    }

    /// Anchor relative snapshot and credentials paths at `paths.data_dir`.
    /// Absolute paths and configs without a `data_dir` are left as is.
    pub fn resolve_relative_paths(&mut self) {
        let Some(base) = self.paths.data_dir.as_deref() else {
            return;
        };
        if self.paths.snapshot.is_relative() {
            self.paths.snapshot = base.join(&self.paths.snapshot);
        }
        if self.credentials.file.is_relative() {
            self.credentials.file = base.join(&self.credentials.file);
        }
    }

    /// Page size clamped to what the API accepts.
    #[must_use]
    pub fn effective_page_size(&self) -> u32 {
        self.api.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}
