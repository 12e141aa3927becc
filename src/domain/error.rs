//! Domain-level error types for subs-export.
//!
//! Each pipeline component owns a small tagged taxonomy. The orchestrator
//! carries those errors through unchanged so the operator always sees which
//! stage failed and why, without raw transport payloads.

use std::path::PathBuf;
use thiserror::Error;

/// Credential resolution failures. All are terminal for a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Credentials file does not exist and nothing else supplied a secret.
    #[error("credentials file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// File exists but is not one of the accepted JSON shapes.
    #[error("malformed credentials file {}: {message}", path.display())]
    MalformedConfig { path: PathBuf, message: String },

    /// A secret was required but absent or empty.
    #[error("missing secret: {name}")]
    MissingSecret { name: String },

    /// Credentials file exists but cannot be read by this user.
    #[error("permission denied reading {}", path.display())]
    PermissionDenied { path: PathBuf },
}

impl ConfigError {
    /// Short variant name for operator messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::FileNotFound { .. } => "FileNotFound",
            Self::MalformedConfig { .. } => "MalformedConfig",
            Self::MissingSecret { .. } => "MissingSecret",
            Self::PermissionDenied { .. } => "PermissionDenied",
        }
    }
}

/// Remote fetch failures, classified from transport responses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Authorization rejected (401, or 403 without a quota reason).
    #[error("authorization rejected (HTTP {status}): {message}")]
    AuthError { status: u16, message: String },

    /// Request budget exhausted.
    #[error("quota exceeded ({reason}): {message}")]
    QuotaExceeded { reason: String, message: String },

    /// Any other failure. Safe for the caller to retry with backoff.
    #[error("transient failure{}: {message}", status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    TransientError {
        status: Option<u16>,
        message: String,
    },
}

impl FetchError {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AuthError { .. } => "AuthError",
            Self::QuotaExceeded { .. } => "QuotaExceeded",
            Self::TransientError { .. } => "TransientError",
        }
    }

    /// Whether a caller may retry the whole fetch later.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientError { .. })
    }
}

/// Snapshot persistence failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("snapshot not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Parses as data but lacks the expected top-level shape.
    #[error("malformed snapshot {}: {message}", path.display())]
    MalformedSnapshot { path: PathBuf, message: String },

    #[error("failed to write snapshot {}: {message}", path.display())]
    WriteFailed { path: PathBuf, message: String },
}

impl SnapshotError {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NotFound",
            Self::MalformedSnapshot { .. } => "MalformedSnapshot",
            Self::WriteFailed { .. } => "WriteFailed",
        }
    }
}

/// Fatal pipeline failure. Wraps the originating component error as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// `run` was called on a pipeline that already left `Init`.
    #[error("pipeline has already run")]
    AlreadyRun,
}

impl PipelineError {
    /// Stage name the failure originated in.
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::Config(_) => "credentials",
            Self::Fetch(_) => "fetch",
            Self::Snapshot(SnapshotError::WriteFailed { .. }) => "persist",
            Self::Snapshot(_) => "load",
            Self::AlreadyRun => "pipeline",
        }
    }

    /// Variant name of the wrapped component error.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Config(e) => e.kind(),
            Self::Fetch(e) => e.kind(),
            Self::Snapshot(e) => e.kind(),
            Self::AlreadyRun => "AlreadyRun",
        }
    }
}

/// Application-level errors for the outer surface (settings, output, CLI).
#[derive(Error, Debug)]
pub enum AppError {
    /// A pipeline stage failed.
    #[error("{} failed ({}): {source}", source.stage(), source.kind())]
    Pipeline {
        #[from]
        source: PipelineError,
    },

    /// Settings or argument error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// JSON serialization failed.
    #[error("JSON error: {message}")]
    JsonParse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// IO operation failed.
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl AppError {
    /// Create a JSON error.
    pub fn json_parse(err: serde_json::Error) -> Self {
        Self::JsonParse {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an IO error with context.
    pub fn io(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(err),
        }
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
