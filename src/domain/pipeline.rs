//! Pipeline state machine and the reporting seam.

use std::fmt;
use std::path::Path;

use super::error::{PipelineError, SnapshotError};
use super::models::{CredentialSource, ExtractionWarning};

/// Lifecycle of one sync run.
///
/// `Init → CredentialsResolved → Fetched → Persisted → Extracted → Done`.
/// `Persisted` is skipped when the snapshot could not be written; `Failed`
/// is reachable from every non-terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Init,
    CredentialsResolved,
    Fetched,
    Persisted,
    Extracted,
    Done,
    Failed(PipelineError),
}

impl PipelineState {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::CredentialsResolved => "credentials_resolved",
            Self::Fetched => "fetched",
            Self::Persisted => "persisted",
            Self::Extracted => "extracted",
            Self::Done => "done",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(err) => write!(f, "failed({})", err.kind()),
            other => f.write_str(other.name()),
        }
    }
}

/// Receives progress events from pipeline components.
///
/// Passed explicitly to each component instead of relying on a global
/// logger. Every method has a no-op default.
pub trait Reporter {
    fn transition(&self, _from: &PipelineState, _to: &PipelineState) {}

    fn credentials_resolved(&self, _kind: &str, _source: CredentialSource) {}

    fn page_fetched(&self, _page: usize, _items: usize, _has_more: bool) {}

    fn record_skipped(&self, _warning: &ExtractionWarning) {}

    fn extraction_finished(&self, _ids: usize, _skipped: usize) {}

    fn snapshot_written(&self, _path: &Path, _records: usize) {}

    fn snapshot_loaded(&self, _path: &Path, _records: usize) {}

    /// Snapshot could not be persisted; output continues in degraded mode.
    fn degraded(&self, _error: &SnapshotError) {}
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {}
