//! `tracing`-backed reporter.

use std::path::Path;

use crate::domain::{CredentialSource, ExtractionWarning, PipelineState, Reporter, SnapshotError};

/// Forwards pipeline events to the installed `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn transition(&self, from: &PipelineState, to: &PipelineState) {
        match to {
            PipelineState::Failed(err) => tracing::error!(
                from = %from,
                stage = err.stage(),
                kind = err.kind(),
                "Pipeline failed"
            ),
            _ => tracing::debug!(from = %from, to = %to, "Pipeline transition"),
        }
    }

    fn credentials_resolved(&self, kind: &str, source: CredentialSource) {
        match source {
            CredentialSource::EnvironmentFallback { file_error } => tracing::warn!(
                kind,
                file_error,
                "Credentials file unusable, using environment secret alone"
            ),
            _ => tracing::info!(kind, source = %source, "Credentials resolved"),
        }
    }

    fn page_fetched(&self, page: usize, items: usize, has_more: bool) {
        tracing::info!(page, items, has_more, "Fetched subscriptions page");
    }

    fn record_skipped(&self, warning: &ExtractionWarning) {
        tracing::warn!("Skipping item: {warning}");
    }

    fn extraction_finished(&self, ids: usize, skipped: usize) {
        tracing::debug!(ids, skipped, "Extraction finished");
    }

    fn snapshot_written(&self, path: &Path, records: usize) {
        tracing::info!(path = %path.display(), records, "Snapshot saved");
    }

    fn snapshot_loaded(&self, path: &Path, records: usize) {
        tracing::info!(path = %path.display(), records, "Snapshot loaded");
    }

    fn degraded(&self, error: &SnapshotError) {
        tracing::warn!(kind = error.kind(), "Snapshot not persisted: {error}");
    }
}
