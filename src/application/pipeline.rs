//! Sync pipeline orchestration.
//!
//! Runs credentials → fetch → persist → extract exactly once and tracks the
//! [`PipelineState`] machine. Fatal errors surface with their component
//! classification intact; a failed snapshot write only degrades the run.

use std::path::{Path, PathBuf};

use crate::domain::{
    ExtractionReport, PipelineError, PipelineState, Reporter, SnapshotError,
};
use crate::infrastructure::{ConfigLoader, SnapshotStore, SubscriptionsApi};

use super::extractor::ChannelIdExtractor;
use super::fetcher::SubscriptionFetcher;

/// Result of a completed sync run.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub report: ExtractionReport,
    pub snapshot_path: PathBuf,
    /// Set when the snapshot could not be written.
    pub persist_error: Option<SnapshotError>,
}

impl SyncOutcome {
    /// Output is usable but the snapshot on disk is stale or absent.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.persist_error.is_some()
    }
}

/// One-shot sync pipeline.
pub struct Pipeline<'r, A> {
    loader: ConfigLoader,
    fetcher: SubscriptionFetcher<A>,
    store: SnapshotStore,
    extractor: ChannelIdExtractor,
    snapshot_path: PathBuf,
    reporter: &'r dyn Reporter,
    state: PipelineState,
    history: Vec<PipelineState>,
}

impl<'r, A: SubscriptionsApi> Pipeline<'r, A> {
    pub fn new(
        loader: ConfigLoader,
        fetcher: SubscriptionFetcher<A>,
        snapshot_path: impl Into<PathBuf>,
        reporter: &'r dyn Reporter,
    ) -> Self {
        Self {
            loader,
            fetcher,
            store: SnapshotStore::new(),
            extractor: ChannelIdExtractor::new(),
            snapshot_path: snapshot_path.into(),
            reporter,
            state: PipelineState::Init,
            history: vec![PipelineState::Init],
        }
    }

    #[must_use]
    pub const fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Every state entered so far, starting with `Init`.
    #[must_use]
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// Run the pipeline.
    ///
    /// # Errors
    /// Returns the originating component error for credential or fetch
    /// failures, or `AlreadyRun` if this pipeline has left `Init`.
    pub fn run(&mut self) -> Result<SyncOutcome, PipelineError> {
        if self.state != PipelineState::Init {
            return Err(PipelineError::AlreadyRun);
        }

        let (credentials, source) = match self.loader.load_with_source() {
            Ok(resolved) => resolved,
            Err(err) => return Err(self.fail(err.into())),
        };
        self.reporter.credentials_resolved(credentials.kind(), source);
        self.advance(PipelineState::CredentialsResolved);

        let snapshot = match self.fetcher.fetch(&credentials, self.reporter) {
            Ok(snapshot) => snapshot,
            Err(err) => return Err(self.fail(err.into())),
        };
        drop(credentials);
        self.advance(PipelineState::Fetched);

        let persist_error = match self.store.save(&snapshot, &self.snapshot_path) {
            Ok(()) => {
                self.reporter
                    .snapshot_written(&self.snapshot_path, snapshot.len());
                self.advance(PipelineState::Persisted);
                None
            }
            Err(err) => {
                self.reporter.degraded(&err);
                Some(err)
            }
        };

        let report = self.extractor.extract(&snapshot, self.reporter);
        self.advance(PipelineState::Extracted);
        self.advance(PipelineState::Done);

        Ok(SyncOutcome {
            report,
            snapshot_path: self.snapshot_path.clone(),
            persist_error,
        })
    }

    fn advance(&mut self, to: PipelineState) {
        self.reporter.transition(&self.state, &to);
        self.history.push(to.clone());
        self.state = to;
    }

    fn fail(&mut self, err: PipelineError) -> PipelineError {
        self.advance(PipelineState::Failed(err.clone()));
        err
    }
}

/// Re-read an existing snapshot and extract identifiers from it.
///
/// # Errors
/// Load failures are fatal on this path and returned unchanged.
pub fn extract_from_snapshot(
    path: &Path,
    reporter: &dyn Reporter,
) -> Result<ExtractionReport, PipelineError> {
    let snapshot = SnapshotStore::new().load(path)?;
    reporter.snapshot_loaded(path, snapshot.len());
    Ok(ChannelIdExtractor::new().extract(&snapshot, reporter))
}
