//! Shared fakes for application tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use crate::domain::{Credentials, ExtractionWarning, PipelineState, Reporter, SnapshotError};
use crate::infrastructure::{SubscriptionPage, SubscriptionsApi, TransportError};

/// Build an API item for `channel_id`.
pub fn item(channel_id: &str) -> Value {
    json!({
        "kind": "youtube#subscription",
        "id": format!("sub-{channel_id}"),
        "snippet": {
            "title": format!("Channel {channel_id}"),
            "resourceId": { "kind": "youtube#channel", "channelId": channel_id }
        }
    })
}

pub fn page(ids: &[&str], next: Option<&str>, total: Option<u64>) -> SubscriptionPage {
    SubscriptionPage {
        items: ids.iter().map(|id| item(id)).collect(),
        next_page_token: next.map(String::from),
        total_results: total,
    }
}

/// Replays scripted page results and records each call.
pub struct FakeApi {
    responses: RefCell<VecDeque<Result<SubscriptionPage, TransportError>>>,
    calls: RefCell<Vec<(Option<String>, u32)>>,
}

impl FakeApi {
    pub fn new(responses: Vec<Result<SubscriptionPage, TransportError>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(Option<String>, u32)> {
        self.calls.borrow().clone()
    }
}

impl SubscriptionsApi for FakeApi {
    fn list_page(
        &self,
        _credentials: &Credentials,
        page_token: Option<&str>,
        page_size: u32,
    ) -> Result<SubscriptionPage, TransportError> {
        self.calls
            .borrow_mut()
            .push((page_token.map(String::from), page_size));
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::network("no scripted response")))
    }
}

impl<A: SubscriptionsApi> SubscriptionsApi for &A {
    fn list_page(
        &self,
        credentials: &Credentials,
        page_token: Option<&str>,
        page_size: u32,
    ) -> Result<SubscriptionPage, TransportError> {
        (**self).list_page(credentials, page_token, page_size)
    }
}

/// Captures reporter events for assertions.
#[derive(Default)]
pub struct RecordingReporter {
    pub transitions: RefCell<Vec<PipelineState>>,
    pub pages: RefCell<Vec<(usize, usize, bool)>>,
    pub skipped: RefCell<Vec<ExtractionWarning>>,
    pub finished: RefCell<Vec<(usize, usize)>>,
    pub written: RefCell<Vec<PathBuf>>,
    pub degraded: RefCell<Vec<SnapshotError>>,
}

impl Reporter for RecordingReporter {
    fn transition(&self, _from: &PipelineState, to: &PipelineState) {
        self.transitions.borrow_mut().push(to.clone());
    }

    fn page_fetched(&self, page: usize, items: usize, has_more: bool) {
        self.pages.borrow_mut().push((page, items, has_more));
    }

    fn record_skipped(&self, warning: &ExtractionWarning) {
        self.skipped.borrow_mut().push(warning.clone());
    }

    fn extraction_finished(&self, ids: usize, skipped: usize) {
        self.finished.borrow_mut().push((ids, skipped));
    }

    fn snapshot_written(&self, path: &Path, _records: usize) {
        self.written.borrow_mut().push(path.to_path_buf());
    }

    fn degraded(&self, error: &SnapshotError) {
        self.degraded.borrow_mut().push(error.clone());
    }
}
