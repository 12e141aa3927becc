//! JSON snapshot persistence.
//!
//! A snapshot file mirrors the API page shape:
//! `{"items": [...], "pageInfo": {"totalResults": n}, "nextPageToken": ..., "fetchedAt": ...}`.
//! Only `items` is required when reading.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::domain::{Snapshot, SnapshotError};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    total_results: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotFileRef<'a> {
    items: Vec<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_info: Option<PageInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_page_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fetched_at: Option<DateTime<Utc>>,
}

/// Reads and writes whole snapshot files.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotStore;

impl SnapshotStore {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Write `snapshot` to `path`, replacing any previous file.
    ///
    /// Content goes to a sibling temporary file first and is renamed into
    /// place, so readers never observe a partial write.
    ///
    /// # Errors
    /// Returns `WriteFailed` if serialization or any filesystem step fails.
    pub fn save(&self, snapshot: &Snapshot, path: &Path) -> Result<(), SnapshotError> {
        let write_failed = |message: String| SnapshotError::WriteFailed {
            path: path.to_path_buf(),
            message,
        };

        let file = SnapshotFileRef {
            items: snapshot.records.iter().map(|r| &r.raw).collect(),
            page_info: snapshot
                .total_results
                .map(|total_results| PageInfo { total_results }),
            next_page_token: snapshot.next_page_token.as_deref(),
            fetched_at: snapshot.fetched_at,
        };

        let content =
            serde_json::to_string_pretty(&file).map_err(|e| write_failed(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| write_failed(e.to_string()))?;
        }

        let tmp_path = temp_path(path);
        if let Err(e) = fs::write(&tmp_path, content).and_then(|()| fs::rename(&tmp_path, path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(write_failed(e.to_string()));
        }

        Ok(())
    }

    /// Read a snapshot back from `path`.
    ///
    /// # Errors
    /// `NotFound` if the file is absent; `MalformedSnapshot` if it cannot be
    /// read, is not a JSON object, or lacks a top-level `items` array.
    /// Unparsable `pageInfo`, `nextPageToken` or `fetchedAt` values are
    /// ignored.
    pub fn load(&self, path: &Path) -> Result<Snapshot, SnapshotError> {
        let malformed = |message: String| SnapshotError::MalformedSnapshot {
            path: path.to_path_buf(),
            message,
        };

        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SnapshotError::NotFound {
                path: path.to_path_buf(),
            },
            _ => malformed(format!("unreadable: {e}")),
        })?;

        let value: Value =
            serde_json::from_str(&content).map_err(|e| malformed(e.to_string()))?;

        let Value::Object(mut object) = value else {
            return Err(malformed("expected a JSON object".into()));
        };

        let items = match object.remove("items") {
            Some(Value::Array(items)) => items,
            Some(_) => return Err(malformed("`items` is not an array".into())),
            None => return Err(malformed("missing top-level `items` collection".into())),
        };

        // Metadata is informational; unusable values are dropped.
        let mut snapshot = Snapshot::from_items(items);
        snapshot.total_results = object
            .get("pageInfo")
            .and_then(|info| info.get("totalResults"))
            .and_then(Value::as_u64);
        snapshot.next_page_token = object
            .get("nextPageToken")
            .and_then(Value::as_str)
            .map(String::from);
        snapshot.fetched_at = object
            .get("fetchedAt")
            .and_then(Value::as_str)
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|at| at.with_timezone(&Utc));

        Ok(snapshot)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
