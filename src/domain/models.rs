//! Domain models for subscription data.
//!
//! These models represent credentials, fetched subscription records and the
//! snapshot/identifier values that flow through the sync pipeline.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Opaque secret material. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw secret for use on the wire.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Authorization material resolved once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Plain API key, sent as a query parameter.
    ApiKey(Secret),
    /// OAuth material from an `installed` client file or the environment.
    OAuth {
        client_id: Option<String>,
        client_secret: Secret,
    },
}

impl Credentials {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ApiKey(_) => "api_key",
            Self::OAuth { .. } => "oauth",
        }
    }

    #[must_use]
    pub const fn secret(&self) -> &Secret {
        match self {
            Self::ApiKey(secret) => secret,
            Self::OAuth { client_secret, .. } => client_secret,
        }
    }
}

/// Where the resolved secret came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// File only.
    File,
    /// Environment only (no credentials file).
    Environment,
    /// File shape with the secret overridden from the environment.
    EnvironmentOverride,
    /// Environment only; the credentials file exists but was unusable.
    EnvironmentFallback { file_error: &'static str },
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Environment => write!(f, "environment"),
            Self::EnvironmentOverride => write!(f, "file + environment override"),
            Self::EnvironmentFallback { file_error } => {
                write!(f, "environment (credentials file ignored: {file_error})")
            }
        }
    }
}

/// A single subscription as returned by the remote API.
///
/// `raw` keeps the original item untouched; the other fields are views
/// derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionRecord {
    /// Subscription resource id (`id`), if present.
    pub id: Option<String>,
    /// Subscribed channel (`snippet.resourceId.channelId`), if usable.
    pub channel_id: Option<String>,
    /// Channel title (`snippet.title`), empty when absent.
    pub title: String,
    pub raw: Value,
}

impl SubscriptionRecord {
    /// Builds a record from a raw API item. Never fails; missing fields
    /// become `None` or empty.
    #[must_use]
    pub fn from_raw(raw: Value) -> Self {
        let snippet = raw.get("snippet");

        let channel_id = snippet
            .and_then(|s| s.get("resourceId"))
            .and_then(|r| r.get("channelId"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from);

        let title = snippet
            .and_then(|s| s.get("title"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let id = raw.get("id").and_then(Value::as_str).map(String::from);

        Self {
            id,
            channel_id,
            title,
            raw,
        }
    }
}

/// Point-in-time capture of every fetched subscription record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    /// Records in arrival order, duplicates preserved.
    pub records: Vec<SubscriptionRecord>,
    /// `pageInfo.totalResults` reported by the API.
    pub total_results: Option<u64>,
    /// Continuation token if the capture is known to be incomplete.
    pub next_page_token: Option<String>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    #[must_use]
    pub fn from_items(items: Vec<Value>) -> Self {
        Self {
            records: items.into_iter().map(SubscriptionRecord::from_raw).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Deduplicated, order-preserving list of channel identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChannelIdList {
    ids: Vec<String>,
    #[serde(skip)]
    seen: HashSet<String>,
}

impl ChannelIdList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `id` unless already present. Returns whether it was added.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.seen.contains(id) {
            return false;
        }
        self.seen.insert(id.to_string());
        self.ids.push(id.to_string());
        true
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for ChannelIdList {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut list = Self::new();
        for id in iter {
            list.insert(id);
        }
        list
    }
}

/// Non-fatal problem found while extracting identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ExtractionWarning {
    /// Record at `index` has no usable channel id.
    MissingChannelId {
        index: usize,
        item_id: Option<String>,
    },
}

impl fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingChannelId { index, item_id } => match item_id {
                Some(id) => write!(f, "record {index} ({id}) has no channel id"),
                None => write!(f, "record {index} has no channel id"),
            },
        }
    }
}

/// Result of extraction: identifiers plus the warnings that were skipped over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionReport {
    pub channel_ids: ChannelIdList,
    pub warnings: Vec<ExtractionWarning>,
    pub total_records: usize,
}

impl ExtractionReport {
    /// Number of records skipped for lacking a channel id.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, ExtractionWarning::MissingChannelId { .. }))
            .count()
    }

    /// Number of duplicate identifiers dropped.
    #[must_use]
    pub fn duplicates(&self) -> usize {
        self.total_records
            .saturating_sub(self.skipped())
            .saturating_sub(self.channel_ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_secret_debug_is_redacted() {
        let creds = Credentials::ApiKey(Secret::new("AIza-very-secret"));
        let printed = format!("{creds:?}");
        assert!(!printed.contains("very-secret"));
        assert!(printed.contains("***"));
    }

    #[test]
    fn test_record_from_full_item() {
        let record = SubscriptionRecord::from_raw(json!({
            "id": "sub-1",
            "snippet": {
                "title": "Rust Channel",
                "resourceId": { "kind": "youtube#channel", "channelId": "UC123" }
            }
        }));
        assert_eq!(record.id.as_deref(), Some("sub-1"));
        assert_eq!(record.channel_id.as_deref(), Some("UC123"));
        assert_eq!(record.title, "Rust Channel");
    }

    #[test]
    fn test_record_tolerates_missing_and_odd_fields() {
        let missing = SubscriptionRecord::from_raw(json!({"snippet": {"resourceId": {}}}));
        let null = SubscriptionRecord::from_raw(json!({"snippet": {"resourceId": {"channelId": null}}}));
        let number = SubscriptionRecord::from_raw(json!({"snippet": {"resourceId": {"channelId": 7}}}));
        let blank = SubscriptionRecord::from_raw(json!({"snippet": {"resourceId": {"channelId": "  "}}}));
        let not_object = SubscriptionRecord::from_raw(json!("garbage"));

        for record in [missing, null, number, blank, not_object] {
            assert_eq!(record.channel_id, None);
            assert!(record.title.is_empty());
        }
    }

    #[test]
    fn test_channel_id_list_keeps_first_position() {
        let list: ChannelIdList = ["UC2", "UC1", "UC2", "UC3", "UC1"].into_iter().collect();
        assert_eq!(list.as_slice(), ["UC2", "UC1", "UC3"]);
    }

    #[test]
    fn test_channel_id_list_serializes_as_array() {
        let list: ChannelIdList = ["UC1", "UC2"].into_iter().collect();
        assert_eq!(serde_json::to_value(&list).unwrap(), json!(["UC1", "UC2"]));
    }
}
