//! Remote subscriptions API transport.
//!
//! One call per page; no retries and no classification here. Failures come
//! back as a [`TransportError`] carrying the HTTP status and the first
//! `error.errors[].reason` from Google's error envelope.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{ApiConfig, Credentials};

/// One page of the "list my subscriptions" call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubscriptionPage {
    pub items: Vec<Value>,
    pub next_page_token: Option<String>,
    pub total_results: Option<u64>,
}

/// Raw transport failure before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    /// HTTP status, `None` for network-level failures.
    pub status: Option<u16>,
    /// Machine-readable reason from the error body, if any.
    pub reason: Option<String>,
    pub message: String,
}

impl TransportError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            status: None,
            reason: None,
            message: message.into(),
        }
    }

    pub fn http(status: u16, reason: Option<String>, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            reason,
            message: message.into(),
        }
    }
}

/// Paginated subscriptions listing.
pub trait SubscriptionsApi {
    /// Fetch one page. `page_token` is `None` for the first page.
    ///
    /// # Errors
    /// Returns a [`TransportError`] for any non-success outcome.
    fn list_page(
        &self,
        credentials: &Credentials,
        page_token: Option<&str>,
        page_size: u32,
    ) -> Result<SubscriptionPage, TransportError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    items: Vec<Value>,
    #[serde(default)]
    next_page_token: Option<String>,
    #[serde(default)]
    page_info: Option<ListPageInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListPageInfo {
    #[serde(default)]
    total_results: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    reason: Option<String>,
}

/// HTTP implementation over the YouTube Data API v3.
pub struct HttpSubscriptionsApi {
    client: Client,
    base_url: String,
}

impl HttpSubscriptionsApi {
    /// Build a client from API settings.
    ///
    /// # Errors
    /// Returns a [`TransportError`] if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("subs-export/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| TransportError::network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl SubscriptionsApi for HttpSubscriptionsApi {
    fn list_page(
        &self,
        credentials: &Credentials,
        page_token: Option<&str>,
        page_size: u32,
    ) -> Result<SubscriptionPage, TransportError> {
        let url = format!("{}/subscriptions", self.base_url);
        let mut query = vec![
            ("part", "snippet".to_string()),
            ("mine", "true".to_string()),
            ("maxResults", page_size.to_string()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        let mut request = self.client.get(&url);
        match credentials {
            Credentials::ApiKey(key) => query.push(("key", key.expose().to_string())),
            // Must be an access token; a bare client secret is rejected with 401.
            Credentials::OAuth { client_secret, .. } => {
                request = request.bearer_auth(client_secret.expose());
            }
        }

        // Transport errors can embed the request URL (and with it an API key).
        let response = request
            .query(&query)
            .send()
            .map_err(|e| TransportError::network(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(parse_error_body(status.as_u16(), &body));
        }

        let payload: ListResponse = response.json().map_err(|e| {
            TransportError::http(
                status.as_u16(),
                None,
                format!("invalid response body: {}", e.without_url()),
            )
        })?;

        Ok(SubscriptionPage {
            items: payload.items,
            next_page_token: payload.next_page_token.filter(|t| !t.is_empty()),
            total_results: payload.page_info.and_then(|p| p.total_results),
        })
    }
}

/// Build a [`TransportError`] from a non-success body without echoing it.
fn parse_error_body(status: u16, body: &str) -> TransportError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let reason = envelope
                .error
                .errors
                .into_iter()
                .find_map(|detail| detail.reason);
            let message = if envelope.error.message.is_empty() {
                format!("HTTP {status}")
            } else {
                envelope.error.message
            };
            TransportError::http(status, reason, message)
        }
        Err(_) => TransportError::http(status, None, format!("HTTP {status}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Secret;
    use httpmock::prelude::*;
    use serde_json::json;

    fn api_for(server: &MockServer) -> HttpSubscriptionsApi {
        let config = ApiConfig {
            base_url: server.base_url(),
            page_size: 50,
            timeout_secs: 5,
        };
        HttpSubscriptionsApi::new(&config).unwrap()
    }

    #[test]
    fn test_first_page_with_api_key() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/subscriptions")
                .query_param("part", "snippet")
                .query_param("mine", "true")
                .query_param("maxResults", "25")
                .query_param("key", "AIza-1");
            then.status(200).json_body(json!({
                "items": [{"snippet": {"resourceId": {"channelId": "UC1"}}}],
                "nextPageToken": "CAEQAA",
                "pageInfo": {"totalResults": 2, "resultsPerPage": 1}
            }));
        });

        let page = api_for(&server)
            .list_page(&Credentials::ApiKey(Secret::new("AIza-1")), None, 25)
            .unwrap();

        mock.assert();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.next_page_token.as_deref(), Some("CAEQAA"));
        assert_eq!(page.total_results, Some(2));
    }

    #[test]
    fn test_page_token_and_bearer_auth() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/subscriptions")
                .query_param("pageToken", "CAEQAA")
                .header("authorization", "Bearer tok");
            then.status(200).json_body(json!({"items": []}));
        });

        let creds = Credentials::OAuth {
            client_id: None,
            client_secret: Secret::new("tok"),
        };
        let page = api_for(&server).list_page(&creds, Some("CAEQAA"), 50).unwrap();

        mock.assert();
        assert!(page.items.is_empty());
        assert_eq!(page.next_page_token, None);
    }

    #[test]
    fn test_error_envelope_reason() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/subscriptions");
            then.status(403).json_body(json!({
                "error": {
                    "code": 403,
                    "message": "The request cannot be completed because you have exceeded your quota.",
                    "errors": [{"domain": "youtube.quota", "reason": "quotaExceeded"}]
                }
            }));
        });

        let err = api_for(&server)
            .list_page(&Credentials::ApiKey(Secret::new("k")), None, 50)
            .unwrap_err();

        assert_eq!(err.status, Some(403));
        assert_eq!(err.reason.as_deref(), Some("quotaExceeded"));
        assert!(err.message.contains("quota"));
    }

    #[test]
    fn test_non_json_error_body_is_not_echoed() {
        let err = parse_error_body(502, "<html>upstream secret stacktrace</html>");
        assert_eq!(err.status, Some(502));
        assert_eq!(err.reason, None);
        assert_eq!(err.message, "HTTP 502");
    }
}
