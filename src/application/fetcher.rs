//! Paginated subscription fetch.
//!
//! Walks continuation tokens until the API stops returning one, keeping
//! items in arrival order (duplicates included). Any failure discards the
//! pages gathered so far.

use std::collections::HashSet;

use chrono::Utc;

use crate::domain::{Credentials, FetchError, Reporter, Snapshot, SubscriptionRecord};
use crate::infrastructure::{SubscriptionsApi, TransportError};

/// `error.errors[].reason` values that mean the request budget is spent.
const QUOTA_REASONS: &[&str] = &[
    "quotaExceeded",
    "dailyLimitExceeded",
    "dailyLimitExceededUnreg",
];

/// Fetches a complete [`Snapshot`] through a [`SubscriptionsApi`].
pub struct SubscriptionFetcher<A> {
    api: A,
    page_size: u32,
}

impl<A: SubscriptionsApi> SubscriptionFetcher<A> {
    pub const fn new(api: A, page_size: u32) -> Self {
        Self { api, page_size }
    }

    /// Fetch every page for `credentials`.
    ///
    /// # Errors
    /// Returns the classified [`FetchError`] of the first failing page. No
    /// partial snapshot is returned and nothing is retried.
    pub fn fetch(
        &self,
        credentials: &Credentials,
        reporter: &dyn Reporter,
    ) -> Result<Snapshot, FetchError> {
        let mut records = Vec::new();
        let mut seen_tokens = HashSet::new();
        let mut page_token: Option<String> = None;
        let mut total_results = None;
        let mut page_number = 0usize;

        loop {
            let page = self
                .api
                .list_page(credentials, page_token.as_deref(), self.page_size)
                .map_err(classify)?;
            page_number += 1;

            total_results = page.total_results.or(total_results);
            reporter.page_fetched(
                page_number,
                page.items.len(),
                page.next_page_token.is_some(),
            );
            records.extend(page.items.into_iter().map(SubscriptionRecord::from_raw));

            match page.next_page_token {
                Some(next) => {
                    if !seen_tokens.insert(next.clone()) {
                        return Err(FetchError::TransientError {
                            status: None,
                            message: format!(
                                "pagination returned a repeated page token after page {page_number}"
                            ),
                        });
                    }
                    page_token = Some(next);
                }
                None => break,
            }
        }

        Ok(Snapshot {
            records,
            total_results,
            next_page_token: None,
            fetched_at: Some(Utc::now()),
        })
    }
}

/// Map a transport failure onto the fetch taxonomy.
#[must_use]
pub fn classify(err: TransportError) -> FetchError {
    match (err.status, err.reason.as_deref()) {
        (Some(403), Some(reason)) if QUOTA_REASONS.contains(&reason) => FetchError::QuotaExceeded {
            reason: reason.to_string(),
            message: err.message,
        },
        (Some(status @ (401 | 403)), _) => FetchError::AuthError {
            status,
            message: err.message,
        },
        (status, _) => FetchError::TransientError {
            status,
            message: err.message,
        },
    }
}
