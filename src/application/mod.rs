//! Application layer - use cases and orchestration.
//!
//! This layer contains the fetch, extraction and pipeline logic that sits
//! between the CLI and the infrastructure adapters.

pub mod extractor;
pub mod fetcher;
pub mod formatter;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod test_support;

pub use extractor::ChannelIdExtractor;
pub use fetcher::SubscriptionFetcher;
pub use formatter::{format_channel_ids, format_summary, OutputFormat};
pub use pipeline::{extract_from_snapshot, Pipeline, SyncOutcome};
