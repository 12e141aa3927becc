//! Infrastructure layer - external adapters (filesystem, environment, HTTP).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod config;
pub mod credentials;
pub mod reporter;
pub mod snapshot_store;
pub mod youtube_api;

pub use config::{ensure_settings_exist, load_settings, settings_file_path};
pub use credentials::ConfigLoader;
pub use reporter::TracingReporter;
pub use snapshot_store::SnapshotStore;
pub use youtube_api::{HttpSubscriptionsApi, SubscriptionPage, SubscriptionsApi, TransportError};
