//! Domain layer - core types and errors.
//!
//! This layer contains pure domain models, the error taxonomy and the
//! pipeline state machine, without any I/O.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod settings;

pub use error::{AppError, ConfigError, FetchError, PipelineError, Result, SnapshotError};
pub use models::{
    ChannelIdList, CredentialSource, Credentials, ExtractionReport, ExtractionWarning, Secret,
    Snapshot, SubscriptionRecord,
};
pub use pipeline::{NullReporter, PipelineState, Reporter};
pub use settings::{ApiConfig, AppConfig, CredentialsConfig};
