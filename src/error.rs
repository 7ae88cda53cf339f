//! Engine error types. Configuration-time problems surface as [`EngineError`];
//! per-member scoring failures are [`InferenceError`] and are recovered into
//! abstaining votes, never propagated to the caller.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The source identifier was never registered. Fatal for the call;
    /// a config fix is required before retry.
    #[error("unknown source `{0}`: not present in the schema registry")]
    UnknownSource(String),

    /// No classifier artifacts were found for a registered source.
    /// Raised at load time; at least one panel member is required.
    #[error("no classifier artifacts found for source `{0}`")]
    ModelsNotFound(String),

    /// An artifact existed but could not be deserialized into a panel member.
    #[error("failed to load artifact {} for source `{source_id}`: {message}", .path.display())]
    ModelLoad {
        source_id: String,
        path: PathBuf,
        message: String,
    },

    /// A source is registered but its panel failed at startup. Other sources
    /// remain servable.
    #[error("source `{source_id}` is registered but unavailable: {reason}")]
    SourceUnavailable { source_id: String, reason: String },

    /// Malformed registry, rule file, or engine configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// A panel member failed while scoring a batch. The member abstains for the
/// whole batch; the error text is carried on its vote entries.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct InferenceError(pub String);

impl InferenceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
