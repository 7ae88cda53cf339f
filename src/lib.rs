//! Anomi Engine — ensemble attack classification for EV charging telemetry.
//!
//! Modular structure:
//! - [`schema`] — Source registry: per-origin text/numeric field lists
//! - [`features`] — Canonical feature reconstruction and text encoding
//! - [`model`] — Classifier panel: trained binary members scoring P(attack)
//! - [`council`] — Voting aggregation across panel members
//! - [`rules`] — Safe-pattern whitelist, attack signatures, attack taxonomy
//! - [`verdict`] — Final decision with attributable reason
//! - [`engine`] — Per-source detectors behind an immutable registry
//! - [`logging`] — Structured JSON logging

pub mod config;
pub mod council;
pub mod engine;
pub mod error;
pub mod features;
pub mod logging;
pub mod model;
pub mod rules;
pub mod schema;
pub mod verdict;

pub use config::EngineConfig;
pub use council::{ClassifierVote, CouncilResult, LocalDecision, VotingAggregator};
pub use engine::{DetectionEngine, EnsembleDetector};
pub use error::{EngineError, InferenceError};
pub use features::FeatureVector;
pub use logging::StructuredLogger;
pub use model::{ClassifierPanel, PanelMember};
pub use rules::RuleSet;
pub use schema::{LogRecord, SchemaRegistry, SourceSchema};
pub use verdict::Verdict;
