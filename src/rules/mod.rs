//! Deterministic rule layer: safe-pattern whitelist, attack-signature
//! keywords, and the ordered attack taxonomy. All tables are loaded once and
//! read-only afterwards; matching is case-insensitive substring scan,
//! first match wins.

mod overrides;
mod patterns;
mod taxonomy;

pub use overrides::{OverrideBranch, OverrideEngine, OverrideOutcome};
pub use patterns::{AttackKeywordSet, SafePatternSet};
pub use taxonomy::{AttackRule, AttackRuleTable};

use crate::error::EngineError;
use crate::schema::LogRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Meta fields excluded from the text used for pattern and keyword matching.
/// Labels and prior decisions must never leak into the override layer.
pub const EXCLUDED_META_FIELDS: &[&str] = &[
    "label",
    "decision",
    "attack_type",
    "is_attack",
    "winning_model",
    "confidence_score",
    "monitor_id",
    "job_id",
];

/// Lower-cased, space-joined string form of every non-meta, non-null record
/// field. This is the only text the override layer and the taxonomy see.
pub fn classification_text(record: &LogRecord) -> String {
    let mut parts = Vec::with_capacity(record.len());
    for (key, value) in record {
        if EXCLUDED_META_FIELDS.contains(&key.as_str()) {
            continue;
        }
        match value {
            Value::Null => {}
            Value::String(s) => parts.push(s.clone()),
            other => parts.push(other.to_string()),
        }
    }
    parts.join(" ").to_lowercase()
}

/// The full deterministic rule configuration: whitelist, keyword signatures,
/// and the taxonomy table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    pub safe_patterns: SafePatternSet,
    pub attack_keywords: AttackKeywordSet,
    pub taxonomy: AttackRuleTable,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            safe_patterns: SafePatternSet::builtin(),
            attack_keywords: AttackKeywordSet::builtin(),
            taxonomy: AttackRuleTable::builtin(),
        }
    }
}

impl RuleSet {
    pub fn from_file(path: &Path) -> Result<Self, EngineError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("rules file {}: {e}", path.display())))?;
        serde_json::from_str(&data)
            .map_err(|e| EngineError::Config(format!("rules file {}: {e}", path.display())))
    }
}
