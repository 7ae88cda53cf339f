//! Override rule engine: the deterministic layer that adjudicates the final
//! verdict. Branches are evaluated in strict priority order; the first match
//! decides. The whitelist outranks everything, including a unanimous attack
//! consensus from the panel.

use super::{AttackKeywordSet, SafePatternSet};
use crate::config::ThresholdConfig;
use crate::council::CouncilResult;

/// Which branch decided the verdict. Carried into the verdict reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideBranch {
    /// A safe pattern matched the classification text
    Whitelist { pattern: String },
    /// An attack keyword matched the classification text
    Signature { keyword: String },
    /// No rule matched; at least one panel member voted attack
    Consensus,
    /// No rule matched and no member voted attack
    Clean,
}

#[derive(Debug, Clone)]
pub struct OverrideOutcome {
    pub branch: OverrideBranch,
    pub is_attack: bool,
    pub confidence: f32,
}

pub struct OverrideEngine {
    safe_patterns: SafePatternSet,
    attack_keywords: AttackKeywordSet,
    thresholds: ThresholdConfig,
}

impl OverrideEngine {
    pub fn new(
        safe_patterns: SafePatternSet,
        attack_keywords: AttackKeywordSet,
        thresholds: ThresholdConfig,
    ) -> Self {
        Self {
            safe_patterns,
            attack_keywords,
            thresholds,
        }
    }

    /// Pure function of the classification text and the council result.
    pub fn adjudicate(&self, classification_text: &str, council: &CouncilResult) -> OverrideOutcome {
        if let Some(pattern) = self.safe_patterns.first_match(classification_text) {
            return OverrideOutcome {
                branch: OverrideBranch::Whitelist {
                    pattern: pattern.to_string(),
                },
                is_attack: false,
                confidence: self.thresholds.whitelist_confidence,
            };
        }

        if let Some(keyword) = self.attack_keywords.first_match(classification_text) {
            return OverrideOutcome {
                branch: OverrideBranch::Signature {
                    keyword: keyword.to_string(),
                },
                is_attack: true,
                confidence: self
                    .thresholds
                    .signature_floor
                    .max(council.highest_confidence),
            };
        }

        if council.total_attack_votes >= 1 {
            return OverrideOutcome {
                branch: OverrideBranch::Consensus,
                is_attack: true,
                confidence: self
                    .thresholds
                    .consensus_floor
                    .max(council.highest_confidence),
            };
        }

        OverrideOutcome {
            branch: OverrideBranch::Clean,
            is_attack: false,
            confidence: council.highest_confidence,
        }
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }
}
