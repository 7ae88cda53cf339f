//! Final verdict assembly. Pure construction; no side effects.

use crate::council::{ClassifierVote, CouncilResult};
use crate::rules::{AttackRuleTable, OverrideBranch, OverrideOutcome};
use serde::{Deserialize, Serialize};

pub const NORMAL_DECISION: &str = "NORMAL";

/// The override-adjudicated output for one record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub source: String,
    /// Taxonomy category for attacks, `"NORMAL"` otherwise
    pub decision: String,
    pub confidence: f32,
    pub is_attack: bool,
    pub winning_member: String,
    pub votes: Vec<ClassifierVote>,
    /// Which override branch decided the outcome
    pub reason: String,
}

/// Assemble the verdict for one record from the council result and the
/// override outcome, attributing the deciding branch in the reason string.
pub fn emit(
    source_id: &str,
    classification_text: &str,
    council: CouncilResult,
    outcome: OverrideOutcome,
    taxonomy: &AttackRuleTable,
) -> Verdict {
    let (decision, reason) = match &outcome.branch {
        OverrideBranch::Whitelist { .. } => {
            (NORMAL_DECISION.to_string(), "whitelist match".to_string())
        }
        OverrideBranch::Signature { keyword } => (
            taxonomy.classify(classification_text, source_id).to_string(),
            format!("signature match: {keyword}"),
        ),
        OverrideBranch::Consensus => (
            taxonomy.classify(classification_text, source_id).to_string(),
            format!("ML consensus via {}", council.winning_member),
        ),
        OverrideBranch::Clean => (NORMAL_DECISION.to_string(), "clean: no signal".to_string()),
    };

    Verdict {
        source: source_id.to_string(),
        decision,
        confidence: outcome.confidence,
        is_attack: outcome.is_attack,
        winning_member: council.winning_member.clone(),
        votes: council.votes,
        reason,
    }
}
