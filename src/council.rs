//! Voting aggregation: per-member probabilities → council result. The council
//! is advisory; the override layer makes the final call.

use crate::config::{AbstainConfig, ThresholdConfig};
use crate::model::MemberBatchScore;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalDecision {
    Attack,
    Normal,
}

impl LocalDecision {
    pub fn from_probability(probability: f32, threshold: f32) -> Self {
        if probability > threshold {
            LocalDecision::Attack
        } else {
            LocalDecision::Normal
        }
    }
}

/// One member's vote on one record. An abstaining member carries its failure
/// text and counts as probability 0.0 where a number is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierVote {
    pub member_id: String,
    pub probability: f32,
    pub local_decision: LocalDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ClassifierVote {
    pub fn abstained(&self) -> bool {
        self.error.is_some()
    }
}

/// The panel's combined view of one record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouncilResult {
    /// Votes in member registration order; length equals the panel size
    pub votes: Vec<ClassifierVote>,
    pub total_attack_votes: usize,
    /// Argmax probability; first-registered member wins ties
    pub winning_member: String,
    pub highest_confidence: f32,
    pub mean_confidence: f32,
}

pub struct VotingAggregator {
    thresholds: ThresholdConfig,
    abstain: AbstainConfig,
}

impl VotingAggregator {
    pub fn new(thresholds: ThresholdConfig, abstain: AbstainConfig) -> Self {
        Self { thresholds, abstain }
    }

    /// Combine every member's batch scores into one council result per record.
    /// `n_records` is the batch length; every score row either matches it or
    /// is an abstention covering the whole batch.
    pub fn aggregate(&self, scores: &[MemberBatchScore], n_records: usize) -> Vec<CouncilResult> {
        let n_members = scores.len();
        // Probability matrix, abstentions filled with 0.0
        let mut matrix = Array2::<f32>::zeros((n_members, n_records));
        for (m, score) in scores.iter().enumerate() {
            if let Ok(probs) = &score.probabilities {
                for (i, p) in probs.iter().enumerate() {
                    matrix[[m, i]] = *p;
                }
            }
        }

        (0..n_records)
            .map(|i| self.council_for(scores, &matrix, i))
            .collect()
    }

    fn council_for(
        &self,
        scores: &[MemberBatchScore],
        matrix: &Array2<f32>,
        record: usize,
    ) -> CouncilResult {
        let mut votes = Vec::with_capacity(scores.len());
        let mut total_attack_votes = 0usize;
        let mut winner = 0usize;
        let mut winner_prob = f32::MIN;
        let mut highest = 0.0f32;
        let mut present_sum = 0.0f32;
        let mut present_count = 0usize;

        for (m, score) in scores.iter().enumerate() {
            let probability = matrix[[m, record]];
            let error = score.probabilities.as_ref().err().map(|e| e.to_string());
            let abstained = error.is_some();
            let local_decision =
                LocalDecision::from_probability(probability, self.thresholds.vote_threshold);

            if !abstained {
                if local_decision == LocalDecision::Attack {
                    total_attack_votes += 1;
                }
                highest = highest.max(probability);
                present_sum += probability;
                present_count += 1;
            }
            // Abstentions stay in the argmax at probability 0.0
            if probability > winner_prob {
                winner_prob = probability;
                winner = m;
            }

            votes.push(ClassifierVote {
                member_id: score.member_id.clone(),
                probability,
                local_decision,
                error,
            });
        }

        let mean_confidence = if self.abstain.count_in_mean {
            if scores.is_empty() {
                0.0
            } else {
                matrix.column(record).sum() / scores.len() as f32
            }
        } else if present_count == 0 {
            0.0
        } else {
            present_sum / present_count as f32
        };

        CouncilResult {
            votes,
            total_attack_votes,
            winning_member: scores
                .get(winner)
                .map(|s| s.member_id.clone())
                .unwrap_or_default(),
            highest_confidence: highest,
            mean_confidence,
        }
    }
}
