//! Logistic panel member over hashed text tokens and standardized numerics.
//! This is the native artifact format: a small serde JSON file exported by
//! the offline training suite.

use super::PanelMember;
use crate::error::InferenceError;
use crate::features::{FeatureVector, HashedTextEncoder};
use crate::schema::SourceSchema;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct LinearArtifact {
    /// One weight per text hash bucket
    text_weights: Vec<f32>,
    /// One weight per schema numeric field, in schema order
    numeric_weights: Vec<f32>,
    #[serde(default)]
    numeric_means: Vec<f32>,
    #[serde(default)]
    numeric_scales: Vec<f32>,
    bias: f32,
}

pub struct LinearMember {
    member_id: String,
    encoder: HashedTextEncoder,
    text_weights: Vec<f32>,
    numeric_weights: Vec<f32>,
    numeric_means: Vec<f32>,
    numeric_scales: Vec<f32>,
    bias: f32,
}

impl LinearMember {
    pub fn load(
        path: &Path,
        member_id: String,
        text_buckets: usize,
        schema: &SourceSchema,
    ) -> Result<Self, String> {
        let data = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        let artifact: LinearArtifact = serde_json::from_str(&data).map_err(|e| e.to_string())?;

        if artifact.text_weights.len() != text_buckets {
            return Err(format!(
                "text_weights has {} entries, engine is configured for {} buckets",
                artifact.text_weights.len(),
                text_buckets
            ));
        }
        let n_num = schema.numeric_fields.len();
        if artifact.numeric_weights.len() != n_num {
            return Err(format!(
                "numeric_weights has {} entries, schema defines {} numeric fields",
                artifact.numeric_weights.len(),
                n_num
            ));
        }

        let numeric_means = if artifact.numeric_means.is_empty() {
            vec![0.0; n_num]
        } else if artifact.numeric_means.len() == n_num {
            artifact.numeric_means
        } else {
            return Err("numeric_means length does not match the schema".to_string());
        };
        let numeric_scales = if artifact.numeric_scales.is_empty() {
            vec![1.0; n_num]
        } else if artifact.numeric_scales.len() == n_num {
            artifact.numeric_scales
        } else {
            return Err("numeric_scales length does not match the schema".to_string());
        };

        Ok(Self {
            member_id,
            encoder: HashedTextEncoder::new(text_buckets),
            text_weights: artifact.text_weights,
            numeric_weights: artifact.numeric_weights,
            numeric_means,
            numeric_scales,
            bias: artifact.bias,
        })
    }

    fn score_one(&self, fv: &FeatureVector) -> f32 {
        let mut z = self.bias;
        let counts = self.encoder.encode(&fv.text_blob);
        for (w, c) in self.text_weights.iter().zip(&counts) {
            z += w * c;
        }
        for (i, value) in fv.numeric.iter().enumerate() {
            let scale = self.numeric_scales[i].abs().max(f32::EPSILON);
            let x = (*value as f32 - self.numeric_means[i]) / scale;
            z += self.numeric_weights[i] * x;
        }
        sigmoid(z)
    }
}

impl PanelMember for LinearMember {
    fn member_id(&self) -> &str {
        &self.member_id
    }

    fn predict_probability(&self, batch: &[FeatureVector]) -> Result<Vec<f32>, InferenceError> {
        Ok(batch.iter().map(|fv| self.score_one(fv)).collect())
    }
}

fn sigmoid(z: f32) -> f32 {
    1.0 / (1.0 + (-z).exp())
}
