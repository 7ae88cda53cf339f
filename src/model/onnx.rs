//! ONNX panel member. Input: `[N, input_dim]` f32 (hashed text buckets
//! followed by numeric fields), output: `[N]` or `[N, 2]` attack
//! probabilities. Sessions require exclusive access to run, so each member
//! wraps its session in a mutex; members themselves stay read-only.

use super::PanelMember;
use crate::error::InferenceError;
use crate::features::{FeatureVector, HashedTextEncoder};
use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use std::path::Path;
use std::sync::Mutex;

pub struct OnnxMember {
    member_id: String,
    session: Mutex<Session>,
    encoder: HashedTextEncoder,
    input_dim: usize,
}

impl OnnxMember {
    pub fn load(
        path: &Path,
        member_id: String,
        text_buckets: usize,
        input_dim: usize,
    ) -> Result<Self, String> {
        let session = Session::builder()
            .map_err(|e| e.to_string())?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| e.to_string())?
            .commit_from_file(path)
            .map_err(|e| e.to_string())?;

        Ok(Self {
            member_id,
            session: Mutex::new(session),
            encoder: HashedTextEncoder::new(text_buckets),
            input_dim,
        })
    }
}

impl PanelMember for OnnxMember {
    fn member_id(&self) -> &str {
        &self.member_id
    }

    fn predict_probability(&self, batch: &[FeatureVector]) -> Result<Vec<f32>, InferenceError> {
        let n = batch.len();
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut input_data = Vec::with_capacity(n * self.input_dim);
        for fv in batch {
            let mut row = fv.to_model_input(&self.encoder);
            row.resize(self.input_dim, 0.0);
            input_data.extend_from_slice(&row);
        }
        let input = Array2::<f32>::from_shape_vec((n, self.input_dim), input_data)
            .map_err(|e| InferenceError::new(format!("input tensor: {e}")))?;
        let tensor =
            Value::from_array(input).map_err(|e| InferenceError::new(format!("tensor: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| InferenceError::new("session mutex poisoned"))?;
        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| InferenceError::new("model defines no output"))?;
        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| InferenceError::new(format!("inference failed: {e}")))?;
        let output = outputs
            .get(&output_name)
            .ok_or_else(|| InferenceError::new("model produced no output"))?;
        let extracted = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::new(format!("extract: {e}")))?;
        let data = extracted.1;

        // [N] → probability per record; [N, 2] → column 1 is P(attack)
        let probs: Vec<f32> = if data.len() == n {
            data.iter().map(|p| p.clamp(0.0, 1.0)).collect()
        } else if data.len() == 2 * n {
            (0..n).map(|i| data[i * 2 + 1].clamp(0.0, 1.0)).collect()
        } else {
            return Err(InferenceError::new(format!(
                "unexpected output shape: {} values for {n} records",
                data.len()
            )));
        };
        Ok(probs)
    }
}
