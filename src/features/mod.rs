//! Canonical feature reconstruction from heterogeneous records.

mod encoding;
mod reconstruct;

pub use encoding::HashedTextEncoder;
pub use reconstruct::{reconstruct_batch, reconstruct_record};

use serde::{Deserialize, Serialize};

/// Schema-shaped feature representation of one record. `numeric[i]` holds the
/// value of the schema's i-th numeric field; the vector length always equals
/// the schema's numeric field count regardless of which fields the record
/// actually carried. The text blob keeps original casing; lower-casing
/// happens at matching/encoding time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub text_blob: String,
    pub numeric: Vec<f64>,
}

impl FeatureVector {
    /// Encode into the flat f32 model input: hashed text buckets followed by
    /// the numeric fields in schema order.
    pub fn to_model_input(&self, encoder: &HashedTextEncoder) -> Vec<f32> {
        let mut out = encoder.encode(&self.text_blob);
        out.extend(self.numeric.iter().map(|v| *v as f32));
        out
    }
}
