//! Record → feature vector reconstruction. Defaulting is total: missing or
//! unparsable fields never fail a call.

use super::FeatureVector;
use crate::schema::{LogRecord, SourceSchema};
use serde_json::Value;

/// Reconstruct one record against its schema. The text blob is the
/// space-joined string form of every configured text field in schema order;
/// absent fields contribute the empty string. Numeric fields default to 0.0
/// on absence or parse failure.
pub fn reconstruct_record(record: &LogRecord, schema: &SourceSchema) -> FeatureVector {
    let text_blob = if schema.text_fields.is_empty() {
        String::new()
    } else {
        schema
            .text_fields
            .iter()
            .map(|f| record.get(f).map(value_to_text).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(" ")
    };

    let numeric = schema
        .numeric_fields
        .iter()
        .map(|f| record.get(f).map(value_to_f64).unwrap_or(0.0))
        .collect();

    FeatureVector { text_blob, numeric }
}

/// Batch reconstruction is defined as per-record reconstruction in input
/// order; the single/batch equivalence property holds by construction.
pub fn reconstruct_batch(records: &[LogRecord], schema: &SourceSchema) -> Vec<FeatureVector> {
    records
        .iter()
        .map(|r| reconstruct_record(r, schema))
        .collect()
}

fn value_to_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn value_to_f64(v: &Value) -> f64 {
    match v {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}
