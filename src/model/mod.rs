//! Classifier panel: independently trained binary members scoring P(attack).
//! Members are loaded by artifact reference at startup and are read-only
//! afterwards; any concrete format can join the panel by implementing
//! [`PanelMember`].

mod linear;
mod onnx;

pub use linear::LinearMember;
pub use onnx::OnnxMember;

use crate::config::FeaturesConfig;
use crate::error::{EngineError, InferenceError};
use crate::features::FeatureVector;
use crate::schema::SourceSchema;
use std::path::Path;
use walkdir::WalkDir;

/// The single capability the engine requires of a classifier member.
pub trait PanelMember: Send + Sync {
    fn member_id(&self) -> &str;

    /// Score a batch; the returned vector must have one probability in
    /// [0, 1] per input vector.
    fn predict_probability(&self, batch: &[FeatureVector]) -> Result<Vec<f32>, InferenceError>;
}

/// One member's scoring outcome for a whole batch. An `Err` means the member
/// abstains for every record in the batch.
pub struct MemberBatchScore {
    pub member_id: String,
    pub probabilities: Result<Vec<f32>, InferenceError>,
}

/// The loaded, immutable panel for one source.
pub struct ClassifierPanel {
    source_id: String,
    members: Vec<Box<dyn PanelMember>>,
}

impl std::fmt::Debug for ClassifierPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierPanel")
            .field("source_id", &self.source_id)
            .field("members", &self.members.len())
            .finish()
    }
}

impl ClassifierPanel {
    /// Discover and load all artifacts named `<source_id>_<member_id>.{json,onnx}`
    /// in `model_dir`. Registration order is the lexicographic order of the
    /// artifact file names, so repeated loads build identical panels.
    pub fn load(
        source_id: &str,
        model_dir: &Path,
        features: &FeaturesConfig,
        schema: &SourceSchema,
    ) -> Result<Self, EngineError> {
        let prefix = format!("{source_id}_");
        let mut paths: Vec<_> = WalkDir::new(model_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| {
                let stem = p.file_stem().and_then(|s| s.to_str()).unwrap_or("");
                let ext = p.extension().and_then(|s| s.to_str()).unwrap_or("");
                stem.starts_with(&prefix) && matches!(ext, "json" | "onnx")
            })
            .collect();
        paths.sort();

        let mut members: Vec<Box<dyn PanelMember>> = Vec::with_capacity(paths.len());
        for path in &paths {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default();
            let member_id = stem[prefix.len()..].to_string();
            let load_err = |message: String| EngineError::ModelLoad {
                source_id: source_id.to_string(),
                path: path.clone(),
                message,
            };
            let input_dim = features.text_buckets + schema.numeric_fields.len();
            match path.extension().and_then(|s| s.to_str()) {
                Some("json") => {
                    let member = LinearMember::load(path, member_id, features.text_buckets, schema)
                        .map_err(load_err)?;
                    members.push(Box::new(member));
                }
                Some("onnx") => {
                    let member =
                        OnnxMember::load(path, member_id, features.text_buckets, input_dim)
                            .map_err(load_err)?;
                    members.push(Box::new(member));
                }
                _ => {}
            }
        }

        if members.is_empty() {
            return Err(EngineError::ModelsNotFound(source_id.to_string()));
        }

        tracing::info!(
            source = source_id,
            members = members.len(),
            "classifier panel loaded"
        );
        Ok(Self {
            source_id: source_id.to_string(),
            members,
        })
    }

    /// Build a panel from already-constructed members (used by tests and by
    /// callers embedding custom model formats).
    pub fn from_members(
        source_id: impl Into<String>,
        members: Vec<Box<dyn PanelMember>>,
    ) -> Result<Self, EngineError> {
        let source_id = source_id.into();
        if members.is_empty() {
            return Err(EngineError::ModelsNotFound(source_id));
        }
        Ok(Self { source_id, members })
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member_ids(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.member_id())
    }

    /// Score a batch with every member. A member error is caught and recorded
    /// as that member abstaining; it never fails the batch.
    pub fn score(&self, batch: &[FeatureVector]) -> Vec<MemberBatchScore> {
        self.members
            .iter()
            .map(|member| {
                let probabilities = member.predict_probability(batch).and_then(|probs| {
                    if probs.len() == batch.len() {
                        Ok(probs)
                    } else {
                        Err(InferenceError::new(format!(
                            "member `{}` returned {} probabilities for {} records",
                            member.member_id(),
                            probs.len(),
                            batch.len()
                        )))
                    }
                });
                if let Err(ref e) = probabilities {
                    tracing::warn!(
                        source = %self.source_id,
                        member = member.member_id(),
                        error = %e,
                        "panel member abstained"
                    );
                }
                MemberBatchScore {
                    member_id: member.member_id().to_string(),
                    probabilities,
                }
            })
            .collect()
    }
}
