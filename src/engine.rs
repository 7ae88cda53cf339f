//! Detection engine: one ensemble detector per source behind an explicit,
//! immutable registry constructed at startup. Detection itself is a pure,
//! stateless-per-call function; the only lock in the system guards the
//! optional one-time shared load.

use crate::config::EngineConfig;
use crate::council::VotingAggregator;
use crate::error::EngineError;
use crate::features::reconstruct_batch;
use crate::model::ClassifierPanel;
use crate::rules::{classification_text, OverrideEngine, RuleSet};
use crate::schema::{LogRecord, SchemaRegistry, SourceSchema};
use crate::verdict::{emit, Verdict};
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

/// The council pipeline for a single source: reconstruct → score → aggregate
/// → override → verdict.
pub struct EnsembleDetector {
    source_id: String,
    schema: SourceSchema,
    panel: ClassifierPanel,
    aggregator: VotingAggregator,
    overrides: OverrideEngine,
    rules: Arc<RuleSet>,
}

impl EnsembleDetector {
    pub fn load(
        source_id: &str,
        config: &EngineConfig,
        schema: &SourceSchema,
        rules: Arc<RuleSet>,
    ) -> Result<Self, EngineError> {
        let panel = ClassifierPanel::load(source_id, &config.model_dir, &config.features, schema)?;
        Ok(Self::from_panel(schema.clone(), panel, rules, config))
    }

    /// Assemble a detector around an already-loaded panel.
    pub fn from_panel(
        schema: SourceSchema,
        panel: ClassifierPanel,
        rules: Arc<RuleSet>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            source_id: panel.source_id().to_string(),
            schema,
            aggregator: VotingAggregator::new(config.thresholds, config.abstain),
            overrides: OverrideEngine::new(
                rules.safe_patterns.clone(),
                rules.attack_keywords.clone(),
                config.thresholds,
            ),
            panel,
            rules,
        }
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn panel(&self) -> &ClassifierPanel {
        &self.panel
    }

    pub fn detect(&self, record: &LogRecord) -> Verdict {
        self.detect_batch(std::slice::from_ref(record))
            .pop()
            .expect("single-record batch yields one verdict")
    }

    /// Verdicts come back in input order, one per record.
    pub fn detect_batch(&self, records: &[LogRecord]) -> Vec<Verdict> {
        if records.is_empty() {
            return Vec::new();
        }
        let features = reconstruct_batch(records, &self.schema);
        let scores = self.panel.score(&features);
        let councils = self.aggregator.aggregate(&scores, records.len());

        records
            .iter()
            .zip(councils)
            .map(|(record, council)| {
                let text = classification_text(record);
                let outcome = self.overrides.adjudicate(&text, &council);
                emit(&self.source_id, &text, council, outcome, &self.rules.taxonomy)
            })
            .collect()
    }
}

/// Immutable registry of per-source detectors. A source whose panel fails at
/// startup is recorded and refused at call time; the others stay servable.
pub struct DetectionEngine {
    detectors: BTreeMap<String, EnsembleDetector>,
    failed: BTreeMap<String, String>,
}

impl DetectionEngine {
    /// Build the engine from configuration: registry and rule tables from
    /// their configured files (built-in defaults otherwise), then one panel
    /// per registered source from the model directory.
    pub fn load(config: &EngineConfig) -> Result<Self, EngineError> {
        let registry = match &config.schema_file {
            Some(path) => SchemaRegistry::from_file(path)?,
            None => SchemaRegistry::builtin(),
        };
        let rules = match &config.rules_file {
            Some(path) => RuleSet::from_file(path)?,
            None => RuleSet::default(),
        };
        Self::with_tables(config, &registry, rules)
    }

    /// Build from explicit tables; used directly by embedders and tests.
    pub fn with_tables(
        config: &EngineConfig,
        registry: &SchemaRegistry,
        rules: RuleSet,
    ) -> Result<Self, EngineError> {
        let rules = Arc::new(rules);
        let mut detectors = BTreeMap::new();
        let mut failed = BTreeMap::new();

        for source_id in registry.source_ids() {
            let schema = registry.lookup(source_id)?;
            match EnsembleDetector::load(source_id, config, schema, Arc::clone(&rules)) {
                Ok(det) => {
                    detectors.insert(source_id.to_string(), det);
                }
                Err(e) => {
                    warn!(source = source_id, error = %e, "source panel failed to load");
                    failed.insert(source_id.to_string(), e.to_string());
                }
            }
        }

        info!(
            servable = detectors.len(),
            failed = failed.len(),
            "detection engine ready"
        );
        Ok(Self { detectors, failed })
    }

    /// Load once and share process-wide. First load wins; later calls get the
    /// existing engine regardless of their configuration.
    pub fn shared(config: &EngineConfig) -> Result<&'static DetectionEngine, EngineError> {
        static SHARED: OnceLock<DetectionEngine> = OnceLock::new();
        if let Some(engine) = SHARED.get() {
            return Ok(engine);
        }
        let engine = Self::load(config)?;
        Ok(SHARED.get_or_init(|| engine))
    }

    pub fn detect(&self, source_id: &str, record: &LogRecord) -> Result<Verdict, EngineError> {
        Ok(self.detector(source_id)?.detect(record))
    }

    /// Output length and order match `records`.
    pub fn detect_batch(
        &self,
        source_id: &str,
        records: &[LogRecord],
    ) -> Result<Vec<Verdict>, EngineError> {
        Ok(self.detector(source_id)?.detect_batch(records))
    }

    pub fn detector(&self, source_id: &str) -> Result<&EnsembleDetector, EngineError> {
        if let Some(det) = self.detectors.get(source_id) {
            return Ok(det);
        }
        match self.failed.get(source_id) {
            Some(reason) => Err(EngineError::SourceUnavailable {
                source_id: source_id.to_string(),
                reason: reason.clone(),
            }),
            None => Err(EngineError::UnknownSource(source_id.to_string())),
        }
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.detectors.keys().map(String::as_str)
    }
}
