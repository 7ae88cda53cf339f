//! Source schemas: which record fields are textual versus numeric for each
//! telemetry origin. Registration is explicit configuration; the engine never
//! infers schemas from data.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Raw log record: an open mapping of field name to scalar value.
/// Immutable for the duration of a detection call.
pub type LogRecord = BTreeMap<String, serde_json::Value>;

/// Per-source feature field lists, fixed at registry construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSchema {
    pub text_fields: Vec<String>,
    pub numeric_fields: Vec<String>,
}

impl SourceSchema {
    pub fn new<S: Into<String>>(text_fields: Vec<S>, numeric_fields: Vec<S>) -> Self {
        Self {
            text_fields: text_fields.into_iter().map(Into::into).collect(),
            numeric_fields: numeric_fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// Static map from source identifier to its expected schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaRegistry {
    sources: BTreeMap<String, SourceSchema>,
}

impl SchemaRegistry {
    /// The ten telemetry sources of the charging ecosystem this engine ships for.
    pub fn builtin() -> Self {
        let mut r = Self::default();
        r.register(
            "ocpp_gateway",
            SourceSchema::new(
                vec!["event_type", "attack_type"],
                vec!["time_delta_ms", "blocked"],
            ),
        );
        r.register("ids_sensor", SourceSchema::new(vec!["detail"], vec![]));
        r.register("backend_api", SourceSchema::new(vec!["message"], vec![]));
        r.register("grid_load", SourceSchema::new(vec![], vec!["load_kw"]));
        r.register("csms", SourceSchema::new(vec!["detail"], vec![]));
        r.register(
            "energy_meter",
            SourceSchema::new(
                vec!["ocpp_message"],
                vec!["price_eur_kwh", "energy_kwh", "power_kw"],
            ),
        );
        r.register(
            "can_bus",
            SourceSchema::new(
                vec![],
                vec![
                    "length",
                    "protocol_ip",
                    "protocol_tcp",
                    "protocol_udp",
                    "protocol_can",
                    "can_id_anomaly",
                ],
            ),
        );
        r.register(
            "charge_kiosk",
            SourceSchema::new(
                vec!["input_name", "input_plate", "reason"],
                vec!["energy_kwh", "duration_min", "avg_power_kw"],
            ),
        );
        r.register(
            "tariff_billing",
            SourceSchema::new(
                vec!["status"],
                vec!["consumption_kwh", "applied_tariff", "expected_tariff"],
            ),
        );
        r.register("charge_point", SourceSchema::new(vec!["action", "status"], vec![]));
        r
    }

    /// Load a replacement registry from a JSON file
    /// (`{"sources": {"<id>": {"text_fields": [...], "numeric_fields": [...]}}}`).
    pub fn from_file(path: &Path) -> Result<Self, EngineError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("schema file {}: {e}", path.display())))?;
        serde_json::from_str(&data)
            .map_err(|e| EngineError::Config(format!("schema file {}: {e}", path.display())))
    }

    pub fn register(&mut self, source_id: impl Into<String>, schema: SourceSchema) {
        self.sources.insert(source_id.into(), schema);
    }

    pub fn lookup(&self, source_id: &str) -> Result<&SourceSchema, EngineError> {
        self.sources
            .get(source_id)
            .ok_or_else(|| EngineError::UnknownSource(source_id.to_string()))
    }

    pub fn source_ids(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
