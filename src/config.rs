//! Engine configuration. Thresholds and override floors are empirical
//! constants carried from the trained deployment; they live here as named
//! fields, never as inline literals.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory holding classifier artifacts (`<source>_<member>.{json,onnx}`)
    pub model_dir: PathBuf,
    /// Optional JSON schema registry replacing the built-in source table
    pub schema_file: Option<PathBuf>,
    /// Optional JSON rule set replacing the built-in pattern/keyword/taxonomy tables
    pub rules_file: Option<PathBuf>,
    /// Feature encoding parameters
    pub features: FeaturesConfig,
    /// Decision thresholds and override confidence floors
    pub thresholds: ThresholdConfig,
    /// Abstention accounting
    pub abstain: AbstainConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturesConfig {
    /// Number of hash buckets for text token features fed to panel members
    pub text_buckets: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Per-member probability above which that member votes attack
    pub vote_threshold: f32,
    /// Confidence floor when an attack keyword overrides the consensus
    pub signature_floor: f32,
    /// Confidence floor when the ML consensus alone decides attack
    pub consensus_floor: f32,
    /// Fixed confidence reported for a safe-pattern match
    pub whitelist_confidence: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AbstainConfig {
    /// When true, abstaining members count as probability 0.0 in the mean
    /// confidence instead of being excluded from it
    pub count_in_mean: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models_ensemble"),
            schema_file: None,
            rules_file: None,
            features: FeaturesConfig::default(),
            thresholds: ThresholdConfig::default(),
            abstain: AbstainConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self { text_buckets: 128 }
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            vote_threshold: 0.5,
            signature_floor: 0.85,
            consensus_floor: 0.94,
            whitelist_confidence: 0.99,
        }
    }
}

impl Default for AbstainConfig {
    fn default() -> Self {
        Self { count_in_mean: false }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

impl EngineConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &std::path::Path) -> Self {
        if path.exists() {
            if let Ok(data) = std::fs::read_to_string(path) {
                if let Ok(c) = serde_json::from_str::<EngineConfig>(&data) {
                    return c;
                }
            }
        }
        Self::default()
    }

    /// Default config location: `$ANOMI_CONFIG_PATH`, then the platform
    /// config dir, then `config.json` in the working directory.
    pub fn default_path() -> PathBuf {
        if let Ok(p) = std::env::var("ANOMI_CONFIG_PATH") {
            return PathBuf::from(p);
        }
        if let Some(dir) = dirs::config_dir() {
            return dir.join("anomi-engine").join("config.json");
        }
        PathBuf::from("config.json")
    }
}
