//! Anomi engine entrypoint: reads NDJSON record envelopes
//! (`{"source": ..., "record": {...}}`) from a file argument or stdin and
//! writes one JSON verdict line per record to stdout. The panel registry is
//! loaded once; everything after startup is pure computation.

use anomi_engine::{
    config::EngineConfig, engine::DetectionEngine, logging::StructuredLogger, schema::LogRecord,
    verdict::Verdict,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Deserialize)]
struct IngestLine {
    source: String,
    record: LogRecord,
}

#[derive(Serialize)]
struct VerdictLine {
    id: String,
    ts: DateTime<Utc>,
    #[serde(flatten)]
    verdict: Verdict,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = EngineConfig::load(&EngineConfig::default_path());

    StructuredLogger::init(config.log.json, &config.log.level);

    info!(model_dir = ?config.model_dir, "anomi engine starting");
    let engine = DetectionEngine::shared(&config)?;
    info!(sources = engine.sources().count(), "panel registry loaded");

    let reader: Box<dyn BufRead> = match std::env::args().nth(1) {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin().lock())),
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut processed: u64 = 0;
    let mut attacks: u64 = 0;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let ingest: IngestLine = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "skipping malformed input line");
                continue;
            }
        };
        match engine.detect(&ingest.source, &ingest.record) {
            Ok(verdict) => {
                processed += 1;
                if verdict.is_attack {
                    attacks += 1;
                    info!(
                        source = %verdict.source,
                        decision = %verdict.decision,
                        confidence = verdict.confidence,
                        winning_member = %verdict.winning_member,
                        reason = %verdict.reason,
                        "attack verdict"
                    );
                }
                let out_line = VerdictLine {
                    id: Uuid::new_v4().to_string(),
                    ts: Utc::now(),
                    verdict,
                };
                serde_json::to_writer(&mut out, &out_line)?;
                out.write_all(b"\n")?;
            }
            Err(e) => warn!(source = %ingest.source, error = %e, "detection refused"),
        }
    }

    info!(processed, attacks, "anomi engine done");
    Ok(())
}
