//! Unit-level tests for feature reconstruction, the rule tables, the
//! override branches, and council vote accounting.

use anomi_engine::config::{AbstainConfig, ThresholdConfig};
use anomi_engine::council::{CouncilResult, LocalDecision, VotingAggregator};
use anomi_engine::error::InferenceError;
use anomi_engine::features::{reconstruct_batch, reconstruct_record};
use anomi_engine::model::MemberBatchScore;
use anomi_engine::rules::{
    classification_text, AttackKeywordSet, AttackRuleTable, OverrideBranch, OverrideEngine,
    RuleSet, SafePatternSet,
};
use anomi_engine::schema::{LogRecord, SchemaRegistry, SourceSchema};
use serde_json::json;

fn record(value: serde_json::Value) -> LogRecord {
    serde_json::from_value(value).expect("record literal")
}

fn scores(rows: &[(&str, Result<Vec<f32>, &str>)]) -> Vec<MemberBatchScore> {
    rows.iter()
        .map(|(id, outcome)| MemberBatchScore {
            member_id: id.to_string(),
            probabilities: outcome
                .clone()
                .map_err(InferenceError::new),
        })
        .collect()
}

fn aggregator() -> VotingAggregator {
    VotingAggregator::new(ThresholdConfig::default(), AbstainConfig::default())
}

fn council(highest: f32, attack_votes: usize) -> CouncilResult {
    CouncilResult {
        votes: Vec::new(),
        total_attack_votes: attack_votes,
        winning_member: "RF".to_string(),
        highest_confidence: highest,
        mean_confidence: highest,
    }
}

// ---- schema & reconstruction ----

#[test]
fn builtin_registry_covers_all_ten_sources() {
    let registry = SchemaRegistry::builtin();
    assert_eq!(registry.len(), 10);
    for id in [
        "ocpp_gateway",
        "ids_sensor",
        "backend_api",
        "grid_load",
        "csms",
        "energy_meter",
        "can_bus",
        "charge_kiosk",
        "tariff_billing",
        "charge_point",
    ] {
        assert!(registry.lookup(id).is_ok(), "missing {id}");
    }
    assert!(registry.lookup("nonexistent").is_err());
}

#[test]
fn feature_vector_shape_is_schema_determined() {
    let schema = SourceSchema::new(
        vec!["ocpp_message"],
        vec!["price_eur_kwh", "energy_kwh", "power_kw"],
    );
    // Record carries none of the configured fields
    let fv = reconstruct_record(&record(json!({"unrelated": "x"})), &schema);
    assert_eq!(fv.text_blob, "");
    assert_eq!(fv.numeric, vec![0.0, 0.0, 0.0]);
}

#[test]
fn text_blob_joins_configured_fields_in_schema_order() {
    let schema = SourceSchema::new(vec!["event_type", "attack_type"], vec![]);
    let fv = reconstruct_record(
        &record(json!({"attack_type": "none", "event_type": "BootNotification"})),
        &schema,
    );
    assert_eq!(fv.text_blob, "BootNotification none");

    // Absent field contributes an empty string, position preserved
    let fv = reconstruct_record(&record(json!({"attack_type": "none"})), &schema);
    assert_eq!(fv.text_blob, " none");
}

#[test]
fn unparsable_numeric_defaults_to_zero() {
    let schema = SourceSchema::new(vec![], vec!["load_kw", "blocked"]);
    let fv = reconstruct_record(
        &record(json!({"load_kw": "not-a-number", "blocked": true})),
        &schema,
    );
    assert_eq!(fv.numeric, vec![0.0, 1.0]);

    let fv = reconstruct_record(&record(json!({"load_kw": "12.5"})), &schema);
    assert_eq!(fv.numeric, vec![12.5, 0.0]);
}

#[test]
fn batch_reconstruction_matches_per_record() {
    let schema = SourceSchema::new(vec!["detail"], vec!["load_kw"]);
    let records = vec![
        record(json!({"detail": "a", "load_kw": 1})),
        record(json!({"load_kw": "7.5"})),
        record(json!({"detail": "c"})),
        record(json!({})),
    ];
    let batch = reconstruct_batch(&records, &schema);
    assert_eq!(batch.len(), records.len());
    for (r, fv) in records.iter().zip(&batch) {
        assert_eq!(fv, &reconstruct_record(r, &schema));
    }
}

// ---- classification text ----

#[test]
fn classification_text_excludes_meta_fields() {
    let text = classification_text(&record(json!({
        "message": "MeterValues Update",
        "label": "attack",
        "attack_type": "injection",
        "decision": "NORMAL",
        "is_attack": true,
        "winning_model": "RF",
        "confidence_score": 0.9,
        "monitor_id": "m-1",
        "job_id": "j-1",
    })));
    assert_eq!(text, "metervalues update");
}

#[test]
fn classification_text_skips_nulls_and_stringifies_scalars() {
    let text = classification_text(&record(json!({
        "a_count": 3,
        "b_flag": false,
        "c_detail": null,
        "d_msg": "OK",
    })));
    assert_eq!(text, "3 false ok");
}

#[test]
fn label_leakage_cannot_trigger_keywords() {
    // The label alone would match "attack detected"; it must be invisible
    let text = classification_text(&record(json!({
        "label": "attack detected",
        "detail": "charging session completed",
    })));
    let keywords = AttackKeywordSet::builtin();
    assert!(keywords.first_match(&text).is_none());
}

// ---- pattern sets & taxonomy ----

#[test]
fn safe_patterns_match_case_insensitively() {
    let safe = SafePatternSet::builtin();
    assert_eq!(
        safe.first_match(&"HEARTBEAT received from CP-42".to_lowercase()),
        Some("heartbeat")
    );
    assert!(safe.first_match("sql injection attempt").is_none());
}

#[test]
fn taxonomy_first_match_wins_by_rule_order() {
    let taxonomy = AttackRuleTable::builtin();
    // "injection" sits in the first rule even though later rules also match
    assert_eq!(
        taxonomy.classify("sql injection via backend api", "backend_api"),
        "OCPP Message Injection"
    );
    assert_eq!(
        taxonomy.classify("tls downgrade forced by proxy", "backend_api"),
        "TLS Downgrade Attack"
    );
    assert_eq!(
        taxonomy.classify("mitm on charge session", "backend_api"),
        "Man-in-the-Middle Attack"
    );
}

#[test]
fn taxonomy_falls_back_to_source_default_then_generic() {
    let taxonomy = AttackRuleTable::builtin();
    assert_eq!(taxonomy.classify("qqq", "grid_load"), "Power Load Anomaly");
    assert_eq!(taxonomy.classify("qqq", "tariff_billing"), "Tariff Anomaly");
    assert_eq!(
        taxonomy.classify("qqq", "never_registered"),
        "Charging Station Anomaly"
    );
}

// ---- override branches ----

fn override_engine() -> OverrideEngine {
    let rules = RuleSet::default();
    OverrideEngine::new(
        rules.safe_patterns,
        rules.attack_keywords,
        ThresholdConfig::default(),
    )
}

#[test]
fn whitelist_branch_beats_keyword_branch() {
    let engine = override_engine();
    // Contains both a safe pattern ("completed") and a keyword ("injection")
    let outcome = engine.adjudicate("injection test completed", &council(0.97, 3));
    assert!(matches!(outcome.branch, OverrideBranch::Whitelist { .. }));
    assert!(!outcome.is_attack);
    assert_eq!(outcome.confidence, 0.99);
}

#[test]
fn signature_branch_applies_confidence_floor() {
    let engine = override_engine();
    let outcome = engine.adjudicate("ddos flood from botnet", &council(0.12, 0));
    assert!(matches!(outcome.branch, OverrideBranch::Signature { .. }));
    assert!(outcome.is_attack);
    assert_eq!(outcome.confidence, 0.85);

    // A stronger council raises the confidence above the floor
    let outcome = engine.adjudicate("ddos flood from botnet", &council(0.91, 2));
    assert_eq!(outcome.confidence, 0.91);
}

#[test]
fn consensus_branch_needs_one_attack_vote() {
    let engine = override_engine();
    let outcome = engine.adjudicate("qqq", &council(0.72, 1));
    assert!(matches!(outcome.branch, OverrideBranch::Consensus));
    assert!(outcome.is_attack);
    assert_eq!(outcome.confidence, 0.94);

    let outcome = engine.adjudicate("qqq", &council(0.47, 0));
    assert!(matches!(outcome.branch, OverrideBranch::Clean));
    assert!(!outcome.is_attack);
    assert_eq!(outcome.confidence, 0.47);
}

// ---- council aggregation ----

#[test]
fn aggregate_counts_votes_and_picks_argmax() {
    let scores = scores(&[
        ("RF", Ok(vec![0.9, 0.2])),
        ("GBM", Ok(vec![0.7, 0.8])),
        ("ET", Ok(vec![0.1, 0.8])),
    ]);
    let councils = aggregator().aggregate(&scores, 2);
    assert_eq!(councils.len(), 2);

    let first = &councils[0];
    assert_eq!(first.total_attack_votes, 2);
    assert_eq!(first.winning_member, "RF");
    assert!((first.highest_confidence - 0.9).abs() < 1e-6);
    assert!((first.mean_confidence - (0.9 + 0.7 + 0.1) / 3.0).abs() < 1e-6);

    // Tie between GBM and ET goes to the first-registered of the two
    let second = &councils[1];
    assert_eq!(second.winning_member, "GBM");
    assert_eq!(second.total_attack_votes, 2);
}

#[test]
fn vote_threshold_is_strict() {
    let scores = scores(&[("RF", Ok(vec![0.5]))]);
    let councils = aggregator().aggregate(&scores, 1);
    assert_eq!(councils[0].total_attack_votes, 0);
    assert_eq!(councils[0].votes[0].local_decision, LocalDecision::Normal);
}

#[test]
fn abstention_excluded_from_mean_by_default() {
    let scores = scores(&[
        ("RF", Ok(vec![0.6])),
        ("GBM", Err("session failure")),
        ("ET", Ok(vec![0.2])),
    ]);
    let councils = aggregator().aggregate(&scores, 1);
    let c = &councils[0];

    assert_eq!(c.votes.len(), 3);
    assert!(c.votes[1].abstained());
    assert_eq!(c.votes[1].probability, 0.0);
    assert_eq!(c.total_attack_votes, 1);
    assert_eq!(c.winning_member, "RF");
    assert!((c.mean_confidence - 0.4).abs() < 1e-6);
    assert!((c.highest_confidence - 0.6).abs() < 1e-6);
}

#[test]
fn abstention_counts_as_zero_when_configured() {
    let scores = scores(&[
        ("RF", Ok(vec![0.6])),
        ("GBM", Err("session failure")),
        ("ET", Ok(vec![0.2])),
    ]);
    let agg = VotingAggregator::new(
        ThresholdConfig::default(),
        AbstainConfig { count_in_mean: true },
    );
    let councils = agg.aggregate(&scores, 1);
    assert!((councils[0].mean_confidence - (0.6 + 0.0 + 0.2) / 3.0).abs() < 1e-6);
}

#[test]
fn all_abstaining_panel_reports_first_member_and_zero_confidence() {
    let scores = scores(&[("RF", Err("down")), ("GBM", Err("down"))]);
    let councils = aggregator().aggregate(&scores, 1);
    let c = &councils[0];
    assert_eq!(c.winning_member, "RF");
    assert_eq!(c.total_attack_votes, 0);
    assert_eq!(c.highest_confidence, 0.0);
    assert_eq!(c.mean_confidence, 0.0);
}
