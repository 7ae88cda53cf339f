//! Rule layer benchmark: whitelist/keyword scan and taxonomy lookup.

use anomi_engine::config::ThresholdConfig;
use anomi_engine::council::CouncilResult;
use anomi_engine::rules::{AttackRuleTable, OverrideEngine, RuleSet};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn council(highest: f32, attack_votes: usize) -> CouncilResult {
    CouncilResult {
        votes: Vec::new(),
        total_attack_votes: attack_votes,
        winning_member: "RF".to_string(),
        highest_confidence: highest,
        mean_confidence: highest,
    }
}

fn bench_override_scan(c: &mut Criterion) {
    let rules = RuleSet::default();
    let engine = OverrideEngine::new(
        rules.safe_patterns,
        rules.attack_keywords,
        ThresholdConfig::default(),
    );

    let texts = [
        ("whitelisted", "metervalues response acknowledged 200 ok"),
        ("keyword", "sql injection attempt on csms endpoint"),
        ("no_match", "periodic telemetry sample from cp-12"),
    ];

    let mut g = c.benchmark_group("override_scan");
    for (label, text) in texts {
        let council = council(0.42, 0);
        g.bench_function(label, |b| {
            b.iter(|| engine.adjudicate(black_box(text), &council))
        });
    }
    g.finish();
}

fn bench_taxonomy(c: &mut Criterion) {
    let taxonomy = AttackRuleTable::builtin();

    c.bench_function("taxonomy_first_rule", |b| {
        b.iter(|| taxonomy.classify(black_box("ocpp_injection frame seen"), "ocpp_gateway"))
    });
    c.bench_function("taxonomy_fallback", |b| {
        b.iter(|| taxonomy.classify(black_box("qqq"), "grid_load"))
    });
}

criterion_group!(benches, bench_override_scan, bench_taxonomy);
criterion_main!(benches);
