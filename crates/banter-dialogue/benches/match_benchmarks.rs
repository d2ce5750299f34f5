//! Benchmark for rule-matching throughput.
//!
//! The dispatcher runs a match on every submitted utterance before deciding
//! whether to hit the network, so matching must stay well under a
//! millisecond even with a padded rule table.

use criterion::{criterion_group, criterion_main, Criterion};

use banter_dialogue::{DialogueEngine, RuleStore};

/// Build a rule source with `n` rules of three keywords each.
///
/// Indices are zero-padded so no keyword is a substring of another and a
/// query for rule k really scans the k rules before it.
fn generate_rule_lines(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            format!(
                "topic{i:03},subject{i:03},thing{i:03}|Canned answer number {i} for the benchmark table.",
                i = i
            )
        })
        .collect()
}

/// Utterances that miss every rule, forcing a full table scan.
fn generate_miss_utterances(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| format!("completely unrelated question number {} about nothing", i))
        .collect()
}

fn bench_match(c: &mut Criterion) {
    let engine_small = DialogueEngine::new(RuleStore::from_lines(generate_rule_lines(16)));
    let engine_large = DialogueEngine::new(RuleStore::from_lines(generate_rule_lines(256)));
    let misses = generate_miss_utterances(100);

    let mut group = c.benchmark_group("rule_match");

    // Hit on the first rule: the cheap common case.
    group.bench_function("first_rule_hit", |b| {
        b.iter(|| engine_small.match_utterance("tell me about topic000 please"))
    });

    // Hit on the last rule of a large table.
    group.bench_function("last_rule_hit_256", |b| {
        b.iter(|| engine_large.match_utterance("tell me about topic255 please"))
    });

    // Full scan with no hit, the worst case that precedes every fallback.
    group.bench_function("miss_full_scan_256", |b| {
        let mut idx = 0usize;
        b.iter(|| {
            let utterance = &misses[idx % misses.len()];
            idx += 1;
            engine_large.match_utterance(utterance)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_match);
criterion_main!(benches);
