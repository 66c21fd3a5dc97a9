use criterion::{black_box, criterion_group, criterion_main, Criterion};
use designcheck::prelude::*;

fn bench_rule_evaluation(c: &mut Criterion) {
    let engine = RuleEngine::with_default_rules();
    let parameters = CadSnapshot::sample_drone_arm().parameter_set();

    c.bench_function("evaluate_rules", |b| {
        b.iter(|| engine.evaluate(black_box(&parameters)));
    });
}

fn bench_full_analysis(c: &mut Criterion) {
    let pipeline = AnalysisPipeline::with_defaults();
    let intent = DesignIntent::new("drone_arm");
    let snapshot = CadSnapshot::sample_drone_arm();

    c.bench_function("analyze_snapshot", |b| {
        b.iter(|| pipeline.analyze(black_box(&intent), black_box(&snapshot)));
    });
}

criterion_group!(benches, bench_rule_evaluation, bench_full_analysis);
criterion_main!(benches);
