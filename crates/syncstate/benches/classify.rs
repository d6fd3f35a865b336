use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

use syncstate::{Classifier, ClassifierConfig};
use syncstate_testkit::fixtures::namespaced_stream_entry;
use syncstate_testkit::batch;

fn stream_batch(len: usize) -> serde_json::Value {
    let entries: Vec<_> = (0..len)
        .map(|i| namespaced_stream_entry("public", &format!("stream_{}", i), json!({ "cursor": i })))
        .collect();
    batch(&entries)
}

fn bench_stream_batches(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify_stream_batch");
    let capable = Classifier::default();
    let legacy = Classifier::new(ClassifierConfig::legacy_only());

    for len in [1usize, 100, 10_000] {
        let raw = stream_batch(len);
        group.bench_with_input(BenchmarkId::new("capable", len), &raw, |b, raw| {
            b.iter(|| capable.classify(black_box(Some(raw))))
        });
        group.bench_with_input(BenchmarkId::new("legacy_only", len), &raw, |b, raw| {
            b.iter(|| legacy.classify(black_box(Some(raw))))
        });
    }

    group.finish();
}

fn bench_fingerprint(c: &mut Criterion) {
    let raw = stream_batch(1_000);
    let wrapper = Classifier::default().classify(Some(&raw)).ok().flatten();

    c.bench_function("fingerprint_1000_streams", |b| {
        b.iter(|| wrapper.as_ref().map(|w| black_box(w).fingerprint()))
    });
}

criterion_group!(benches, bench_stream_batches, bench_fingerprint);
criterion_main!(benches);
