use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tokenbudget::Engine;

fn bench_count_tokens(c: &mut Criterion) {
    let engine = Engine::from_embedded().expect("embedded vocabularies are always valid");
    let mut group = c.benchmark_group("count_tokens");

    for size in &[10, 100, 1000] {
        let text = "Hello world ".repeat(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| engine.count_tokens(black_box("gpt-4o"), black_box(&text)));
        });
    }
    group.finish();
}

fn bench_long_repeated_run(c: &mut Criterion) {
    let engine = Engine::from_embedded().expect("embedded vocabularies are always valid");
    let text = "a".repeat(4096);

    c.bench_function("count_tokens_4096_repeated_byte", |b| {
        b.iter(|| engine.count_tokens(black_box("gpt-4o"), black_box(&text)));
    });
}

fn bench_load_embedded(c: &mut Criterion) {
    c.bench_function("load_embedded_vocabularies", |b| {
        b.iter(Engine::from_embedded);
    });
}

criterion_group!(
    benches,
    bench_count_tokens,
    bench_long_repeated_run,
    bench_load_embedded
);
criterion_main!(benches);
