use criterion::{black_box, criterion_group, criterion_main, Criterion};
use indexd::index::search::search;

fn bench_search(c: &mut Criterion) {
    let values: Vec<i64> = (0..1_000_000).map(|i| i * 3).collect();

    c.bench_function("search_exact", |b| {
        b.iter(|| search(black_box(&values), black_box(1_500_000)))
    });

    c.bench_function("search_tolerant_hit", |b| {
        b.iter(|| search(black_box(&values), black_box(1_500_001)))
    });

    c.bench_function("search_miss", |b| {
        b.iter(|| search(black_box(&values), black_box(-5)))
    });
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
