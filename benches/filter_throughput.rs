//! Filter-mode throughput benchmarks
//!
//! Measures parsing once and evaluating a predicate against every record, with
//! varying record counts and predicate shapes.
//!
//! Run benchmarks: `cargo bench --bench filter_throughput`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use jsonql::{FilterQuery, Value, parse};
use serde_json::json;
use std::hint::black_box;

/// Generate test data records
fn generate_records(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            Value::from(json!({
                "id": i,
                "name": format!("user-{}", i),
                "gender": if i % 2 == 0 { "m" } else { "f" },
                "score": (i % 100) as f64 / 10.0,
                "tags": ["alpha", "beta", format!("t{}", i % 7)],
            }))
        })
        .collect()
}

fn bench_predicates(c: &mut Criterion) {
    let predicates = [
        ("equality", "gender = 'f'"),
        ("arithmetic", "score * 2 + id % 3 >= 10"),
        ("regex", "name ~= '-1[0-9]*$' && tags[2] != 't0'"),
        ("defined", "missing is not defined || id < 0"),
    ];

    let query = FilterQuery::new(generate_records(1000));
    let mut group = c.benchmark_group("predicate_shape");
    group.throughput(Throughput::Elements(1000));

    for (label, source) in predicates {
        let expr = parse(source).expect("benchmark predicate parses");
        group.bench_with_input(BenchmarkId::from_parameter(label), &expr, |b, expr| {
            b.iter(|| black_box(query.filter(expr).expect("benchmark predicate evaluates")));
        });
    }
    group.finish();
}

fn bench_record_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_scaling");

    for count in [10, 100, 1000, 10000] {
        let query = FilterQuery::new(generate_records(count));
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &query, |b, query| {
            b.iter(|| black_box(query.query("gender = 'f' && score > 5").expect("query runs")));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_predicates, bench_record_scaling);
criterion_main!(benches);
