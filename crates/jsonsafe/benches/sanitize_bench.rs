use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use jsonsafe::{BigInt, Instant, Object, Value};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn wide_rows(n: usize) -> Value {
    let mut rng = StdRng::seed_from_u64(42);
    let rows = (0..n)
        .map(|i| {
            let mut row = Object::new();
            row.insert("id", BigInt::from(i as u64) * BigInt::from(u64::MAX));
            row.insert("points", rng.gen_range(0..100_000_u32));
            row.insert("created_at", Instant::from_millis(rng.gen_range(0.0..1.7e12)));
            row.insert("label", format!("row-{i}"));
            Value::Object(row)
        })
        .collect();
    Value::Array(rows)
}

fn deep_chain(depth: usize) -> Value {
    let mut v = Value::BigInt(BigInt::from(1));
    for _ in 0..depth {
        let mut o = Object::new();
        o.insert("next", v);
        v = Value::Object(o);
    }
    v
}

pub fn sanitize_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("sanitize");
    for &n in &[100, 1_000, 10_000] {
        let data = wide_rows(n);
        group.bench_function(format!("wide_rows::{n}"), |b| {
            b.iter(|| black_box(jsonsafe::sanitize(black_box(&data))))
        });
        group.bench_function(format!("to_string::{n}"), |b| {
            b.iter_batched(
                || data.clone(),
                |d| {
                    let out = jsonsafe::to_string(&d, &jsonsafe::Options::default()).unwrap();
                    black_box(out)
                },
                BatchSize::SmallInput,
            )
        });
    }
    let deep = deep_chain(500);
    group.bench_function("deep_chain::500", |b| {
        b.iter(|| black_box(jsonsafe::sanitize(black_box(&deep))))
    });
    group.finish();
}

criterion_group!(benches, sanitize_benchmarks);
criterion_main!(benches);
