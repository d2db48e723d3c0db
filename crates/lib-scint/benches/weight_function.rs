//! Weight-function precompute benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lib_scint::af::{Annular, Circular, Point};
use lib_scint::sf::Mono;
use lib_scint::weight::WeightFunction;

fn bench_precompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("precompute");
    group.sample_size(10);

    for size in [64, 256, 1024].iter() {
        group.bench_with_input(BenchmarkId::new("mono_point", size), size, |b, &n| {
            b.iter(|| WeightFunction::new(&Mono, 550.0, &Point, 10.0, black_box(n)).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("mono_circular", size), size, |b, &n| {
            b.iter(|| WeightFunction::new(&Mono, 550.0, &Circular, 10.0, black_box(n)).unwrap());
        });
    }

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let annular = Annular::new(0.25).unwrap();
    let wf = WeightFunction::new(&Mono, 550.0, &annular, 20.574, 1024).unwrap();

    c.bench_function("evaluate", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for i in 0..1024 {
                acc += wf.eval(black_box(i as f64 * 30.0 / 1023.0));
            }
            acc
        });
    });
}

criterion_group!(benches, bench_precompute, bench_evaluate);
criterion_main!(benches);
