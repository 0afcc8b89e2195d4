use std::hint::black_box;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use minibvh::{
    Bvh, linear_intersect,
    scene::random::{random_ray, random_scene},
};
use rand::{SeedableRng, rngs::SmallRng};

const EXTENT: f64 = 100.0;

fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);
    let rays: Vec<_> = (0..1000).map(|_| random_ray(&mut rng, EXTENT)).collect();

    let mut group = c.benchmark_group("intersect");
    for count in [100, 1000, 10_000] {
        let primitives = random_scene(&mut rng, count, EXTENT);
        let bvh = Bvh::build(primitives.clone());

        group.bench_with_input(BenchmarkId::new("bvh_nearest", count), &bvh, |b, bvh| {
            b.iter(|| {
                for ray in &rays {
                    black_box(bvh.intersect(ray));
                }
            })
        });
        group.bench_with_input(BenchmarkId::new("bvh_any", count), &bvh, |b, bvh| {
            b.iter(|| {
                for ray in &rays {
                    black_box(bvh.intersects(ray));
                }
            })
        });
        group.bench_with_input(
            BenchmarkId::new("linear_nearest", count),
            &primitives,
            |b, primitives| {
                b.iter(|| {
                    for ray in &rays {
                        black_box(linear_intersect(primitives, ray));
                    }
                })
            },
        );
    }
    group.finish();

    let primitives = random_scene(&mut rng, 100_000, EXTENT);
    c.bench_function("build_100k", |b| {
        b.iter_batched(
            || primitives.clone(),
            |primitives| Bvh::build(primitives),
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(20).measurement_time(Duration::from_secs(10));
    targets = criterion_benchmark
}
criterion_main!(benches);
