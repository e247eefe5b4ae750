use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flocking_lib::{
    flock::Flock,
    options::{FlockOptions, PlaneSize, Tunables},
};

fn demo_options(size: usize) -> FlockOptions {
    FlockOptions::new(
        size,
        PlaneSize::new(800., 600.),
        true,
        Tunables {
            separation_strength: 1.,
            separation_distance: 30.,
            alignment_strength: 0.03,
            alignment_distance: 40.,
            cohesion_strength: 0.05,
            cohesion_distance: 100.,
        },
    )
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("flock update");

    for size in [20_usize, 30, 100, 300] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let mut flock = Flock::new(&demo_options(size));
            // let the initial burst settle so neighbourhoods look like a running demo
            for _ in 0..100 {
                flock.update();
            }
            b.iter(|| black_box(&mut flock).update())
        });
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
