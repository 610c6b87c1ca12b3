use criterion::{criterion_group, criterion_main, Criterion};

use euler2d::config::Config;
use euler2d::problem::{Problem, SodShockTube};
use euler2d::simulation::Simulation;

fn my_benchmark(c: &mut Criterion) {
    let mut config = Config::default();
    config.nthread = 4;
    config.nu = 128;
    config.nv = 128;

    c.bench_function("sod_shock_tube_10_steps", |b| {
        b.iter(|| {
            let problem: std::sync::Arc<dyn Problem> = std::sync::Arc::new(SodShockTube);
            let sim = Simulation::new(config.clone(), problem).expect("simulation setup");
            sim.run_headless(10);
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = my_benchmark
}
criterion_main!(benches);
