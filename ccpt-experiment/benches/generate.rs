use ccpt_core::StimulusSpec;
use ccpt_experiment::generate;
use criterion::{Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequence");
    for n in [40usize, 300, 1200] {
        group.bench_function(format!("generate_{n}"), |b| {
            let mut rng = StdRng::seed_from_u64(42);
            b.iter(|| generate(black_box(n), StimulusSpec::red_square(), &mut rng).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate);
criterion_main!(benches);
