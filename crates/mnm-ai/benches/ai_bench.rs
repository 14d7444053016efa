use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mnm_ai::{rollout, EcoPolicy, RandomPolicy};
use mnm_runtime::GameTemplate;

fn bench_rollouts(c: &mut Criterion) {
    let template = GameTemplate::default();
    c.bench_function("random rollout 37 rounds", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed += 1;
            let mut game = template.new_game();
            let _ = black_box(rollout(&mut game, &mut RandomPolicy::new(seed), 10_000));
        })
    });
    c.bench_function("eco rollout 37 rounds", |b| {
        b.iter(|| {
            let mut game = template.new_game();
            let _ = black_box(rollout(&mut game, &mut EcoPolicy::default(), 10_000));
        })
    });
}

criterion_group!(benches, bench_rollouts);
criterion_main!(benches);
