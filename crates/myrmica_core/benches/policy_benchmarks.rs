use criterion::{black_box, criterion_group, criterion_main, Criterion};
use myrmica_core::config::CoreConfig;
use myrmica_core::pipeline::AgentMind;
use myrmica_core::{choose_action, decide};
use myrmica_data::{
    AgentSnapshot, Belief, Cell, Channel, ColonyId, Mode, Observation, Position, Precision,
    WorldSnapshot,
};
use std::collections::HashMap;

fn bench_world() -> WorldSnapshot {
    let width = 64u16;
    let height = 64u16;
    let mut cells = vec![Cell::default(); usize::from(width) * usize::from(height)];
    for (i, cell) in cells.iter_mut().enumerate() {
        cell.food = (i % 7) as f64;
        cell.pheromone = (i % 5) as f64 * 0.2;
    }
    let mut homes = HashMap::new();
    homes.insert(ColonyId(0), Position::new(4, 4));
    homes.insert(ColonyId(1), Position::new(60, 60));
    let mut reserves = HashMap::new();
    reserves.insert(ColonyId(0), 40.0);
    reserves.insert(ColonyId(1), 70.0);
    WorldSnapshot {
        width,
        height,
        cells,
        max_food: 10.0,
        max_pheromone: 1.0,
        homes,
        reserves,
        queen_initial_reserve: 100.0,
    }
}

fn bench_observation() -> Observation {
    let mut obs = Observation::default();
    obs.set(Channel::Food, 0.3);
    obs.set(Channel::Pher, 0.2);
    obs.set(Channel::HomeProx, 0.6);
    obs.set(Channel::Hunger, 0.5);
    obs.set(Channel::Cargo, 0.3);
    obs.set(Channel::Novelty, 0.6);
    obs.set(Channel::Reserve, 0.4);
    obs
}

/// Benchmark policy evaluation alone, the hot path of every agent-tick.
fn bench_choose_action(c: &mut Criterion) {
    let cfg = CoreConfig::default();
    let obs = bench_observation();
    let belief = Belief::at(Position::new(10, 10));
    let precision = Precision::default();

    c.bench_function("choose_action", |b| {
        b.iter(|| {
            let decision =
                choose_action(&belief, &precision, black_box(&obs), Mode::Outbound, &cfg);
            black_box(decision)
        })
    });
}

/// Benchmark the full observe-perceive-regulate-select pipeline.
fn bench_full_pipeline(c: &mut Criterion) {
    let cfg = CoreConfig::default();
    let world = bench_world();
    let agent = AgentSnapshot::new(ColonyId(0), Position::new(20, 20), Some(Position::new(4, 4)));
    let mut mind = AgentMind::new(agent.pos, &cfg);

    c.bench_function("decision_pipeline", |b| {
        b.iter(|| {
            let decision = decide(black_box(&world), &agent, &mut mind, &cfg);
            black_box(decision)
        })
    });
}

/// Benchmark observation normalization on a mid-grid agent.
fn bench_observe(c: &mut Criterion) {
    let world = bench_world();
    let agent = AgentSnapshot::new(ColonyId(0), Position::new(20, 20), Some(Position::new(4, 4)));

    c.bench_function("observe", |b| {
        b.iter(|| {
            let obs = myrmica_core::observation::observe(black_box(&world), &agent, None);
            black_box(obs)
        })
    });
}

criterion_group!(
    benches,
    bench_choose_action,
    bench_full_pipeline,
    bench_observe
);
criterion_main!(benches);
