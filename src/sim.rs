//! Simulation driver: two colony populations over one shared world, ticked
//! sequentially for determinism.
//!
//! Colony 0 runs the full inference pipeline; colony 1 runs the reflex
//! baseline. Agents decide against the same start-of-tick snapshot and their
//! actions apply in spawn order, so a run is a pure function of the seed and
//! the configs.

use std::collections::HashMap;
use std::time::Instant;

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use myrmica_core::decider::{ActiveInferenceDecider, Decider, ReactiveDecider};
use myrmica_core::{CoreConfig, Metrics};
use myrmica_data::{AgentSnapshot, ColonyId, MacroAction, Position};

use crate::world::{World, WorldConfig};

struct AgentRuntime {
    snapshot: AgentSnapshot,
    decider: Box<dyn Decider>,
}

/// End-of-run report, serialized by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct SimSummary {
    pub ticks: u64,
    pub agents: usize,
    pub actions: HashMap<String, u64>,
    pub reserves: HashMap<u8, f64>,
    pub mean_hunger: f64,
    pub food_remaining: f64,
}

pub struct Simulation {
    world: World,
    agents: Vec<AgentRuntime>,
    metrics: Metrics,
}

impl Simulation {
    pub fn new(
        world_cfg: WorldConfig,
        core_cfg: &CoreConfig,
        agents_per_colony: usize,
        seed: u64,
    ) -> Result<Self> {
        core_cfg.validate()?;
        let colonies = world_cfg.colonies;
        let world = World::new(world_cfg, seed)?;

        let mut agents = Vec::new();
        for c in 0..colonies {
            let colony = ColonyId(c);
            let home = world
                .home_of(colony)
                .ok_or_else(|| anyhow::anyhow!("colony {c} has no home"))?;
            for i in 0..agents_per_colony {
                // Spread spawns around the home so agents do not stack.
                let offset = i as i32 % 3 - 1;
                let pos = Position::new(home.x + offset, home.y + (i as i32 / 3) % 3 - 1);
                let snapshot = AgentSnapshot::new(colony, pos, Some(home));
                let decider: Box<dyn Decider> = if c == 0 {
                    Box::new(ActiveInferenceDecider::new(pos, core_cfg.clone()))
                } else {
                    Box::new(ReactiveDecider::new(pos, core_cfg.clone()))
                };
                agents.push(AgentRuntime { snapshot, decider });
            }
        }

        info!(
            agents = agents.len(),
            colonies = colonies,
            config = %core_cfg.fingerprint(),
            "simulation ready"
        );

        Ok(Self {
            world,
            agents,
            metrics: Metrics::new(),
        })
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// One full tick: decide against the frozen snapshot, apply in order,
    /// then step the environment.
    pub fn tick(&mut self) {
        let started = Instant::now();
        let snapshot = self.world.snapshot();
        for agent in &mut self.agents {
            let decision = agent.decider.decide(&snapshot, &agent.snapshot);
            let feedback = self.world.apply(&mut agent.snapshot, decision.action);
            agent.decider.integrate(&feedback);
            self.metrics.record_decision(decision.action);
        }
        self.world.step_environment();
        self.metrics.record_tick(started.elapsed(), self.agents.len());
    }

    pub fn run(&mut self, ticks: u64) -> SimSummary {
        for _ in 0..ticks {
            self.tick();
        }
        self.summary()
    }

    #[must_use]
    pub fn summary(&self) -> SimSummary {
        let mut actions = HashMap::new();
        for action in MacroAction::ALL {
            actions.insert(action.label().to_string(), self.metrics.counter(action.label()));
        }
        let snapshot = self.world.snapshot();
        let reserves = snapshot
            .reserves
            .iter()
            .map(|(colony, reserve)| (colony.0, *reserve))
            .collect();
        let mean_hunger = if self.agents.is_empty() {
            0.0
        } else {
            self.agents.iter().map(|a| a.snapshot.hunger).sum::<f64>()
                / self.agents.len() as f64
        };
        SimSummary {
            ticks: self.world.tick(),
            agents: self.agents.len(),
            actions,
            reserves,
            mean_hunger,
            food_remaining: self.world.total_food(),
        }
    }
}
