//! Mutable world the harness owns: the food/pheromone grid, colony homes and
//! reserves, and the executor that applies a chosen macro-action to an agent.
//!
//! The decision core only ever sees immutable [`WorldSnapshot`]s; all
//! mutation happens here, after selection.

use std::collections::HashMap;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use myrmica_core::decider::ActionFeedback;
use myrmica_data::{AgentSnapshot, Cell, ColonyId, MacroAction, Position, WorldSnapshot};

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("world dimensions must be at least 4x4, got {width}x{height}")]
    TooSmall { width: u16, height: u16 },
    #[error("world needs room for {colonies} colony homes")]
    NoRoomForHomes { colonies: usize },
}

/// Harness-side world parameters. The decision core has its own config; this
/// one only shapes the environment and action execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: u16,
    pub height: u16,
    pub colonies: u8,
    /// Food clusters seeded at startup.
    pub food_clusters: usize,
    /// Peak food dropped at a cluster center.
    pub cluster_food: f64,
    /// Ticks between fresh cluster spawns; zero disables respawn.
    pub respawn_interval: u64,
    /// Multiplicative pheromone retention per tick.
    pub pheromone_retention: f64,
    pub pheromone_deposit: f64,
    pub max_food: f64,
    pub max_pheromone: f64,
    /// Food units moved from cell to cargo per forage tick.
    pub gather_rate: f64,
    /// Fraction of gathered food eaten on the spot.
    pub bite_fraction: f64,
    /// Cargo capacity in food units; cargo is stored normalized.
    pub carry_capacity: f64,
    /// Reserve units the queen consumes per tick.
    pub queen_consumption: f64,
    pub queen_initial_reserve: f64,
    /// Reserve units an agent may eat when depositing at the home.
    pub home_meal: f64,
    /// Raw hunger drift per tick, relieved by eating.
    pub hunger_burn: f64,
    pub hunger_relief: f64,
    /// Retention factor of the recent ingest/gather traces.
    pub trace_retention: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 48,
            height: 48,
            colonies: 2,
            food_clusters: 6,
            cluster_food: 8.0,
            respawn_interval: 50,
            pheromone_retention: 0.97,
            pheromone_deposit: 0.35,
            max_food: 10.0,
            max_pheromone: 1.0,
            gather_rate: 1.5,
            bite_fraction: 0.25,
            carry_capacity: 3.0,
            queen_consumption: 0.05,
            queen_initial_reserve: 100.0,
            home_meal: 0.5,
            hunger_burn: 0.01,
            hunger_relief: 0.4,
            trace_retention: 0.7,
        }
    }
}

/// The live, mutable world.
pub struct World {
    cfg: WorldConfig,
    cells: Vec<Cell>,
    homes: HashMap<ColonyId, Position>,
    reserves: HashMap<ColonyId, f64>,
    rng: ChaCha8Rng,
    tick: u64,
}

impl World {
    pub fn new(cfg: WorldConfig, seed: u64) -> Result<Self, WorldError> {
        if cfg.width < 4 || cfg.height < 4 {
            return Err(WorldError::TooSmall {
                width: cfg.width,
                height: cfg.height,
            });
        }
        let colonies = usize::from(cfg.colonies);
        if colonies > 4 {
            return Err(WorldError::NoRoomForHomes { colonies });
        }

        let mut cells =
            vec![Cell::default(); usize::from(cfg.width) * usize::from(cfg.height)];
        let mut homes = HashMap::new();
        let mut reserves = HashMap::new();

        // Homes sit in opposite quadrants so populations start apart.
        let anchors = [
            (0.2, 0.2),
            (0.8, 0.8),
            (0.8, 0.2),
            (0.2, 0.8),
        ];
        for i in 0..colonies {
            let colony = ColonyId(i as u8);
            let (fx, fy) = anchors[i];
            let pos = Position::new(
                (fx * f64::from(cfg.width - 1)).round() as i32,
                (fy * f64::from(cfg.height - 1)).round() as i32,
            );
            homes.insert(colony, pos);
            reserves.insert(colony, cfg.queen_initial_reserve * 0.5);
            let idx = pos.y as usize * usize::from(cfg.width) + pos.x as usize;
            cells[idx].home_owner = Some(colony);
        }

        let mut world = Self {
            cfg,
            cells,
            homes,
            reserves,
            rng: ChaCha8Rng::seed_from_u64(seed),
            tick: 0,
        };
        for _ in 0..world.cfg.food_clusters {
            world.spawn_cluster();
        }
        Ok(world)
    }

    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub fn reserve_of(&self, colony: ColonyId) -> f64 {
        self.reserves.get(&colony).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn home_of(&self, colony: ColonyId) -> Option<Position> {
        self.homes.get(&colony).copied()
    }

    #[must_use]
    pub fn total_food(&self) -> f64 {
        self.cells.iter().map(|c| c.food).sum()
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < i32::from(self.cfg.width) && y < i32::from(self.cfg.height)
    }

    fn index(&self, pos: Position) -> usize {
        pos.y as usize * usize::from(self.cfg.width) + pos.x as usize
    }

    fn cell_mut(&mut self, pos: Position) -> &mut Cell {
        let idx = self.index(pos);
        &mut self.cells[idx]
    }

    /// Immutable view for the decision core.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            width: self.cfg.width,
            height: self.cfg.height,
            cells: self.cells.clone(),
            max_food: self.cfg.max_food,
            max_pheromone: self.cfg.max_pheromone,
            homes: self.homes.clone(),
            reserves: self.reserves.clone(),
            queen_initial_reserve: self.cfg.queen_initial_reserve,
        }
    }

    /// Environmental dynamics: trail evaporation, queen consumption, and
    /// periodic food respawn.
    pub fn step_environment(&mut self) {
        self.tick += 1;
        for cell in &mut self.cells {
            cell.pheromone = (cell.pheromone * self.cfg.pheromone_retention).max(0.0);
            if cell.pheromone < 1e-4 {
                cell.pheromone = 0.0;
            }
        }
        for reserve in self.reserves.values_mut() {
            *reserve = (*reserve - self.cfg.queen_consumption).max(0.0);
        }
        if self.cfg.respawn_interval > 0 && self.tick % self.cfg.respawn_interval == 0 {
            self.spawn_cluster();
        }
    }

    /// Drops a food cluster with 3x3 falloff around a random center.
    fn spawn_cluster(&mut self) {
        let max_food = self.cfg.max_food;
        let cx = self.rng.gen_range(0..i32::from(self.cfg.width));
        let cy = self.rng.gen_range(0..i32::from(self.cfg.height));
        for dy in -1..=1 {
            for dx in -1..=1 {
                let (x, y) = (cx + dx, cy + dy);
                if !self.in_bounds(x, y) {
                    continue;
                }
                let amount = if dx == 0 && dy == 0 {
                    self.cfg.cluster_food
                } else {
                    self.cfg.cluster_food * 0.4
                };
                let cell = self.cell_mut(Position::new(x, y));
                cell.food = (cell.food + amount).min(max_food);
            }
        }
    }

    /// One grid step from `from` toward `target`, clamped in bounds.
    fn step_toward(&self, from: Position, target: Position) -> Position {
        let step = Position::new(
            from.x + (target.x - from.x).signum(),
            from.y + (target.y - from.y).signum(),
        );
        if self.in_bounds(step.x, step.y) {
            step
        } else {
            from
        }
    }

    /// Neighbor (or the current cell) with the most food, foraging's movement
    /// target. Ties break toward the current cell, then scan order.
    fn richest_nearby(&self, pos: Position) -> Position {
        let snapshot_food = |p: Position| {
            if self.in_bounds(p.x, p.y) {
                self.cells[self.index(p)].food
            } else {
                0.0
            }
        };
        let mut best = pos;
        let mut best_food = snapshot_food(pos);
        for dy in -1..=1 {
            for dx in -1..=1 {
                let cand = Position::new(pos.x + dx, pos.y + dy);
                if !self.in_bounds(cand.x, cand.y) {
                    continue;
                }
                let food = snapshot_food(cand);
                if food > best_food {
                    best = cand;
                    best_food = food;
                }
            }
        }
        best
    }

    /// Executes one macro-action for one agent and returns the normalized
    /// feedback the decider integrates.
    pub fn apply(&mut self, agent: &mut AgentSnapshot, action: MacroAction) -> ActionFeedback {
        let mut feedback = ActionFeedback::default();

        match action {
            MacroAction::Hold => {}
            MacroAction::Forage => {
                let target = self.richest_nearby(agent.pos);
                if target != agent.pos {
                    agent.pos = self.step_toward(agent.pos, target);
                }
                let capacity = self.cfg.carry_capacity;
                let gather_rate = self.cfg.gather_rate;
                let bite_fraction = self.cfg.bite_fraction;
                let cell = self.cell_mut(agent.pos);
                let taken = cell.food.min(gather_rate);
                cell.food -= taken;
                let eaten = taken * bite_fraction;
                let hauled = taken - eaten;
                agent.cargo = (agent.cargo + hauled / capacity).clamp(0.0, 1.0);
                feedback.gathered = (taken / gather_rate).clamp(0.0, 1.0);
                feedback.ingested = (eaten / gather_rate).clamp(0.0, 1.0);
            }
            MacroAction::Return => {
                if let Some(home) = agent.home.or_else(|| self.home_of(agent.colony)) {
                    if agent.pos == home {
                        let deposited = agent.cargo * self.cfg.carry_capacity;
                        if deposited > 0.0 {
                            *self.reserves.entry(agent.colony).or_insert(0.0) += deposited;
                            agent.cargo = 0.0;
                            feedback.deposited = (deposited / self.cfg.carry_capacity).min(1.0);
                        }
                        // A returning agent eats a small meal from the reserve.
                        let reserve = self.reserves.entry(agent.colony).or_insert(0.0);
                        let meal = reserve.min(self.cfg.home_meal);
                        *reserve -= meal;
                        feedback.ingested = (meal / self.cfg.home_meal.max(1e-9)).min(1.0);
                    } else {
                        agent.pos = self.step_toward(agent.pos, home);
                    }
                }
            }
            MacroAction::Pheromone => {
                let deposit = self.cfg.pheromone_deposit;
                let max = self.cfg.max_pheromone;
                let cell = self.cell_mut(agent.pos);
                cell.pheromone = (cell.pheromone + deposit).min(max);
            }
        }

        *agent.visits.entry(agent.pos).or_insert(0) += 1;
        agent.recent_ingest = (agent.recent_ingest * self.cfg.trace_retention
            + feedback.ingested)
            .clamp(0.0, 1.0);
        agent.recent_gather = (agent.recent_gather * self.cfg.trace_retention
            + feedback.gathered)
            .clamp(0.0, 1.0);
        agent.hunger = (agent.hunger + self.cfg.hunger_burn
            - self.cfg.hunger_relief * feedback.ingested)
            .clamp(0.0, 1.0);

        feedback
    }
}
