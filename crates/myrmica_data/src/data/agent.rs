use super::sensing::SensoryVector;
use super::world::Position;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Identifies one colony (population) in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColonyId(pub u8);

/// Unique identification of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub Uuid);

impl AgentId {
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Coarse behavioral phase, inferred with hysteresis from cargo, home
/// proximity, and trail/food signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Heading out to find food.
    #[default]
    Outbound,
    /// Hauling cargo back to the nest.
    Homebound,
    /// Tending trails near the nest.
    Maintain,
}

/// An agent's belief state ("mu"): where it thinks it is, where it is
/// heading, how hungry it believes it is, and its per-channel sensory
/// predictions. Owned exclusively by the agent, mutated once per tick by the
/// perception engine, persists for the agent's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Belief {
    pub position: Position,
    /// Continuous goal location, blended between the enemy home and the own
    /// home depending on context.
    pub goal: (f64, f64),
    pub hunger: f64,
    pub predicted: SensoryVector,
}

impl Belief {
    #[must_use]
    pub fn at(position: Position) -> Self {
        Self {
            position,
            goal: (f64::from(position.x), f64::from(position.y)),
            hunger: 0.5,
            predicted: SensoryVector::neutral(),
        }
    }
}

/// Per-channel sensory precision weights plus the softmax temperature
/// ("tau"). Mutated by the affect regulator each tick and by the policy
/// evaluator's colony/survival coupling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Precision {
    pub weights: SensoryVector,
    pub tau: f64,
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            weights: SensoryVector::splat(1.0),
            tau: 1.0,
        }
    }
}

/// Read-only view of one agent handed to the decision pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub colony: ColonyId,
    pub pos: Position,
    pub home: Option<Position>,
    /// Raw hunger drive, used when no belief state exists yet.
    pub hunger: f64,
    /// Cargo load as a fraction of capacity.
    pub cargo: f64,
    pub recent_ingest: f64,
    pub recent_gather: f64,
    /// Visit counts per cell, for the novelty channel.
    pub visits: HashMap<Position, u32>,
}

impl AgentSnapshot {
    #[must_use]
    pub fn new(colony: ColonyId, pos: Position, home: Option<Position>) -> Self {
        Self {
            id: AgentId::random(),
            colony,
            pos,
            home,
            hunger: 0.5,
            cargo: 0.0,
            recent_ingest: 0.0,
            recent_gather: 0.0,
            visits: HashMap::new(),
        }
    }

    #[must_use]
    pub fn visits_here(&self) -> u32 {
        self.visits.get(&self.pos).copied().unwrap_or(0)
    }
}
