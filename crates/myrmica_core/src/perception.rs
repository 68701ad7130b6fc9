//! Perception engine: bounded predictive-coding reconciliation of predicted
//! and observed sensing.
//!
//! Each tick runs a fixed number of micro-iterations. Every iteration
//! computes per-channel prediction errors, weights them by an annealed
//! precision, and nudges the sensory predictions, the hunger belief, and the
//! goal location. The step count is a hard cap, not a convergence criterion:
//! this is deliberately myopic, never a fixed-point solver.

use crate::affect;
use crate::config::CoreConfig;
use myrmica_data::{AgentSnapshot, Belief, Channel, Observation, Precision, WorldSnapshot};

#[inline]
fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

#[inline]
fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Per-channel error record from the last iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelError {
    pub observed: f64,
    pub predicted: f64,
    /// `observed - predicted`.
    pub error: f64,
    /// `precision * error`.
    pub weighted: f64,
}

/// One trace entry per predictive-coding iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceStep {
    pub tau: f64,
    pub hunger: f64,
    /// Precision-weighted mean squared error across channels.
    pub step_error: f64,
}

/// Everything `perceive` hands back: the updated belief and precision, the
/// last error map, the free energy proxy, and the full iteration trace.
#[derive(Debug, Clone)]
pub struct PerceptionOutcome {
    pub belief: Belief,
    pub precision: Precision,
    pub errors: [ChannelError; Channel::COUNT],
    pub free_energy: f64,
    pub trace: Vec<TraceStep>,
}

/// Runs the bounded predictive-coding loop for one agent-tick.
///
/// The returned precision is the modulated target re-derived from the
/// settled hunger belief, not an annealed intermediate.
#[must_use]
pub fn perceive(
    world: &WorldSnapshot,
    agent: &AgentSnapshot,
    observation: &Observation,
    belief: &Belief,
    cfg: &CoreConfig,
) -> PerceptionOutcome {
    let max_steps = cfg.perception.max_steps.max(1);
    let alpha = cfg.perception.alpha;
    let beta = cfg.perception.beta;

    let mut mu = belief.clone();
    let mut errors = [ChannelError {
        observed: 0.0,
        predicted: 0.0,
        error: 0.0,
        weighted: 0.0,
    }; Channel::COUNT];
    let mut trace = Vec::with_capacity(max_steps);
    let mut error_sum = 0.0;

    let mut target = affect::modulate_precisions(mu.hunger, observation, cfg);

    for step in 0..max_steps {
        let tau = affect::anneal_tau(target.tau, step, max_steps);

        let mut weighted_sq_sum = 0.0;
        for ch in Channel::ALL {
            let observed = observation.get(ch);
            let predicted = mu.predicted.get(ch);
            let error = observed - predicted;
            let weighted = target.weights.get(ch) * error;
            errors[ch.index()] = ChannelError {
                observed,
                predicted,
                error,
                weighted,
            };
            weighted_sq_sum += target.weights.get(ch) * error * error;
        }
        let step_error = weighted_sq_sum / Channel::COUNT as f64;
        error_sum += step_error;

        // Drift non-hunger predictions toward the weighted evidence.
        for ch in Channel::ALL {
            if ch == Channel::Hunger {
                continue;
            }
            let predicted = mu.predicted.get(ch);
            let next = clamp01(predicted + alpha * errors[ch.index()].weighted);
            mu.predicted.set(ch, next);
        }

        // Hunger belief follows its own dynamics, seeded by the weighted
        // hunger error.
        let hunger_seed = clamp01(mu.hunger + beta * errors[Channel::Hunger.index()].weighted);
        mu.hunger = affect::tick_hunger(
            hunger_seed,
            observation.get(Channel::Food),
            observation.get(Channel::HomeProx),
            observation.get(Channel::Cargo),
            &cfg.affect,
        );
        mu.predicted.set(Channel::Hunger, mu.hunger);

        update_goal(&mut mu, world, agent, observation, cfg);

        mu.position = agent.pos;

        trace.push(TraceStep {
            tau,
            hunger: mu.hunger,
            step_error,
        });

        // The hunger belief just moved, so the next iteration (and the
        // returned precision) re-derive their target from it.
        target = affect::modulate_precisions(mu.hunger, observation, cfg);
    }

    let free_energy = 0.5 * error_sum / max_steps as f64;

    PerceptionOutcome {
        belief: mu,
        precision: target,
        errors,
        free_energy,
        trace,
    }
}

/// Blends the goal toward the enemy home when raiding context dominates and
/// toward the own home in proportion to cargo and home-proximity overshoot.
fn update_goal(
    mu: &mut Belief,
    world: &WorldSnapshot,
    agent: &AgentSnapshot,
    observation: &Observation,
    cfg: &CoreConfig,
) {
    let cargo = observation.get(Channel::Cargo);
    let enemy_prox = observation.get(Channel::EnemyProx);
    let home_prox = observation.get(Channel::HomeProx);
    let rate = cfg.perception.goal_rate;

    if let Some(enemy) = world.enemy_home_of(agent.colony, agent.pos) {
        let weight = clamp01(enemy_prox - 0.4 * cargo).min(0.95);
        mu.goal.0 = lerp(mu.goal.0, f64::from(enemy.x), rate * weight);
        mu.goal.1 = lerp(mu.goal.1, f64::from(enemy.y), rate * weight);
    }
    if let Some(home) = agent.home.or_else(|| world.home_of(agent.colony)) {
        let overshoot = (home_prox - 0.5).max(0.0);
        let weight = clamp01(0.6 * cargo + 0.4 * overshoot).min(0.95);
        mu.goal.0 = lerp(mu.goal.0, f64::from(home.x), rate * weight);
        mu.goal.1 = lerp(mu.goal.1, f64::from(home.y), rate * weight);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::observe;
    use myrmica_data::{Cell, ColonyId, Position};
    use std::collections::HashMap;

    fn world_with_homes() -> WorldSnapshot {
        let mut world = WorldSnapshot {
            width: 8,
            height: 8,
            cells: vec![Cell::default(); 64],
            max_food: 10.0,
            max_pheromone: 1.0,
            homes: HashMap::new(),
            reserves: HashMap::new(),
            queen_initial_reserve: 100.0,
        };
        world.homes.insert(ColonyId(0), Position::new(1, 1));
        world.homes.insert(ColonyId(1), Position::new(6, 6));
        world.cells[1 * 8 + 1].home_owner = Some(ColonyId(0));
        world.cells[6 * 8 + 6].home_owner = Some(ColonyId(1));
        world
    }

    fn agent() -> AgentSnapshot {
        let mut a = AgentSnapshot::new(ColonyId(0), Position::new(4, 4), Some(Position::new(1, 1)));
        a.cargo = 0.3;
        a
    }

    #[test]
    fn test_runs_exactly_max_steps() {
        let world = world_with_homes();
        let agent = agent();
        let obs = observe(&world, &agent, None);
        let belief = Belief::at(agent.pos);
        let cfg = CoreConfig::default();
        let outcome = perceive(&world, &agent, &obs, &belief, &cfg);
        assert_eq!(outcome.trace.len(), cfg.perception.max_steps);
    }

    #[test]
    fn test_predictions_move_toward_observation() {
        let mut world = world_with_homes();
        world.cells[4 * 8 + 4].food = 8.0;
        let agent = agent();
        let obs = observe(&world, &agent, None);
        let belief = Belief::at(agent.pos);
        let cfg = CoreConfig::default();
        let outcome = perceive(&world, &agent, &obs, &belief, &cfg);

        let observed = obs.get(Channel::Food);
        let before = belief.predicted.get(Channel::Food);
        let after = outcome.belief.predicted.get(Channel::Food);
        assert!((after - observed).abs() < (before - observed).abs());
    }

    #[test]
    fn test_step_error_shrinks_over_iterations() {
        let mut world = world_with_homes();
        world.cells[4 * 8 + 4].food = 8.0;
        world.cells[4 * 8 + 4].pheromone = 0.6;
        let agent = agent();
        let obs = observe(&world, &agent, None);
        let belief = Belief::at(agent.pos);
        let outcome = perceive(&world, &agent, &obs, &belief, &CoreConfig::default());
        let first = outcome.trace.first().unwrap().step_error;
        let last = outcome.trace.last().unwrap().step_error;
        assert!(last < first);
    }

    #[test]
    fn test_free_energy_is_half_mean_step_error() {
        let world = world_with_homes();
        let agent = agent();
        let obs = observe(&world, &agent, None);
        let belief = Belief::at(agent.pos);
        let outcome = perceive(&world, &agent, &obs, &belief, &CoreConfig::default());
        let mean: f64 = outcome.trace.iter().map(|t| t.step_error).sum::<f64>()
            / outcome.trace.len() as f64;
        assert!((outcome.free_energy - 0.5 * mean).abs() < 1e-12);
    }

    #[test]
    fn test_cargo_pulls_goal_homeward() {
        let world = world_with_homes();
        let mut hauling = agent();
        hauling.cargo = 0.9;
        let obs = observe(&world, &hauling, None);
        let belief = Belief::at(hauling.pos);
        let outcome = perceive(&world, &hauling, &obs, &belief, &CoreConfig::default());
        let home = Position::new(1, 1);
        let before = belief.goal;
        let after = outcome.belief.goal;
        let dist_before = ((before.0 - 1.0).powi(2) + (before.1 - 1.0).powi(2)).sqrt();
        let dist_after = ((after.0 - f64::from(home.x)).powi(2)
            + (after.1 - f64::from(home.y)).powi(2))
        .sqrt();
        assert!(dist_after < dist_before);
    }

    #[test]
    fn test_belief_position_tracks_agent() {
        let world = world_with_homes();
        let agent = agent();
        let obs = observe(&world, &agent, None);
        let belief = Belief::at(Position::new(0, 0));
        let outcome = perceive(&world, &agent, &obs, &belief, &CoreConfig::default());
        assert_eq!(outcome.belief.position, agent.pos);
    }

    #[test]
    fn test_precision_is_modulated_target_not_annealed() {
        let world = world_with_homes();
        let agent = agent();
        let obs = observe(&world, &agent, None);
        let belief = Belief::at(agent.pos);
        let cfg = CoreConfig::default();
        let outcome = perceive(&world, &agent, &obs, &belief, &cfg);
        let target = affect::modulate_precisions(outcome.belief.hunger, &obs, &cfg);
        assert_eq!(outcome.precision.tau, target.tau);
        assert_eq!(outcome.precision.weights, target.weights);
    }

    #[test]
    fn test_precision_target_tracks_settled_hunger() {
        // A heavy load drives hunger up across the iterations, so the
        // per-iteration target must drift away from the initial-hunger one
        // and the returned precision must match the settled belief.
        let world = world_with_homes();
        let mut hauling = agent();
        hauling.cargo = 0.9;
        let obs = observe(&world, &hauling, None);
        let belief = Belief::at(hauling.pos);
        let cfg = CoreConfig::default();
        let outcome = perceive(&world, &hauling, &obs, &belief, &cfg);

        assert!(outcome.belief.hunger > belief.hunger);
        let settled = affect::modulate_precisions(outcome.belief.hunger, &obs, &cfg);
        let initial = affect::modulate_precisions(belief.hunger, &obs, &cfg);
        assert_eq!(outcome.precision, settled);
        assert_ne!(outcome.precision.tau, initial.tau);
    }
}
