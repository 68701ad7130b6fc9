//! Observation normalizer: raw world + agent state in, a flat record of
//! [0, 1] scalars out.
//!
//! Pure and deterministic; every tick produces a fresh `Observation` and
//! nothing here mutates world or agent state. Degenerate normalizers (max
//! value of zero or below) collapse to 0.0 instead of dividing by zero.

use myrmica_data::{AgentSnapshot, Belief, Channel, Observation, Position, WorldSnapshot};

/// Food below 5% of max counts as negligible for the white-space predicate.
const WHITE_FOOD: f64 = 0.05;
/// Pheromone and neighborhood food below 10% of max count as negligible.
const WHITE_PHER: f64 = 0.10;
const WHITE_TRACE: f64 = 0.10;

#[inline]
fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Cell value over the configured max, clamped; 0 when the max is degenerate.
#[inline]
fn normalize(value: f64, max: f64) -> f64 {
    if max <= 0.0 {
        0.0
    } else {
        clamp01(value / max)
    }
}

/// Proximity to a target: 1 at the target, falling off linearly with
/// euclidean distance over the grid diagonal. Absent targets read as 0.
fn proximity(world: &WorldSnapshot, from: Position, target: Option<Position>) -> f64 {
    let Some(target) = target else {
        return 0.0;
    };
    if !world.in_bounds(target.x, target.y) {
        return 0.0;
    }
    1.0 - clamp01(from.dist(target) / world.diagonal())
}

/// Builds the per-tick observation for one agent.
///
/// Hunger is sourced from the belief state when one exists, falling back to
/// the agent's raw drive, falling back to 0.5.
#[must_use]
pub fn observe(
    world: &WorldSnapshot,
    agent: &AgentSnapshot,
    belief: Option<&Belief>,
) -> Observation {
    let mut obs = Observation::default();

    let here = world.cell(agent.pos.x, agent.pos.y);
    let food = normalize(here.food, world.max_food);
    let pher = normalize(here.pheromone, world.max_pheromone);
    obs.set(Channel::Food, food);
    obs.set(Channel::Pher, pher);

    let neighbors = world.neighbors8(agent.pos);
    let (food_trace, pher_trace) = if neighbors.is_empty() {
        (0.0, 0.0)
    } else {
        let mut food_sum = 0.0;
        let mut pher_sum = 0.0;
        for pos in &neighbors {
            let cell = world.cell(pos.x, pos.y);
            food_sum += normalize(cell.food, world.max_food);
            pher_sum += normalize(cell.pheromone, world.max_pheromone);
        }
        let n = neighbors.len() as f64;
        (food_sum / n, pher_sum / n)
    };
    obs.set(Channel::FoodTrace, food_trace);
    obs.set(Channel::PherTrace, pher_trace);

    let home = agent.home.or_else(|| world.home_of(agent.colony));
    obs.set(Channel::HomeProx, proximity(world, agent.pos, home));
    let enemy_home = world.enemy_home_of(agent.colony, agent.pos);
    obs.set(Channel::EnemyProx, proximity(world, agent.pos, enemy_home));

    let hunger = belief.map(|b| b.hunger).unwrap_or(agent.hunger);
    obs.set(Channel::Hunger, clamp01(hunger));
    obs.set(Channel::Ingest, clamp01(agent.recent_ingest));
    obs.set(Channel::Gather, clamp01(agent.recent_gather));
    obs.set(Channel::Cargo, clamp01(agent.cargo));

    let on_home = match home {
        Some(h) if h == agent.pos => {
            let owner = world.cell(h.x, h.y).home_owner;
            if owner == Some(agent.colony) {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    };
    obs.set(Channel::OnHome, on_home);

    let trail_grad = if neighbors.is_empty() {
        0.0
    } else {
        let best = neighbors
            .iter()
            .map(|pos| normalize(world.cell(pos.x, pos.y).pheromone, world.max_pheromone))
            .fold(0.0_f64, f64::max);
        clamp01(best - pher)
    };
    obs.set(Channel::TrailGrad, trail_grad);

    obs.set(Channel::Novelty, 1.0 / (1.0 + f64::from(agent.visits_here())));

    let dist_home = match home {
        Some(h) => clamp01(agent.pos.dist(h) / world.diagonal()),
        None => 1.0,
    };
    obs.set(Channel::DistHome, dist_home);

    let reserve = normalize(world.reserve_of(agent.colony), world.queen_initial_reserve);
    obs.set(Channel::Reserve, reserve);

    obs.white_space = if food < WHITE_FOOD && pher < WHITE_PHER && food_trace < WHITE_TRACE {
        1.0
    } else {
        0.0
    };

    obs
}

#[cfg(test)]
mod tests {
    use super::*;
    use myrmica_data::{Cell, ColonyId};
    use std::collections::HashMap;

    fn world_5x5() -> WorldSnapshot {
        WorldSnapshot {
            width: 5,
            height: 5,
            cells: vec![Cell::default(); 25],
            max_food: 10.0,
            max_pheromone: 1.0,
            homes: HashMap::new(),
            reserves: HashMap::new(),
            queen_initial_reserve: 100.0,
        }
    }

    fn agent_at(x: i32, y: i32) -> AgentSnapshot {
        AgentSnapshot::new(ColonyId(0), Position::new(x, y), None)
    }

    fn set_cell(world: &mut WorldSnapshot, x: i32, y: i32, cell: Cell) {
        let idx = y as usize * world.width as usize + x as usize;
        world.cells[idx] = cell;
    }

    #[test]
    fn test_all_channels_in_unit_interval() {
        let mut world = world_5x5();
        set_cell(
            &mut world,
            2,
            2,
            Cell {
                food: 50.0, // above max, must clamp
                pheromone: 3.0,
                home_owner: None,
            },
        );
        let obs = observe(&world, &agent_at(2, 2), None);
        for ch in Channel::ALL {
            let v = obs.get(ch);
            assert!((0.0..=1.0).contains(&v), "{ch:?} = {v}");
        }
    }

    #[test]
    fn test_degenerate_max_collapses_to_zero() {
        let mut world = world_5x5();
        world.max_food = 0.0;
        world.max_pheromone = 0.0;
        set_cell(
            &mut world,
            2,
            2,
            Cell {
                food: 7.0,
                pheromone: 0.9,
                home_owner: None,
            },
        );
        let obs = observe(&world, &agent_at(2, 2), None);
        assert_eq!(obs.get(Channel::Food), 0.0);
        assert_eq!(obs.get(Channel::Pher), 0.0);
        assert_eq!(obs.get(Channel::FoodTrace), 0.0);
        assert_eq!(obs.get(Channel::PherTrace), 0.0);
        assert_eq!(obs.get(Channel::TrailGrad), 0.0);
    }

    #[test]
    fn test_corner_trace_uses_in_bounds_neighbors_only() {
        let mut world = world_5x5();
        // Corner (0,0) has exactly 3 neighbors: (1,0), (0,1), (1,1).
        set_cell(&mut world, 1, 0, Cell { food: 10.0, ..Cell::default() });
        set_cell(&mut world, 0, 1, Cell { food: 5.0, ..Cell::default() });
        let obs = observe(&world, &agent_at(0, 0), None);
        let expected = (1.0 + 0.5 + 0.0) / 3.0;
        assert!((obs.get(Channel::FoodTrace) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_friendly_home_requires_owner_match() {
        let mut world = world_5x5();
        let home = Position::new(2, 2);
        world.homes.insert(ColonyId(0), home);
        let mut agent = agent_at(2, 2);
        agent.home = Some(home);

        // Cell not marked as owned: indicator stays 0.
        let obs = observe(&world, &agent, None);
        assert_eq!(obs.get(Channel::OnHome), 0.0);

        set_cell(
            &mut world,
            2,
            2,
            Cell {
                home_owner: Some(ColonyId(0)),
                ..Cell::default()
            },
        );
        let obs = observe(&world, &agent, None);
        assert_eq!(obs.get(Channel::OnHome), 1.0);
        assert_eq!(obs.get(Channel::HomeProx), 1.0);
        assert_eq!(obs.get(Channel::DistHome), 0.0);
    }

    #[test]
    fn test_trail_gradient_points_up_slope() {
        let mut world = world_5x5();
        set_cell(&mut world, 3, 2, Cell { pheromone: 0.8, ..Cell::default() });
        set_cell(&mut world, 2, 2, Cell { pheromone: 0.3, ..Cell::default() });
        let obs = observe(&world, &agent_at(2, 2), None);
        assert!((obs.get(Channel::TrailGrad) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_hunger_prefers_belief_over_raw() {
        let world = world_5x5();
        let mut agent = agent_at(1, 1);
        agent.hunger = 0.9;
        let mut belief = Belief::at(agent.pos);
        belief.hunger = 0.2;
        let obs = observe(&world, &agent, Some(&belief));
        assert_eq!(obs.get(Channel::Hunger), 0.2);
        let obs = observe(&world, &agent, None);
        assert_eq!(obs.get(Channel::Hunger), 0.9);
    }

    #[test]
    fn test_novelty_decays_with_visits() {
        let world = world_5x5();
        let mut agent = agent_at(1, 1);
        let obs = observe(&world, &agent, None);
        assert_eq!(obs.get(Channel::Novelty), 1.0);
        agent.visits.insert(agent.pos, 3);
        let obs = observe(&world, &agent, None);
        assert_eq!(obs.get(Channel::Novelty), 0.25);
    }

    #[test]
    fn test_no_home_reads_max_distance() {
        let world = world_5x5();
        let obs = observe(&world, &agent_at(1, 1), None);
        assert_eq!(obs.get(Channel::DistHome), 1.0);
        assert_eq!(obs.get(Channel::HomeProx), 0.0);
    }

    #[test]
    fn test_white_space_flag() {
        let world = world_5x5();
        let obs = observe(&world, &agent_at(2, 2), None);
        assert_eq!(obs.white_space, 1.0);

        let mut rich = world_5x5();
        set_cell(&mut rich, 2, 2, Cell { food: 6.0, ..Cell::default() });
        let obs = observe(&rich, &agent_at(2, 2), None);
        assert_eq!(obs.white_space, 0.0);
    }
}
