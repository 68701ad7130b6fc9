use std::collections::HashMap;

use proptest::prelude::*;

use myrmica_core::observation::observe;
use myrmica_data::{
    AgentSnapshot, Cell, Channel, ColonyId, Position, WorldSnapshot,
};

prop_compose! {
    fn arb_cell()(
        food in 0.0f64..12.0,
        pheromone in 0.0f64..1.5,
        home in prop::option::of(0u8..2)
    ) -> Cell {
        Cell { food, pheromone, home_owner: home.map(ColonyId) }
    }
}

prop_compose! {
    fn arb_world()(
        width in 4u16..16,
        height in 4u16..16,
    )(
        cells in prop::collection::vec(arb_cell(), (width as usize) * (height as usize)),
        width in Just(width),
        height in Just(height),
        max_food in 0.0f64..10.0,
        reserve in 0.0f64..150.0,
    ) -> WorldSnapshot {
        let mut homes = HashMap::new();
        homes.insert(ColonyId(0), Position::new(1, 1));
        homes.insert(ColonyId(1), Position::new(i32::from(width) - 2, i32::from(height) - 2));
        let mut reserves = HashMap::new();
        reserves.insert(ColonyId(0), reserve);
        WorldSnapshot {
            width,
            height,
            cells,
            max_food,
            max_pheromone: 1.0,
            homes,
            reserves,
            queen_initial_reserve: 100.0,
        }
    }
}

prop_compose! {
    fn arb_agent()(
        x in -2i32..20,
        y in -2i32..20,
        hunger in -0.5f64..1.5,
        cargo in 0.0f64..1.0,
        ingest in 0.0f64..1.0,
        gather in 0.0f64..1.0,
        visits in 0u32..40,
    ) -> AgentSnapshot {
        let pos = Position::new(x, y);
        let mut agent = AgentSnapshot::new(ColonyId(0), pos, Some(Position::new(1, 1)));
        agent.hunger = hunger;
        agent.cargo = cargo;
        agent.recent_ingest = ingest;
        agent.recent_gather = gather;
        if visits > 0 {
            agent.visits.insert(pos, visits);
        }
        agent
    }
}

proptest! {
    /// Every channel of every observation lands in the unit interval, no
    /// matter how hostile the raw world values are.
    #[test]
    fn observation_channels_stay_in_unit_interval(
        world in arb_world(),
        agent in arb_agent(),
    ) {
        let obs = observe(&world, &agent, None);
        for ch in Channel::ALL {
            let v = obs.get(ch);
            prop_assert!((0.0..=1.0).contains(&v), "{ch:?} = {v}");
        }
        prop_assert!(obs.white_space == 0.0 || obs.white_space == 1.0);
    }

    /// Degenerate normalizers (zero max food) never produce NaN or negative
    /// channels.
    #[test]
    fn zero_max_food_is_safe(agent in arb_agent()) {
        let world = WorldSnapshot {
            width: 8,
            height: 8,
            cells: vec![Cell { food: 5.0, pheromone: 0.3, home_owner: None }; 64],
            max_food: 0.0,
            max_pheromone: 0.0,
            homes: HashMap::new(),
            reserves: HashMap::new(),
            queen_initial_reserve: 0.0,
        };
        let obs = observe(&world, &agent, None);
        for ch in Channel::ALL {
            prop_assert!(obs.get(ch).is_finite());
            prop_assert!(obs.get(ch) >= 0.0);
        }
    }

    /// Observation is a pure function of its inputs.
    #[test]
    fn observation_is_deterministic(world in arb_world(), agent in arb_agent()) {
        let a = observe(&world, &agent, None);
        let b = observe(&world, &agent, None);
        prop_assert_eq!(a, b);
    }
}
