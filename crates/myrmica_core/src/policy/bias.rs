//! Contextual logit biases layered on top of the EFE score.
//!
//! Each rule is a small pure function over the scalar subset it cares about,
//! returning a signed delta that is added straight onto an action's G
//! (negative favors the action). The rules are deliberately independent and
//! composed by summation so each one stays individually testable; do not
//! fold them into one branch tree.

use myrmica_data::{Channel, MacroAction, Mode, Observation};

/// Cargo-conditioned baseline adjustment.
#[must_use]
pub fn base_adjust(action: MacroAction, observation: &Observation) -> f64 {
    let cargo = observation.get(Channel::Cargo);
    if cargo > 0.5 {
        match action {
            MacroAction::Return => -0.10,
            MacroAction::Forage => 0.05,
            _ => 0.0,
        }
    } else if cargo < 0.05 {
        match action {
            MacroAction::Return => 0.05,
            MacroAction::Forage => -0.05,
            _ => 0.0,
        }
    } else {
        0.0
    }
}

// The nine situational rules. Each is gated by a conjunction of thresholds
// and touches one or two actions.

fn fresh_ground(action: MacroAction, o: &Observation) -> f64 {
    if o.get(Channel::Novelty) > 0.7 && o.get(Channel::TrailGrad) < 0.2 {
        if action == MacroAction::Forage {
            return -0.15;
        }
    }
    0.0
}

fn follow_trail(action: MacroAction, o: &Observation) -> f64 {
    if o.get(Channel::TrailGrad) >= 0.5 && o.get(Channel::Cargo) < 0.1 {
        return match action {
            MacroAction::Forage => -0.10,
            MacroAction::Pheromone => 0.05,
            _ => 0.0,
        };
    }
    0.0
}

fn unload_at_home(action: MacroAction, o: &Observation) -> f64 {
    if o.get(Channel::OnHome) >= 0.9 && o.get(Channel::Cargo) >= 0.25 {
        if action == MacroAction::Return {
            return -0.20;
        }
    }
    0.0
}

fn food_underfoot(action: MacroAction, o: &Observation) -> f64 {
    if o.get(Channel::Food) >= 0.3 && o.get(Channel::Cargo) < 0.6 {
        if action == MacroAction::Forage {
            return -0.15;
        }
    }
    0.0
}

fn starving_idle(action: MacroAction, o: &Observation) -> f64 {
    if o.get(Channel::Gather) < 0.1 && o.get(Channel::Hunger) > 0.6 {
        return match action {
            MacroAction::Forage => -0.10,
            MacroAction::Hold => 0.10,
            _ => 0.0,
        };
    }
    0.0
}

fn colony_deficit_haul(action: MacroAction, o: &Observation) -> f64 {
    if o.get(Channel::Reserve) < 0.2 && o.get(Channel::Cargo) >= 0.3 {
        if action == MacroAction::Return {
            return -0.25;
        }
    }
    0.0
}

fn surplus_maintenance(action: MacroAction, o: &Observation) -> f64 {
    if o.get(Channel::Reserve) > 0.75 && o.get(Channel::Hunger) < 0.3 {
        if action == MacroAction::Pheromone {
            return -0.10;
        }
    }
    0.0
}

fn eat_now(action: MacroAction, o: &Observation) -> f64 {
    if o.get(Channel::Hunger) > 0.8 && o.get(Channel::Food) >= 0.2 {
        if action == MacroAction::Forage {
            return -0.20;
        }
    }
    0.0
}

fn deep_field_haul(action: MacroAction, o: &Observation) -> f64 {
    if o.get(Channel::DistHome) > 0.7 && o.get(Channel::Cargo) >= 0.5 {
        if action == MacroAction::Return {
            return -0.15;
        }
    }
    0.0
}

/// Sum of the nine situational rules.
#[must_use]
pub fn situation_adjust(action: MacroAction, observation: &Observation) -> f64 {
    fresh_ground(action, observation)
        + follow_trail(action, observation)
        + unload_at_home(action, observation)
        + food_underfoot(action, observation)
        + starving_idle(action, observation)
        + colony_deficit_haul(action, observation)
        + surplus_maintenance(action, observation)
        + eat_now(action, observation)
        + deep_field_haul(action, observation)
}

/// Visit-driven bias: nudge exploration outward from well-trodden ground
/// near home, and penalize foraging that has stalled far afield.
#[must_use]
pub fn visit_bias(action: MacroAction, observation: &Observation) -> f64 {
    if action != MacroAction::Forage {
        return 0.0;
    }
    let mut delta = 0.0;
    if observation.get(Channel::Gather) < 0.15 && observation.get(Channel::DistHome) > 0.6 {
        delta += 0.15;
    }
    if observation.get(Channel::Novelty) < 0.3 && observation.get(Channel::DistHome) < 0.3 {
        delta -= 0.10;
    }
    delta
}

/// Active only on a low-signal patch: stop foraging nothing, mark or leave.
#[must_use]
pub fn white_space_adjust(action: MacroAction, observation: &Observation) -> f64 {
    if !observation.is_white_space() {
        return 0.0;
    }
    match action {
        MacroAction::Forage => 0.20,
        MacroAction::Pheromone => -0.10,
        MacroAction::Return => -0.05,
        MacroAction::Hold => 0.0,
    }
}

/// Per-mode tilt of the action ranking.
#[must_use]
pub fn mode_adjust(action: MacroAction, mode: Mode) -> f64 {
    match (mode, action) {
        (Mode::Outbound, MacroAction::Forage) => -0.15,
        (Mode::Outbound, MacroAction::Return) => 0.10,
        (Mode::Homebound, MacroAction::Return) => -0.20,
        (Mode::Homebound, MacroAction::Forage) => 0.10,
        (Mode::Maintain, MacroAction::Pheromone) => -0.15,
        _ => 0.0,
    }
}

/// The full additive stack, in its fixed order.
#[must_use]
pub fn bias_stack(action: MacroAction, observation: &Observation, mode: Mode) -> f64 {
    base_adjust(action, observation)
        + situation_adjust(action, observation)
        + visit_bias(action, observation)
        + white_space_adjust(action, observation)
        + mode_adjust(action, mode)
}
