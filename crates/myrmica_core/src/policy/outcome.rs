//! Myopic one-step forward model: what the agent expects each macro-action
//! to do to its next observation.
//!
//! Every field drifts toward an action-specific target at an action-specific
//! rate, `new = old + rate * (target - old)`, clamped to [0, 1]. The tables
//! are hand-tuned and pinned by the anchor tests below; changing a rate is a
//! behavior change, not a refactor.

use myrmica_data::{Belief, Channel, MacroAction, Observation};

#[inline]
fn drift(old: f64, target: f64, rate: f64) -> f64 {
    (old + rate * (target - old)).clamp(0.0, 1.0)
}

/// Blend of cell food and neighborhood food that gates how productive a
/// forage step is expected to be.
#[must_use]
pub fn availability(observation: &Observation) -> f64 {
    0.6 * observation.get(Channel::Food) + 0.4 * observation.get(Channel::FoodTrace)
}

/// Predicts the next observation under one macro-action.
///
/// The hunger channel is seeded from the believed hunger, not the raw sensed
/// value: the forward model extrapolates the agent's own estimate.
#[must_use]
pub fn predict_outcome(
    belief: &Belief,
    observation: &Observation,
    action: MacroAction,
) -> Observation {
    let mut base = *observation;
    base.set(Channel::Hunger, belief.hunger.clamp(0.0, 1.0));
    let mut next = base;
    let set = |next: &mut Observation, ch: Channel, target: f64, rate: f64| {
        next.set(ch, drift(base.get(ch), target, rate));
    };

    match action {
        MacroAction::Forage => {
            let avail = availability(&base);
            set(&mut next, Channel::Cargo, 1.0, 0.5 * avail);
            set(&mut next, Channel::Food, 0.0, 0.4 * avail);
            set(&mut next, Channel::Ingest, avail, 0.5);
            set(&mut next, Channel::Gather, avail, 0.5);
            set(&mut next, Channel::Hunger, 0.0, 0.3 * avail);
            set(&mut next, Channel::Novelty, 0.0, 0.4);
            set(&mut next, Channel::TrailGrad, 0.0, 0.1);
            set(&mut next, Channel::HomeProx, 0.0, 0.05);
            set(&mut next, Channel::DistHome, 1.0, 0.05);
        }
        MacroAction::Return => {
            let cargo = base.get(Channel::Cargo);
            let home_prox = base.get(Channel::HomeProx);
            set(&mut next, Channel::Cargo, 0.0, 0.6);
            set(&mut next, Channel::HomeProx, 1.0, 0.5);
            set(&mut next, Channel::DistHome, 0.0, 0.5);
            set(&mut next, Channel::OnHome, 1.0, 0.25 * home_prox);
            set(&mut next, Channel::EnemyProx, 0.0, 0.3);
            set(&mut next, Channel::Ingest, 0.0, 0.3);
            set(&mut next, Channel::Hunger, 0.0, 0.05);
            set(&mut next, Channel::Novelty, 0.0, 0.2);
            set(&mut next, Channel::Reserve, 1.0, 0.1 * cargo);
        }
        MacroAction::Pheromone => {
            set(&mut next, Channel::Pher, 1.0, 0.5);
            set(&mut next, Channel::PherTrace, 1.0, 0.3);
            set(&mut next, Channel::TrailGrad, 1.0, 0.4);
            set(&mut next, Channel::Hunger, 1.0, 0.05);
            set(&mut next, Channel::Ingest, 0.0, 0.2);
            set(&mut next, Channel::Novelty, 0.0, 0.1);
        }
        MacroAction::Hold => {
            set(&mut next, Channel::Hunger, 1.0, 0.02);
            set(&mut next, Channel::Ingest, 0.0, 0.1);
            set(&mut next, Channel::Novelty, 0.0, 0.05);
        }
    }

    // The low-signal flag follows the predicted fields.
    next.white_space = if next.get(Channel::Food) < 0.05
        && next.get(Channel::Pher) < 0.10
        && next.get(Channel::FoodTrace) < 0.10
    {
        1.0
    } else {
        0.0
    };

    next
}
