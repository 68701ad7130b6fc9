//! Expected-free-energy scoring: the weighted sum of risk, ambiguity,
//! information gain, colony cost, survival cost, and the hand-tuned action
//! priors. Lower G is preferred.

use crate::config::{ActionCostConfig, ColonyCostConfig, CoreConfig, SurvivalCostConfig};
use myrmica_data::{Channel, MacroAction, Observation, Precision};

/// Precision below this floor contributes no extra ambiguity weight.
const AMBIGUITY_PRECISION_FLOOR: f64 = 0.2;

/// Sub-term breakdown of one action's G score.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct EfeTerms {
    pub risk: f64,
    pub ambiguity: f64,
    pub info: f64,
    pub colony: f64,
    pub survival: f64,
    pub action_prior: f64,
}

/// Negative log-likelihood of the predicted hunger and ingest against the
/// Gaussian preference targets.
#[must_use]
pub fn risk(outcome: &Observation, cfg: &CoreConfig) -> f64 {
    let p = &cfg.preferences;
    let hunger_z = (outcome.get(Channel::Hunger) - p.hunger_mean) / p.hunger_sd;
    let ingest_z = (outcome.get(Channel::Ingest) - p.ingest_mean) / p.ingest_sd;
    0.5 * hunger_z * hunger_z + 0.5 * ingest_z * ingest_z
}

/// Bernoulli-variance proxy of outcome uncertainty, weighted by inverse
/// precision, over the non-hunger channels.
#[must_use]
pub fn ambiguity(outcome: &Observation, precision: &Precision) -> f64 {
    let mut sum = 0.0;
    for ch in Channel::ALL {
        if ch == Channel::Hunger {
            continue;
        }
        let v = outcome.get(ch);
        let weight = 1.0 / precision.weights.get(ch).max(AMBIGUITY_PRECISION_FLOOR);
        sum += weight * v * (1.0 - v);
    }
    0.5 * sum
}

/// Epistemic value: expected reduction in novelty plus a quarter of the
/// expected increase in trail gradient, each floored at zero.
#[must_use]
pub fn info_gain(observation: &Observation, outcome: &Observation) -> f64 {
    let novelty_drop =
        (observation.get(Channel::Novelty) - outcome.get(Channel::Novelty)).max(0.0);
    let trail_rise =
        (outcome.get(Channel::TrailGrad) - observation.get(Channel::TrailGrad)).max(0.0);
    novelty_drop + 0.25 * trail_rise
}

/// Deficit-scaled colony penalty; returning carries a reduced share since it
/// relieves the reserve.
#[must_use]
pub fn colony_cost(reserve: f64, action: MacroAction, cfg: &ColonyCostConfig) -> f64 {
    if reserve >= cfg.reserve_threshold {
        return 0.0;
    }
    let deficit = cfg.reserve_threshold - reserve;
    let factor = if action == MacroAction::Return {
        cfg.return_factor
    } else {
        1.0
    };
    deficit * cfg.penalty_weight * factor
}

/// Weighted hunger overshoot, distance from home, and ingest deficit of the
/// predicted outcome; reduced for the return action.
#[must_use]
pub fn survival_cost(outcome: &Observation, action: MacroAction, cfg: &SurvivalCostConfig) -> f64 {
    let hunger_over = (outcome.get(Channel::Hunger) - cfg.hunger_thresh).max(0.0);
    let ingest_deficit = (cfg.ingest_floor - outcome.get(Channel::Ingest)).max(0.0);
    let raw = cfg.hunger_weight * hunger_over
        + cfg.dist_weight * outcome.get(Channel::DistHome)
        + cfg.ingest_weight * ingest_deficit;
    if action == MacroAction::Return {
        raw * cfg.return_reduction
    } else {
        raw
    }
}

/// The same pressure formula applied to the current observation, for the tau
/// coupling's direct pressure reading.
#[must_use]
pub fn direct_pressure(observation: &Observation, cfg: &SurvivalCostConfig) -> f64 {
    let hunger_over = (observation.get(Channel::Hunger) - cfg.hunger_thresh).max(0.0);
    let ingest_deficit = (cfg.ingest_floor - observation.get(Channel::Ingest)).max(0.0);
    cfg.hunger_weight * hunger_over
        + cfg.dist_weight * observation.get(Channel::DistHome)
        + cfg.ingest_weight * ingest_deficit
}

/// Hand-tuned per-action prior cost, evaluated on the current observation.
#[must_use]
pub fn action_prior(action: MacroAction, observation: &Observation, cfg: &ActionCostConfig) -> f64 {
    let hunger = observation.get(Channel::Hunger);
    let ingest = observation.get(Channel::Ingest);
    let on_home = observation.get(Channel::OnHome);
    let cargo = observation.get(Channel::Cargo);

    match action {
        MacroAction::Hold => cfg.hold_base,
        MacroAction::Pheromone => {
            cfg.pheromone_base
                + cfg.pheromone_hunger * hunger
                + cfg.pheromone_no_ingest * (1.0 - ingest)
                + cfg.pheromone_on_home * on_home
        }
        MacroAction::Forage => cfg.forage_base + cfg.forage_on_home * on_home,
        MacroAction::Return => {
            let mut cost = 0.0;
            let empty = cargo < cfg.return_empty_cargo;
            if empty && on_home >= cfg.return_home_prox {
                cost += cfg.return_empty_home;
            }
            if empty {
                cost += cfg.return_far_empty * observation.get(Channel::DistHome);
            }
            // Returning is less urgent when the agent is sated and the
            // colony is stocked.
            let hunger_gap = (0.45 - hunger).max(0.0);
            cost += cfg.return_hunger_gap * hunger_gap * observation.get(Channel::Reserve);
            cost
        }
    }
}

/// Combines the terms into G with the configured lambda weights.
#[must_use]
pub fn combine(terms: &EfeTerms, cfg: &CoreConfig) -> f64 {
    let l = &cfg.lambdas;
    l.pragmatic * terms.risk + l.ambiguity * terms.ambiguity - l.info * terms.info
        + l.colony * terms.colony
        + l.survival * terms.survival
        + terms.action_prior
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::outcome::predict_outcome;

    fn obs_with(pairs: &[(Channel, f64)]) -> Observation {
        let mut obs = Observation::default();
        for (ch, v) in pairs {
            obs.set(*ch, *v);
        }
        obs
    }

    #[test]
    fn test_risk_is_zero_at_preference_means() {
        let cfg = CoreConfig::default();
        let obs = obs_with(&[(Channel::Hunger, 0.20), (Channel::Ingest, 0.60)]);
        assert!(risk(&obs, &cfg).abs() < 1e-12);
    }

    #[test]
    fn test_risk_grows_with_deviation() {
        let cfg = CoreConfig::default();
        let near = obs_with(&[(Channel::Hunger, 0.3), (Channel::Ingest, 0.6)]);
        let far = obs_with(&[(Channel::Hunger, 0.9), (Channel::Ingest, 0.6)]);
        assert!(risk(&far, &cfg) > risk(&near, &cfg));
    }

    #[test]
    fn test_ambiguity_peaks_at_half() {
        let prec = Precision::default();
        let certain = obs_with(&[(Channel::Food, 1.0), (Channel::Hunger, 0.5)]);
        let uncertain = obs_with(&[(Channel::Food, 0.5), (Channel::Hunger, 0.5)]);
        assert!(ambiguity(&uncertain, &prec) > ambiguity(&certain, &prec));
    }

    #[test]
    fn test_ambiguity_falls_with_precision() {
        let obs = obs_with(&[(Channel::Food, 0.5)]);
        let loose = Precision::default();
        let mut sharp = Precision::default();
        for ch in Channel::ALL {
            sharp.weights.set(ch, 4.0);
        }
        assert!(ambiguity(&obs, &sharp) < ambiguity(&obs, &loose));
    }

    #[test]
    fn test_ambiguity_ignores_hunger_channel() {
        let prec = Precision::default();
        let a = obs_with(&[(Channel::Hunger, 0.5)]);
        let b = obs_with(&[(Channel::Hunger, 1.0)]);
        assert_eq!(ambiguity(&a, &prec), ambiguity(&b, &prec));
    }

    #[test]
    fn test_info_gain_floors_at_zero() {
        let before = obs_with(&[(Channel::Novelty, 0.2), (Channel::TrailGrad, 0.8)]);
        let after = obs_with(&[(Channel::Novelty, 0.9), (Channel::TrailGrad, 0.1)]);
        // novelty rose and trail fell: no gain from either
        assert_eq!(info_gain(&before, &after), 0.0);
    }

    #[test]
    fn test_info_gain_weights_trail_quarter() {
        let before = obs_with(&[(Channel::Novelty, 0.8), (Channel::TrailGrad, 0.0)]);
        let after = obs_with(&[(Channel::Novelty, 0.4), (Channel::TrailGrad, 0.4)]);
        assert!((info_gain(&before, &after) - (0.4 + 0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_colony_cost_zero_above_threshold() {
        let cfg = ColonyCostConfig::default();
        assert_eq!(colony_cost(0.5, MacroAction::Forage, &cfg), 0.0);
        assert_eq!(colony_cost(0.9, MacroAction::Hold, &cfg), 0.0);
    }

    #[test]
    fn test_colony_cost_favors_return_under_deficit() {
        let cfg = ColonyCostConfig::default();
        let forage = colony_cost(0.1, MacroAction::Forage, &cfg);
        let ret = colony_cost(0.1, MacroAction::Return, &cfg);
        assert!(ret < forage);
        assert!(ret > 0.0);
    }

    #[test]
    fn test_survival_cost_halved_for_return() {
        let cfg = SurvivalCostConfig::default();
        let outcome = obs_with(&[
            (Channel::Hunger, 0.9),
            (Channel::DistHome, 0.5),
            (Channel::Ingest, 0.0),
        ]);
        let forage = survival_cost(&outcome, MacroAction::Forage, &cfg);
        let ret = survival_cost(&outcome, MacroAction::Return, &cfg);
        assert!((ret - forage * 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_pheromone_prior_penalized_by_hunger() {
        let cfg = ActionCostConfig::default();
        let hungry = obs_with(&[(Channel::Hunger, 0.9), (Channel::Ingest, 0.0)]);
        let sated = obs_with(&[(Channel::Hunger, 0.1), (Channel::Ingest, 0.8)]);
        assert!(
            action_prior(MacroAction::Pheromone, &hungry, &cfg)
                > action_prior(MacroAction::Pheromone, &sated, &cfg)
        );
    }

    #[test]
    fn test_return_prior_punishes_empty_arrival() {
        let cfg = ActionCostConfig::default();
        let empty_home = obs_with(&[
            (Channel::OnHome, 1.0),
            (Channel::Cargo, 0.0),
            (Channel::Hunger, 0.5),
        ]);
        let loaded_home = obs_with(&[
            (Channel::OnHome, 1.0),
            (Channel::Cargo, 0.5),
            (Channel::Hunger, 0.5),
        ]);
        assert!(
            action_prior(MacroAction::Return, &empty_home, &cfg)
                > action_prior(MacroAction::Return, &loaded_home, &cfg)
        );
    }

    #[test]
    fn test_return_prior_punishes_far_empty() {
        let cfg = ActionCostConfig::default();
        let far = obs_with(&[
            (Channel::Cargo, 0.0),
            (Channel::DistHome, 0.9),
            (Channel::Hunger, 0.5),
        ]);
        let near = obs_with(&[
            (Channel::Cargo, 0.0),
            (Channel::DistHome, 0.1),
            (Channel::Hunger, 0.5),
        ]);
        assert!(
            action_prior(MacroAction::Return, &far, &cfg)
                > action_prior(MacroAction::Return, &near, &cfg)
        );
    }

    #[test]
    fn test_hunger_drives_return_over_pheromone() {
        // A hungry, loaded agent with nothing to eat must rank return
        // strictly better than laying trail.
        let cfg = CoreConfig::default();
        let obs = obs_with(&[
            (Channel::Hunger, 0.9),
            (Channel::Ingest, 0.0),
            (Channel::Cargo, 0.8),
            (Channel::DistHome, 0.5),
        ]);
        let prec = Precision::default();
        let mut belief = myrmica_data::Belief::at(myrmica_data::Position::new(0, 0));
        belief.hunger = 0.9;
        let mut g = std::collections::HashMap::new();
        for action in [MacroAction::Return, MacroAction::Pheromone] {
            let outcome = predict_outcome(&belief, &obs, action);
            let terms = EfeTerms {
                risk: risk(&outcome, &cfg),
                ambiguity: ambiguity(&outcome, &prec),
                info: info_gain(&obs, &outcome),
                colony: colony_cost(obs.get(Channel::Reserve), action, &cfg.colony),
                survival: survival_cost(&outcome, action, &cfg.survival),
                action_prior: action_prior(action, &obs, &cfg.action_cost),
            };
            g.insert(action, combine(&terms, &cfg));
        }
        assert!(g[&MacroAction::Return] < g[&MacroAction::Pheromone]);
    }
}
