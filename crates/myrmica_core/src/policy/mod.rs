//! Policy evaluator: one-step expected-free-energy scoring over the
//! admissible macro-actions, contextual bias adjustment, temperature
//! coupling, and deterministic softmax-argmax selection.
//!
//! Evaluation is a pure function of (belief, precision, observation, mode,
//! config): repeated invocation yields bit-identical scores, probabilities,
//! and choice. The only "sampling" is an argmax over the softmax weights.

pub mod admissible;
pub mod bias;
pub mod efe;
pub mod outcome;

pub use admissible::{admissible_actions, base_order};
pub use efe::EfeTerms;
pub use outcome::predict_outcome;

use crate::config::CoreConfig;
use myrmica_data::{Belief, Channel, MacroAction, Mode, Observation, Precision};

const TAU_EPSILON: f64 = 1e-6;

/// Full evaluation of one candidate action.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PolicyEval {
    /// Expected free energy after the bias stack.
    pub g: f64,
    /// Softmax probability over the admissible set.
    pub p: f64,
    pub terms: EfeTerms,
    pub bias: f64,
    pub outcome: Observation,
}

/// Result of one policy evaluation: the chosen action, the coupled tau, and
/// the per-action diagnostics in admissible order.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PolicyDecision {
    pub action: MacroAction,
    pub tau: f64,
    pub reserve_delta: f64,
    pub survival_pressure: f64,
    pub evals: Vec<(MacroAction, PolicyEval)>,
}

impl PolicyDecision {
    #[must_use]
    pub fn eval(&self, action: MacroAction) -> Option<&PolicyEval> {
        self.evals
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, e)| e)
    }
}

/// Soft posterior over behavioral modes, inferred from the observation
/// alone. This intentionally overlaps the hard hysteresis machine and the
/// EFE preference terms: the combined tilt is part of the tuned behavior and
/// is pinned by regression tests, so keep it separate and do not "simplify"
/// it into either.
#[must_use]
pub fn mode_posterior(observation: &Observation) -> [f64; 3] {
    let cargo = observation.get(Channel::Cargo);
    let home_prox = observation.get(Channel::HomeProx);
    let on_home = observation.get(Channel::OnHome);
    let novelty = observation.get(Channel::Novelty);
    let reserve = observation.get(Channel::Reserve);

    let evidence = [
        (1.0 - cargo) + 0.5 * novelty,          // outbound
        cargo + 0.5 * home_prox,                // homebound
        on_home + (reserve - 0.5).max(0.0),     // maintain
    ];
    let max = evidence.iter().fold(f64::MIN, |a, b| a.max(*b));
    let mut weights = [0.0; 3];
    let mut sum = 0.0;
    for (i, e) in evidence.iter().enumerate() {
        weights[i] = (e - max).exp();
        sum += weights[i];
    }
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

/// Linear per-mode action preferences feeding the posterior tilt.
fn mode_preference(mode_idx: usize, action: MacroAction) -> f64 {
    match (mode_idx, action) {
        (0, MacroAction::Forage) => 0.30,
        (0, MacroAction::Pheromone) => 0.10,
        (0, MacroAction::Return) => -0.20,
        (0, MacroAction::Hold) => -0.10,
        (1, MacroAction::Return) => 0.35,
        (1, MacroAction::Hold) => 0.05,
        (1, MacroAction::Forage) => -0.20,
        (1, MacroAction::Pheromone) => -0.10,
        (2, MacroAction::Pheromone) => 0.30,
        (2, MacroAction::Hold) => 0.10,
        (2, MacroAction::Forage) => -0.10,
        (2, MacroAction::Return) => 0.0,
        _ => 0.0,
    }
}

/// Secondary mode-posterior-weighted logit adjustment, layered on top of the
/// primary EFE logits.
#[must_use]
pub fn mode_posterior_tilt(action: MacroAction, observation: &Observation, cfg: &CoreConfig) -> f64 {
    let posterior = mode_posterior(observation);
    let score: f64 = posterior
        .iter()
        .enumerate()
        .map(|(i, q)| q * mode_preference(i, action))
        .sum();
    cfg.lambdas.mode_tilt * score
}

/// Colony/survival-pressure coupling of the softmax temperature.
#[must_use]
pub fn couple_tau(base: f64, reserve_delta: f64, survival_pressure: f64, cfg: &CoreConfig) -> f64 {
    (base - cfg.precision.reserve_gain * reserve_delta
        - cfg.precision.survival_gain * survival_pressure)
        .clamp(cfg.precision.tau_floor, cfg.precision.tau_cap)
}

/// Contextual caps applied after the coupling: desperate hunger and a loaded
/// arrival sharpen selection; an idle stand on a barren home loosens it.
fn apply_tau_caps(tau: f64, observation: &Observation, cfg: &CoreConfig) -> f64 {
    let caps = &cfg.tau_caps;
    let hunger = observation.get(Channel::Hunger);
    let on_home = observation.get(Channel::OnHome);
    let cargo = observation.get(Channel::Cargo);
    let food = observation.get(Channel::Food);
    let trail = observation.get(Channel::TrailGrad);

    let mut tau = tau;
    if hunger > caps.hungry_above {
        tau = tau.min(caps.hungry_cap);
    }
    if on_home >= caps.loaded_home_high && cargo > caps.loaded_cargo_high {
        tau = tau.min(caps.loaded_cap_high);
    } else if on_home >= caps.loaded_home_low && cargo > caps.loaded_cargo_low {
        tau = tau.min(caps.loaded_cap_low);
    }
    if on_home >= caps.idle_home
        && cargo < caps.idle_cargo
        && food < caps.idle_food
        && trail < caps.idle_trail
    {
        tau = tau.max(caps.idle_raise).min(cfg.precision.tau_cap);
    }
    tau
}

/// Max-subtracted softmax over `-G/tau + tilt`; degenerate weights fall back
/// to a uniform distribution.
fn softmax_probabilities(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().fold(f64::NEG_INFINITY, |a, b| a.max(*b));
    let weights: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f64 = weights.iter().sum();
    if !sum.is_finite() || sum <= 0.0 {
        return vec![1.0 / logits.len() as f64; logits.len()];
    }
    weights.iter().map(|w| w / sum).collect()
}

/// Evaluates the admissible actions and deterministically selects the most
/// probable one.
#[must_use]
pub fn choose_action(
    belief: &Belief,
    precision: &Precision,
    observation: &Observation,
    mode: Mode,
    cfg: &CoreConfig,
) -> PolicyDecision {
    let actions = admissible_actions(observation, mode, &cfg.guards);
    let reserve = observation.get(Channel::Reserve);

    let mut evals: Vec<(MacroAction, PolicyEval)> = Vec::with_capacity(actions.len());
    let mut max_survival = 0.0_f64;
    for action in &actions {
        let outcome = predict_outcome(belief, observation, *action);
        let terms = EfeTerms {
            risk: efe::risk(&outcome, cfg),
            ambiguity: efe::ambiguity(&outcome, precision),
            info: efe::info_gain(observation, &outcome),
            colony: efe::colony_cost(reserve, *action, &cfg.colony),
            survival: efe::survival_cost(&outcome, *action, &cfg.survival),
            action_prior: efe::action_prior(*action, observation, &cfg.action_cost),
        };
        max_survival = max_survival.max(terms.survival);
        let bias = bias::bias_stack(*action, observation, mode);
        let g = efe::combine(&terms, cfg) + bias;
        evals.push((
            *action,
            PolicyEval {
                g,
                p: 0.0,
                terms,
                bias,
                outcome,
            },
        ));
    }

    let reserve_delta = (cfg.colony.reserve_threshold - reserve).clamp(-1.0, 1.0);
    let norm = cfg.survival.pressure_norm.max(TAU_EPSILON);
    let survival_pressure = (efe::direct_pressure(observation, &cfg.survival) / norm)
        .max(max_survival / norm)
        .clamp(0.0, 1.0);

    let tau = couple_tau(precision.tau, reserve_delta, survival_pressure, cfg);
    let tau = apply_tau_caps(tau, observation, cfg);

    let logits: Vec<f64> = evals
        .iter()
        .map(|(action, eval)| {
            -eval.g / tau.max(TAU_EPSILON) + mode_posterior_tilt(*action, observation, cfg)
        })
        .collect();
    let probabilities = softmax_probabilities(&logits);
    for (slot, p) in evals.iter_mut().zip(&probabilities) {
        slot.1.p = *p;
    }

    // Deterministic argmax; ties resolve to the earliest admissible entry.
    let mut best = 0;
    for (i, p) in probabilities.iter().enumerate() {
        if *p > probabilities[best] {
            best = i;
        }
    }
    let action = evals[best].0;

    PolicyDecision {
        action,
        tau,
        reserve_delta,
        survival_pressure,
        evals,
    }
}
