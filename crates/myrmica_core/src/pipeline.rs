//! Per-agent decision pipeline: observe, perceive, regulate, select.
//!
//! `AgentMind` is the only state the core keeps between ticks for an agent.
//! Everything else is recomputed from the world snapshot each call, so the
//! pipeline stays deterministic and replayable.

use std::collections::VecDeque;

use tracing::debug;

use crate::affect::{self, TauDrive};
use crate::config::CoreConfig;
use crate::perception::{self, PerceptionOutcome, TraceStep};
use crate::policy::{self, EfeTerms, PolicyDecision};
use myrmica_data::{
    AgentSnapshot, Belief, Channel, MacroAction, Mode, Observation, Position, Precision,
    WorldSnapshot,
};

/// Persistent mental state of one agent.
#[derive(Debug, Clone)]
pub struct AgentMind {
    pub belief: Belief,
    pub precision: Precision,
    pub mode: Mode,
    hunger_window: VecDeque<f64>,
    trend_window: usize,
}

impl AgentMind {
    #[must_use]
    pub fn new(position: Position, cfg: &CoreConfig) -> Self {
        let trend_window = cfg.trend_window.max(2);
        Self {
            belief: Belief::at(position),
            precision: Precision::default(),
            mode: Mode::default(),
            hunger_window: VecDeque::with_capacity(trend_window),
            trend_window,
        }
    }

    fn record_hunger(&mut self, hunger: f64) {
        if self.hunger_window.len() == self.trend_window {
            self.hunger_window.pop_front();
        }
        self.hunger_window.push_back(hunger);
    }

    /// Mean first-difference of the recorded hunger samples. Zero until at
    /// least two samples exist.
    #[must_use]
    pub fn hunger_trend(&self) -> f64 {
        if self.hunger_window.len() < 2 {
            return 0.0;
        }
        let diffs: f64 = self
            .hunger_window
            .iter()
            .zip(self.hunger_window.iter().skip(1))
            .map(|(a, b)| b - a)
            .sum();
        diffs / (self.hunger_window.len() - 1) as f64
    }
}

/// Scalar diagnostics of one pipeline run, for logging and inspection.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct Diagnostics {
    pub hunger: f64,
    pub hunger_trend: f64,
    pub need_error: f64,
    pub free_energy: f64,
    /// Sub-term breakdown of the chosen action's G score.
    pub terms: EfeTerms,
}

/// One complete decision: the chosen action plus everything the pipeline
/// computed on the way there.
#[derive(Debug, Clone)]
pub struct Decision {
    pub action: MacroAction,
    pub mode: Mode,
    pub tau: f64,
    pub observation: Observation,
    pub policy: PolicyDecision,
    pub diagnostics: Diagnostics,
    /// Per-iteration record of the perception loop that led here.
    pub trace: Vec<TraceStep>,
}

/// Runs one full agent-tick against a world snapshot, mutating `mind` in
/// place.
pub fn decide(
    world: &WorldSnapshot,
    agent: &AgentSnapshot,
    mind: &mut AgentMind,
    cfg: &CoreConfig,
) -> Decision {
    let observation = crate::observation::observe(world, agent, Some(&mind.belief));

    let PerceptionOutcome {
        belief,
        precision,
        free_energy,
        trace,
        ..
    } = perception::perceive(world, agent, &observation, &mind.belief, cfg);
    mind.belief = belief;

    // Event-driven hunger correction on top of the perceived belief: feeding
    // and depositing relieve, enemy exposure raises.
    let ingest = observation.get(Channel::Ingest);
    let deposit = observation.get(Channel::OnHome) * observation.get(Channel::Cargo);
    let risk = observation.get(Channel::EnemyProx);
    let update = affect::update_hunger(mind.belief.hunger, ingest, deposit, risk, &cfg.affect);
    mind.belief.hunger = update.value;
    mind.belief.predicted.set(Channel::Hunger, update.value);
    mind.record_hunger(update.value);

    let drive = TauDrive {
        hunger: mind.belief.hunger,
        ingest,
        cargo: observation.get(Channel::Cargo),
        dhdt: mind.hunger_trend(),
        reserve: observation.get(Channel::Reserve),
    };
    mind.precision = Precision {
        weights: precision.weights,
        tau: affect::update_tau(precision.tau, drive, cfg),
    };

    mind.mode = affect::next_mode(mind.mode, &observation, &cfg.modes);

    let policy = policy::choose_action(&mind.belief, &mind.precision, &observation, mind.mode, cfg);

    let diagnostics = Diagnostics {
        hunger: mind.belief.hunger,
        hunger_trend: drive.dhdt,
        need_error: affect::need_error(mind.belief.hunger, ingest, &cfg.affect),
        free_energy,
        terms: policy
            .eval(policy.action)
            .map(|eval| eval.terms)
            .unwrap_or_default(),
    };

    debug!(
        agent = %agent.id.0,
        action = policy.action.label(),
        mode = ?mind.mode,
        tau = policy.tau,
        hunger = diagnostics.hunger,
        free_energy = diagnostics.free_energy,
        "decision"
    );

    Decision {
        action: policy.action,
        mode: mind.mode,
        tau: policy.tau,
        observation,
        policy,
        diagnostics,
        trace,
    }
}
