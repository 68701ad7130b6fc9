//! Pluggable decision backends behind a common trait, so the simulation loop
//! never cares whether an agent runs the full inference pipeline or a cheap
//! reflex chain.

use crate::config::CoreConfig;
use crate::pipeline::{self, AgentMind, Decision};
use myrmica_data::{AgentSnapshot, Channel, MacroAction, Mode, Position, WorldSnapshot};

/// Post-hoc feedback the world reports after an action was applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionFeedback {
    /// Food ingested on the spot this tick, normalized.
    pub ingested: f64,
    /// Food picked up into cargo this tick, normalized.
    pub gathered: f64,
    /// Cargo deposited at the home this tick, normalized.
    pub deposited: f64,
}

/// A decision backend: selects one macro-action per tick and integrates the
/// world's feedback afterwards.
pub trait Decider {
    fn decide(&mut self, world: &WorldSnapshot, agent: &AgentSnapshot) -> Decision;

    /// Folds the applied action's feedback back into internal state. The
    /// default implementation is stateless.
    fn integrate(&mut self, _feedback: &ActionFeedback) {}

    fn mode(&self) -> Mode;
}

/// The full observe-perceive-regulate-select pipeline.
pub struct ActiveInferenceDecider {
    mind: AgentMind,
    cfg: CoreConfig,
}

impl ActiveInferenceDecider {
    #[must_use]
    pub fn new(position: Position, cfg: CoreConfig) -> Self {
        Self {
            mind: AgentMind::new(position, &cfg),
            cfg,
        }
    }

    #[must_use]
    pub fn mind(&self) -> &AgentMind {
        &self.mind
    }
}

impl Decider for ActiveInferenceDecider {
    fn decide(&mut self, world: &WorldSnapshot, agent: &AgentSnapshot) -> Decision {
        pipeline::decide(world, agent, &mut self.mind, &self.cfg)
    }

    fn integrate(&mut self, feedback: &ActionFeedback) {
        // Direct relief bypasses the next observation round-trip so that a
        // feeding event registers on the very next tick.
        let update = crate::affect::update_hunger(
            self.mind.belief.hunger,
            feedback.ingested,
            feedback.deposited,
            0.0,
            &self.cfg.affect,
        );
        self.mind.belief.hunger = update.value;
        self.mind
            .belief
            .predicted
            .set(Channel::Hunger, update.value);
    }

    fn mode(&self) -> Mode {
        self.mind.mode
    }
}

/// Fixed-priority reflex chain, useful as a control population and as a
/// baseline in behavioral comparisons. First matching rule wins.
pub struct ReactiveDecider {
    mind: AgentMind,
    cfg: CoreConfig,
}

impl ReactiveDecider {
    #[must_use]
    pub fn new(position: Position, cfg: CoreConfig) -> Self {
        Self {
            mind: AgentMind::new(position, &cfg),
            cfg,
        }
    }

    fn reflex(observation: &myrmica_data::Observation) -> MacroAction {
        let cargo = observation.get(Channel::Cargo);
        let food = observation.get(Channel::Food);
        let trail = observation.get(Channel::TrailGrad);
        let on_home = observation.get(Channel::OnHome);

        if cargo > 0.6 {
            MacroAction::Return
        } else if on_home >= 0.9 && cargo > 0.05 {
            MacroAction::Return
        } else if food >= 0.1 && on_home < 0.9 {
            MacroAction::Forage
        } else if trail >= 0.3 {
            MacroAction::Pheromone
        } else {
            MacroAction::Hold
        }
    }
}

impl Decider for ReactiveDecider {
    fn decide(&mut self, world: &WorldSnapshot, agent: &AgentSnapshot) -> Decision {
        // Run the shared pipeline for its belief bookkeeping and diagnostics,
        // then override the selection with the reflex chain.
        let mut decision = pipeline::decide(world, agent, &mut self.mind, &self.cfg);
        let reflex = Self::reflex(&decision.observation);
        decision.action = reflex;
        decision.policy.action = reflex;
        decision
    }

    fn mode(&self) -> Mode {
        self.mind.mode
    }
}
