use serde::{Deserialize, Serialize};

/// The fixed set of sensory channels an agent perceives.
///
/// Every channel value is normalized to [0, 1]. The perception engine keeps a
/// predicted value and a precision weight per channel; the policy evaluator
/// predicts a next value per channel for each candidate action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Food density at the agent's cell.
    Food,
    /// Pheromone density at the agent's cell.
    Pher,
    /// Mean food over the in-bounds 8-neighborhood.
    FoodTrace,
    /// Mean pheromone over the in-bounds 8-neighborhood.
    PherTrace,
    /// Proximity to the agent's own home (1 = standing on it).
    HomeProx,
    /// Proximity to the nearest rival home.
    EnemyProx,
    /// Felt hunger drive.
    Hunger,
    /// Recent ingestion rate.
    Ingest,
    /// Standing-on-own-home indicator.
    OnHome,
    /// Local pheromone gradient strength.
    TrailGrad,
    /// Inverse visit frequency of the current cell.
    Novelty,
    /// Normalized distance to own home.
    DistHome,
    /// Colony reserve level relative to the queen's initial store.
    Reserve,
    /// Rolling recent-gather proxy.
    Gather,
    /// Cargo load fraction.
    Cargo,
}

impl Channel {
    pub const COUNT: usize = 15;

    pub const ALL: [Channel; Channel::COUNT] = [
        Channel::Food,
        Channel::Pher,
        Channel::FoodTrace,
        Channel::PherTrace,
        Channel::HomeProx,
        Channel::EnemyProx,
        Channel::Hunger,
        Channel::Ingest,
        Channel::OnHome,
        Channel::TrailGrad,
        Channel::Novelty,
        Channel::DistHome,
        Channel::Reserve,
        Channel::Gather,
        Channel::Cargo,
    ];

    #[must_use]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Neutral default when a source field is missing: additive quantities
    /// default to 0, belief-like priors to 0.5.
    #[must_use]
    pub fn neutral(&self) -> f64 {
        match self {
            Channel::Hunger => 0.5,
            _ => 0.0,
        }
    }
}

/// One value per sensory channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensoryVector(pub [f64; Channel::COUNT]);

impl SensoryVector {
    #[must_use]
    pub fn splat(value: f64) -> Self {
        Self([value; Channel::COUNT])
    }

    /// Channel-neutral defaults (0.5 for hunger, 0 elsewhere).
    #[must_use]
    pub fn neutral() -> Self {
        let mut v = Self::splat(0.0);
        for ch in Channel::ALL {
            v.set(ch, ch.neutral());
        }
        v
    }

    #[must_use]
    pub fn get(&self, ch: Channel) -> f64 {
        self.0[ch.index()]
    }

    pub fn set(&mut self, ch: Channel, value: f64) {
        self.0[ch.index()] = value;
    }
}

impl Default for SensoryVector {
    fn default() -> Self {
        Self::neutral()
    }
}

/// An agent's normalized local sensing at one instant.
///
/// Produced fresh every tick by the observation normalizer; immutable once
/// produced. Invariant: every channel value lies in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub channels: SensoryVector,
    /// Low-signal patch indicator: negligible food, weak trail, empty
    /// neighborhood. 1.0 or 0.0.
    pub white_space: f64,
}

impl Observation {
    #[must_use]
    pub fn get(&self, ch: Channel) -> f64 {
        self.channels.get(ch)
    }

    pub fn set(&mut self, ch: Channel, value: f64) {
        self.channels.set(ch, value);
    }

    #[must_use]
    pub fn is_white_space(&self) -> bool {
        self.white_space >= 0.5
    }
}

impl Default for Observation {
    fn default() -> Self {
        Self {
            channels: SensoryVector::neutral(),
            white_space: 0.0,
        }
    }
}
