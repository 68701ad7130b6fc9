//! Configuration for the decision core.
//!
//! All tuning constants live in strongly-typed nested structs that map to
//! `config.toml`. Resolution is layered: hardcoded defaults, then an optional
//! world-level override, then an optional per-agent override, deep-merged
//! into a new immutable config (`CoreConfig::resolve`).
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [preferences]
//! hunger_mean = 0.2
//! ingest_mean = 0.6
//!
//! [lambdas]
//! info = 0.8
//!
//! [perception]
//! max_steps = 5
//! ```

use serde::{Deserialize, Serialize};

/// Gaussian preference targets for the pragmatic (risk) term.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PreferenceConfig {
    pub hunger_mean: f64,
    pub hunger_sd: f64,
    pub ingest_mean: f64,
    pub ingest_sd: f64,
}

impl Default for PreferenceConfig {
    fn default() -> Self {
        Self {
            hunger_mean: 0.20,
            hunger_sd: 0.20,
            ingest_mean: 0.60,
            ingest_sd: 0.25,
        }
    }
}

/// Weights of the expected-free-energy terms.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LambdaConfig {
    pub pragmatic: f64,
    pub ambiguity: f64,
    pub info: f64,
    pub colony: f64,
    pub survival: f64,
    /// Weight of the secondary mode-posterior logit tilt.
    pub mode_tilt: f64,
}

impl Default for LambdaConfig {
    fn default() -> Self {
        Self {
            pragmatic: 1.0,
            ambiguity: 0.6,
            info: 0.8,
            colony: 1.0,
            survival: 1.0,
            mode_tilt: 0.6,
        }
    }
}

/// Hand-tuned per-action prior costs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ActionCostConfig {
    pub hold_base: f64,
    pub pheromone_base: f64,
    /// Pheromone cost scaling with hunger.
    pub pheromone_hunger: f64,
    /// Pheromone cost scaling with absence of ingestion.
    pub pheromone_no_ingest: f64,
    /// Pheromone cost when standing on the friendly home.
    pub pheromone_on_home: f64,
    pub forage_base: f64,
    /// Forage cost when standing on the friendly home.
    pub forage_on_home: f64,
    /// Penalty for arriving home with nothing to deposit.
    pub return_empty_home: f64,
    /// Penalty per unit distance for heading home empty.
    pub return_far_empty: f64,
    /// Cargo below this counts as empty for the return penalties.
    pub return_empty_cargo: f64,
    /// Friendly-home level above which an empty return counts as arrived.
    pub return_home_prox: f64,
    /// Hunger-gap term weight, scaled by colony reserve.
    pub return_hunger_gap: f64,
}

impl Default for ActionCostConfig {
    fn default() -> Self {
        Self {
            hold_base: 0.05,
            pheromone_base: 0.10,
            pheromone_hunger: 0.50,
            pheromone_no_ingest: 0.30,
            pheromone_on_home: 0.40,
            forage_base: 0.05,
            forage_on_home: 0.60,
            return_empty_home: 0.80,
            return_far_empty: 0.50,
            return_empty_cargo: 0.10,
            return_home_prox: 0.80,
            return_hunger_gap: 0.40,
        }
    }
}

/// Colony-level cost: penalize actions while the reserve runs a deficit.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ColonyCostConfig {
    pub reserve_threshold: f64,
    pub penalty_weight: f64,
    /// Deficit penalty multiplier for the return action (relieving the
    /// colony is rewarded with a smaller share of the penalty).
    pub return_factor: f64,
}

impl Default for ColonyCostConfig {
    fn default() -> Self {
        Self {
            reserve_threshold: 0.50,
            penalty_weight: 1.2,
            return_factor: 0.35,
        }
    }
}

/// Survival cost: hunger overshoot, distance from home, ingest deficit.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SurvivalCostConfig {
    pub hunger_thresh: f64,
    pub ingest_floor: f64,
    pub hunger_weight: f64,
    pub dist_weight: f64,
    pub ingest_weight: f64,
    /// Multiplier applied to the survival cost of the return action.
    pub return_reduction: f64,
    /// Divisor normalizing survival pressure for the tau coupling.
    pub pressure_norm: f64,
}

impl Default for SurvivalCostConfig {
    fn default() -> Self {
        Self {
            hunger_thresh: 0.55,
            ingest_floor: 0.30,
            hunger_weight: 1.0,
            dist_weight: 0.4,
            ingest_weight: 0.6,
            return_reduction: 0.5,
            pressure_norm: 1.5,
        }
    }
}

/// Per-channel precision bounds and the tau coupling gains.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PrecisionConfig {
    pub floor: f64,
    pub cap: f64,
    pub tau_floor: f64,
    pub tau_cap: f64,
    /// How strongly hunger raises food-channel precision.
    pub food_gain: f64,
    /// How strongly hunger raises hunger-channel precision.
    pub hunger_gain: f64,
    /// Reserve-delta gain of the policy tau coupling.
    pub reserve_gain: f64,
    /// Survival-pressure gain of the policy tau coupling.
    pub survival_gain: f64,
}

impl Default for PrecisionConfig {
    fn default() -> Self {
        Self {
            floor: 0.2,
            cap: 4.0,
            tau_floor: 0.25,
            tau_cap: 2.6,
            food_gain: 1.0,
            hunger_gain: 0.5,
            reserve_gain: 0.6,
            survival_gain: 0.5,
        }
    }
}

/// Hunger drive dynamics and the hunger-to-tau map.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AffectConfig {
    /// Per-tick metabolic burn added to hunger.
    pub burn: f64,
    /// Hunger relief per unit of local food.
    pub feed: f64,
    /// Hunger relief per unit of home proximity.
    pub rest: f64,
    /// Hunger pressure per unit of cargo.
    pub load_pressure: f64,
    pub ingest_relief: f64,
    pub deposit_relief: f64,
    pub metabolic_rate: f64,
    pub metabolic_gain: f64,
    pub risk_gain: f64,
    pub tau_min: f64,
    pub tau_max: f64,
    /// Hunger threshold of the need-error term.
    pub hunger_thresh: f64,
    /// Ingest threshold of the need-error term.
    pub ingest_thresh: f64,
    pub need_gain: f64,
    pub dhdt_gain: f64,
    /// Extra tau reduction per unit hunger overshoot while hauling.
    pub clamp_gain: f64,
    /// Cargo above this enables the extra reduction.
    pub clamp_cargo: f64,
}

impl Default for AffectConfig {
    fn default() -> Self {
        Self {
            burn: 0.02,
            feed: 0.05,
            rest: 0.03,
            load_pressure: 0.25,
            ingest_relief: 0.60,
            deposit_relief: 0.05,
            metabolic_rate: 0.010,
            metabolic_gain: 0.015,
            risk_gain: 0.020,
            tau_min: 0.35,
            tau_max: 2.6,
            hunger_thresh: 0.45,
            ingest_thresh: 0.60,
            need_gain: -0.25,
            dhdt_gain: -0.50,
            clamp_gain: 0.50,
            clamp_cargo: 0.25,
        }
    }
}

/// Thresholds of the outbound/homebound/maintain hysteresis machine.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ModeConfig {
    pub cargo_high: f64,
    pub cargo_low: f64,
    pub home_high: f64,
    pub home_low: f64,
    pub reserve_low: f64,
    pub trail_min: f64,
    pub food_eps: f64,
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            cargo_high: 0.60,
            cargo_low: 0.10,
            home_high: 0.80,
            home_low: 0.50,
            reserve_low: 0.20,
            trail_min: 0.20,
            food_eps: 0.02,
        }
    }
}

/// Predictive-coding iteration count and learning rates.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PerceptionConfig {
    pub max_steps: usize,
    /// Sensory prediction learning rate.
    pub alpha: f64,
    /// Hunger-belief learning rate.
    pub beta: f64,
    /// Goal blending rate per iteration.
    pub goal_rate: f64,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            max_steps: 5,
            alpha: 0.55,
            beta: 0.30,
            goal_rate: 0.35,
        }
    }
}

/// Thresholds of the admissibility guards. Deliberately independent fields:
/// the recurring cargo/home cutoffs mean different things in different guards
/// and are tuned separately.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GuardConfig {
    pub cargo_heavy: f64,
    pub on_home_min: f64,
    pub near_home: f64,
    pub reserve_low: f64,
    pub food_negligible: f64,
    pub trail_weak: f64,
    pub cargo_empty: f64,
    pub home_far: f64,
    pub food_present: f64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            cargo_heavy: 0.60,
            on_home_min: 0.90,
            near_home: 0.50,
            reserve_low: 0.20,
            food_negligible: 0.02,
            trail_weak: 0.20,
            cargo_empty: 0.05,
            home_far: 0.70,
            food_present: 0.10,
        }
    }
}

/// Contextual tau caps applied after the colony/survival coupling.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TauCapConfig {
    pub hungry_above: f64,
    pub hungry_cap: f64,
    pub loaded_home_high: f64,
    pub loaded_cargo_high: f64,
    pub loaded_cap_high: f64,
    pub loaded_home_low: f64,
    pub loaded_cargo_low: f64,
    pub loaded_cap_low: f64,
    pub idle_home: f64,
    pub idle_cargo: f64,
    pub idle_food: f64,
    pub idle_trail: f64,
    /// Target tau for the idle-at-home exploration raise.
    pub idle_raise: f64,
}

impl Default for TauCapConfig {
    fn default() -> Self {
        Self {
            hungry_above: 0.80,
            hungry_cap: 0.80,
            loaded_home_high: 0.95,
            loaded_cargo_high: 0.25,
            loaded_cap_high: 0.60,
            loaded_home_low: 0.80,
            loaded_cargo_low: 0.10,
            loaded_cap_low: 0.75,
            idle_home: 0.90,
            idle_cargo: 0.10,
            idle_food: 0.02,
            idle_trail: 0.20,
            idle_raise: 1.15,
        }
    }
}

/// Full configuration of the decision core.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CoreConfig {
    pub preferences: PreferenceConfig,
    pub lambdas: LambdaConfig,
    pub action_cost: ActionCostConfig,
    pub colony: ColonyCostConfig,
    pub survival: SurvivalCostConfig,
    pub precision: PrecisionConfig,
    pub affect: AffectConfig,
    pub modes: ModeConfig,
    pub perception: PerceptionConfig,
    pub guards: GuardConfig,
    pub tau_caps: TauCapConfig,
    /// Window length of the hunger-trend smoother.
    pub trend_window: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            preferences: PreferenceConfig::default(),
            lambdas: LambdaConfig::default(),
            action_cost: ActionCostConfig::default(),
            colony: ColonyCostConfig::default(),
            survival: SurvivalCostConfig::default(),
            precision: PrecisionConfig::default(),
            affect: AffectConfig::default(),
            modes: ModeConfig::default(),
            perception: PerceptionConfig::default(),
            guards: GuardConfig::default(),
            tau_caps: TauCapConfig::default(),
            trend_window: 8,
        }
    }
}

impl CoreConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a
    /// description of the first failure. The core itself never validates at
    /// decision time; callers validate once at the load boundary.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.preferences.hunger_sd > 0.0,
            "Hunger preference sd must be positive"
        );
        anyhow::ensure!(
            self.preferences.ingest_sd > 0.0,
            "Ingest preference sd must be positive"
        );

        anyhow::ensure!(self.lambdas.pragmatic >= 0.0, "Pragmatic lambda must be non-negative");
        anyhow::ensure!(self.lambdas.ambiguity >= 0.0, "Ambiguity lambda must be non-negative");
        anyhow::ensure!(self.lambdas.info >= 0.0, "Info lambda must be non-negative");
        anyhow::ensure!(self.lambdas.colony >= 0.0, "Colony lambda must be non-negative");
        anyhow::ensure!(self.lambdas.survival >= 0.0, "Survival lambda must be non-negative");

        anyhow::ensure!(self.precision.floor > 0.0, "Precision floor must be positive");
        anyhow::ensure!(
            self.precision.cap >= self.precision.floor,
            "Precision cap must be at least the floor"
        );
        anyhow::ensure!(self.precision.tau_floor > 0.0, "Tau floor must be positive");
        anyhow::ensure!(
            self.precision.tau_cap >= self.precision.tau_floor,
            "Tau cap must be at least the floor"
        );

        anyhow::ensure!(
            self.affect.tau_max >= self.affect.tau_min,
            "Affect tau_max must be at least tau_min"
        );

        anyhow::ensure!(self.perception.max_steps >= 1, "Perception needs at least one step");
        anyhow::ensure!(
            self.perception.alpha >= 0.0 && self.perception.alpha <= 1.0,
            "Perception alpha must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.perception.beta >= 0.0 && self.perception.beta <= 1.0,
            "Perception beta must be in [0.0, 1.0]"
        );

        anyhow::ensure!(
            self.modes.cargo_high > self.modes.cargo_low,
            "Mode cargo_high must exceed cargo_low"
        );
        anyhow::ensure!(
            self.modes.home_high > self.modes.home_low,
            "Mode home_high must exceed home_low"
        );

        anyhow::ensure!(self.trend_window >= 1, "Trend window must be at least 1");

        Ok(())
    }

    /// Loads and validates configuration from TOML text. Missing keys fall
    /// back to defaults.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolves a config from defaults, a world-level override, and a
    /// per-agent override, deep-merged in that order. Produces a new
    /// immutable config; the inputs are untouched.
    pub fn resolve(
        world_override: Option<&toml::Value>,
        agent_override: Option<&toml::Value>,
    ) -> anyhow::Result<Self> {
        let mut base = toml::Value::try_from(Self::default())?;
        if let Some(over) = world_override {
            deep_merge(&mut base, over);
        }
        if let Some(over) = agent_override {
            deep_merge(&mut base, over);
        }
        let config: Self = base.try_into()?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.preferences).as_bytes());
        hasher.update(format!("{:?}", self.lambdas).as_bytes());
        hasher.update(format!("{:?}", self.action_cost).as_bytes());
        hasher.update(format!("{:?}", self.colony).as_bytes());
        hasher.update(format!("{:?}", self.survival).as_bytes());
        hasher.update(format!("{:?}", self.precision).as_bytes());
        hasher.update(format!("{:?}", self.affect).as_bytes());
        hasher.update(format!("{:?}", self.modes).as_bytes());
        hasher.update(format!("{:?}", self.perception).as_bytes());
        hasher.update(format!("{:?}", self.guards).as_bytes());
        hasher.update(format!("{:?}", self.tau_caps).as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Recursive structural merge of TOML trees: tables merge key-wise, every
/// other value in `over` replaces the one in `base`.
pub fn deep_merge(base: &mut toml::Value, over: &toml::Value) {
    match (base, over) {
        (toml::Value::Table(base_table), toml::Value::Table(over_table)) => {
            for (key, value) in over_table {
                match base_table.get_mut(key) {
                    Some(slot) => deep_merge(slot, value),
                    None => {
                        base_table.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (slot, value) => *slot = value.clone(),
    }
}
