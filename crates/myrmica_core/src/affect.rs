//! Affect regulator: the hunger drive and everything derived from it.
//!
//! Hunger rises with metabolic burn and cargo pressure and falls with feeding
//! and rest at home. From hunger and context this module derives the softmax
//! temperature ("tau") and the per-channel sensory precision weights the
//! perception engine anneals toward. All updates clamp; nothing here can
//! fail.

use crate::config::{AffectConfig, CoreConfig, ModeConfig};
use myrmica_data::{Channel, Mode, Observation, Precision, SensoryVector};

#[inline]
fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Per-tick hunger dynamics: burn plus load pressure minus feeding and rest.
#[must_use]
pub fn tick_hunger(
    current: f64,
    food: f64,
    home_prox: f64,
    cargo: f64,
    cfg: &AffectConfig,
) -> f64 {
    clamp01(
        current + cfg.burn + cfg.load_pressure * cargo - cfg.feed * food - cfg.rest * home_prox,
    )
}

/// Result of an event-driven hunger update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HungerUpdate {
    pub value: f64,
    /// Signed change, `value - previous`.
    pub delta: f64,
}

/// Event-driven hunger update: ingestion and depositing relieve hunger,
/// metabolism and risk exposure raise it.
#[must_use]
pub fn update_hunger(
    hunger: f64,
    ingest: f64,
    deposit: f64,
    risk: f64,
    cfg: &AffectConfig,
) -> HungerUpdate {
    let value = clamp01(
        hunger - cfg.ingest_relief * ingest - cfg.deposit_relief * deposit
            + cfg.metabolic_gain * cfg.metabolic_rate.max(1e-6)
            + cfg.risk_gain * risk,
    );
    HungerUpdate {
        value,
        delta: value - hunger,
    }
}

/// Linear inverse map from hunger to temperature: hungrier agents get a
/// lower tau and therefore sharper, more exploitative action selection.
#[must_use]
pub fn hunger_to_tau(hunger: f64, cfg: &AffectConfig) -> f64 {
    cfg.tau_min + (cfg.tau_max - cfg.tau_min) * (1.0 - clamp01(hunger))
}

/// Derives the precision target and tau for the current hunger and context.
///
/// Food and hunger channels sharpen with hunger; trail channels dull with it;
/// the proximity channels sharpen with home-proximity context. Weights are
/// bounded by the configured floor/cap.
#[must_use]
pub fn modulate_precisions(hunger: f64, observation: &Observation, cfg: &CoreConfig) -> Precision {
    let h = clamp01(hunger);
    let home_prox = observation.get(Channel::HomeProx);
    let mut weights = SensoryVector::splat(1.0);
    for ch in Channel::ALL {
        let scale = match ch {
            Channel::Food | Channel::FoodTrace => 1.0 + cfg.precision.food_gain * h,
            Channel::Hunger => 1.0 + cfg.precision.hunger_gain * h,
            Channel::Pher | Channel::PherTrace | Channel::TrailGrad => 0.5 + 0.5 * (1.0 - h),
            Channel::HomeProx => 0.5 + home_prox,
            Channel::EnemyProx => 0.5 + 0.5 * home_prox,
            _ => 1.0,
        };
        weights.set(ch, scale.clamp(cfg.precision.floor, cfg.precision.cap));
    }
    let tau = (hunger_to_tau(h, &cfg.affect) * (1.0 + 0.5 * home_prox) / 1.5)
        .clamp(cfg.precision.tau_floor, cfg.precision.tau_cap);
    Precision { weights, tau }
}

/// Linear tau annealing schedule for the perception iterations: starts hot at
/// `max(0.2, 1.5 * target)` and lands on the target at the final step.
#[must_use]
pub fn anneal_tau(target: f64, step: usize, max_steps: usize) -> f64 {
    let start = (1.5 * target).max(0.2);
    let span = max_steps.saturating_sub(1).max(1) as f64;
    let frac = (step as f64 / span).min(1.0);
    (start + (target - start) * frac).clamp(0.2, 4.0)
}

/// Unmet-need error: hunger above threshold plus ingestion below threshold.
#[must_use]
pub fn need_error(hunger: f64, ingest: f64, cfg: &AffectConfig) -> f64 {
    (hunger - cfg.hunger_thresh).max(0.0) + (cfg.ingest_thresh - ingest).max(0.0)
}

/// Drive signals feeding the per-tick tau update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TauDrive {
    pub hunger: f64,
    pub ingest: f64,
    pub cargo: f64,
    /// Smoothed hunger trend; only a rising trend lowers tau.
    pub dhdt: f64,
    pub reserve: f64,
}

/// Stepped adjustment from the colony reserve level: deficits cool the
/// temperature, surpluses warm it.
fn reserve_term(reserve: f64) -> f64 {
    if reserve < 0.2 {
        -0.30
    } else if reserve < 0.35 {
        -0.20
    } else if reserve < 0.5 {
        -0.10
    } else if reserve > 0.75 {
        0.20
    } else if reserve > 0.6 {
        0.10
    } else {
        0.0
    }
}

/// Per-tick tau update from need error, hunger trend, reserve level, and the
/// hauling-while-hungry clamp. Always lands inside [floor, cap].
#[must_use]
pub fn update_tau(tau: f64, drive: TauDrive, cfg: &CoreConfig) -> f64 {
    let need = need_error(drive.hunger, drive.ingest, &cfg.affect);
    let clamp_delta = if drive.hunger > cfg.affect.hunger_thresh
        && drive.ingest < cfg.affect.ingest_thresh
        && drive.cargo > cfg.affect.clamp_cargo
    {
        -cfg.affect.clamp_gain * (drive.hunger - cfg.affect.hunger_thresh)
    } else {
        0.0
    };
    (tau + cfg.affect.need_gain * need
        + cfg.affect.dhdt_gain * drive.dhdt.max(0.0)
        + reserve_term(drive.reserve)
        + clamp_delta)
        .clamp(cfg.precision.tau_floor, cfg.precision.tau_cap)
}

/// Low local signal: negligible food or a weak trail.
fn low_signal(observation: &Observation, cfg: &ModeConfig) -> bool {
    observation.get(Channel::Food) < cfg.food_eps
        || observation.get(Channel::TrailGrad) < cfg.trail_min
}

/// Three-state behavioral mode machine with hysteresis.
///
/// Entering a near-home state requires the high proximity threshold; leaving
/// uses the low one, so agents do not flap at the boundary.
#[must_use]
pub fn next_mode(current: Mode, observation: &Observation, cfg: &ModeConfig) -> Mode {
    let cargo = observation.get(Channel::Cargo);
    let home_prox = observation.get(Channel::HomeProx);
    let reserve = observation.get(Channel::Reserve);
    let on_home = observation.get(Channel::OnHome);

    match current {
        Mode::Outbound => {
            if cargo >= cfg.cargo_high {
                Mode::Homebound
            } else if home_prox >= cfg.home_high
                && low_signal(observation, cfg)
                && reserve <= cfg.reserve_low
            {
                Mode::Maintain
            } else {
                Mode::Outbound
            }
        }
        Mode::Homebound => {
            if cargo <= cfg.cargo_low {
                let idle_at_home = home_prox >= cfg.home_high
                    && low_signal(observation, cfg)
                    && reserve <= cfg.reserve_low;
                if idle_at_home {
                    Mode::Maintain
                } else {
                    Mode::Outbound
                }
            } else {
                Mode::Homebound
            }
        }
        Mode::Maintain => {
            if cargo >= cfg.cargo_high {
                Mode::Homebound
            } else if home_prox < cfg.home_low && on_home < 0.5 {
                Mode::Outbound
            } else {
                Mode::Maintain
            }
        }
    }
}
