//! Mode-dependent action ordering and the layered admissibility guards.
//!
//! Guards only ever remove actions; if they remove everything, selection
//! falls back to the head of the unfiltered base ordering. The recurring
//! cargo/home thresholds here are configured independently on purpose: each
//! guard means something slightly different by "empty" or "near".

use crate::config::GuardConfig;
use myrmica_data::{Channel, MacroAction, Mode, Observation};

/// Preference-ordered candidate actions per mode, before any guard runs.
#[must_use]
pub fn base_order(mode: Mode) -> [MacroAction; 4] {
    match mode {
        Mode::Outbound => [
            MacroAction::Forage,
            MacroAction::Pheromone,
            MacroAction::Return,
            MacroAction::Hold,
        ],
        Mode::Homebound => [
            MacroAction::Return,
            MacroAction::Hold,
            MacroAction::Pheromone,
            MacroAction::Forage,
        ],
        Mode::Maintain => [
            MacroAction::Pheromone,
            MacroAction::Hold,
            MacroAction::Forage,
            MacroAction::Return,
        ],
    }
}

/// Applies the guard stack and returns the admissible actions in base order.
/// Never returns an empty set.
#[must_use]
pub fn admissible_actions(
    observation: &Observation,
    mode: Mode,
    cfg: &GuardConfig,
) -> Vec<MacroAction> {
    let base = base_order(mode);
    let mut actions: Vec<MacroAction> = base.to_vec();

    let cargo = observation.get(Channel::Cargo);
    let on_home = observation.get(Channel::OnHome);
    let home_prox = observation.get(Channel::HomeProx);
    let food = observation.get(Channel::Food);
    let trail = observation.get(Channel::TrailGrad);
    let reserve = observation.get(Channel::Reserve);

    // Heavy load: narrow to hauling options when any survive.
    if cargo > cfg.cargo_heavy {
        let narrowed: Vec<MacroAction> = actions
            .iter()
            .copied()
            .filter(|a| matches!(a, MacroAction::Return | MacroAction::Hold))
            .collect();
        if !narrowed.is_empty() {
            actions = narrowed;
        }
    }

    // Standing squarely on the own home: no foraging or trail-laying there.
    if on_home >= cfg.on_home_min {
        actions.retain(|a| !matches!(a, MacroAction::Forage | MacroAction::Pheromone));
    }

    // Near a starving home with nothing to find locally: foraging here wastes
    // the tick.
    if home_prox >= cfg.near_home
        && reserve < cfg.reserve_low
        && food < cfg.food_negligible
        && trail < cfg.trail_weak
    {
        actions.retain(|a| *a != MacroAction::Forage);
    }

    // Empty-handed, away from home, food present: pick it up before heading
    // back.
    if cargo < cfg.cargo_empty && home_prox < cfg.home_far && food >= cfg.food_present {
        actions.retain(|a| *a != MacroAction::Return);
    }

    if actions.is_empty() {
        actions.push(base[0]);
    }
    actions
}
