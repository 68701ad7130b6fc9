//! # Myrmica Core
//!
//! The decision core for Myrmica - an active-inference colony foraging
//! simulation.
//!
//! This crate contains the deterministic per-agent decision logic,
//! including:
//! - Observation normalization from world snapshots
//! - Affect regulation (hunger drive, precision, temperature)
//! - Bounded predictive-coding perception
//! - Expected-free-energy policy evaluation and action selection
//! - Metrics collection and structured logging
//!
//! ## Architecture
//!
//! Each agent-tick runs a fixed pipeline over an immutable world snapshot:
//! - **Observe**: normalize raw world state into unit-interval channels
//! - **Perceive**: reconcile predictions with evidence in bounded steps
//! - **Regulate**: update hunger, temperature, and behavioral mode
//! - **Select**: score admissible actions by expected free energy
//!
//! The core is free of randomness and interior mutability: identical inputs
//! always yield identical decisions.
//!
//! ## Example
//!
//! ```
//! use myrmica_core::config::CoreConfig;
//! use myrmica_core::pipeline::AgentMind;
//! use myrmica_data::{AgentSnapshot, Cell, ColonyId, Position, WorldSnapshot};
//! use std::collections::HashMap;
//!
//! let world = WorldSnapshot {
//!     width: 8,
//!     height: 8,
//!     cells: vec![Cell::default(); 64],
//!     max_food: 10.0,
//!     max_pheromone: 1.0,
//!     homes: HashMap::new(),
//!     reserves: HashMap::new(),
//!     queen_initial_reserve: 100.0,
//! };
//! let agent = AgentSnapshot::new(ColonyId(0), Position::new(4, 4), None);
//! let cfg = CoreConfig::default();
//! let mut mind = AgentMind::new(agent.pos, &cfg);
//!
//! let decision = myrmica_core::pipeline::decide(&world, &agent, &mut mind, &cfg);
//! assert!(decision.tau > 0.0);
//! ```

/// Affect regulation (hunger drive, tau, precision modulation, mode machine)
pub mod affect;
/// Configuration management for decision parameters
pub mod config;
/// Pluggable decision backends (active inference, reflex baseline)
pub mod decider;
/// Performance metrics collection and logging
pub mod metrics;
/// Observation normalization from world snapshots
pub mod observation;
/// Bounded predictive-coding perception engine
pub mod perception;
/// The per-agent observe-perceive-regulate-select pipeline
pub mod pipeline;
/// Expected-free-energy policy evaluation and action selection
pub mod policy;

pub use config::CoreConfig;
pub use decider::{ActionFeedback, ActiveInferenceDecider, Decider, ReactiveDecider};
pub use metrics::{init_logging, Metrics};
pub use pipeline::{decide, AgentMind, Decision};
pub use policy::{choose_action, PolicyDecision};
