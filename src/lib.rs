//! Myrmica simulation harness: a mutable grid world, an action executor, and
//! a deterministic driver over the decision core in `myrmica_core`.

pub mod config;
pub mod sim;
pub mod world;

pub use config::AppConfig;
pub use sim::{SimSummary, Simulation};
pub use world::{World, WorldConfig, WorldError};
