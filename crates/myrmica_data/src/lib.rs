//! Plain data types shared by the myrmica simulation crates.
//!
//! This crate carries no behavior beyond small constructors and accessors:
//! the decision logic lives in `myrmica_core`, the world harness in the root
//! package. Everything here is serde-serializable so snapshots and telemetry
//! can be dumped as JSON.

pub mod data;

pub use data::agent::{AgentId, AgentSnapshot, Belief, ColonyId, Mode, Precision};
pub use data::sensing::{Channel, Observation, SensoryVector};
pub use data::world::{Cell, MacroAction, Position, WorldSnapshot};
