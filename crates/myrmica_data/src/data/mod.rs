//! Core data structures for the myrmica simulation.

pub mod agent;
pub mod sensing;
pub mod world;
