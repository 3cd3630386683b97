//! Simulation systems: rigid block state and the cohesive interfaces between blocks

pub mod bodies;
pub mod interfaces;
