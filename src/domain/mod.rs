//! Domain - materials, the editable grid partition and ground motion
//!
//! These are the collaborators the simulation core consumes; the core
//! never mutates them during a run.

pub mod grid;
pub mod ground_motion;
pub mod materials;

pub use grid::{BlockMap, Grid};
pub use ground_motion::GroundMotion;
pub use materials::{Material, MaterialId, MaterialRegistry, PLAYER_MATERIAL};
