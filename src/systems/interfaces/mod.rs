//! Cohesive interfaces between neighbouring blocks
//!
//! `InterfaceManager` discovers faces from the grid, `InterfaceSet` turns
//! block kinematics into face forces, and `TractionLaw` is the constitutive
//! model shared by every face of one material pair.

mod interface_set;
mod manager;
mod traction;

pub use interface_set::{Face, InterfaceSet};
pub use manager::{InterfaceManager, LawSelector, MaterialPair};
pub use traction::{
    Axis, Brittle, CohesiveDamage, CohesiveDefaults, DamageHistory, KelvinVoigt, QuadratureBatch, TractionLaw,
    TractionModel,
};
