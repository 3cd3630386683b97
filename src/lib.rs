//! CZM Engine - cohesive-zone block physics in WASM
//!
//! Square rigid blocks carved from a material grid, bonded to their
//! neighbours by cohesive interfaces that soften and break, shaken by a
//! prescribed ground motion and poked by a player body.
//!
//! Architecture:
//! - core/        - math primitives and the error type
//! - domain/      - materials, grid partition, ground motion
//! - systems/     - block state and force kernels, cohesive interfaces
//! - simulation/  - orchestration, settings, perf, render extraction, JS facade

pub mod core;
pub mod domain;
pub mod systems;
pub mod simulation;

use wasm_bindgen::prelude::*;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    #[cfg(target_arch = "wasm32")]
    {
        // a second init keeps the first logger
        let _ = console_log::init_with_level(log::Level::Info);
        web_sys::console::log_1(&"🧱 CZM WASM Engine initialized!".into());
    }

    log::info!("czm-engine {} initialized", version());
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Name of the reserved player material
#[wasm_bindgen]
pub fn player_material_name() -> String {
    domain::PLAYER_MATERIAL.to_string()
}

// Re-export main types
pub use crate::core::{EngineError, Vec2};
pub use domain::{Grid, GroundMotion, Material, MaterialId, MaterialRegistry};
pub use simulation::{PerfStats, Simulation, SimulationCore, SimulationSettings};
pub use systems::bodies::{BodyState, Fixity};
pub use systems::interfaces::{InterfaceManager, MaterialPair, TractionLaw};
