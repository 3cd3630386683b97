use serde::{Deserialize, Serialize};

use crate::core::{EngineError, Vec2};
use crate::systems::interfaces::CohesiveDefaults;

use super::perf_stats::PerfStats;
use super::SimulationCore;

/// Run-wide physical and numerical parameters.
///
/// Every field has a default, so a settings document only needs to list
/// what it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Body acceleration [m/s^2]
    pub gravity: Vec2,
    pub drag_coefficient: f32,
    /// Substeps per `advance` call
    pub substeps: u32,
    /// Player contact penalty stiffness [N/m]
    pub contact_stiffness: f32,
    /// Player half-width as a fraction of the block length
    pub player_half_extent: f32,
    /// Block edge length [m]
    pub block_length: f32,
    /// Law used for every material pair unless a selector is installed
    pub cohesive: CohesiveDefaults,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.8e-2),
            drag_coefficient: 0.0,
            substeps: 500,
            contact_stiffness: 1.0e4,
            player_half_extent: 0.51,
            block_length: 1.0,
            cohesive: CohesiveDefaults::default(),
        }
    }
}

impl SimulationSettings {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let invalid = |reason: &str| Err(EngineError::InvalidConfiguration { reason: reason.to_string() });
        if self.substeps == 0 {
            return invalid("substeps must be at least 1");
        }
        if !(self.block_length > 0.0) {
            return invalid("block_length must be positive");
        }
        if !(self.player_half_extent > 0.0) {
            return invalid("player_half_extent must be positive");
        }
        if !(self.cohesive.stiffness > 0.0) {
            return invalid("cohesive stiffness must be positive");
        }
        if !(self.cohesive.failure_strain > 0.0) {
            return invalid("cohesive failure_strain must be positive");
        }
        if self.contact_stiffness < 0.0 || self.drag_coefficient < 0.0 || self.cohesive.viscosity < 0.0 {
            return invalid("stiffness, drag and viscosity must be non-negative");
        }
        Ok(())
    }
}

pub(super) fn enable_perf_metrics(sim: &mut SimulationCore, enabled: bool) {
    sim.perf_enabled = enabled;
    if !enabled {
        sim.perf_stats.reset();
    }
}

pub(super) fn get_perf_stats(sim: &SimulationCore) -> PerfStats {
    sim.perf_stats.clone()
}

pub(super) fn set_gravity(sim: &mut SimulationCore, x: f32, y: f32) {
    sim.settings.gravity = Vec2::new(x, y);
}

pub(super) fn set_drag(sim: &mut SimulationCore, coefficient: f32) {
    sim.settings.drag_coefficient = coefficient.max(0.0);
}

pub(super) fn set_substeps(sim: &mut SimulationCore, substeps: u32) {
    sim.settings.substeps = substeps.max(1);
}

/// Replace all settings. Geometry and law parameters take effect at the
/// next `start()`; gravity, drag and substeps apply immediately.
pub(super) fn apply_settings(sim: &mut SimulationCore, settings: SimulationSettings) -> Result<(), EngineError> {
    settings.validate()?;
    log::debug!("settings updated: {}", settings.to_json());
    sim.settings = settings;
    Ok(())
}
