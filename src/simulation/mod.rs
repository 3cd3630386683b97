//! SimulationCore - edit/run state machine and the substep pipeline
//!
//! In edit mode only the grid changes. `start()` carves blocks and faces
//! out of the grid in one go; from then on every substep runs the fixed
//! pipeline in `step/step.rs`. Heavy lifting lives in the systems, this
//! module only orchestrates and delegates to its submodules.

use crate::core::{EngineError, Vec2};
use crate::domain::{BlockMap, Grid, GroundMotion, MaterialId, MaterialRegistry};
use crate::systems::bodies::BodyState;
use crate::systems::interfaces::{InterfaceManager, LawSelector};

#[path = "perf/perf_timer.rs"]
mod perf_timer;
#[path = "perf/perf_stats.rs"]
mod perf_stats;
#[path = "step/step.rs"]
mod step;
#[path = "commands/commands.rs"]
mod commands;
#[path = "render/render_extract.rs"]
mod render_extract;
#[path = "init/init.rs"]
mod init;
#[path = "init/settings.rs"]
mod settings;
mod facade;

pub use facade::{RenderLayout, Simulation};
pub use perf_stats::PerfStats;
pub use settings::SimulationSettings;

/// Floats per block in the render transform buffer: `[px, py, rz, material]`.
pub const TRANSFORM_STRIDE: usize = 4;

/// The simulation driver
pub struct SimulationCore {
    materials: MaterialRegistry,
    grid: Grid,
    settings: SimulationSettings,
    ground_motion: GroundMotion,

    // Run state, rebuilt together by `start()`
    running: bool,
    time: f32,
    bodies: BodyState,
    block_map: BlockMap,
    interfaces: InterfaceManager,
    custom_laws: bool,

    /// Held external acceleration, applied every substep until changed
    external_acceleration: Vec2,

    // Render output
    transforms: Vec<f32>,

    // Perf metrics
    perf_enabled: bool,
    perf_stats: PerfStats,
}

impl SimulationCore {
    pub fn new(nx: u32, ny: u32) -> Self {
        init::create_simulation_core(nx, ny, SimulationSettings::default())
    }

    pub fn with_settings(nx: u32, ny: u32, settings: SimulationSettings) -> Self {
        init::create_simulation_core(nx, ny, settings)
    }

    // === Materials ===

    pub fn materials(&self) -> &MaterialRegistry {
        &self.materials
    }

    /// Replace the material palette. Clears the grid, since cells may
    /// reference ids that no longer exist.
    pub fn load_material_bundle_json(&mut self, json: &str) -> Result<(), EngineError> {
        commands::load_material_bundle(self, json)
    }

    pub fn material_manifest_json(&self) -> String {
        self.materials.manifest_json()
    }

    // === Settings ===

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn apply_settings(&mut self, settings: SimulationSettings) -> Result<(), EngineError> {
        settings::apply_settings(self, settings)
    }

    pub fn apply_settings_json(&mut self, json: &str) -> Result<(), EngineError> {
        let parsed = SimulationSettings::from_json(json)?;
        settings::apply_settings(self, parsed)
    }

    pub fn set_gravity(&mut self, x: f32, y: f32) {
        settings::set_gravity(self, x, y);
    }

    pub fn set_drag(&mut self, coefficient: f32) {
        settings::set_drag(self, coefficient);
    }

    pub fn set_substeps(&mut self, substeps: u32) {
        settings::set_substeps(self, substeps);
    }

    pub fn set_ground_motion(&mut self, motion: GroundMotion) {
        self.ground_motion = motion;
    }

    pub fn ground_motion(&self) -> &GroundMotion {
        &self.ground_motion
    }

    /// Install a custom law selector, used from the next `start()` on.
    pub fn set_law_selector(&mut self, selector: LawSelector) {
        self.interfaces.set_selector(selector);
        self.custom_laws = true;
    }

    /// Go back to the cohesive law described by `settings.cohesive`.
    pub fn clear_law_selector(&mut self) {
        self.custom_laws = false;
    }

    /// Held uniform external force on every body (not mass scaled).
    /// Pass `(0, 0)` to release.
    pub fn apply_acceleration(&mut self, ax: f32, ay: f32) {
        self.external_acceleration = Vec2::new(ax, ay);
    }

    /// Enable or disable per-frame perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        settings::enable_perf_metrics(self, enabled);
    }

    /// Last `advance` perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        settings::get_perf_stats(self)
    }

    // === Edit mode ===

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn set_cell(&mut self, i: u32, j: u32, material: MaterialId) -> Result<(), EngineError> {
        commands::set_cell(self, i, j, material)
    }

    pub fn clear_cell(&mut self, i: u32, j: u32) -> Result<Option<MaterialId>, EngineError> {
        commands::clear_cell(self, i, j)
    }

    // === Mode transitions ===

    /// Build bodies and interfaces from the grid and enter run mode.
    pub fn start(&mut self) {
        commands::start(self);
    }

    /// Leave run mode, keeping the grid.
    pub fn edit(&mut self) {
        commands::edit(self);
    }

    /// Leave run mode and clear the grid.
    pub fn reset(&mut self) {
        commands::reset(self);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    // === Time stepping ===

    /// One substep of length `dt`. No-op in edit mode.
    pub fn step(&mut self, dt: f32) {
        step::step(self, dt);
    }

    /// `settings.substeps` substeps covering `frame_dt`.
    pub fn advance(&mut self, frame_dt: f32) {
        step::advance(self, frame_dt);
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    // === Read-only state ===

    pub fn bodies(&self) -> &BodyState {
        &self.bodies
    }

    /// Direct body access for scenario setup and host perturbations.
    pub fn bodies_mut(&mut self) -> &mut BodyState {
        &mut self.bodies
    }

    pub fn block_map(&self) -> &BlockMap {
        &self.block_map
    }

    pub fn interfaces(&self) -> &InterfaceManager {
        &self.interfaces
    }

    pub fn block_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn player_position(&self) -> Option<Vec2> {
        self.bodies.player().map(|p| p.pos)
    }

    /// Pack `[px, py, rz, material]` per block into the transform buffer.
    pub fn render_transforms(&mut self) -> &[f32] {
        render_extract::render_transforms(self)
    }

    pub fn transforms_ptr(&self) -> *const f32 {
        self.transforms.as_ptr()
    }

    pub fn transforms_len(&self) -> usize {
        self.transforms.len()
    }

    /// Grid cells as material ids, `-1` for empty, row-major.
    pub fn render_cells(&self) -> Vec<i32> {
        render_extract::render_cells(self)
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
