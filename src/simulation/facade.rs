use wasm_bindgen::prelude::*;

use crate::core::EngineError;
use crate::domain::{GroundMotion, MaterialId};

use super::perf_stats::PerfStats;
use super::{SimulationCore, TRANSFORM_STRIDE};

fn to_js(e: EngineError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Zero-copy view description of the render transform buffer.
#[wasm_bindgen]
pub struct RenderLayout {
    transforms_ptr: u32,
    transforms_len_elements: u32,
    transforms_len_bytes: u32,
    stride: u32,
    block_count: u32,
}

#[wasm_bindgen]
impl RenderLayout {
    #[wasm_bindgen(getter)]
    pub fn transforms_ptr(&self) -> u32 { self.transforms_ptr }
    #[wasm_bindgen(getter)]
    pub fn transforms_len_elements(&self) -> u32 { self.transforms_len_elements }
    #[wasm_bindgen(getter)]
    pub fn transforms_len_bytes(&self) -> u32 { self.transforms_len_bytes }
    #[wasm_bindgen(getter)]
    pub fn stride(&self) -> u32 { self.stride }
    #[wasm_bindgen(getter)]
    pub fn block_count(&self) -> u32 { self.block_count }
}

#[wasm_bindgen]
pub struct Simulation {
    core: SimulationCore,
}

#[wasm_bindgen]
impl Simulation {
    /// Create an empty `nx` x `ny` grid in edit mode
    #[wasm_bindgen(constructor)]
    pub fn new(nx: u32, ny: u32) -> Self {
        Self { core: SimulationCore::new(nx, ny) }
    }

    #[wasm_bindgen(js_name = withSettingsJson)]
    pub fn with_settings_json(nx: u32, ny: u32, json: String) -> Result<Simulation, JsValue> {
        let settings = super::SimulationSettings::from_json(&json).map_err(to_js)?;
        Ok(Self { core: SimulationCore::with_settings(nx, ny, settings) })
    }

    #[wasm_bindgen(getter)]
    pub fn nx(&self) -> u32 { self.core.grid().nx() }

    #[wasm_bindgen(getter)]
    pub fn ny(&self) -> u32 { self.core.grid().ny() }

    #[wasm_bindgen(getter)]
    pub fn time(&self) -> f32 { self.core.time() }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool { self.core.is_running() }

    #[wasm_bindgen(getter)]
    pub fn block_count(&self) -> usize { self.core.block_count() }

    // === Materials ===

    pub fn load_material_bundle(&mut self, json: String) -> Result<(), JsValue> {
        self.core.load_material_bundle_json(&json).map_err(to_js)
    }

    pub fn get_material_manifest_json(&self) -> String {
        self.core.material_manifest_json()
    }

    /// Next palette entry (wraps around)
    pub fn next_material(&self, id: u16) -> u16 {
        self.core.materials().next_id(MaterialId(id)).0
    }

    /// Previous palette entry (wraps around)
    pub fn prev_material(&self, id: u16) -> u16 {
        self.core.materials().prev_id(MaterialId(id)).0
    }

    // === Settings ===

    pub fn apply_settings_json(&mut self, json: String) -> Result<(), JsValue> {
        self.core.apply_settings_json(&json).map_err(to_js)
    }

    pub fn get_settings_json(&self) -> String {
        self.core.settings().to_json()
    }

    pub fn set_gravity(&mut self, x: f32, y: f32) {
        self.core.set_gravity(x, y);
    }

    pub fn set_drag(&mut self, coefficient: f32) {
        self.core.set_drag(coefficient);
    }

    pub fn set_substeps(&mut self, substeps: u32) {
        self.core.set_substeps(substeps);
    }

    /// Displacement record sampled every `sample_dt`; `uy` may be empty
    pub fn set_ground_motion(&mut self, sample_dt: f32, ux: Vec<f32>, uy: Vec<f32>, scale: f32) {
        self.core.set_ground_motion(GroundMotion::new(sample_dt, ux, uy, scale));
    }

    pub fn clear_ground_motion(&mut self) {
        self.core.set_ground_motion(GroundMotion::none());
    }

    pub fn apply_acceleration(&mut self, ax: f32, ay: f32) {
        self.core.apply_acceleration(ax, ay);
    }

    /// Enable or disable per-frame perf metrics (adds timing overhead when enabled)
    pub fn enable_perf_metrics(&mut self, enabled: bool) {
        self.core.enable_perf_metrics(enabled);
    }

    /// Last frame perf snapshot (zeros when perf disabled)
    pub fn get_perf_stats(&self) -> PerfStats {
        self.core.get_perf_stats()
    }

    // === Edit mode ===

    pub fn set_cell(&mut self, i: u32, j: u32, material: u16) -> Result<(), JsValue> {
        self.core.set_cell(i, j, MaterialId(material)).map_err(to_js)
    }

    /// Returns the removed material id, or -1 if the cell was empty
    pub fn clear_cell(&mut self, i: u32, j: u32) -> Result<i32, JsValue> {
        let removed = self.core.clear_cell(i, j).map_err(to_js)?;
        Ok(removed.map_or(-1, |id| id.0 as i32))
    }

    /// Grid cells, row-major from the bottom row, `-1` for empty
    pub fn cells(&self) -> Vec<i32> {
        self.core.render_cells()
    }

    // === Mode transitions ===

    pub fn start(&mut self) {
        self.core.start();
    }

    pub fn edit(&mut self) {
        self.core.edit();
    }

    pub fn reset(&mut self) {
        self.core.reset();
    }

    // === Time stepping ===

    /// One frame of `settings.substeps` substeps
    pub fn advance(&mut self, frame_dt: f32) {
        self.core.advance(frame_dt);
    }

    /// A single substep
    pub fn step(&mut self, dt: f32) {
        self.core.step(dt);
    }

    // === Rendering ===

    /// Refresh the transform buffer and describe it for a zero-copy view.
    pub fn render_layout(&mut self) -> RenderLayout {
        let len = self.core.render_transforms().len();
        RenderLayout {
            transforms_ptr: self.core.transforms_ptr() as u32,
            transforms_len_elements: len as u32,
            transforms_len_bytes: (len * std::mem::size_of::<f32>()) as u32,
            stride: TRANSFORM_STRIDE as u32,
            block_count: (len / TRANSFORM_STRIDE) as u32,
        }
    }

    /// Copying variant of `render_layout`: `[px, py, rz, material]` per block
    pub fn transforms(&mut self) -> Vec<f32> {
        self.core.render_transforms().to_vec()
    }

    pub fn transforms_len(&self) -> usize {
        self.core.transforms_len()
    }

    /// `[x, y]` of the player, empty when there is none
    pub fn player_position(&self) -> Vec<f32> {
        self.core.player_position().map_or_else(Vec::new, |p| vec![p.x, p.y])
    }

    pub fn face_count(&self) -> usize {
        self.core.interfaces().face_count()
    }

    pub fn failed_points(&self) -> usize {
        self.core.interfaces().failed_points()
    }
}
