use wasm_bindgen::prelude::*;

/// Timing and size snapshot of the last `advance` call.
#[wasm_bindgen]
#[derive(Clone, Debug, Default)]
pub struct PerfStats {
    pub(super) frame_ms: f64,
    pub(super) boundary_ms: f64,
    pub(super) cohesive_ms: f64,
    pub(super) contact_ms: f64,
    pub(super) integrate_ms: f64,
    pub(super) substeps: u32,
    pub(super) blocks: u32,
    pub(super) faces: u32,
    pub(super) interface_sets: u32,
    pub(super) failed_points: u32,
}

impl PerfStats {
    pub(crate) fn reset(&mut self) {
        *self = PerfStats::default();
    }
}

#[wasm_bindgen]
impl PerfStats {
    #[wasm_bindgen(getter)]
    pub fn frame_ms(&self) -> f64 { self.frame_ms }
    #[wasm_bindgen(getter)]
    pub fn boundary_ms(&self) -> f64 { self.boundary_ms }
    #[wasm_bindgen(getter)]
    pub fn cohesive_ms(&self) -> f64 { self.cohesive_ms }
    #[wasm_bindgen(getter)]
    pub fn contact_ms(&self) -> f64 { self.contact_ms }
    #[wasm_bindgen(getter)]
    pub fn integrate_ms(&self) -> f64 { self.integrate_ms }
    #[wasm_bindgen(getter)]
    pub fn substeps(&self) -> u32 { self.substeps }
    #[wasm_bindgen(getter)]
    pub fn blocks(&self) -> u32 { self.blocks }
    #[wasm_bindgen(getter)]
    pub fn faces(&self) -> u32 { self.faces }
    #[wasm_bindgen(getter)]
    pub fn interface_sets(&self) -> u32 { self.interface_sets }
    #[wasm_bindgen(getter)]
    pub fn failed_points(&self) -> u32 { self.failed_points }
}
