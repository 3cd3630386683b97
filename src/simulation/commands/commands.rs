use crate::core::EngineError;
use crate::domain::{BlockMap, MaterialId, MaterialRegistry};
use crate::systems::bodies::{BodyState, ContactParams};
use crate::systems::interfaces::InterfaceManager;

use super::SimulationCore;

pub(super) fn set_cell(sim: &mut SimulationCore, i: u32, j: u32, material: MaterialId) -> Result<(), EngineError> {
    if sim.running {
        return Err(EngineError::SimulationRunning);
    }
    if !sim.materials.contains(material) {
        return Err(EngineError::UnknownMaterial { id: material.0 });
    }
    sim.grid.set_cell(i, j, material)
}

pub(super) fn clear_cell(sim: &mut SimulationCore, i: u32, j: u32) -> Result<Option<MaterialId>, EngineError> {
    if sim.running {
        return Err(EngineError::SimulationRunning);
    }
    sim.grid.clear_cell(i, j)
}

pub(super) fn load_material_bundle(sim: &mut SimulationCore, json: &str) -> Result<(), EngineError> {
    let registry = MaterialRegistry::from_bundle_json(json)?;
    log::info!("loaded material bundle with {} materials", registry.len());
    sim.materials = registry;
    reset(sim);
    Ok(())
}

pub(super) fn start(sim: &mut SimulationCore) {
    let length = sim.settings.block_length;
    let (mut bodies, block_map) = BodyState::from_grid(&sim.grid, &sim.materials, length);

    let mut contact = ContactParams::for_length(length).with_stiffness(sim.settings.contact_stiffness);
    contact.player_half_extent = sim.settings.player_half_extent * length;
    bodies.set_contact_params(contact);

    if !sim.custom_laws {
        sim.interfaces = InterfaceManager::new(sim.settings.cohesive);
    }
    sim.interfaces.initialize(&sim.grid, &block_map, &sim.materials);

    sim.bodies = bodies;
    sim.block_map = block_map;
    sim.time = 0.0;
    sim.running = true;
    sim.perf_stats.reset();

    log::info!(
        "simulation started: {} blocks, {} faces in {} interface sets, player {}",
        sim.bodies.len(),
        sim.interfaces.face_count(),
        sim.interfaces.set_count(),
        if sim.bodies.player().is_some() { "present" } else { "absent" }
    );
}

pub(super) fn edit(sim: &mut SimulationCore) {
    if sim.running {
        log::info!("simulation stopped at t = {:.3}", sim.time);
    }
    drop_run_state(sim);
}

pub(super) fn reset(sim: &mut SimulationCore) {
    sim.grid.reset();
    drop_run_state(sim);
    log::debug!("simulation reset");
}

/// Blocks and faces only live for one run.
fn drop_run_state(sim: &mut SimulationCore) {
    sim.running = false;
    sim.bodies = BodyState::new(sim.settings.block_length);
    sim.block_map = BlockMap::new(sim.grid.nx(), sim.grid.ny());
    sim.interfaces.clear();
    sim.transforms.clear();
    sim.time = 0.0;
    sim.perf_stats.reset();
}
