use super::{SimulationCore, TRANSFORM_STRIDE};

pub(super) fn render_transforms(sim: &mut SimulationCore) -> &[f32] {
    let bodies = &sim.bodies;
    let out = &mut sim.transforms;
    out.clear();
    out.reserve(bodies.len() * TRANSFORM_STRIDE);

    for i in 0..bodies.len() {
        let p = bodies.position(i);
        out.push(p.x);
        out.push(p.y);
        out.push(bodies.orientation(i));
        out.push(bodies.material(i).0 as f32);
    }

    &sim.transforms
}

pub(super) fn render_cells(sim: &SimulationCore) -> Vec<i32> {
    sim.grid
        .cells()
        .iter()
        .map(|cell| cell.map_or(-1, |id| id.0 as i32))
        .collect()
}
