use super::perf_timer::timed;
use super::SimulationCore;

/// One substep, in hard order:
/// zero forces, boundary motion, body force, external acceleration, drag,
/// cohesive forces, contact forces, integration.
pub(super) fn step(sim: &mut SimulationCore, dt: f32) {
    if !sim.running || !(dt > 0.0) {
        return;
    }
    let perf_on = sim.perf_enabled;

    sim.bodies.zero_forces();

    timed(perf_on, &mut sim.perf_stats.boundary_ms, || {
        let (ux_old, uy_old) = sim.ground_motion.evaluate(sim.time);
        sim.time += dt;
        let (ux, uy) = sim.ground_motion.evaluate(sim.time);
        sim.bodies.apply_prescribed_boundary_motion(ux - ux_old, uy - uy_old, dt);
    });

    let g = sim.settings.gravity;
    sim.bodies.apply_body_force(g.x, g.y);

    let a = sim.external_acceleration;
    if a.x != 0.0 || a.y != 0.0 {
        sim.bodies.apply_acceleration(a.x, a.y);
    }

    sim.bodies.apply_drag_force(sim.settings.drag_coefficient);

    timed(perf_on, &mut sim.perf_stats.cohesive_ms, || {
        sim.interfaces.apply_cohesive_forces(&mut sim.bodies);
    });

    timed(perf_on, &mut sim.perf_stats.contact_ms, || {
        sim.bodies.apply_contact_forces();
    });

    timed(perf_on, &mut sim.perf_stats.integrate_ms, || {
        sim.bodies.time_integrate(dt);
    });
}

pub(super) fn advance(sim: &mut SimulationCore, frame_dt: f32) {
    if !sim.running {
        return;
    }
    let substeps = sim.settings.substeps.max(1);
    let dt = frame_dt / substeps as f32;

    let perf_on = sim.perf_enabled;
    if perf_on {
        sim.perf_stats.reset();
    }

    let mut frame_ms = 0.0;
    timed(perf_on, &mut frame_ms, || {
        for _ in 0..substeps {
            step(sim, dt);
        }
    });

    if perf_on {
        let stats = &mut sim.perf_stats;
        stats.frame_ms = frame_ms;
        stats.substeps = substeps;
        stats.blocks = sim.bodies.len() as u32;
        stats.faces = sim.interfaces.face_count() as u32;
        stats.interface_sets = sim.interfaces.set_count() as u32;
        stats.failed_points = sim.interfaces.failed_points() as u32;
    }
}
