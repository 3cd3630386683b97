use super::*;
use crate::systems::bodies::Fixity;
use crate::systems::interfaces::{KelvinVoigt, MaterialPair, TractionLaw};

fn material(sim: &SimulationCore, name: &str) -> MaterialId {
    sim.materials().id_by_name(name).expect("default material")
}

fn fill(sim: &mut SimulationCore, name: &str) {
    let id = material(sim, name);
    for i in 0..sim.grid().nx() {
        for j in 0..sim.grid().ny() {
            sim.set_cell(i, j, id).expect("in bounds");
        }
    }
}

#[test]
fn step_is_a_no_op_in_edit_mode() {
    let mut sim = SimulationCore::new(4, 4);
    fill(&mut sim, "Rock");
    sim.step(0.01);
    sim.advance(0.5);
    assert_eq!(sim.time(), 0.0);
    assert!(sim.bodies().is_empty());
}

#[test]
fn start_builds_blocks_and_faces_together() {
    let mut sim = SimulationCore::new(3, 3);
    fill(&mut sim, "Rock");
    sim.start();

    assert!(sim.is_running());
    assert_eq!(sim.block_count(), 9);
    // 3 rows of 2 x-faces + 3 columns of 2 y-faces
    assert_eq!(sim.interfaces().face_count(), 12);
    assert_eq!(sim.interfaces().set_count(), 1);

    let center = sim.block_map().get(1, 1).expect("center") as usize;
    assert_eq!(sim.bodies().fixity(center), Fixity::Free);
}

#[test]
fn grid_is_locked_while_running() {
    let mut sim = SimulationCore::new(3, 3);
    let rock = material(&sim, "Rock");
    sim.start();
    assert_eq!(sim.set_cell(0, 0, rock), Err(EngineError::SimulationRunning));
    assert_eq!(sim.clear_cell(0, 0), Err(EngineError::SimulationRunning));

    sim.edit();
    assert!(sim.set_cell(0, 0, rock).is_ok());
    assert_eq!(
        sim.set_cell(0, 0, MaterialId(99)),
        Err(EngineError::UnknownMaterial { id: 99 })
    );
    assert!(matches!(sim.set_cell(3, 0, rock), Err(EngineError::CellOutOfBounds { .. })));
}

#[test]
fn edit_keeps_grid_and_reset_clears_it() {
    let mut sim = SimulationCore::new(2, 2);
    fill(&mut sim, "Soil");
    sim.start();
    sim.step(1e-3);
    assert_eq!(sim.render_transforms().len(), 4 * TRANSFORM_STRIDE);
    sim.edit();
    assert!(!sim.is_running());
    assert_eq!(sim.grid().populated_count(), 4);

    // the finished run is gone, only the grid survives
    assert_eq!(sim.block_count(), 0);
    assert!(sim.bodies().is_empty());
    assert_eq!(sim.block_map().get(0, 0), None);
    assert_eq!(sim.interfaces().face_count(), 0);
    assert_eq!(sim.interfaces().set_count(), 0);
    assert_eq!(sim.transforms_len(), 0);
    assert_eq!(sim.time(), 0.0);

    sim.start();
    assert_eq!(sim.time(), 0.0);

    sim.reset();
    assert!(!sim.is_running());
    assert_eq!(sim.grid().populated_count(), 0);
    assert!(sim.bodies().is_empty());
    assert_eq!(sim.interfaces().face_count(), 0);
}

#[test]
fn ground_motion_drives_perimeter_blocks_exactly() {
    let mut sim = SimulationCore::new(3, 3);
    fill(&mut sim, "Rock");
    sim.set_gravity(0.0, 0.0);
    sim.set_ground_motion(GroundMotion::new(1.0, vec![0.0, 1.0, 2.0], vec![], 1.0));
    sim.start();

    let corner = sim.block_map().get(0, 0).expect("corner") as usize;
    let before = sim.bodies().position(corner);
    sim.step(0.25);

    let after = sim.bodies().position(corner);
    assert_eq!(after.x, before.x + 0.25);
    assert_eq!(after.y, before.y);
    assert_eq!(sim.bodies().velocity(corner), Vec2::new(1.0, 0.0));
    assert_eq!(sim.bodies().orientation(corner), 0.0);
}

#[test]
fn lone_free_block_falls_under_gravity() {
    let mut sim = SimulationCore::new(3, 3);
    let wood = material(&sim, "Wood");
    sim.set_cell(1, 1, wood).expect("in bounds");
    sim.start();
    assert_eq!(sim.interfaces().face_count(), 0);

    sim.step(0.5);
    let v = sim.bodies().velocity(0);
    assert!((v.y + 0.098 * 0.5).abs() < 1e-6);
    assert_eq!(v.x, 0.0);
}

#[test]
fn held_acceleration_pushes_every_substep() {
    let mut sim = SimulationCore::new(3, 3);
    let wood = material(&sim, "Wood");
    sim.set_cell(1, 1, wood).expect("in bounds");
    sim.set_gravity(0.0, 0.0);
    sim.start();

    // wood block of unit area weighs 600
    sim.apply_acceleration(600.0, 0.0);
    sim.step(0.05);
    sim.step(0.05);
    assert!((sim.bodies().velocity(0).x - 0.1).abs() < 1e-6);

    sim.apply_acceleration(0.0, 0.0);
    sim.step(0.05);
    assert!((sim.bodies().velocity(0).x - 0.1).abs() < 1e-6);
}

#[test]
fn advance_runs_configured_substeps() {
    let mut sim = SimulationCore::new(3, 3);
    fill(&mut sim, "Concrete");
    sim.set_substeps(10);
    sim.enable_perf_metrics(true);
    sim.start();
    sim.advance(0.01);

    assert!((sim.time() - 0.01).abs() < 1e-6);
    let stats = sim.get_perf_stats();
    assert_eq!(stats.substeps(), 10);
    assert_eq!(stats.blocks(), 9);
    assert_eq!(stats.faces(), 12);
    assert!(stats.frame_ms() >= 0.0);
}

#[test]
fn render_transforms_pack_four_floats_per_block() {
    let mut sim = SimulationCore::new(2, 1);
    let rock = material(&sim, "Rock");
    let steel = material(&sim, "Steel");
    sim.set_cell(0, 0, rock).expect("in bounds");
    sim.set_cell(1, 0, steel).expect("in bounds");
    sim.start();

    let t = sim.render_transforms().to_vec();
    assert_eq!(t.len(), 2 * TRANSFORM_STRIDE);
    assert_eq!(&t[0..4], &[0.5, 0.5, 0.0, rock.0 as f32]);
    assert_eq!(&t[4..8], &[1.5, 0.5, 0.0, steel.0 as f32]);
    assert_eq!(sim.transforms_len(), 8);

    let cells = sim.render_cells();
    assert_eq!(cells, vec![rock.0 as i32, steel.0 as i32]);
}

#[test]
fn player_is_reported_separately() {
    let mut sim = SimulationCore::new(4, 4);
    let player = sim.materials().player_id().expect("player material");
    sim.set_cell(2, 2, player).expect("in bounds");
    assert_eq!(sim.player_position(), None);

    sim.start();
    assert_eq!(sim.block_count(), 0);
    assert_eq!(sim.player_position(), Some(Vec2::new(2.5, 2.5)));
}

#[test]
fn custom_law_selector_is_used_on_start() {
    let mut sim = SimulationCore::new(2, 1);
    fill(&mut sim, "Rock");
    sim.set_law_selector(Box::new(|_: MaterialPair, _: &MaterialRegistry| {
        TractionLaw::KelvinVoigt(KelvinVoigt::new(1.0e5, 10.0))
    }));
    sim.start();
    let names: Vec<_> = sim.interfaces().sets().map(|(_, s)| s.law().name()).collect();
    assert_eq!(names, vec!["kelvin-voigt"]);

    sim.clear_law_selector();
    sim.edit();
    sim.start();
    let names: Vec<_> = sim.interfaces().sets().map(|(_, s)| s.law().name()).collect();
    assert_eq!(names, vec!["cohesive-damage"]);
}

#[test]
fn loading_a_bundle_clears_the_grid() {
    let mut sim = SimulationCore::new(2, 2);
    fill(&mut sim, "Rock");
    let bundle = r#"{"materials":[{"name":"Granite","density":2700},{"name":"Player","density":900}]}"#;
    sim.load_material_bundle_json(bundle).expect("valid bundle");

    assert_eq!(sim.grid().populated_count(), 0);
    assert_eq!(sim.materials().len(), 2);
    assert!(sim.load_material_bundle_json(r#"{"materials":[]}"#).is_err());
}

#[test]
fn settings_json_updates_gravity() {
    let mut sim = SimulationCore::new(2, 2);
    sim.apply_settings_json(r#"{"gravity":{"x":1.0,"y":0.0}}"#).expect("valid");
    assert_eq!(sim.settings().gravity, Vec2::new(1.0, 0.0));
    assert!(sim.apply_settings_json(r#"{"substeps":0}"#).is_err());
    assert_eq!(sim.settings().gravity, Vec2::new(1.0, 0.0));
}
