use czm_engine::systems::bodies::{BodyState, Fixity};
use czm_engine::systems::interfaces::{InterfaceSet, KelvinVoigt, TractionLaw};
use czm_engine::{MaterialId, SimulationCore, Vec2};

const GRAVITY: f32 = 9.8;

/// Row of three blocks, ends held, middle hanging on two Kelvin-Voigt faces.
#[test]
fn middle_block_of_held_row_settles() {
    let (stiffness, viscosity, mass) = (2.0e6_f32, 1.0e5_f32, 1000.0_f32);

    let mut bodies = BodyState::new(1.0);
    bodies.push_block(MaterialId(0), mass, Vec2::new(0.5, 0.5), Fixity::Fixed);
    bodies.push_block(MaterialId(0), mass, Vec2::new(1.5, 0.5), Fixity::Free);
    bodies.push_block(MaterialId(0), mass, Vec2::new(2.5, 0.5), Fixity::Fixed);

    let mut set = InterfaceSet::new(TractionLaw::KelvinVoigt(KelvinVoigt::new(stiffness, viscosity)));
    set.insert_face_x(0, 1);
    set.insert_face_x(1, 2);
    set.initialize();

    let dt = 1.0e-3;
    for _ in 0..3000 {
        bodies.zero_forces();
        bodies.apply_prescribed_boundary_motion(0.0, 0.0, dt);
        bodies.apply_body_force(0.0, -GRAVITY);
        set.apply_forces(&mut bodies);
        bodies.apply_contact_forces();
        bodies.time_integrate(dt);
    }

    // held ends never move
    assert_eq!(bodies.position(0), Vec2::new(0.5, 0.5));
    assert_eq!(bodies.position(2), Vec2::new(2.5, 0.5));

    // two faces, two Gauss points each, each point spring E * dx
    let expected_sag = mass * GRAVITY / (4.0 * stiffness);
    let sag = 0.5 - bodies.position(1).y;
    assert!(sag > 0.0, "middle block rose by {}", -sag);
    assert!(
        (sag - expected_sag).abs() < 0.02 * expected_sag,
        "sag {sag} vs {expected_sag}"
    );
    assert!((bodies.position(1).x - 1.5).abs() < 1e-5);
    assert!(bodies.orientation(1).abs() < 1e-4);

    let residual = bodies.force(1).length();
    assert!(residual < 1e-3 * mass * GRAVITY, "residual force {residual}");
    assert!(bodies.velocity(1).length() < 1e-4);
}

/// A block hanging inside a held ring on the default cohesive law stays
/// bonded under the default gravity.
#[test]
fn center_block_of_ring_settles_without_damage() {
    let mut sim = SimulationCore::new(3, 3);
    let rock = sim.materials().id_by_name("Rock").expect("rock");
    for i in 0..3 {
        for j in 0..3 {
            sim.set_cell(i, j, rock).expect("in bounds");
        }
    }
    sim.start();
    let center = sim.block_map().get(1, 1).expect("center") as usize;
    let start = sim.bodies().position(center);

    // 500 substeps of 1 ms per frame
    for _ in 0..6 {
        sim.advance(0.5);
    }

    let p = sim.bodies().position(center);
    let sag = start.y - p.y;
    assert!(sag > 0.0);
    // far below the failure strain of the default law
    assert!(sag < 1.0e-3);
    assert_eq!(sim.interfaces().failed_points(), 0);
    assert!(sim.bodies().velocity(center).length() < 1e-4);

    let weight = sim.bodies().mass(center) * 0.098;
    assert!(sim.bodies().force(center).length() < 0.05 * weight);
}
