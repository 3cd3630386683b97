use crate::core::Vec2;
use crate::domain::{BlockMap, Grid, GroundMotion, MaterialRegistry};
use crate::systems::bodies::BodyState;
use crate::systems::interfaces::InterfaceManager;

use super::perf_stats::PerfStats;
use super::settings::SimulationSettings;
use super::SimulationCore;

pub(super) fn create_simulation_core(nx: u32, ny: u32, settings: SimulationSettings) -> SimulationCore {
    SimulationCore {
        materials: MaterialRegistry::from_defaults(),
        grid: Grid::new(nx, ny),
        ground_motion: GroundMotion::none(),

        running: false,
        time: 0.0,
        bodies: BodyState::new(settings.block_length),
        block_map: BlockMap::new(nx, ny),
        interfaces: InterfaceManager::new(settings.cohesive),
        custom_laws: false,

        external_acceleration: Vec2::zero(),
        transforms: Vec::new(),

        perf_enabled: false,
        perf_stats: PerfStats::default(),

        settings,
    }
}
