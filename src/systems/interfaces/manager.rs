use std::collections::BTreeMap;

use crate::domain::{BlockMap, Grid, MaterialId, MaterialRegistry};
use crate::systems::bodies::BodyState;

use super::interface_set::InterfaceSet;
use super::traction::{CohesiveDefaults, TractionLaw};

/// Unordered material pair, stored canonically as (min, max).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaterialPair(MaterialId, MaterialId);

impl MaterialPair {
    pub fn new(a: MaterialId, b: MaterialId) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub fn first(self) -> MaterialId {
        self.0
    }

    pub fn second(self) -> MaterialId {
        self.1
    }
}

/// Chooses the traction law for a newly discovered material pair.
pub type LawSelector = Box<dyn Fn(MaterialPair, &MaterialRegistry) -> TractionLaw>;

/// Groups every populated face by material pair, one `InterfaceSet` each.
pub struct InterfaceManager {
    sets: BTreeMap<MaterialPair, InterfaceSet>,
    selector: LawSelector,
    failed_points: usize,
}

impl InterfaceManager {
    /// Every pair gets the cohesive-damage law built from `defaults`.
    pub fn new(defaults: CohesiveDefaults) -> Self {
        Self::with_selector(Box::new(move |_: MaterialPair, _: &MaterialRegistry| defaults.build()))
    }

    pub fn with_selector(selector: LawSelector) -> Self {
        Self {
            sets: BTreeMap::new(),
            selector,
            failed_points: 0,
        }
    }

    pub fn set_selector(&mut self, selector: LawSelector) {
        self.selector = selector;
    }

    /// Drop all sets and rediscover faces from the grid.
    ///
    /// X-faces are scanned row by row (j outer, i inner), Y-faces column by
    /// column (i outer, j inner). A face exists where both cells map to a
    /// block; player cells never do.
    pub fn initialize(&mut self, grid: &Grid, blocks: &BlockMap, materials: &MaterialRegistry) {
        self.sets.clear();
        self.failed_points = 0;
        let (nx, ny) = (grid.nx(), grid.ny());

        for j in 0..ny {
            for i in 1..nx {
                if let Some((pair, left, right)) = self.face_between(grid, blocks, (i - 1, j), (i, j)) {
                    self.set_for(pair, materials).insert_face_x(left, right);
                }
            }
        }

        for i in 0..nx {
            for j in 1..ny {
                if let Some((pair, lower, upper)) = self.face_between(grid, blocks, (i, j - 1), (i, j)) {
                    self.set_for(pair, materials).insert_face_y(lower, upper);
                }
            }
        }

        for set in self.sets.values_mut() {
            set.initialize();
        }

        log::debug!(
            "interfaces: {} faces across {} material pairs",
            self.face_count(),
            self.sets.len()
        );
    }

    fn face_between(
        &self,
        grid: &Grid,
        blocks: &BlockMap,
        a: (u32, u32),
        b: (u32, u32),
    ) -> Option<(MaterialPair, u32, u32)> {
        let block_a = blocks.get(a.0, a.1)?;
        let block_b = blocks.get(b.0, b.1)?;
        let mat_a = grid.get(a.0, a.1)?;
        let mat_b = grid.get(b.0, b.1)?;
        Some((MaterialPair::new(mat_a, mat_b), block_a, block_b))
    }

    fn set_for(&mut self, pair: MaterialPair, materials: &MaterialRegistry) -> &mut InterfaceSet {
        let selector = &self.selector;
        self.sets
            .entry(pair)
            .or_insert_with(|| InterfaceSet::new(selector(pair, materials)))
    }

    /// Accumulate cohesive forces of every set, in pair order.
    pub fn apply_cohesive_forces(&mut self, bodies: &mut BodyState) {
        for (pair, set) in self.sets.iter_mut() {
            let newly_failed = set.apply_forces(bodies);
            if newly_failed > 0 {
                if set.law().failed_points() == newly_failed {
                    log::debug!("first interface failure between materials {} and {}", pair.0 .0, pair.1 .0);
                }
                self.failed_points += newly_failed;
            }
        }
    }

    pub fn clear(&mut self) {
        self.sets.clear();
        self.failed_points = 0;
    }

    pub fn sets(&self) -> impl Iterator<Item = (&MaterialPair, &InterfaceSet)> {
        self.sets.iter()
    }

    pub fn set(&self, pair: MaterialPair) -> Option<&InterfaceSet> {
        self.sets.get(&pair)
    }

    pub fn set_count(&self) -> usize {
        self.sets.len()
    }

    pub fn face_count(&self) -> usize {
        self.sets.values().map(InterfaceSet::face_count).sum()
    }

    /// Quadrature points failed since the last `initialize`.
    pub fn failed_points(&self) -> usize {
        self.failed_points
    }
}

impl Default for InterfaceManager {
    fn default() -> Self {
        Self::new(CohesiveDefaults::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Vec2;
    use crate::systems::interfaces::traction::KelvinVoigt;
    use crate::systems::interfaces::Face;

    fn build(grid: &Grid, manager: &mut InterfaceManager) -> BodyState {
        let reg = MaterialRegistry::from_defaults();
        let (bodies, map) = BodyState::from_grid(grid, &reg, 1.0);
        manager.initialize(grid, &map, &reg);
        bodies
    }

    #[test]
    fn pair_is_canonical() {
        let a = MaterialPair::new(MaterialId(4), MaterialId(1));
        let b = MaterialPair::new(MaterialId(1), MaterialId(4));
        assert_eq!(a, b);
        assert_eq!(a.first(), MaterialId(1));
        assert_eq!(a.second(), MaterialId(4));
    }

    #[test]
    fn discovers_faces_of_full_grid() {
        let reg = MaterialRegistry::from_defaults();
        let rock = reg.id_by_name("Rock").expect("rock");
        let mut grid = Grid::new(3, 2);
        for i in 0..3 {
            for j in 0..2 {
                grid.set_cell(i, j, rock).expect("in bounds");
            }
        }
        let mut manager = InterfaceManager::default();
        build(&grid, &mut manager);

        assert_eq!(manager.set_count(), 1);
        let set = manager.set(MaterialPair::new(rock, rock)).expect("rock-rock set");
        // 2 rows of 2 x-faces, 3 columns of 1 y-face
        assert_eq!(set.x_faces().len(), 4);
        assert_eq!(set.y_faces().len(), 3);
        assert_eq!(set.law().name(), "cohesive-damage");
    }

    #[test]
    fn face_order_follows_scan_direction() {
        let reg = MaterialRegistry::from_defaults();
        let soil = reg.id_by_name("Soil").expect("soil");
        let mut grid = Grid::new(2, 2);
        for (i, j) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            grid.set_cell(i, j, soil).expect("in bounds");
        }
        let mut manager = InterfaceManager::default();
        build(&grid, &mut manager);

        // blocks are numbered column-major: (0,0)=0 (0,1)=1 (1,0)=2 (1,1)=3
        let set = manager.set(MaterialPair::new(soil, soil)).expect("set");
        assert_eq!(set.x_faces(), &[Face { a: 0, b: 2 }, Face { a: 1, b: 3 }]);
        assert_eq!(set.y_faces(), &[Face { a: 0, b: 1 }, Face { a: 2, b: 3 }]);
    }

    #[test]
    fn mixed_materials_share_one_set_per_pair() {
        let reg = MaterialRegistry::from_defaults();
        let rock = reg.id_by_name("Rock").expect("rock");
        let wood = reg.id_by_name("Wood").expect("wood");
        let mut grid = Grid::new(3, 1);
        grid.set_cell(0, 0, wood).expect("in bounds");
        grid.set_cell(1, 0, rock).expect("in bounds");
        grid.set_cell(2, 0, wood).expect("in bounds");
        let mut manager = InterfaceManager::default();
        build(&grid, &mut manager);

        assert_eq!(manager.set_count(), 1);
        assert_eq!(manager.set(MaterialPair::new(wood, rock)).map(|s| s.face_count()), Some(2));
    }

    #[test]
    fn player_and_empty_cells_break_faces() {
        let reg = MaterialRegistry::from_defaults();
        let rock = reg.id_by_name("Rock").expect("rock");
        let player = reg.player_id().expect("player");
        let mut grid = Grid::new(4, 1);
        grid.set_cell(0, 0, rock).expect("in bounds");
        grid.set_cell(1, 0, player).expect("in bounds");
        grid.set_cell(3, 0, rock).expect("in bounds");
        let mut manager = InterfaceManager::default();
        build(&grid, &mut manager);
        assert_eq!(manager.face_count(), 0);
    }

    #[test]
    fn selector_chooses_law_per_pair() {
        let reg = MaterialRegistry::from_defaults();
        let rock = reg.id_by_name("Rock").expect("rock");
        let steel = reg.id_by_name("Steel").expect("steel");
        let mut grid = Grid::new(3, 1);
        grid.set_cell(0, 0, rock).expect("in bounds");
        grid.set_cell(1, 0, rock).expect("in bounds");
        grid.set_cell(2, 0, steel).expect("in bounds");

        let mut manager = InterfaceManager::with_selector(Box::new(|pair: MaterialPair, reg: &MaterialRegistry| {
            if reg.get(pair.second()).map(|m| m.name.as_str()) == Some("Steel") {
                TractionLaw::KelvinVoigt(KelvinVoigt::new(1.0e5, 0.0))
            } else {
                CohesiveDefaults::default().build()
            }
        }));
        build(&grid, &mut manager);

        let names: Vec<_> = manager.sets().map(|(_, s)| s.law().name()).collect();
        assert_eq!(names, vec!["cohesive-damage", "kelvin-voigt"]);
    }

    #[test]
    fn failures_are_counted_once() {
        let reg = MaterialRegistry::from_defaults();
        let rock = reg.id_by_name("Rock").expect("rock");
        let mut grid = Grid::new(2, 1);
        grid.set_cell(0, 0, rock).expect("in bounds");
        grid.set_cell(1, 0, rock).expect("in bounds");
        let mut manager = InterfaceManager::default();
        let mut bodies = build(&grid, &mut manager);

        // open the face far past the max strain
        bodies.set_position(1, Vec2::new(3.0, 0.5));
        for _ in 0..3 {
            bodies.zero_forces();
            manager.apply_cohesive_forces(&mut bodies);
        }
        assert_eq!(manager.failed_points(), 2);
        assert_eq!(bodies.force(0), Vec2::zero());
    }
}
