use crate::core::Vec2;
use crate::domain::{BlockMap, Grid, MaterialId, MaterialRegistry};

use super::contact::ContactParams;

/// Whether a block is integrated from forces or driven by the boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fixity {
    /// Perimeter block: position follows the prescribed ground motion.
    Fixed,
    /// Interior block: integrated from accumulated forces.
    Free,
}

impl Fixity {
    /// Multiplier applied to integrated velocities (0 = fixed, 1 = free).
    #[inline]
    pub fn factor(self) -> f32 {
        match self {
            Fixity::Fixed => 0.0,
            Fixity::Free => 1.0,
        }
    }
}

/// The singleton player body: translation only, no interfaces.
#[derive(Clone, Debug)]
pub struct Player {
    pub material: MaterialId,
    pub mass: f32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub force: Vec2,
}

/// Structure-of-arrays rigid body state for every block plus the player.
///
/// Indices are assigned once in `from_grid` and are stable for the whole run.
pub struct BodyState {
    /// Characteristic block edge length [m]
    pub(crate) length: f32,

    // Per-block arrays, all of length `len()`
    pub(crate) material: Vec<MaterialId>,
    pub(crate) mass: Vec<f32>,
    pub(crate) inv_mass: Vec<f32>,
    pub(crate) inv_inertia: Vec<f32>,
    pub(crate) px: Vec<f32>,
    pub(crate) py: Vec<f32>,
    pub(crate) rz: Vec<f32>,
    pub(crate) vx: Vec<f32>,
    pub(crate) vy: Vec<f32>,
    pub(crate) wz: Vec<f32>,
    pub(crate) fx: Vec<f32>,
    pub(crate) fy: Vec<f32>,
    pub(crate) mz: Vec<f32>,
    pub(crate) fixity: Vec<Fixity>,

    pub(crate) player: Option<Player>,
    pub(crate) contact: ContactParams,
}

/// Moment of inertia coefficient of a uniform square: I = m L^2 / 6
const SQUARE_INERTIA_COEFF: f32 = 6.0;

impl BodyState {
    pub fn new(length: f32) -> Self {
        Self {
            length,
            material: Vec::new(),
            mass: Vec::new(),
            inv_mass: Vec::new(),
            inv_inertia: Vec::new(),
            px: Vec::new(),
            py: Vec::new(),
            rz: Vec::new(),
            vx: Vec::new(),
            vy: Vec::new(),
            wz: Vec::new(),
            fx: Vec::new(),
            fy: Vec::new(),
            mz: Vec::new(),
            fixity: Vec::new(),
            player: None,
            contact: ContactParams::for_length(length),
        }
    }

    /// Carve blocks out of a grid snapshot.
    ///
    /// Cells are visited column by column (i outer, j inner). The cell
    /// holding the player material becomes the player body instead of a
    /// block. Perimeter cells become `Fixity::Fixed`.
    pub fn from_grid(grid: &Grid, materials: &MaterialRegistry, length: f32) -> (Self, BlockMap) {
        let mut state = Self::new(length);
        let mut map = BlockMap::new(grid.nx(), grid.ny());
        let area = length * length;

        for i in 0..grid.nx() {
            for j in 0..grid.ny() {
                let Some(id) = grid.get(i, j) else {
                    continue;
                };
                let Some(material) = materials.get(id) else {
                    log::warn!("cell ({}, {}) references unknown material {}", i, j, id.0);
                    continue;
                };

                let mass = material.density * area;
                let center = Vec2::new(length * (i as f32 + 0.5), length * (j as f32 + 0.5));

                if materials.is_player(id) {
                    state.player = Some(Player {
                        material: id,
                        mass,
                        pos: center,
                        vel: Vec2::zero(),
                        force: Vec2::zero(),
                    });
                    continue;
                }

                let fixity = if grid.is_perimeter(i, j) { Fixity::Fixed } else { Fixity::Free };
                let index = state.push_block(id, mass, center, fixity);
                map.set(i, j, index as u32);
            }
        }

        (state, map)
    }

    /// Append a block at rest. Returns its index.
    pub fn push_block(&mut self, material: MaterialId, mass: f32, pos: Vec2, fixity: Fixity) -> usize {
        let area = self.length * self.length;
        let inv_mass = 1.0 / mass;
        self.material.push(material);
        self.mass.push(mass);
        self.inv_mass.push(inv_mass);
        self.inv_inertia.push(SQUARE_INERTIA_COEFF * inv_mass / area);
        self.px.push(pos.x);
        self.py.push(pos.y);
        self.rz.push(0.0);
        self.vx.push(0.0);
        self.vy.push(0.0);
        self.wz.push(0.0);
        self.fx.push(0.0);
        self.fy.push(0.0);
        self.mz.push(0.0);
        self.fixity.push(fixity);
        self.px.len() - 1
    }

    pub fn set_player(&mut self, material: MaterialId, mass: f32, pos: Vec2) {
        self.player = Some(Player {
            material,
            mass,
            pos,
            vel: Vec2::zero(),
            force: Vec2::zero(),
        });
    }

    pub fn set_contact_params(&mut self, contact: ContactParams) {
        self.contact = contact;
    }

    // === Read-only accessors (renderers, tests) ===

    #[inline]
    pub fn len(&self) -> usize {
        self.px.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.px.is_empty()
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn material(&self, i: usize) -> MaterialId {
        self.material[i]
    }

    pub fn mass(&self, i: usize) -> f32 {
        self.mass[i]
    }

    pub fn position(&self, i: usize) -> Vec2 {
        Vec2::new(self.px[i], self.py[i])
    }

    pub fn orientation(&self, i: usize) -> f32 {
        self.rz[i]
    }

    pub fn velocity(&self, i: usize) -> Vec2 {
        Vec2::new(self.vx[i], self.vy[i])
    }

    pub fn angular_velocity(&self, i: usize) -> f32 {
        self.wz[i]
    }

    pub fn force(&self, i: usize) -> Vec2 {
        Vec2::new(self.fx[i], self.fy[i])
    }

    pub fn moment(&self, i: usize) -> f32 {
        self.mz[i]
    }

    pub fn fixity(&self, i: usize) -> Fixity {
        self.fixity[i]
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn contact_params(&self) -> &ContactParams {
        &self.contact
    }

    // === Direct state edits (scenario setup, host perturbations) ===

    pub fn set_position(&mut self, i: usize, pos: Vec2) {
        self.px[i] = pos.x;
        self.py[i] = pos.y;
    }

    pub fn set_orientation(&mut self, i: usize, rz: f32) {
        self.rz[i] = rz;
    }

    pub fn set_velocity(&mut self, i: usize, vel: Vec2) {
        self.vx[i] = vel.x;
        self.vy[i] = vel.y;
    }

    pub fn set_angular_velocity(&mut self, i: usize, wz: f32) {
        self.wz[i] = wz;
    }

    pub fn set_player_position(&mut self, pos: Vec2) {
        if let Some(player) = self.player.as_mut() {
            player.pos = pos;
        }
    }

    pub fn set_player_velocity(&mut self, vel: Vec2) {
        if let Some(player) = self.player.as_mut() {
            player.vel = vel;
        }
    }

    /// Sum of all block and player forces (momentum balance checks).
    pub fn net_force(&self) -> Vec2 {
        let mut sum = Vec2::zero();
        for i in 0..self.len() {
            sum = sum + self.force(i);
        }
        if let Some(player) = self.player.as_ref() {
            sum = sum + player.force;
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> MaterialRegistry {
        MaterialRegistry::from_defaults()
    }

    #[test]
    fn from_grid_assigns_fixity_by_perimeter() {
        let reg = registry();
        let rock = reg.id_by_name("Rock").expect("rock");
        let mut grid = Grid::new(3, 3);
        for i in 0..3 {
            for j in 0..3 {
                grid.set_cell(i, j, rock).expect("in bounds");
            }
        }

        let (state, map) = BodyState::from_grid(&grid, &reg, 1.0);
        assert_eq!(state.len(), 9);
        let center = map.get(1, 1).expect("center block") as usize;
        assert_eq!(state.fixity(center), Fixity::Free);
        assert_eq!(state.position(center), Vec2::new(1.5, 1.5));
        let corner = map.get(0, 0).expect("corner block") as usize;
        assert_eq!(state.fixity(corner), Fixity::Fixed);
    }

    #[test]
    fn from_grid_visits_columns_first() {
        let reg = registry();
        let wood = reg.id_by_name("Wood").expect("wood");
        let mut grid = Grid::new(2, 2);
        grid.set_cell(1, 0, wood).expect("in bounds");
        grid.set_cell(0, 1, wood).expect("in bounds");

        let (_, map) = BodyState::from_grid(&grid, &reg, 1.0);
        assert_eq!(map.get(0, 1), Some(0));
        assert_eq!(map.get(1, 0), Some(1));
    }

    #[test]
    fn player_cell_is_extracted_from_blocks() {
        let reg = registry();
        let soil = reg.id_by_name("Soil").expect("soil");
        let player = reg.player_id().expect("player");
        let mut grid = Grid::new(4, 4);
        grid.set_cell(1, 1, soil).expect("in bounds");
        grid.set_cell(2, 2, player).expect("in bounds");

        let (state, map) = BodyState::from_grid(&grid, &reg, 1.0);
        assert_eq!(state.len(), 1);
        assert_eq!(map.get(2, 2), None);
        let p = state.player().expect("player body");
        assert_eq!(p.pos, Vec2::new(2.5, 2.5));
        assert_eq!(p.mass, 1000.0);
    }

    #[test]
    fn mass_properties_follow_density() {
        let reg = registry();
        let steel = reg.id_by_name("Steel").expect("steel");
        let mut grid = Grid::new(1, 1);
        grid.set_cell(0, 0, steel).expect("in bounds");

        let (state, _) = BodyState::from_grid(&grid, &reg, 1.0);
        assert_eq!(state.mass(0), 8050.0);
        assert!((state.inv_mass[0] - 1.0 / 8050.0).abs() < 1e-12);
        assert!((state.inv_inertia[0] - 6.0 / 8050.0).abs() < 1e-9);
    }
}
