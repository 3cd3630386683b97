use super::state::{BodyState, Fixity};

impl BodyState {
    /// Semi-implicit Euler step: `v += dt F / m`, then `x += dt v`.
    ///
    /// Fixed blocks take no dynamic contribution. Their velocity stays what
    /// `apply_prescribed_boundary_motion` wrote this substep and their
    /// position was already advanced by the prescribed increment.
    pub fn time_integrate(&mut self, dt: f32) {
        for i in 0..self.px.len() {
            if self.fixity[i] == Fixity::Fixed {
                continue;
            }
            self.vx[i] += dt * self.inv_mass[i] * self.fx[i];
            self.vy[i] += dt * self.inv_mass[i] * self.fy[i];
            self.wz[i] += dt * self.inv_inertia[i] * self.mz[i];
            self.px[i] += dt * self.vx[i];
            self.py[i] += dt * self.vy[i];
            self.rz[i] += dt * self.wz[i];
        }

        if let Some(player) = self.player.as_mut() {
            player.vel.x += dt * player.force.x / player.mass;
            player.vel.y += dt * player.force.y / player.mass;
            player.pos.x += dt * player.vel.x;
            player.pos.y += dt * player.vel.y;
        }
    }
}
