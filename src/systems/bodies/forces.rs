//! Force kernels - each is one pass over all blocks plus the player

use super::state::{BodyState, Fixity};

impl BodyState {
    /// Clear accumulated forces and moments. First stage of every substep.
    pub fn zero_forces(&mut self) {
        self.fx.fill(0.0);
        self.fy.fill(0.0);
        self.mz.fill(0.0);
        if let Some(player) = self.player.as_mut() {
            player.force.x = 0.0;
            player.force.y = 0.0;
        }
    }

    /// Kinematic boundary condition for fixed blocks.
    ///
    /// Moves every `Fixity::Fixed` block by `(dux, duy)` and overwrites its
    /// velocity with `(dux/dt, duy/dt)`. Free blocks are untouched.
    pub fn apply_prescribed_boundary_motion(&mut self, dux: f32, duy: f32, dt: f32) {
        let vx = dux / dt;
        let vy = duy / dt;
        for i in 0..self.len() {
            if self.fixity[i] == Fixity::Fixed {
                self.px[i] += dux;
                self.py[i] += duy;
                self.vx[i] = vx;
                self.vy[i] = vy;
            }
        }
    }

    /// Mass-proportional body force (gravity).
    pub fn apply_body_force(&mut self, bx: f32, by: f32) {
        for i in 0..self.len() {
            self.fx[i] += self.mass[i] * bx;
            self.fy[i] += self.mass[i] * by;
        }

        if let Some(player) = self.player.as_mut() {
            player.force.x += player.mass * bx;
            player.force.y += player.mass * by;
        }
    }

    /// Uniform external force, not scaled by mass.
    pub fn apply_acceleration(&mut self, ax: f32, ay: f32) {
        for i in 0..self.len() {
            self.fx[i] += ax;
            self.fy[i] += ay;
        }

        if let Some(player) = self.player.as_mut() {
            player.force.x += ax;
            player.force.y += ay;
        }
    }

    /// Quadratic drag: `f -= c |v|^2 v`, `m -= c w^2 w`.
    /// The player only gets the translational part.
    pub fn apply_drag_force(&mut self, c: f32) {
        for i in 0..self.len() {
            let drag_force = c * (self.vx[i] * self.vx[i] + self.vy[i] * self.vy[i]);
            let drag_moment = c * (self.wz[i] * self.wz[i]);
            self.fx[i] -= drag_force * self.vx[i];
            self.fy[i] -= drag_force * self.vy[i];
            self.mz[i] -= drag_moment * self.wz[i];
        }

        if let Some(player) = self.player.as_mut() {
            let drag_force = c * player.vel.length_squared();
            player.force.x -= drag_force * player.vel.x;
            player.force.y -= drag_force * player.vel.y;
        }
    }
}
