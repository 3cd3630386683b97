//! Penalty contact between the player square and block corners
//!
//! Each candidate block contributes its four rotated corners as contact
//! nodes. A node inside the player's axis-aligned square pushes along the
//! axis where it sits furthest from the player center, proportional to the
//! penetration past the half-extent on that axis. Corner forces act on the
//! block translation only; no moment is produced.

use crate::core::Vec2;

use super::state::BodyState;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContactParams {
    /// Penalty stiffness [N/m]
    pub stiffness: f32,
    /// Half-width of the player square
    pub player_half_extent: f32,
    /// Half-width of a block
    pub block_half_extent: f32,
    /// Squared center distance beyond which a block is not tested
    pub cutoff_squared: f32,
}

impl ContactParams {
    pub fn for_length(length: f32) -> Self {
        Self {
            stiffness: 1.0e4,
            player_half_extent: 0.51 * length,
            block_half_extent: 0.5 * length,
            cutoff_squared: 2.0 * length * length,
        }
    }

    pub fn with_stiffness(mut self, stiffness: f32) -> Self {
        self.stiffness = stiffness;
        self
    }
}

/// Corners of a square of half-width `half` rotated by `rz`, counter-clockwise
/// starting from the one that is bottom-left at `rz = 0`.
#[inline]
pub fn block_corners(center: Vec2, rz: f32, half: f32) -> [Vec2; 4] {
    let (s, c) = rz.sin_cos();
    let drx = (c - s) * half;
    let dry = (c + s) * half;
    [
        Vec2::new(center.x - drx, center.y - dry),
        Vec2::new(center.x + dry, center.y - drx),
        Vec2::new(center.x + drx, center.y + dry),
        Vec2::new(center.x - dry, center.y + drx),
    ]
}

/// Force on the player from one contact node, zero if the node is outside.
#[inline]
fn node_force(player_pos: Vec2, node: Vec2, params: &ContactParams) -> Vec2 {
    let half = params.player_half_extent;
    let dist = player_pos - node;
    if dist.x.abs() >= half || dist.y.abs() >= half {
        return Vec2::zero();
    }

    let k = params.stiffness;
    if dist.x.abs() > dist.y.abs() {
        // node on the left (dist > 0) or right face of the player
        let pen = if dist.x > 0.0 { dist.x - half } else { dist.x + half };
        Vec2::new(-k * pen, 0.0)
    } else {
        // node on the bottom (dist > 0) or top face of the player
        let pen = if dist.y > 0.0 { dist.y - half } else { dist.y + half };
        Vec2::new(0.0, -k * pen)
    }
}

impl BodyState {
    /// Player-block penalty contact. No-op without a player.
    pub fn apply_contact_forces(&mut self) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        let params = self.contact;

        for i in 0..self.px.len() {
            let center = Vec2::new(self.px[i], self.py[i]);
            if (player.pos - center).length_squared() >= params.cutoff_squared {
                continue;
            }

            for node in block_corners(center, self.rz[i], params.block_half_extent) {
                let fc = node_force(player.pos, node, &params);
                self.fx[i] -= fc.x;
                self.fy[i] -= fc.y;
                player.force = player.force + fc;
            }
        }
    }
}
