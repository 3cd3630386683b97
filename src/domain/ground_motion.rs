use serde::{Deserialize, Serialize};

/// Sampled ground displacement history, linearly interpolated.
///
/// Past the last sample the motion evaluates to `(0, 0)`; the driver only
/// uses differences between consecutive evaluations, so the boundary stops
/// moving once the record ends.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GroundMotion {
    /// Sampling interval of `ux`/`uy` [s]
    pub sample_dt: f32,
    pub ux: Vec<f32>,
    pub uy: Vec<f32>,
    /// Unit conversion applied to both components (e.g. cm -> m)
    pub scale: f32,
}

impl GroundMotion {
    pub fn new(sample_dt: f32, ux: Vec<f32>, uy: Vec<f32>, scale: f32) -> Self {
        Self { sample_dt, ux, uy, scale }
    }

    /// No motion at all.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn duration(&self) -> f32 {
        if self.ux.len() < 2 {
            return 0.0;
        }
        self.sample_dt * (self.ux.len() - 1) as f32
    }

    pub fn evaluate(&self, time: f32) -> (f32, f32) {
        if !(self.sample_dt > 0.0) || time < 0.0 {
            return (0.0, 0.0);
        }
        let mut frac = time / self.sample_dt;
        let n = frac.floor();
        // compared as floats, the cast saturates for huge sample counts
        if !(n + 1.0 < self.ux.len() as f32) {
            return (0.0, 0.0);
        }
        let n_idx = n as usize;
        frac -= n;
        let ux = self.scale * lerp(self.ux[n_idx], self.ux[n_idx + 1], frac);
        let uy = match (self.uy.get(n_idx), self.uy.get(n_idx + 1)) {
            (Some(&a), Some(&b)) => self.scale * lerp(a, b, frac),
            _ => 0.0,
        };
        (ux, uy)
    }
}

#[inline]
fn lerp(a: f32, b: f32, frac: f32) -> f32 {
    frac * b + (1.0 - frac) * a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_between_samples() {
        let gm = GroundMotion::new(0.5, vec![0.0, 1.0, -1.0], vec![0.0, 2.0, 0.0], 10.0);
        let (ux, uy) = gm.evaluate(0.25);
        assert!((ux - 5.0).abs() < 1e-5);
        assert!((uy - 10.0).abs() < 1e-5);
        let (ux, _) = gm.evaluate(0.75);
        assert!(ux.abs() < 1e-5);
    }

    #[test]
    fn zero_after_record_ends() {
        let gm = GroundMotion::new(0.5, vec![0.0, 1.0, -1.0], Vec::new(), 1.0);
        assert_eq!(gm.evaluate(1.0), (0.0, 0.0));
        assert_eq!(gm.evaluate(7.0), (0.0, 0.0));
        assert!((gm.duration() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn tiny_sample_interval_ends_the_record() {
        let gm = GroundMotion::new(1e-20, vec![0.0, 1.0], vec![0.0, 1.0], 1.0);
        assert_eq!(gm.evaluate(1.0), (0.0, 0.0));
        assert_eq!(gm.evaluate(f32::MAX), (0.0, 0.0));
    }

    #[test]
    fn missing_vertical_record_is_zero() {
        let gm = GroundMotion::new(1.0, vec![0.0, 4.0], Vec::new(), 1.0);
        let (ux, uy) = gm.evaluate(0.5);
        assert!((ux - 2.0).abs() < 1e-6);
        assert_eq!(uy, 0.0);
    }
}
