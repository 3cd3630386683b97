//! Traction-separation laws
//!
//! A law maps relative displacement/velocity at a batch of quadrature
//! points to a traction (force per unit length) at each point. Laws are a
//! closed set dispatched through `TractionLaw`; each variant owns whatever
//! per-point history it needs, sized once by `initialize`.

use serde::{Deserialize, Serialize};

/// Face orientation: X-faces separate left/right neighbours, Y-faces
/// separate lower/upper neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// Per-call quadrature workspace.
///
/// Inputs are `ux..ny`, outputs `tx, ty`. Every array holds exactly
/// `len()` points; `resize` is called with the current workload before
/// each batch, so no face is ever dropped.
#[derive(Clone, Debug, Default)]
pub struct QuadratureBatch {
    pub ux: Vec<f32>,
    pub uy: Vec<f32>,
    pub vx: Vec<f32>,
    pub vy: Vec<f32>,
    pub nx: Vec<f32>,
    pub ny: Vec<f32>,
    pub tx: Vec<f32>,
    pub ty: Vec<f32>,
}

impl QuadratureBatch {
    pub fn with_len(len: usize) -> Self {
        let mut batch = Self::default();
        batch.resize(len);
        batch
    }

    pub fn resize(&mut self, len: usize) {
        for buf in [
            &mut self.ux,
            &mut self.uy,
            &mut self.vx,
            &mut self.vy,
            &mut self.nx,
            &mut self.ny,
            &mut self.tx,
            &mut self.ty,
        ] {
            buf.resize(len, 0.0);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ux.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ux.is_empty()
    }
}

/// Common interface of every constitutive model.
pub trait TractionModel {
    /// Size per-point history for the final face counts of a set.
    fn initialize(&mut self, x_points: usize, y_points: usize);

    /// Fill `batch.tx/ty` from the kinematics in `batch`.
    ///
    /// `inv_dx` is the inverse characteristic length. Returns how many
    /// points failed during this call.
    fn compute_traction(&mut self, batch: &mut QuadratureBatch, inv_dx: f32, axis: Axis) -> usize;
}

// === Kelvin-Voigt ===

/// Linear spring-dashpot acting directly on global x/y components.
///
/// No rotation into the face frame, so only valid for small relative
/// rotation between neighbours.
#[derive(Clone, Debug, PartialEq)]
pub struct KelvinVoigt {
    pub stiffness: f32,
    pub viscosity: f32,
}

impl KelvinVoigt {
    pub fn new(stiffness: f32, viscosity: f32) -> Self {
        Self { stiffness, viscosity }
    }
}

#[inline]
fn kelvin_voigt_traction(stiffness: f32, viscosity: f32, batch: &mut QuadratureBatch, inv_dx: f32) {
    let e_div_dx = stiffness * inv_dx;
    let eta_div_dx = viscosity * inv_dx;
    for i in 0..batch.len() {
        batch.tx[i] = e_div_dx * batch.ux[i] + eta_div_dx * batch.vx[i];
        batch.ty[i] = e_div_dx * batch.uy[i] + eta_div_dx * batch.vy[i];
    }
}

impl TractionModel for KelvinVoigt {
    fn initialize(&mut self, _x_points: usize, _y_points: usize) {}

    fn compute_traction(&mut self, batch: &mut QuadratureBatch, inv_dx: f32, _axis: Axis) -> usize {
        kelvin_voigt_traction(self.stiffness, self.viscosity, batch, inv_dx);
        0
    }
}

// === Brittle ===

/// Kelvin-Voigt response with a stored failure stress.
///
/// The threshold is carried for callers that want to inspect it; the
/// traction itself is exactly the Kelvin-Voigt one and nothing ever fails.
#[derive(Clone, Debug, PartialEq)]
pub struct Brittle {
    pub failure_stress: f32,
    pub stiffness: f32,
    pub viscosity: f32,
}

impl Brittle {
    pub fn new(failure_stress: f32, stiffness: f32, viscosity: f32) -> Self {
        Self { failure_stress, stiffness, viscosity }
    }
}

impl TractionModel for Brittle {
    fn initialize(&mut self, _x_points: usize, _y_points: usize) {}

    fn compute_traction(&mut self, batch: &mut QuadratureBatch, inv_dx: f32, _axis: Axis) -> usize {
        kelvin_voigt_traction(self.stiffness, self.viscosity, batch, inv_dx);
        0
    }
}

// === Cohesive damage ===

/// Floor on the softening branch length; below it failure is instantaneous.
const BRITTLE_SOFTENING_EPS: f32 = 1.0e-16;

/// Per-quadrature-point damage history for one face axis.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DamageHistory {
    stiffness: Vec<f32>,
    failed: Vec<bool>,
}

impl DamageHistory {
    fn reset(&mut self, len: usize, stiffness: f32) {
        self.stiffness.clear();
        self.stiffness.resize(len, stiffness);
        self.failed.clear();
        self.failed.resize(len, false);
    }

    pub fn len(&self) -> usize {
        self.stiffness.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stiffness.is_empty()
    }

    /// Current secant stiffness of point `i`.
    pub fn stiffness(&self, i: usize) -> f32 {
        self.stiffness[i]
    }

    pub fn is_failed(&self, i: usize) -> bool {
        self.failed[i]
    }

    pub fn failed_count(&self) -> usize {
        self.failed.iter().filter(|&&f| f).count()
    }
}

/// Bilinear cohesive law with irreversible softening.
///
/// Strains are displacements over the characteristic length. Below the
/// failure strain the response is linear; past it the secant stiffness
/// ratchets down along the softening branch until it reaches zero, at
/// which point the point is failed for good. Compression always sees the
/// undamaged stiffness and viscosity.
#[derive(Clone, Debug, PartialEq)]
pub struct CohesiveDamage {
    pub stiffness: f32,
    pub viscosity: f32,
    pub failure_stress: f32,
    pub fracture_energy: f32,
    failure_strain: f32,
    softening: f32,
    x_history: DamageHistory,
    y_history: DamageHistory,
}

impl CohesiveDamage {
    pub fn new(failure_stress: f32, fracture_energy: f32, stiffness: f32, viscosity: f32) -> Self {
        let failure_strain = failure_stress / stiffness;
        let max_strain = 2.0 * fracture_energy / failure_stress;
        let softening = if max_strain > failure_strain {
            // stable crack growth
            failure_stress / (max_strain - failure_strain)
        } else {
            // unstable crack growth
            failure_stress / BRITTLE_SOFTENING_EPS
        };

        Self {
            stiffness,
            viscosity,
            failure_stress,
            fracture_energy,
            failure_strain,
            softening,
            x_history: DamageHistory::default(),
            y_history: DamageHistory::default(),
        }
    }

    /// Build from strain-space parameters: the law peaks at
    /// `failure_strain` and reaches zero traction at `max_strain`.
    pub fn from_strains(stiffness: f32, viscosity: f32, failure_strain: f32, max_strain: f32) -> Self {
        let failure_stress = stiffness * failure_strain;
        let fracture_energy = 0.5 * failure_stress * max_strain;
        Self::new(failure_stress, fracture_energy, stiffness, viscosity)
    }

    pub fn failure_strain(&self) -> f32 {
        self.failure_strain
    }

    pub fn softening_modulus(&self) -> f32 {
        self.softening
    }

    pub fn history(&self, axis: Axis) -> &DamageHistory {
        match axis {
            Axis::X => &self.x_history,
            Axis::Y => &self.y_history,
        }
    }

    pub fn failed_points(&self) -> usize {
        self.x_history.failed_count() + self.y_history.failed_count()
    }

    pub fn total_points(&self) -> usize {
        self.x_history.len() + self.y_history.len()
    }
}

impl TractionModel for CohesiveDamage {
    fn initialize(&mut self, x_points: usize, y_points: usize) {
        self.x_history.reset(x_points, self.stiffness);
        self.y_history.reset(y_points, self.stiffness);
    }

    fn compute_traction(&mut self, batch: &mut QuadratureBatch, inv_dx: f32, axis: Axis) -> usize {
        let stiffness = self.stiffness;
        let viscosity = self.viscosity;
        let eta_div_e = viscosity / stiffness;
        let failure_stress = self.failure_stress;
        let failure_strain = self.failure_strain;
        let softening = self.softening;

        let history = match axis {
            Axis::X => &mut self.x_history,
            Axis::Y => &mut self.y_history,
        };
        if history.len() != batch.len() {
            log::warn!(
                "damage history has {} points for {} quadrature points; starting them undamaged",
                history.len(),
                batch.len()
            );
            history.reset(batch.len(), stiffness);
        }

        let mut newly_failed = 0;
        for i in 0..batch.len() {
            if history.failed[i] {
                batch.tx[i] = 0.0;
                batch.ty[i] = 0.0;
                continue;
            }

            let (nx, ny) = (batch.nx[i], batch.ny[i]);

            // { un } = [ +nx +ny ] { ux }
            // { ut } = [ -ny +nx ] { uy }
            let un = (nx * batch.ux[i] + ny * batch.uy[i]) * inv_dx;
            let ut = (-ny * batch.ux[i] + nx * batch.uy[i]) * inv_dx;
            let vn = (nx * batch.vx[i] + ny * batch.vy[i]) * inv_dx;
            let vt = (-ny * batch.vx[i] + nx * batch.vy[i]) * inv_dx;

            let un_tensile = un.max(0.0);
            let un_compressive = un - un_tensile;
            let u = (un_tensile * un_tensile + ut * ut).sqrt();

            let trial = (failure_stress - softening * (u - failure_strain)) / u.max(failure_strain);
            let e_damaged = trial.min(history.stiffness[i]).max(0.0);
            history.stiffness[i] = e_damaged;
            if e_damaged == 0.0 {
                history.failed[i] = true;
                newly_failed += 1;
            }

            let damaged_viscosity = eta_div_e * e_damaged;
            let mut tn = e_damaged * un_tensile + damaged_viscosity * vn;
            let tt = e_damaged * ut + damaged_viscosity * vt;
            if un_tensile == 0.0 {
                tn += stiffness * un_compressive + viscosity * vn;
            }

            // { tx } = [ +nx -ny ] { tn }
            // { ty } = [ +ny +nx ] { tt }
            batch.tx[i] = nx * tn - ny * tt;
            batch.ty[i] = ny * tn + nx * tt;
        }
        newly_failed
    }
}

// === Dispatch ===

/// Closed set of traction laws owned by an interface set.
#[derive(Clone, Debug, PartialEq)]
pub enum TractionLaw {
    KelvinVoigt(KelvinVoigt),
    Brittle(Brittle),
    CohesiveDamage(CohesiveDamage),
}

impl TractionLaw {
    pub fn name(&self) -> &'static str {
        match self {
            TractionLaw::KelvinVoigt(_) => "kelvin-voigt",
            TractionLaw::Brittle(_) => "brittle",
            TractionLaw::CohesiveDamage(_) => "cohesive-damage",
        }
    }

    /// Quadrature points that have failed permanently (0 for laws without damage).
    pub fn failed_points(&self) -> usize {
        match self {
            TractionLaw::CohesiveDamage(law) => law.failed_points(),
            _ => 0,
        }
    }

    /// Fraction of quadrature points that have failed, in [0, 1].
    pub fn damage_fraction(&self) -> f32 {
        match self {
            TractionLaw::CohesiveDamage(law) if law.total_points() > 0 => {
                law.failed_points() as f32 / law.total_points() as f32
            }
            _ => 0.0,
        }
    }
}

impl TractionModel for TractionLaw {
    fn initialize(&mut self, x_points: usize, y_points: usize) {
        match self {
            TractionLaw::KelvinVoigt(law) => law.initialize(x_points, y_points),
            TractionLaw::Brittle(law) => law.initialize(x_points, y_points),
            TractionLaw::CohesiveDamage(law) => law.initialize(x_points, y_points),
        }
    }

    fn compute_traction(&mut self, batch: &mut QuadratureBatch, inv_dx: f32, axis: Axis) -> usize {
        match self {
            TractionLaw::KelvinVoigt(law) => law.compute_traction(batch, inv_dx, axis),
            TractionLaw::Brittle(law) => law.compute_traction(batch, inv_dx, axis),
            TractionLaw::CohesiveDamage(law) => law.compute_traction(batch, inv_dx, axis),
        }
    }
}

/// Parameters of the default cohesive law, in strain space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CohesiveDefaults {
    pub stiffness: f32,
    pub viscosity: f32,
    pub failure_strain: f32,
    pub max_strain: f32,
}

impl Default for CohesiveDefaults {
    fn default() -> Self {
        Self {
            stiffness: 200.0e4,
            viscosity: 100.0e3,
            failure_strain: 5.0e-2,
            max_strain: 5.0e-1,
        }
    }
}

impl CohesiveDefaults {
    pub fn build(&self) -> TractionLaw {
        TractionLaw::CohesiveDamage(CohesiveDamage::from_strains(
            self.stiffness,
            self.viscosity,
            self.failure_strain,
            self.max_strain,
        ))
    }
}
