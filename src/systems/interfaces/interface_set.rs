//! One group of faces sharing a traction law
//!
//! Each face is integrated with two-point Gauss quadrature along the shared
//! edge. Relative kinematics are corotational: each block's half-edge
//! vector is rotated by that block's own orientation, and the face normal
//! is the bisector of the two orientations.
//!
//! ```text
//!  -----o . . . . . o-----
//!  #####|   2 x     |#####
//!   A   |     :-> N |   B
//!  #####|   1 x     |#####
//!  -----o . . . . . o-----
//! ```

use crate::systems::bodies::BodyState;

use super::traction::{Axis, QuadratureBatch, TractionLaw, TractionModel};

/// Gauss point offset along the half edge.
const GAUSS_OFFSET: f32 = 0.577_350_26; // 1/sqrt(3)

/// Ordered block pair sharing a face.
///
/// For X-faces `a` is the left block and `b` the right one; for Y-faces
/// `a` is lower and `b` upper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    pub a: u32,
    pub b: u32,
}

/// Reused per-call workspace: quadrature kinematics plus moment arms
/// relative to the `a` (minus) and `b` (plus) block centers.
#[derive(Clone, Debug, Default)]
struct Scratch {
    batch: QuadratureBatch,
    rxm: Vec<f32>,
    rym: Vec<f32>,
    rxp: Vec<f32>,
    ryp: Vec<f32>,
}

impl Scratch {
    fn resize(&mut self, points: usize) {
        self.batch.resize(points);
        self.rxm.resize(points, 0.0);
        self.rym.resize(points, 0.0);
        self.rxp.resize(points, 0.0);
        self.ryp.resize(points, 0.0);
    }
}

/// Per-block rotation terms scaled by the half edge.
#[derive(Clone, Copy)]
struct HalfEdge {
    sin: f32,
    cos: f32,
    dsin: f32,
    dcos: f32,
}

impl HalfEdge {
    #[inline]
    fn of(bodies: &BodyState, i: usize, half: f32) -> Self {
        let (s, c) = bodies.rz[i].sin_cos();
        let sin = s * half;
        let cos = c * half;
        let w = bodies.wz[i];
        Self { sin, cos, dsin: cos * w, dcos: -sin * w }
    }
}

pub struct InterfaceSet {
    law: TractionLaw,
    x_faces: Vec<Face>,
    y_faces: Vec<Face>,
    scratch: Scratch,
}

impl InterfaceSet {
    pub fn new(law: TractionLaw) -> Self {
        Self {
            law,
            x_faces: Vec::new(),
            y_faces: Vec::new(),
            scratch: Scratch::default(),
        }
    }

    pub fn insert_face_x(&mut self, left: u32, right: u32) {
        self.x_faces.push(Face { a: left, b: right });
    }

    pub fn insert_face_y(&mut self, lower: u32, upper: u32) {
        self.y_faces.push(Face { a: lower, b: upper });
    }

    /// Size law history for the final face counts. Call once after all
    /// faces are inserted.
    pub fn initialize(&mut self) {
        self.law.initialize(2 * self.x_faces.len(), 2 * self.y_faces.len());
    }

    pub fn law(&self) -> &TractionLaw {
        &self.law
    }

    pub fn x_faces(&self) -> &[Face] {
        &self.x_faces
    }

    pub fn y_faces(&self) -> &[Face] {
        &self.y_faces
    }

    pub fn face_count(&self) -> usize {
        self.x_faces.len() + self.y_faces.len()
    }

    /// Accumulate cohesive forces and moments of every face into `bodies`.
    ///
    /// Expects `initialize()` after the last inserted face; a damage law
    /// that finds its history mis-sized restarts it undamaged.
    /// Returns the number of quadrature points that failed during this call.
    pub fn apply_forces(&mut self, bodies: &mut BodyState) -> usize {
        let mut newly_failed = 0;
        if !self.x_faces.is_empty() {
            self.gather_x(bodies);
            newly_failed += self.law.compute_traction(&mut self.scratch.batch, 1.0 / bodies.length, Axis::X);
            scatter(&self.x_faces, &self.scratch, bodies);
        }
        if !self.y_faces.is_empty() {
            self.gather_y(bodies);
            newly_failed += self.law.compute_traction(&mut self.scratch.batch, 1.0 / bodies.length, Axis::Y);
            scatter(&self.y_faces, &self.scratch, bodies);
        }
        newly_failed
    }

    fn gather_x(&mut self, bodies: &BodyState) {
        let half = 0.5 * bodies.length;
        let s = &mut self.scratch;
        s.resize(2 * self.x_faces.len());
        let b = &mut s.batch;

        for (f, face) in self.x_faces.iter().enumerate() {
            let (l, r) = (face.a as usize, face.b as usize);
            let (p1, p2) = (2 * f, 2 * f + 1);
            let el = HalfEdge::of(bodies, l, half);
            let er = HalfEdge::of(bodies, r, half);

            let rz_avg = 0.5 * (bodies.rz[l] + bodies.rz[r]);
            let (ns, nc) = rz_avg.sin_cos();
            b.nx[p1] = nc;
            b.ny[p1] = ns;
            b.nx[p2] = nc;
            b.ny[p2] = ns;

            let ux0 = bodies.px[r] - bodies.px[l] - er.cos - el.cos;
            let uy0 = bodies.py[r] - bodies.py[l] - er.sin - el.sin;
            let dsin = (er.sin - el.sin) * GAUSS_OFFSET;
            let dcos = (er.cos - el.cos) * GAUSS_OFFSET;
            b.ux[p1] = ux0 + dsin;
            b.uy[p1] = uy0 - dcos;
            b.ux[p2] = ux0 - dsin;
            b.uy[p2] = uy0 + dcos;

            let vx0 = bodies.vx[r] - bodies.vx[l] - er.dcos - el.dcos;
            let vy0 = bodies.vy[r] - bodies.vy[l] - er.dsin - el.dsin;
            let ddsin = (er.dsin - el.dsin) * GAUSS_OFFSET;
            let ddcos = (er.dcos - el.dcos) * GAUSS_OFFSET;
            b.vx[p1] = vx0 + ddsin;
            b.vy[p1] = vy0 - ddcos;
            b.vx[p2] = vx0 - ddsin;
            b.vy[p2] = vy0 + ddcos;

            s.rxm[p1] = el.cos + el.sin * GAUSS_OFFSET + 0.5 * b.ux[p1];
            s.rym[p1] = el.sin - el.cos * GAUSS_OFFSET + 0.5 * b.uy[p1];
            s.rxm[p2] = el.cos - el.sin * GAUSS_OFFSET + 0.5 * b.ux[p2];
            s.rym[p2] = el.sin + el.cos * GAUSS_OFFSET + 0.5 * b.uy[p2];
            s.rxp[p1] = -er.cos + er.sin * GAUSS_OFFSET - 0.5 * b.ux[p1];
            s.ryp[p1] = -er.sin - er.cos * GAUSS_OFFSET - 0.5 * b.uy[p1];
            s.rxp[p2] = -er.cos - er.sin * GAUSS_OFFSET - 0.5 * b.ux[p2];
            s.ryp[p2] = -er.sin + er.cos * GAUSS_OFFSET - 0.5 * b.uy[p2];
        }
    }

    fn gather_y(&mut self, bodies: &BodyState) {
        let half = 0.5 * bodies.length;
        let s = &mut self.scratch;
        s.resize(2 * self.y_faces.len());
        let b = &mut s.batch;

        for (f, face) in self.y_faces.iter().enumerate() {
            let (lo, up) = (face.a as usize, face.b as usize);
            let (p1, p2) = (2 * f, 2 * f + 1);
            let el = HalfEdge::of(bodies, lo, half);
            let eu = HalfEdge::of(bodies, up, half);

            let rz_avg = 0.5 * (bodies.rz[lo] + bodies.rz[up]);
            let (ns, nc) = rz_avg.sin_cos();
            b.nx[p1] = -ns;
            b.ny[p1] = nc;
            b.nx[p2] = -ns;
            b.ny[p2] = nc;

            let ux0 = bodies.px[up] - bodies.px[lo] + eu.sin + el.sin;
            let uy0 = bodies.py[up] - bodies.py[lo] - eu.cos - el.cos;
            let dsin = (eu.sin - el.sin) * GAUSS_OFFSET;
            let dcos = (eu.cos - el.cos) * GAUSS_OFFSET;
            b.ux[p1] = ux0 + dcos;
            b.uy[p1] = uy0 + dsin;
            b.ux[p2] = ux0 - dcos;
            b.uy[p2] = uy0 - dsin;

            let vx0 = bodies.vx[up] - bodies.vx[lo] + eu.dsin + el.dsin;
            let vy0 = bodies.vy[up] - bodies.vy[lo] - eu.dcos - el.dcos;
            let ddsin = (eu.dsin - el.dsin) * GAUSS_OFFSET;
            let ddcos = (eu.dcos - el.dcos) * GAUSS_OFFSET;
            b.vx[p1] = vx0 + ddcos;
            b.vy[p1] = vy0 + ddsin;
            b.vx[p2] = vx0 - ddcos;
            b.vy[p2] = vy0 - ddsin;

            s.rxm[p1] = -el.sin + el.cos * GAUSS_OFFSET + 0.5 * b.ux[p1];
            s.rym[p1] = el.cos + el.sin * GAUSS_OFFSET + 0.5 * b.uy[p1];
            s.rxm[p2] = -el.sin - el.cos * GAUSS_OFFSET + 0.5 * b.ux[p2];
            s.rym[p2] = el.cos - el.sin * GAUSS_OFFSET + 0.5 * b.uy[p2];
            s.rxp[p1] = eu.sin + eu.cos * GAUSS_OFFSET - 0.5 * b.ux[p1];
            s.ryp[p1] = -eu.cos + eu.sin * GAUSS_OFFSET - 0.5 * b.uy[p1];
            s.rxp[p2] = eu.sin - eu.cos * GAUSS_OFFSET - 0.5 * b.ux[p2];
            s.ryp[p2] = -eu.cos - eu.sin * GAUSS_OFFSET - 0.5 * b.uy[p2];
        }
    }
}

/// Sum point tractions into equal and opposite face forces, plus the
/// moment of each point traction about each block center.
///
/// Both arms of a point end at the midpoint of its gap, and forces and
/// moments share the `dx` weight, so the pair exerts no net moment.
fn scatter(faces: &[Face], s: &Scratch, bodies: &mut BodyState) {
    let dx = bodies.length;
    let (tx, ty) = (&s.batch.tx, &s.batch.ty);

    for (f, face) in faces.iter().enumerate() {
        let (a, b) = (face.a as usize, face.b as usize);
        let (p1, p2) = (2 * f, 2 * f + 1);

        let fx = (tx[p1] + tx[p2]) * dx;
        let fy = (ty[p1] + ty[p2]) * dx;
        bodies.fx[a] += fx;
        bodies.fy[a] += fy;
        bodies.fx[b] -= fx;
        bodies.fy[b] -= fy;

        bodies.mz[a] += (s.rxm[p1] * ty[p1] - s.rym[p1] * tx[p1] + s.rxm[p2] * ty[p2] - s.rym[p2] * tx[p2]) * dx;
        bodies.mz[b] -= (s.rxp[p1] * ty[p1] - s.ryp[p1] * tx[p1] + s.rxp[p2] * ty[p2] - s.ryp[p2] * tx[p2]) * dx;
    }
}
