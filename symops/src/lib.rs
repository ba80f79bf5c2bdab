//! Space-group operations as seen by plane-wave coefficients.
//!
//! An operation `{A|T}` carries
//! - `A`, an integer rotation acting on direct-lattice fractional
//!   coordinates (`x' = A x + T`),
//! - `T`, the fractional translation, kept exactly as supplied,
//! - `S`, the 2x2 matrix acting on spinor components (identity by default).
//!
//! A k-point (and every G-vector, in reciprocal fractional coordinates)
//! transforms with `B = A^-T`.

use dwconsts::*;
use thiserror::Error;
use vector3::*;

/// Integer 3x3 rotation matrix in fractional-coordinate basis.
///
/// For crystallographic operations this is unimodular with
/// determinant `+1` (proper) or `-1` (improper).
pub type Rotation = [[i32; 3]; 3];

pub mod spinor;
pub use spinor::*;

pub const IDENTITY_ROTATION: Rotation = [[1, 0, 0], [0, 1, 0], [0, 0, 1]];

#[derive(Clone, Debug, PartialEq)]
pub struct SymOp {
    rotation: Rotation,
    rotation_inv: Rotation,
    translation: Vector3f64,
    spinor: SpinorMatrix,
}

#[derive(Error, Clone, Debug, PartialEq)]
pub enum SymOpError {
    #[error("rotation determinant must be ±1, got {det}")]
    NonUnimodularRotation { det: i32 },

    #[error("symmetry group is empty")]
    EmptyGroup,

    #[error("symmetry group is missing identity")]
    MissingIdentity,

    #[error("symmetry op {index} has no inverse in group")]
    MissingInverse { index: usize },

    #[error("symmetry group is not closed: op {left} composed with op {right} is missing")]
    NotClosed { left: usize, right: usize },

    #[error("group generated from the given operations exceeds {limit} elements")]
    GroupTooLarge { limit: usize },
}

impl SymOp {
    /// Operation with identity spinor part. Fails unless `det(A) = ±1`.
    pub fn new(rotation: Rotation, translation: Vector3f64) -> Result<Self, SymOpError> {
        let det = determinant(rotation);
        if det != 1 && det != -1 {
            return Err(SymOpError::NonUnimodularRotation { det });
        }

        Ok(Self {
            rotation,
            rotation_inv: inverse_unimodular(rotation, det),
            translation,
            spinor: spinor_identity(),
        })
    }

    pub fn identity() -> Self {
        Self {
            rotation: IDENTITY_ROTATION,
            rotation_inv: IDENTITY_ROTATION,
            translation: Vector3f64::zeros(),
            spinor: spinor_identity(),
        }
    }

    /// Spatial inversion `-I`; acts trivially on spin.
    pub fn inversion() -> Self {
        let rotation = [[-1, 0, 0], [0, -1, 0], [0, 0, -1]];
        Self {
            rotation,
            rotation_inv: rotation,
            translation: Vector3f64::zeros(),
            spinor: spinor_identity(),
        }
    }

    pub fn with_spinor(mut self, spinor: SpinorMatrix) -> Self {
        self.spinor = spinor;
        self
    }

    pub fn rotation(&self) -> &Rotation {
        &self.rotation
    }

    pub fn rotation_inverse(&self) -> &Rotation {
        &self.rotation_inv
    }

    /// `B = A^-T`, the action on reciprocal fractional coordinates.
    pub fn rotation_inverse_transpose(&self) -> Rotation {
        transpose(self.rotation_inv)
    }

    pub fn translation(&self) -> Vector3f64 {
        self.translation
    }

    pub fn spinor(&self) -> &SpinorMatrix {
        &self.spinor
    }

    pub fn determinant(&self) -> i32 {
        determinant(self.rotation)
    }

    /// `A T`
    pub fn rotated_translation(&self) -> Vector3f64 {
        mat_vec_i32(&self.rotation, &self.translation)
    }

    /// `A^-1 T`
    pub fn inverse_rotated_translation(&self) -> Vector3f64 {
        mat_vec_i32(&self.rotation_inv, &self.translation)
    }

    /// `B k` with `B = A^-T`.
    pub fn apply_to_kpoint(&self, k: &Vector3f64) -> Vector3f64 {
        mat_vec_i32(&self.rotation_inverse_transpose(), k)
    }

    /// `B g`, exact for integer reciprocal vectors.
    pub fn apply_to_miller(&self, g: &Vector3i32) -> Vector3i32 {
        let b = self.rotation_inverse_transpose();
        Vector3i32::new(
            b[0][0] * g.x + b[0][1] * g.y + b[0][2] * g.z,
            b[1][0] * g.x + b[1][1] * g.y + b[1][2] * g.z,
            b[2][0] * g.x + b[2][1] * g.y + b[2][2] * g.z,
        )
    }

    /// Group composition `self ∘ rhs`:
    /// `{A1|T1}{A2|T2} = {A1 A2 | A1 T2 + T1}`, spinor parts multiply.
    pub fn compose(&self, rhs: &SymOp) -> SymOp {
        SymOp {
            rotation: mat_mul_i32(&self.rotation, &rhs.rotation),
            rotation_inv: mat_mul_i32(&rhs.rotation_inv, &self.rotation_inv),
            translation: mat_vec_i32(&self.rotation, &rhs.translation) + self.translation,
            spinor: spinor_mul(&self.spinor, &rhs.spinor),
        }
    }

    /// `{A|T}^-1 = {A^-1 | -A^-1 T}`, spinor part `S^+`.
    pub fn inverse(&self) -> SymOp {
        SymOp {
            rotation: self.rotation_inv,
            rotation_inv: self.rotation,
            translation: self.inverse_rotated_translation() * -1.0,
            spinor: spinor_adjoint(&self.spinor),
        }
    }
}

/// Determinant of 3x3 integer rotation matrix.
pub fn determinant(rotation: Rotation) -> i32 {
    rotation[0][0] * (rotation[1][1] * rotation[2][2] - rotation[1][2] * rotation[2][1])
        - rotation[0][1] * (rotation[1][0] * rotation[2][2] - rotation[1][2] * rotation[2][0])
        + rotation[0][2] * (rotation[1][0] * rotation[2][1] - rotation[1][1] * rotation[2][0])
}

/// Validates that `ops` behaves like a finite symmetry group under composition.
///
/// Translations are compared modulo lattice vectors and spinor parts are
/// ignored, so double-group sign choices do not matter.
pub fn validate_group(ops: &[SymOp], tol: f64) -> Result<(), SymOpError> {
    if ops.is_empty() {
        return Err(SymOpError::EmptyGroup);
    }

    let identity = SymOp::identity();
    if !ops.iter().any(|op| sym_op_approx_eq(op, &identity, tol)) {
        return Err(SymOpError::MissingIdentity);
    }

    for (idx, op) in ops.iter().enumerate() {
        let has_inverse = ops.iter().any(|candidate| {
            let left = op.compose(candidate);
            let right = candidate.compose(op);
            sym_op_approx_eq(&left, &identity, tol) && sym_op_approx_eq(&right, &identity, tol)
        });
        if !has_inverse {
            return Err(SymOpError::MissingInverse { index: idx });
        }
    }

    for (i, left) in ops.iter().enumerate() {
        for (j, right) in ops.iter().enumerate() {
            let composed = left.compose(right);
            if !ops
                .iter()
                .any(|candidate| sym_op_approx_eq(&composed, candidate, tol))
            {
                return Err(SymOpError::NotClosed { left: i, right: j });
            }
        }
    }

    Ok(())
}

/// Closes `generators` under composition (identity included).
///
/// Fails once more than `limit` distinct operations appear, which happens
/// for translations that are not commensurate with the lattice.
pub fn generate_group(generators: &[SymOp], tol: f64, limit: usize) -> Result<Vec<SymOp>, SymOpError> {
    let mut group = vec![SymOp::identity()];
    let mut ibeg = 0;

    while ibeg < group.len() {
        let iend = group.len();

        for i in ibeg..iend {
            for generator in generators.iter() {
                let candidate = group[i].compose(generator);

                if !group.iter().any(|op| sym_op_approx_eq(op, &candidate, tol)) {
                    if group.len() == limit {
                        return Err(SymOpError::GroupTooLarge { limit });
                    }
                    group.push(candidate);
                }
            }
        }

        ibeg = iend;
    }

    Ok(group)
}

/// Indices of the operations that map `k` to itself modulo a reciprocal
/// lattice vector, i.e. the little group of `k`.
pub fn little_group_indices(k: &Vector3f64, ops: &[SymOp], tol: f64) -> Vec<usize> {
    ops.iter()
        .enumerate()
        .filter(|(_, op)| approx_eq_mod_lattice(&op.apply_to_kpoint(k), k, tol))
        .map(|(idx, _)| idx)
        .collect()
}

/// Same rotation, translations equal modulo lattice.
pub fn sym_op_approx_eq(lhs: &SymOp, rhs: &SymOp, tol: f64) -> bool {
    lhs.rotation == rhs.rotation && approx_eq_mod_lattice(&lhs.translation, &rhs.translation, tol)
}

/// Compares vectors modulo integer lattice shifts.
pub fn approx_eq_mod_lattice(lhs: &Vector3f64, rhs: &Vector3f64, tol: f64) -> bool {
    let d = *lhs - *rhs;
    (0..3).all(|i| wrap_centered(d.get(i)).abs() <= tol)
}

pub fn transpose(m: Rotation) -> Rotation {
    let mut out = [[0_i32; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            out[i][j] = m[j][i];
        }
    }
    out
}

pub fn mat_vec_i32(rotation: &Rotation, vector: &Vector3f64) -> Vector3f64 {
    let row = |i: usize| {
        rotation[i][0] as f64 * vector.x
            + rotation[i][1] as f64 * vector.y
            + rotation[i][2] as f64 * vector.z
    };
    Vector3f64::new(row(0), row(1), row(2))
}

fn mat_mul_i32(lhs: &Rotation, rhs: &Rotation) -> Rotation {
    let mut out = [[0_i32; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            out[i][j] = lhs[i][0] * rhs[0][j] + lhs[i][1] * rhs[1][j] + lhs[i][2] * rhs[2][j];
        }
    }
    out
}

fn inverse_unimodular(rotation: Rotation, det: i32) -> Rotation {
    let mut inv = [[0_i32; 3]; 3];
    for row in 0..3 {
        for col in 0..3 {
            inv[col][row] = cofactor(rotation, row, col) / det;
        }
    }
    inv
}

fn cofactor(rotation: Rotation, row: usize, col: usize) -> i32 {
    let minor = minor_det(rotation, row, col);
    if (row + col) % 2 == 0 {
        minor
    } else {
        -minor
    }
}

fn minor_det(rotation: Rotation, row: usize, col: usize) -> i32 {
    let mut vals = [0_i32; 4];
    let mut idx = 0;
    for i in 0..3 {
        if i == row {
            continue;
        }
        for j in 0..3 {
            if j == col {
                continue;
            }
            vals[idx] = rotation[i][j];
            idx += 1;
        }
    }
    vals[0] * vals[3] - vals[1] * vals[2]
}

fn wrap_centered(x: f64) -> f64 {
    // representative in [-0.5, 0.5)
    let wrapped = x - x.round();
    if wrapped.abs() < EPS12 {
        0.0
    } else {
        wrapped
    }
}
