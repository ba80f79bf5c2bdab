use dwconsts::*;
use gvector::GVectorTable;
use itertools::Itertools;
use lattice::Lattice;
use log::{trace, warn};
use symops::{Rotation, SymOp, SymOpError};
use thiserror::Error;
use vector3::*;

#[derive(Error, Debug)]
pub enum GTransformError {
    #[error(transparent)]
    SymOp(#[from] SymOpError),

    #[error(
        "the k-point {k} and the rotated k-point {k_transformed} are not equivalent \
         modulo a reciprocal lattice vector, rotation {rotation:?} is not a symmetry at this k-point"
    )]
    NotSymmetry {
        k: Vector3f64,
        k_transformed: Vector3f64,
        rotation: Rotation,
    },

    #[error(
        "failed to find the rotated partner of plane wave {index} (G = {miller}, B G + dK = {transformed}) \
         at k = {k}; plane waves of the same energy: {}",
        format_millers(.shell)
    )]
    MissingPartner {
        index: usize,
        miller: Vector3i32,
        transformed: Vector3i32,
        k: Vector3f64,
        shell: Vec<Vector3i32>,
    },
}

fn format_millers(v: &[Vector3i32]) -> String {
    v.iter().map(|g| g.to_string()).join(" ")
}

/// Index of the image of every plane wave of `table` under the rotation
/// `rotation` (fractional, acting on real-space coordinates).
///
/// `result[i] = j` means `B G_i + dK = G_j`, with `B = A^-T` and
/// `dK = B K - K` the reciprocal lattice vector bringing the rotated
/// k-point back to `k`.
pub fn transformed_g(
    k: &Vector3f64,
    blatt: &Lattice,
    table: &GVectorTable,
    rotation: &Rotation,
) -> Result<Vec<usize>, GTransformError> {
    let op = SymOp::new(*rotation, Vector3f64::zeros())?;

    transformed_g_with_op(k, blatt, table, &op)
}

/// Same as [`transformed_g`], taking the rotation from a space-group operation.
pub fn transformed_g_with_op(
    k: &Vector3f64,
    blatt: &Lattice,
    table: &GVectorTable,
    op: &SymOp,
) -> Result<Vec<usize>, GTransformError> {
    let k_transformed = op.apply_to_kpoint(k);

    let diff = k_transformed - *k;
    let dk = diff.round();

    if !is_close(&diff, &dk.to_f64()) {
        warn!("rotation {:?} does not leave k = {} invariant", op.rotation(), k);

        return Err(GTransformError::NotSymmetry {
            k: *k,
            k_transformed,
            rotation: *op.rotation(),
        });
    }

    trace!("k = {} maps to k + {}", k, dk);

    check_metric(blatt, op);

    let entries = table.entries();

    let mut rotind = vec![0; entries.len()];

    for (i, entry) in entries.iter().enumerate() {
        let transformed = op.apply_to_miller(&entry.get_miller()) + dk;

        let shell = entry.get_shell();

        let partner = entries[shell.clone()]
            .iter()
            .position(|other| other.get_miller() == transformed);

        match partner {
            Some(j) => rotind[i] = shell.start + j,
            None => {
                warn!("no partner for plane wave {} under rotation {:?}", i, op.rotation());

                return Err(GTransformError::MissingPartner {
                    index: i,
                    miller: entry.get_miller(),
                    transformed,
                    k: *k,
                    shell: entries[shell].iter().map(|e| e.get_miller()).collect(),
                });
            }
        }
    }

    Ok(rotind)
}

// |a - b| <= atol + rtol * |a| per component, a = B K - K
fn is_close(diff: &Vector3f64, rounded: &Vector3f64) -> bool {
    diff.to_array()
        .iter()
        .zip(rounded.to_array().iter())
        .all(|(a, b)| (a - b).abs() <= EPS8 + EPS5 * a.abs())
}

// B^T M B = M for the reciprocal metric M; plane waves of a rotation that
// does not preserve it end up in different shells.
fn check_metric(blatt: &Lattice, op: &SymOp) {
    let rows = [blatt.get_vector_a(), blatt.get_vector_b(), blatt.get_vector_c()];

    let mut metric = [[0.0; 3]; 3];

    for i in 0..3 {
        for j in 0..3 {
            metric[i][j] = rows[i].dot_product(&rows[j]);
        }
    }

    let b = op.rotation_inverse_transpose();

    let mut deviation = 0.0f64;
    let mut scale = 0.0f64;

    for i in 0..3 {
        for j in 0..3 {
            let mut s = 0.0;
            for p in 0..3 {
                for q in 0..3 {
                    s += b[p][i] as f64 * metric[p][q] * b[q][j] as f64;
                }
            }

            deviation = deviation.max((s - metric[i][j]).abs());
            scale = scale.max(metric[i][j].abs());
        }
    }

    if deviation > EPS5 * scale {
        warn!(
            "rotation {:?} changes the reciprocal metric by {:.3e}, plane-wave shells may not map onto themselves",
            op.rotation(),
            deviation
        );
    }
}
