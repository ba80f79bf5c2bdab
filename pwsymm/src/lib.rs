//! Matrix elements of a space-group operation {A|T} between plane-wave
//! wavefunctions at one k-point.
//!
//! Wavefunctions are stored one band per column. For spinors the first
//! `npw` rows hold the spin-up coefficients and the next `npw` the
//! spin-down ones, both in the order of the `GVectorTable`.

use dwconsts::*;
use gtransform::{transformed_g_with_op, GTransformError};
use gvector::GVectorTable;
use itertools::multizip;
use lattice::Lattice;
use log::debug;
use matrix::Matrix;
use num_traits::Zero;
use rayon::prelude::*;
use symops::SymOp;
use thiserror::Error;
use types::c64;
use vector3::*;

#[derive(Error, Debug)]
pub enum PWSymmError {
    #[error(transparent)]
    Transform(#[from] GTransformError),

    #[error("wavefunction has {found} rows, expected {expected}")]
    DimensionMismatch { expected: usize, found: usize },
}

/// `<psi_n | {A|T} | psi_n>` for every band n (column of `evc`).
///
/// The translation enters as `exp(-2 pi i (A^-1 T).(G+K))`.
pub fn symm_eigenvalues(
    k: &Vector3f64,
    blatt: &Lattice,
    evc: &Matrix<c64>,
    table: &GVectorTable,
    op: &SymOp,
    spinor: bool,
) -> Result<Vec<c64>, PWSymmError> {
    check_rows(evc, table, spinor)?;

    let rotind = transformed_g_with_op(k, blatt, table, op)?;
    let phase = translation_phase(k, table, &op.inverse_rotated_translation());

    let ncomp = if spinor { 2 } else { 1 };

    debug!(
        "symmetry eigenvalues of {} bands over {} plane waves, spinor = {}",
        evc.ncol(),
        table.len(),
        spinor
    );

    let vals = (0..evc.ncol())
        .into_par_iter()
        .map(|ib| {
            let psi = evc.get_col(ib);
            let rotated = rotated_bra(psi, &rotind, &phase, op, ncomp);

            braket(&rotated, psi)
        })
        .collect();

    Ok(vals)
}

/// `M[m][n] = <psi_m | {A|T} | psi_n>` over all bands.
///
/// The translation enters as `exp(-2 pi i (A T).(G+K))`.
pub fn symm_matrix(
    k: &Vector3f64,
    blatt: &Lattice,
    evc: &Matrix<c64>,
    table: &GVectorTable,
    op: &SymOp,
    spinor: bool,
) -> Result<Matrix<c64>, PWSymmError> {
    check_rows(evc, table, spinor)?;

    let rotind = transformed_g_with_op(k, blatt, table, op)?;
    let phase = translation_phase(k, table, &op.rotated_translation());

    let ncomp = if spinor { 2 } else { 1 };
    let nband = evc.ncol();

    debug!(
        "symmetry matrix of {} bands over {} plane waves, spinor = {}",
        nband,
        table.len(),
        spinor
    );

    let rows: Vec<Vec<c64>> = (0..nband)
        .into_par_iter()
        .map(|m| {
            let rotated = rotated_bra(evc.get_col(m), &rotind, &phase, op, ncomp);

            (0..nband).map(|n| braket(&rotated, evc.get_col(n))).collect()
        })
        .collect();

    let mut mat = Matrix::<c64>::new(nband, nband);

    for (m, row) in rows.iter().enumerate() {
        for (n, v) in row.iter().enumerate() {
            mat[[m, n]] = *v;
        }
    }

    Ok(mat)
}

fn check_rows(evc: &Matrix<c64>, table: &GVectorTable, spinor: bool) -> Result<(), PWSymmError> {
    let expected = if spinor { 2 * table.len() } else { table.len() };

    if evc.nrow() != expected {
        return Err(PWSymmError::DimensionMismatch {
            expected,
            found: evc.nrow(),
        });
    }

    Ok(())
}

// exp(-2 pi i tau.(G+K))
fn translation_phase(k: &Vector3f64, table: &GVectorTable, tau: &Vector3f64) -> Vec<c64> {
    table
        .entries()
        .iter()
        .map(|e| {
            let arg = -TWOPI * (*tau * (*k + e.get_miller()));
            c64::new(0.0, arg).exp()
        })
        .collect()
}

// Row vector whose plain product with psi_n gives the matrix element:
// bra[t][g] = sum_s conj(psi[s][rot g]) phase[g] S[s][t]
fn rotated_bra(psi: &[c64], rotind: &[usize], phase: &[c64], op: &SymOp, ncomp: usize) -> Vec<c64> {
    let npw = rotind.len();

    let mut conj_rot = vec![c64::zero(); ncomp * npw];

    for s in 0..ncomp {
        let comp = &psi[s * npw..(s + 1) * npw];

        for (x, &ir, p) in multizip((conj_rot[s * npw..(s + 1) * npw].iter_mut(), rotind.iter(), phase.iter())) {
            *x = comp[ir].conj() * p;
        }
    }

    if ncomp == 1 {
        return conj_rot;
    }

    let smat = op.spinor();

    let (up, dn) = utility::get_slice_up_dn(&conj_rot);

    let mut bra = vec![c64::zero(); 2 * npw];

    for t in 0..2 {
        for (x, u, d) in multizip((bra[t * npw..(t + 1) * npw].iter_mut(), up.iter(), dn.iter())) {
            *x = u * smat[0][t] + d * smat[1][t];
        }
    }

    bra
}

fn braket(bra: &[c64], ket: &[c64]) -> c64 {
    multizip((bra.iter(), ket.iter())).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests;
