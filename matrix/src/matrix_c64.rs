use crate::Matrix;
use dwconsts::*;

use types::c64;

impl Matrix<c64> {
    pub fn identity(n: usize) -> Matrix<c64> {
        let mut mat = Matrix::<c64>::new(n, n);

        for i in 0..n {
            mat[[i, i]] = ONE_C64;
        }

        mat
    }

    pub fn adjoint(&self) -> Matrix<c64> {
        let mut data = Vec::with_capacity(self.nrow * self.ncol);
        for i in 0..self.nrow {
            for j in 0..self.ncol {
                data.push(self[[i, j]].conj())
            }
        }
        Matrix {
            nrow: self.ncol,
            ncol: self.nrow,
            data,
        }
    }

    pub fn trace(&self) -> c64 {
        self.diagonal().iter().sum()
    }

    /// Largest |a_ij - b_ij|; used to compare symmetry matrices.
    pub fn max_abs_diff(&self, other: &Matrix<c64>) -> f64 {
        assert_eq!(self.shape(), other.shape());

        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| (a - b).norm())
            .fold(0.0, f64::max)
    }
}
