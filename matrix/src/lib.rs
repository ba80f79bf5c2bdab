// column-major memory layout
// [i,j] : i + j * nrow
//   0,0 0,1 0,2        0 2 4
//   1,0 1,1 1,2        1 3 5
//
// wave functions are stored one band per column: evc[[ig, ib]]

mod matrix_c64;

//////////////////////////////////////////

use std::ops::*;
use std::{fmt, fmt::Display};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matrix<T> {
    nrow: usize,
    ncol: usize,
    data: Vec<T>,
}

impl<T: num_traits::Zero + Copy> Matrix<T> {
    pub fn new(nrow: usize, ncol: usize) -> Matrix<T> {
        Matrix {
            nrow,
            ncol,
            data: vec![T::zero(); nrow * ncol],
        }
    }

    pub fn nrow(&self) -> usize {
        self.nrow
    }

    pub fn ncol(&self) -> usize {
        self.ncol
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nrow, self.ncol)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn from_row_slice(nrow: usize, ncol: usize, s: &[T]) -> Matrix<T> {
        assert_eq!(s.len(), nrow * ncol);

        let mut data: Vec<T> = vec![T::zero(); nrow * ncol];
        let mut n = 0;
        for i in 0..nrow {
            for j in 0..ncol {
                data[i + j * nrow] = s[n];
                n += 1;
            }
        }
        Matrix { nrow, ncol, data }
    }

    /// Builds the matrix column by column, one slice of length `nrow` per column.
    pub fn from_cols(nrow: usize, cols: &[Vec<T>]) -> Matrix<T> {
        let mut m = Matrix::<T>::new(nrow, cols.len());

        for (icol, v) in cols.iter().enumerate() {
            m.set_col(icol, v);
        }

        m
    }

    pub fn set_col(&mut self, icol: usize, v: &[T]) {
        let n1 = icol * self.nrow;
        let n2 = n1 + self.nrow;

        self.data[n1..n2].copy_from_slice(v);
    }

    pub fn get_col(&self, icol: usize) -> &[T] {
        let n1 = icol * self.nrow;
        let n2 = n1 + self.nrow;

        &self.data[n1..n2]
    }

    pub fn get_mut_col(&mut self, icol: usize) -> &mut [T] {
        let n1 = icol * self.nrow;
        let n2 = n1 + self.nrow;

        &mut self.data[n1..n2]
    }

    pub fn diagonal(&self) -> Vec<T> {
        (0..self.nrow.min(self.ncol)).map(|i| self[[i, i]]).collect()
    }
}

impl<T> Index<[usize; 2]> for Matrix<T> {
    type Output = T;

    fn index(&self, idx: [usize; 2]) -> &T {
        &self.data[idx[0] + idx[1] * self.nrow]
    }
}

impl<T> IndexMut<[usize; 2]> for Matrix<T> {
    fn index_mut(&mut self, idx: [usize; 2]) -> &mut Self::Output {
        &mut self.data[idx[0] + idx[1] * self.nrow]
    }
}

impl<T: Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for i in 0..self.nrow {
            write!(f, " | ")?;
            for j in 0..self.ncol {
                write!(f, "{:+8.3} ", self[[i, j]])?;
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}

#[test]
fn test_matrix_layout() {
    let mut m = Matrix::<f64>::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

    assert_eq!(m.shape(), (2, 3));
    assert_eq!(m.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    assert_eq!(m.get_col(1), &[2.0, 5.0]);

    m[[1, 1]] = 8.0;
    assert_eq!(m.get_col(1), &[2.0, 8.0]);
}

#[test]
fn test_matrix_from_cols() {
    let m = Matrix::<i32>::from_cols(2, &[vec![1, 2], vec![3, 4], vec![5, 6]]);

    assert_eq!(m.shape(), (2, 3));
    assert_eq!(m[[0, 2]], 5);
    assert_eq!(m.diagonal(), vec![1, 4]);
}
