use itertools::multizip;
use matrix::Matrix;
use rand::{thread_rng, Rng};
use std::cmp::Ordering;
use std::f64::consts;
use types::*;

/// Indices that sort `v` ascending. Equal elements keep their input order.
pub fn argsort<T: PartialOrd>(v: &[T]) -> Vec<usize> {
    let mut idx = (0..v.len()).collect::<Vec<_>>();

    idx.sort_by(|&i, &j| v[i].partial_cmp(&v[j]).unwrap_or(Ordering::Equal));

    idx
}

/// Stable argsort on an integer key.
pub fn argsort_by_key<K: Ord, F: Fn(usize) -> K>(n: usize, key: F) -> Vec<usize> {
    let mut idx = (0..n).collect::<Vec<_>>();

    idx.sort_by_key(|&i| key(i));

    idx
}

pub fn get_slice_up_dn<T>(v: &[T]) -> (&[T], &[T]) {
    let n = v.len() / 2;

    (&v[0..n], &v[n..])
}

pub fn zdot_product(u: &[c64], v: &[c64]) -> c64 {
    assert_eq!(u.len(), v.len());

    multizip((u.iter(), v.iter()))
        .map(|(x, y)| x.conj() * (*y))
        .sum()
}

pub fn vec_norm(v: &[c64]) -> f64 {
    v.iter().map(|x| x.norm_sqr()).sum::<f64>().sqrt()
}

pub fn normalize_vector_c64(v: &mut [c64]) {
    let s = vec_norm(v);

    v.iter_mut().for_each(|x| *x /= s);
}

pub fn make_normalized_rand_vector(v: &mut [c64]) {
    let mut rng = thread_rng();

    for y in v.iter_mut() {
        let t = rng.gen_range(-0.5f64, 0.5f64);
        let theta = t * 2.0 * consts::PI;

        let re = t * theta.cos();
        let im = t * theta.sin();

        *y = c64 { re, im };
    }

    normalize_vector_c64(v);
}

/// Modified Gram-Schmidt on the columns of `m`.
pub fn orthonormalize_columns(m: &mut Matrix<c64>) {
    for j in 0..m.ncol() {
        for i in 0..j {
            let proj = zdot_product(m.get_col(i), m.get_col(j));

            let vi = m.get_col(i).to_vec();

            for (x, y) in multizip((m.get_mut_col(j).iter_mut(), vi.iter())) {
                *x -= proj * y;
            }
        }

        normalize_vector_c64(m.get_mut_col(j));
    }
}

/// `nband` random orthonormal columns of length `npw`.
pub fn make_orthonormal_rand_matrix(npw: usize, nband: usize) -> Matrix<c64> {
    let mut m = Matrix::<c64>::new(npw, nband);

    for ib in 0..nband {
        make_normalized_rand_vector(m.get_mut_col(ib));
    }

    orthonormalize_columns(&mut m);

    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_argsort_is_stable() {
        let v = [3.0, 1.0, 2.0, 1.0, 0.5];
        assert_eq!(argsort(&v), vec![4, 1, 3, 2, 0]);
    }

    #[test]
    fn test_argsort_by_key() {
        let keys = [5i64, -1, 5, 0];
        assert_eq!(argsort_by_key(keys.len(), |i| keys[i]), vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_slice_up_dn() {
        let v = [1, 2, 3, 4, 5, 6];
        let (up, dn) = get_slice_up_dn(&v);
        assert_eq!(up, &[1, 2, 3]);
        assert_eq!(dn, &[4, 5, 6]);
    }

    #[test]
    fn test_orthonormal_rand_matrix() {
        let m = make_orthonormal_rand_matrix(12, 4);

        for i in 0..4 {
            for j in 0..4 {
                let d = zdot_product(m.get_col(i), m.get_col(j));
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(d.re, expected, epsilon = 1E-10);
                assert_abs_diff_eq!(d.im, 0.0, epsilon = 1E-10);
            }
        }
    }
}
