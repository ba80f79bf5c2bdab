use vector3::*;

use std::{f64::consts, fmt};

/// Three basis vectors a, b, c in cartesian coordinates.
///
/// Used both for the direct lattice (angstrom) and for the reciprocal
/// lattice (1/angstrom, including the 2 pi factor). A point with fractional
/// coordinates (x1, x2, x3) sits at x1 a + x2 b + x3 c.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Lattice {
    a: Vector3f64,
    b: Vector3f64,
    c: Vector3f64,
}

impl Lattice {
    pub fn new(a: &[f64], b: &[f64], c: &[f64]) -> Lattice {
        Lattice {
            a: Vector3f64::new(a[0], a[1], a[2]),
            b: Vector3f64::new(b[0], b[1], b[2]),
            c: Vector3f64::new(c[0], c[1], c[2]),
        }
    }

    pub fn get_vector_a(&self) -> Vector3f64 {
        self.a
    }

    pub fn get_vector_b(&self) -> Vector3f64 {
        self.b
    }

    pub fn get_vector_c(&self) -> Vector3f64 {
        self.c
    }

    // ( a x b ) . c
    pub fn volume(&self) -> f64 {
        self.a.cross_product(&self.b).dot_product(&self.c)
    }

    // ra = 2 x PI x (b x c) / volume
    // rb = 2 x PI x (c x a) / volume
    // rc = 2 x PI x (a x b) / volume
    pub fn reciprocal(&self) -> Lattice {
        let factor = 2.0 * consts::PI / self.volume();

        Lattice {
            a: self.b.cross_product(&self.c) * factor,
            b: self.c.cross_product(&self.a) * factor,
            c: self.a.cross_product(&self.b) * factor,
        }
    }

    pub fn frac_to_cart(&self, pos_f: &Vector3f64) -> Vector3f64 {
        pos_f.x * self.a + pos_f.y * self.b + pos_f.z * self.c
    }

    /// Frobenius norm of the inverse of the row matrix [a; b; c].
    ///
    /// Gives the lower bound |x1 a + x2 b + x3 c| >= |x| / norm for any
    /// fractional x.
    pub fn inverse_frobenius_norm(&self) -> f64 {
        let bc = self.b.cross_product(&self.c).norm_squared();
        let ca = self.c.cross_product(&self.a).norm_squared();
        let ab = self.a.cross_product(&self.b).norm_squared();

        (bc + ca + ab).sqrt() / self.volume().abs()
    }
}

impl fmt::Display for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let a = self.get_vector_a();
        let b = self.get_vector_b();
        let c = self.get_vector_c();

        write!(f,
               "{}\n{:25.16}\t{:25.16}\t{:25.16}\n{:25.16}\t{:25.16}\t{:25.16}\n{:25.16}\t{:25.16}\t{:25.16}", "Lattice",
               a.x, a.y, a.z, b.x, b.y, b.z, c.x, c.y, c.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_reciprocal_duality() {
        let latt = Lattice::new(&[1.0, 0.1, 0.0], &[0.0, 1.0, 0.2], &[0.0, 0.3, 1.0]);
        let blatt = latt.reciprocal();

        let direct = [latt.get_vector_a(), latt.get_vector_b(), latt.get_vector_c()];
        let recip = [blatt.get_vector_a(), blatt.get_vector_b(), blatt.get_vector_c()];

        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 2.0 * consts::PI } else { 0.0 };
                assert_abs_diff_eq!(direct[i] * recip[j], expected, epsilon = 1E-12);
            }
        }
    }

    #[test]
    fn test_frac_to_cart() {
        let latt = Lattice::new(&[1.0, 0.1, 0.0], &[0.0, 1.0, 0.2], &[0.0, 0.3, 1.0]);

        let pos_c = latt.frac_to_cart(&Vector3f64::new(0.2, 0.3, 0.4));

        assert_abs_diff_eq!(pos_c.x, 0.2, epsilon = 1E-12);
        assert_abs_diff_eq!(pos_c.y, 0.02 + 0.3 + 0.12, epsilon = 1E-12);
        assert_abs_diff_eq!(pos_c.z, 0.06 + 0.4, epsilon = 1E-12);
    }

    #[test]
    fn test_inverse_norm_bound() {
        let latt = Lattice::new(&[2.0, 0.0, 0.0], &[1.0, 1.5, 0.0], &[0.0, 0.3, 0.7]);
        let fnorm = latt.inverse_frobenius_norm();

        for x in [
            Vector3f64::new(1.0, 0.0, 0.0),
            Vector3f64::new(-1.0, 2.0, 0.0),
            Vector3f64::new(0.3, -4.0, 7.0),
        ]
        .iter()
        {
            assert!(latt.frac_to_cart(x).norm2() >= x.norm2() / fnorm - 1E-12);
        }

        let cubic = Lattice::new(&[2.0, 0.0, 0.0], &[0.0, 2.0, 0.0], &[0.0, 0.0, 2.0]);
        assert_abs_diff_eq!(cubic.inverse_frobenius_norm(), 3f64.sqrt() / 2.0, epsilon = 1E-12);
    }
}
