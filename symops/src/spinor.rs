//! 2x2 matrices acting on (spin-up, spin-down) coefficient pairs.

use dwconsts::*;
use types::c64;
use vector3::Vector3f64;

pub type SpinorMatrix = [[c64; 2]; 2];

pub fn spinor_identity() -> SpinorMatrix {
    [[ONE_C64, ZERO_C64], [ZERO_C64, ONE_C64]]
}

/// SU(2) image of a proper rotation by `angle` (radians, anticlockwise
/// looking down `axis`) about the cartesian `axis`:
///
/// S = cos(angle/2) I - i sin(angle/2) (n . sigma)
///
/// A rotation by 2 pi gives `-I`.
pub fn spinor_rotation(angle: f64, axis: &Vector3f64) -> SpinorMatrix {
    let n = *axis * (1.0 / axis.norm2());

    let c = (0.5 * angle).cos();
    let s = (0.5 * angle).sin();

    [
        [c64::new(c, -s * n.z), c64::new(-s * n.y, -s * n.x)],
        [c64::new(s * n.y, -s * n.x), c64::new(c, s * n.z)],
    ]
}

pub fn spinor_mul(lhs: &SpinorMatrix, rhs: &SpinorMatrix) -> SpinorMatrix {
    let mut out = [[ZERO_C64; 2]; 2];
    for i in 0..2 {
        for j in 0..2 {
            out[i][j] = lhs[i][0] * rhs[0][j] + lhs[i][1] * rhs[1][j];
        }
    }
    out
}

pub fn spinor_adjoint(m: &SpinorMatrix) -> SpinorMatrix {
    [
        [m[0][0].conj(), m[1][0].conj()],
        [m[0][1].conj(), m[1][1].conj()],
    ]
}

pub fn spinor_max_abs_diff(lhs: &SpinorMatrix, rhs: &SpinorMatrix) -> f64 {
    let mut d = 0.0f64;
    for i in 0..2 {
        for j in 0..2 {
            d = d.max((lhs[i][j] - rhs[i][j]).norm());
        }
    }
    d
}
