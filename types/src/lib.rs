#![allow(non_camel_case_types)]

/// Plane-wave coefficients, phase factors and symmetry matrix elements.
pub type c64 = num_complex::Complex<f64>;
