use std::f64;
use types::c64;

// units : energy, length in angstrom

// 2m/hbar^2 in 1/(eV Ang^2); last decimals tuned so plane-wave counts
// agree with VASP
pub const TWOMHBAR2: f64 = 0.262465831;

//

pub const ZERO_C64: c64 = c64 { re: 0.0, im: 0.0 };
pub const ONE_C64: c64 = c64 { re: 1.0, im: 0.0 };

// pi

pub const PI: f64 = f64::consts::PI;
pub const TWOPI: f64 = 2.0 * f64::consts::PI;

// numerical tolerances

pub const EPS3: f64 = 1E-3;
pub const EPS5: f64 = 1E-5;
pub const EPS8: f64 = 1E-8;
pub const EPS12: f64 = 1E-12;

// defaults of the plane-wave enumeration

pub const DEFAULT_SHELL_THRESH: f64 = EPS3; // eV
pub const DEFAULT_NPLANEMAX: usize = 10000;
pub const STUCK_WINDOW: usize = 10;
