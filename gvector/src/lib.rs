//! Plane waves |k+G> below the kinetic-energy cutoff at one k-point.
//!
//! The table is built the way VASP's WAVECAR tools do it, so that its
//! canonical index matches the order of the coefficients in the DFT output,
//! and is then sorted by energy and cut into shells of (nearly) equal
//! kinetic energy. A symmetry operation can only permute G-vectors inside a
//! shell.

use control::{Control, ControlError};
use dwconsts::*;
use fifo::FIFO;
use itertools::Itertools;
use lattice::Lattice;
use log::{debug, error, info};
use matrix::Matrix;
use std::ops::Range;
use thiserror::Error;
use vector3::*;

#[derive(Error, Debug)]
pub enum GVectorError {
    #[error("invalid plane-wave parameters")]
    Control(#[from] ControlError),

    #[error(
        "plane-wave enumeration is stuck calculating plane waves of energy larger \
         than cutoff Ecut = {ecut}. Make sure that the calculation does not include \
         SOC and set spinor = true if it does."
    )]
    Stuck { ecut: f64 },

    #[error("computed number of plane waves {computed} (spinor = {spinor}) != input nplane = {nplane}")]
    PlaneWaveCountMismatch {
        computed: usize,
        nplane: usize,
        spinor: bool,
    },
}

/// One plane wave of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct GVectorEntry {
    miller: Vector3i32,
    index: usize,
    shell: Range<usize>,
}

impl GVectorEntry {
    /// Reciprocal-lattice (fractional) coordinates of G.
    pub fn get_miller(&self) -> Vector3i32 {
        self.miller
    }

    /// Position in the canonical (DFT coefficient) order.
    pub fn get_index(&self) -> usize {
        self.index
    }

    /// Table positions of all plane waves with the same energy.
    pub fn get_shell(&self) -> Range<usize> {
        self.shell.clone()
    }
}

#[derive(Debug, Clone)]
pub struct GVectorTable {
    entries: Vec<GVectorEntry>,
    energies: Vec<f64>, // eV, ascending
}

impl GVectorTable {
    /// Enumerates the plane waves of `k_frac` (fractional coordinates in
    /// `blatt`, the reciprocal lattice with vectors as rows, 1/angstrom).
    ///
    /// With `nplane` set, the count is checked against the DFT code's
    /// number (twice the count for spinors).
    pub fn new(k_frac: &Vector3f64, blatt: &Lattice, ctrl: &Control) -> Result<GVectorTable, GVectorError> {
        ctrl.validate()?;

        let ecut = ctrl.get_ecut();
        let ecut1 = ctrl.effective_ecut1();

        let found = enumerate_plane_waves(k_frac, blatt, ctrl)?;

        let ncnt = found.len();

        if let Some(nplane) = ctrl.get_nplane() {
            let computed = if ctrl.is_spinor() { 2 * ncnt } else { ncnt };

            if computed != nplane {
                error!("plane waves found = {}, expected from nplane = {}", computed, nplane);

                return Err(GVectorError::PlaneWaveCountMismatch {
                    computed,
                    nplane,
                    spinor: ctrl.is_spinor(),
                });
            }
        }

        // canonical order, then drop everything above ecut1

        let canonical = canonical_order(&found);

        let (miller, energies): (Vec<Vector3i32>, Vec<f64>) = canonical
            .iter()
            .map(|&i| found[i])
            .unzip();

        let kept: Vec<usize> = (0..ncnt).filter(|&i| energies[i] <= ecut1).collect();

        // ascending energy

        let t_energies: Vec<f64> = kept.iter().map(|&i| energies[i]).collect();

        let ordered_index = utility::argsort(&t_energies);

        let energies: Vec<f64> = ordered_index.iter().map(|&j| t_energies[j]).collect();

        let mut entries: Vec<GVectorEntry> = ordered_index
            .iter()
            .map(|&j| {
                let index = kept[j];
                GVectorEntry {
                    miller: miller[index],
                    index,
                    shell: 0..0,
                }
            })
            .collect();

        let shells = shell_bounds(&energies, ctrl.get_thresh());

        for shell in shells.iter() {
            for entry in entries[shell.clone()].iter_mut() {
                entry.shell = shell.clone();
            }
        }

        info!(
            "k = {} : {} plane waves below ecut = {} eV, {} below ecut1 = {} eV, {} shells",
            k_frac,
            ncnt,
            ecut,
            entries.len(),
            ecut1,
            shells.len()
        );

        Ok(GVectorTable {
            entries,
            energies,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[GVectorEntry] {
        &self.entries
    }

    pub fn get_miller(&self, i: usize) -> Vector3i32 {
        self.entries[i].miller
    }

    pub fn get_shell(&self, i: usize) -> Range<usize> {
        self.entries[i].shell.clone()
    }

    /// Kinetic energies in eV, ascending.
    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    /// Shell ranges in ascending energy.
    pub fn shells(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.entries.iter().map(|e| e.shell.clone()).dedup()
    }

    /// 6 x N integer layout: g1, g2, g3, canonical index, shell start, shell end.
    pub fn as_igall(&self) -> Matrix<i64> {
        let mut igall = Matrix::<i64>::new(6, self.len());

        for (i, e) in self.entries.iter().enumerate() {
            igall.set_col(
                i,
                &[
                    e.miller.x as i64,
                    e.miller.y as i64,
                    e.miller.z as i64,
                    e.index as i64,
                    e.shell.start as i64,
                    e.shell.end as i64,
                ],
            );
        }

        igall
    }
}

/// 2m|k+G|^2/hbar^2 in eV.
pub fn kinetic_energy(k_frac: &Vector3f64, blatt: &Lattice, g: &Vector3i32) -> f64 {
    blatt.frac_to_cart(&(*k_frac + *g)).norm_squared() / TWOMHBAR2
}

/// All integer triples with |g1| + |g2| + |g3| = n, each exactly once.
pub fn l1_sphere(n: i32) -> impl Iterator<Item = Vector3i32> {
    (-n..=n).flat_map(move |ig3| {
        let r3 = n - ig3.abs();

        (-r3..=r3).flat_map(move |ig2| {
            let r = r3 - ig2.abs();

            let signs: &'static [i32] = if r == 0 { &[1] } else { &[-1, 1] };

            signs.iter().map(move |s| Vector3i32::new(s * r, ig2, ig3))
        })
    })
}

// Plane waves with energy below ecut, in enumeration order.
//
// Radii grow until the expected count is reached (nplane given) or until no
// lattice point can fall below the cutoff any more; never beyond nplanemax.
fn enumerate_plane_waves(
    k_frac: &Vector3f64,
    blatt: &Lattice,
    ctrl: &Control,
) -> Result<Vec<(Vector3i32, f64)>, GVectorError> {
    let ecut = ctrl.get_ecut();
    let spinor = ctrl.is_spinor();
    let nplane = ctrl.get_nplane();

    // |x1 a + x2 b + x3 c| >= |x| / |B^-1|_F and |x| >= |x|_1 / sqrt(3)
    let gmax = (ecut * TWOMHBAR2).sqrt();
    let nbound = (3f64.sqrt() * (gmax * blatt.inverse_frobenius_norm() + k_frac.l1_norm())).ceil() as usize;

    let mut found: Vec<(Vector3i32, f64)> = Vec::new();

    // true for radii that added nothing
    let mut empty_radii = FIFO::filled(STUCK_WINDOW, true);

    for n in 0..ctrl.get_nplanemax() {
        if n % 10 == 0 {
            debug!("radius {:6} : {:8} plane waves", n, found.len());
        }

        let ncnt = found.len();

        if let Some(nplane) = nplane {
            if 2 * ncnt >= nplane {
                if spinor || ncnt >= nplane {
                    debug!("expected number of plane waves reached at radius {}", n);
                    break;
                }

                if empty_radii.iter().all(|&b| b) {
                    error!("no new plane waves in the last {} radii", STUCK_WINDOW);
                    return Err(GVectorError::Stuck { ecut });
                }
            }
        }

        if n > nbound {
            if let Some(nplane) = nplane {
                if !spinor && 2 * ncnt >= nplane && ncnt < nplane {
                    error!("no plane waves beyond radius {}, {} of {} found", nbound, ncnt, nplane);
                    return Err(GVectorError::Stuck { ecut });
                }
            }

            debug!("no plane waves beyond radius {}", nbound);
            break;
        }

        let nprev = found.len();

        for g in l1_sphere(n as i32) {
            let etot = kinetic_energy(k_frac, blatt, &g);

            if etot < ecut {
                found.push((g, etot));
            }
        }

        empty_radii.push(found.len() == nprev);
    }

    Ok(found)
}

// Sort by the mixed-radix key of the residues modulo the span of the found
// vectors, z slowest. Equal keys keep enumeration order.
fn canonical_order(found: &[(Vector3i32, f64)]) -> Vec<usize> {
    if found.is_empty() {
        return Vec::new();
    }

    let first = found[0].0;

    let (gmin, gmax) = found.iter().fold((first, first), |(lo, hi), (g, _)| {
        (lo.min_by_component(g), hi.max_by_component(g))
    });

    let ng = gmax - gmin;

    let residue = |x: i32, n: i32| -> i64 {
        if n == 0 {
            0
        } else {
            x.rem_euclid(n) as i64
        }
    };

    let key = |i: usize| -> i64 {
        let g = found[i].0;

        let r1 = residue(g.x, ng.x);
        let r2 = residue(g.y, ng.y);
        let r3 = residue(g.z, ng.z);

        (r3 * ng.y as i64 + r2) * ng.x as i64 + r1
    };

    utility::argsort_by_key(found.len(), key)
}

// [start, end) of every run of energies whose consecutive gaps are <= thresh
fn shell_bounds(energies: &[f64], thresh: f64) -> Vec<Range<usize>> {
    let mut wall = vec![0];

    for (i, (e0, e1)) in energies.iter().tuple_windows().enumerate() {
        if e1 - e0 > thresh {
            wall.push(i + 1);
        }
    }

    wall.push(energies.len());

    wall.iter()
        .tuple_windows()
        .filter(|(a, b)| a < b)
        .map(|(&a, &b)| a..b)
        .collect()
}
