//! Parameters of the plane-wave enumeration at one k-point.
//!
//! Values come either from the caller (the DFT reader knows `ecut`,
//! `nplane` and `spinor`) or from an `in.ctrl`-style file:
//!
//! ```text
//! # cutoffs in eV
//! ecut      = 400
//! ecut1     = 100
//! nplane    = 2390
//! spinor    = false
//! thresh    = 1e-3
//! nplanemax = 10000
//! ```

use dwconsts::*;
use log::info;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ControlError {
    #[error("cannot read control file")]
    Io(#[from] std::io::Error),

    #[error("line {line} is not of the form 'key = value': '{text}'")]
    InvalidLine { line: usize, text: String },

    #[error("invalid value '{value}' for parameter '{key}'")]
    InvalidValue { key: String, value: String },

    #[error("unknown parameter '{0}'")]
    UnknownKey(String),

    #[error("parameter 'ecut' is missing")]
    MissingCutoff,

    #[error("ecut must be positive, got {0} eV")]
    NonPositiveCutoff(f64),

    #[error("ecut1 = {ecut1} eV exceeds ecut = {ecut} eV")]
    InconsistentCutoffs { ecut: f64, ecut1: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    ecut: f64,            // eV, cutoff of the DFT calculation
    ecut1: f64,           // eV, <= 0 means ecut
    nplane: Option<usize>, // plane-wave count reported by the DFT code
    thresh: f64,          // eV, energy window of one shell
    spinor: bool,
    nplanemax: usize,     // cap on the number of enumeration radii
}

impl Control {
    pub fn new(ecut: f64) -> Control {
        Control {
            ecut,
            ecut1: -1.0,
            nplane: None,
            thresh: DEFAULT_SHELL_THRESH,
            spinor: true,
            nplanemax: DEFAULT_NPLANEMAX,
        }
    }

    pub fn with_ecut1(mut self, ecut1: f64) -> Control {
        self.ecut1 = ecut1;
        self
    }

    pub fn with_nplane(mut self, nplane: Option<usize>) -> Control {
        self.nplane = nplane;
        self
    }

    pub fn with_thresh(mut self, thresh: f64) -> Control {
        self.thresh = thresh;
        self
    }

    pub fn with_spinor(mut self, spinor: bool) -> Control {
        self.spinor = spinor;
        self
    }

    pub fn with_nplanemax(mut self, nplanemax: usize) -> Control {
        self.nplanemax = nplanemax;
        self
    }

    pub fn get_ecut(&self) -> f64 {
        self.ecut
    }

    /// Secondary cutoff with the "non-positive means ecut" rule applied.
    pub fn effective_ecut1(&self) -> f64 {
        if self.ecut1 <= 0.0 {
            self.ecut
        } else {
            self.ecut1
        }
    }

    pub fn get_nplane(&self) -> Option<usize> {
        self.nplane
    }

    pub fn get_thresh(&self) -> f64 {
        self.thresh
    }

    pub fn is_spinor(&self) -> bool {
        self.spinor
    }

    pub fn get_nplanemax(&self) -> usize {
        self.nplanemax
    }

    pub fn validate(&self) -> Result<(), ControlError> {
        if !(self.ecut > 0.0) {
            return Err(ControlError::NonPositiveCutoff(self.ecut));
        }

        if self.effective_ecut1() > self.ecut {
            return Err(ControlError::InconsistentCutoffs {
                ecut: self.ecut,
                ecut1: self.ecut1,
            });
        }

        Ok(())
    }

    pub fn read_file<P: AsRef<Path>>(inpfile: P) -> Result<Control, ControlError> {
        let file = File::open(inpfile)?;

        let lines = BufReader::new(file)
            .lines()
            .collect::<Result<Vec<String>, _>>()?;

        Control::parse_lines(&lines)
    }

    pub fn parse_lines(lines: &[String]) -> Result<Control, ControlError> {
        let mut ecut = None;
        let mut ctrl = Control::new(0.0);

        for (iline, line) in lines.iter().enumerate() {
            let line = match line.find('#') {
                Some(pos) => &line[..pos],
                None => line.as_str(),
            };

            if line.trim().is_empty() {
                continue;
            }

            let s: Vec<&str> = line.split('=').map(|x| x.trim()).collect();

            if s.len() != 2 || s[0].is_empty() {
                return Err(ControlError::InvalidLine {
                    line: iline + 1,
                    text: line.to_string(),
                });
            }

            let (key, value) = (s[0], s[1]);

            match key {
                "ecut" => {
                    ecut = Some(parse_value::<f64>(key, value)?);
                }

                "ecut1" => {
                    ctrl.ecut1 = parse_value(key, value)?;
                }

                "nplane" => {
                    ctrl.nplane = match value {
                        "inf" | "none" => None,
                        _ => Some(parse_value(key, value)?),
                    };
                }

                "thresh" => {
                    ctrl.thresh = parse_value(key, value)?;
                }

                "spinor" => {
                    ctrl.spinor = parse_value(key, value)?;
                }

                "nplanemax" => {
                    ctrl.nplanemax = parse_value(key, value)?;
                }

                _ => {
                    return Err(ControlError::UnknownKey(key.to_string()));
                }
            }
        }

        ctrl.ecut = ecut.ok_or(ControlError::MissingCutoff)?;

        ctrl.validate()?;

        Ok(ctrl)
    }

    pub fn display(&self) {
        const OUT_WIDTH1: usize = 28;
        const OUT_WIDTH2: usize = 18;

        let nplane = match self.nplane {
            Some(n) => n.to_string(),
            None => "inf".to_string(),
        };

        info!("   {:-^80}", " control parameters ");

        info!(
            "   {:<width1$} = {:>width2$.3}",
            "ecut (eV)",
            self.ecut,
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );

        info!(
            "   {:<width1$} = {:>width2$.3}",
            "ecut1 (eV)",
            self.effective_ecut1(),
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );

        info!(
            "   {:<width1$} = {:>width2$}",
            "nplane",
            nplane,
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );

        info!(
            "   {:<width1$} = {:>width2$}",
            "spinor",
            self.spinor,
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );

        info!(
            "   {:<width1$} = {:>width2$.3E}",
            "thresh (eV)",
            self.thresh,
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );

        info!(
            "   {:<width1$} = {:>width2$}",
            "nplanemax",
            self.nplanemax,
            width1 = OUT_WIDTH1,
            width2 = OUT_WIDTH2
        );
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ControlError> {
    value.parse::<T>().map_err(|_| ControlError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
