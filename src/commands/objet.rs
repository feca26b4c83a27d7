//! Initial particle ensembles.

use serde::{Deserialize, Serialize};

use super::fmt_num;
use crate::error::Result;
use crate::units::{Quantity, UnitRegistry};

fn one() -> usize {
    1
}

fn reference_momentum() -> f64 {
    1.0
}

fn default_tag() -> char {
    'A'
}

/// Initial coordinates of one particle, in Zgoubi's conventions:
/// `Y`, `Z`, `X` in cm, `T`, `P` in mrad, `D` relative rigidity (1 = reference).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleCoordinates {
    #[serde(rename = "Y", default)]
    pub y: f64,
    #[serde(rename = "T", default)]
    pub t: f64,
    #[serde(rename = "Z", default)]
    pub z: f64,
    #[serde(rename = "P", default)]
    pub p: f64,
    #[serde(rename = "X", default)]
    pub x: f64,
    #[serde(rename = "D", default = "reference_momentum")]
    pub d: f64,
    #[serde(default = "default_tag")]
    pub tag: char,
}

impl ParticleCoordinates {
    pub fn new(y: f64, t: f64, z: f64, p: f64, x: f64, d: f64) -> Self {
        Self {
            y,
            t,
            z,
            p,
            x,
            d,
            tag: default_tag(),
        }
    }

    /// A particle on the reference orbit.
    pub fn reference() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, 0.0, 1.0)
    }
}

/// `OBJET` with `KOBJ = 2`: an explicit list of initial coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objet2 {
    #[serde(rename = "BORO")]
    pub boro: Quantity,
    #[serde(rename = "IMAX", default, skip_serializing_if = "Option::is_none")]
    pub imax: Option<usize>,
    #[serde(rename = "IDMAX", default = "one")]
    pub idmax: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub particles: Vec<ParticleCoordinates>,
}

fields!(Objet2, "OBJET", {
    "BORO" => boro,
    "IMAX" => imax,
    "IDMAX" => idmax,
});

impl Objet2 {
    pub const KOBJ: u8 = 2;

    pub fn new(boro: Quantity) -> Self {
        Self {
            boro,
            imax: None,
            idmax: 1,
            particles: Vec::new(),
        }
    }

    pub fn with_imax(mut self, imax: usize) -> Self {
        self.imax = Some(imax);
        self
    }

    pub fn with_particles(mut self, particles: &[ParticleCoordinates]) -> Self {
        self.load(particles);
        self
    }

    /// Explicit bound when set, otherwise the number of loaded particles.
    pub fn imax(&self) -> usize {
        self.imax.unwrap_or(self.particles.len())
    }

    /// Drops the particle payload and the bound derived from it.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.imax = None;
    }

    /// Appends particles and bumps the bound to the new particle count.
    pub fn load(&mut self, particles: &[ParticleCoordinates]) {
        self.particles.extend_from_slice(particles);
        self.imax = Some(self.particles.len());
    }

    pub fn render(&self, units: &UnitRegistry) -> Result<String> {
        let mut lines = vec![
            fmt_num(units.kilogauss_cm(&self.boro)?),
            Self::KOBJ.to_string(),
            format!("{} {}", self.imax(), self.idmax),
        ];
        for p in &self.particles {
            lines.push(format!(
                "{} {} {} {} {} {} '{}'",
                fmt_num(p.y),
                fmt_num(p.t),
                fmt_num(p.z),
                fmt_num(p.p),
                fmt_num(p.x),
                fmt_num(p.d),
                p.tag
            ));
        }
        if !self.particles.is_empty() {
            lines.push(vec!["1"; self.particles.len()].join(" "));
        }
        Ok(lines.join("\n") + "\n")
    }
}

/// Twiss parameters and emittance of one phase-space plane, as Zgoubi reads
/// them: beta in m, emittance (eps/pi) in m.rad, cut-off in sigmas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TwissPlane {
    #[serde(default)]
    pub alpha: f64,
    #[serde(default = "reference_momentum")]
    pub beta: f64,
    #[serde(default)]
    pub emittance: f64,
    #[serde(default = "default_cutoff")]
    pub cutoff: f64,
}

fn default_cutoff() -> f64 {
    3.0
}

impl Default for TwissPlane {
    fn default() -> Self {
        Self {
            alpha: 0.0,
            beta: 1.0,
            emittance: 0.0,
            cutoff: default_cutoff(),
        }
    }
}

fn default_densities() -> [u8; 6] {
    [2, 2, 2, 2, 1, 1]
}

fn default_centroid() -> [f64; 6] {
    [0.0, 0.0, 0.0, 0.0, 0.0, 1.0]
}

fn default_seeds() -> [u32; 3] {
    [186_387, 548_728, 472_874]
}

/// `MCOBJET` with `KOBJ = 3`: a Monte-Carlo generated ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MCObjet3 {
    #[serde(rename = "BORO")]
    pub boro: Quantity,
    #[serde(rename = "IMAX", default, skip_serializing_if = "Option::is_none")]
    pub imax: Option<usize>,
    /// Density kinds for Y, T, Z, P, X, D (1 uniform, 2 gaussian, 3 parabolic).
    #[serde(default = "default_densities")]
    pub densities: [u8; 6],
    #[serde(default = "default_centroid")]
    pub centroid: [f64; 6],
    #[serde(default)]
    pub horizontal: TwissPlane,
    #[serde(default)]
    pub vertical: TwissPlane,
    #[serde(default)]
    pub longitudinal: TwissPlane,
    #[serde(default = "default_seeds")]
    pub seeds: [u32; 3],
}

fields!(MCObjet3, "MCOBJET", {
    "BORO" => boro,
    "IMAX" => imax,
});

impl MCObjet3 {
    pub const KOBJ: u8 = 3;

    pub fn new(boro: Quantity) -> Self {
        Self {
            boro,
            imax: None,
            densities: default_densities(),
            centroid: default_centroid(),
            horizontal: TwissPlane::default(),
            vertical: TwissPlane::default(),
            longitudinal: TwissPlane::default(),
            seeds: default_seeds(),
        }
    }

    pub fn with_imax(mut self, imax: usize) -> Self {
        self.imax = Some(imax);
        self
    }

    pub fn render(&self, units: &UnitRegistry) -> Result<String> {
        let join = |values: &[f64]| {
            values
                .iter()
                .map(|v| fmt_num(*v))
                .collect::<Vec<_>>()
                .join(" ")
        };
        let plane = |p: &TwissPlane| join(&[p.alpha, p.beta, p.emittance, p.cutoff]);

        let lines = [
            fmt_num(units.kilogauss_cm(&self.boro)?),
            Self::KOBJ.to_string(),
            self.imax.unwrap_or(1).to_string(),
            self.densities
                .iter()
                .map(u8::to_string)
                .collect::<Vec<_>>()
                .join(" "),
            join(&self.centroid),
            plane(&self.horizontal),
            plane(&self.vertical),
            plane(&self.longitudinal),
            self.seeds
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(" "),
        ];
        Ok(lines.join("\n") + "\n")
    }
}
