//! Optical elements and control commands.

use serde::{Deserialize, Serialize};

use super::fmt_num;
use crate::error::Result;
use crate::units::{Quantity, UnitRegistry};

const QUADRUPOLE_FRINGE: [f64; 6] = [0.1122, 6.2671, -1.4982, 3.5882, -2.1209, 1.723];
const BEND_FRINGE: [f64; 6] = [0.2401, 1.8639, -0.5572, 0.3904, 0.0, 0.0];

fn zero_cm() -> Quantity {
    Quantity::new(0.0, "cm")
}

fn zero_rad() -> Quantity {
    Quantity::new(0.0, "rad")
}

fn default_step() -> Quantity {
    Quantity::new(1.0, "cm")
}

fn quadrupole_fringe() -> [f64; 6] {
    QUADRUPOLE_FRINGE
}

fn bend_fringe() -> [f64; 6] {
    BEND_FRINGE
}

fn kpos_centered() -> i64 {
    1
}

fn kpos_automatic() -> i64 {
    3
}

fn fringe_line(coefficients: &[f64; 6]) -> String {
    let values: Vec<String> = coefficients.iter().map(|c| fmt_num(*c)).collect();
    format!("6 {}", values.join(" "))
}

/// `DRIFT`: field-free straight section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drift {
    #[serde(rename = "XL")]
    pub xl: Quantity,
}

fields!(Drift, "DRIFT", { "XL" => xl });

impl Drift {
    pub fn new(xl: Quantity) -> Self {
        Self { xl }
    }

    pub fn render(&self, units: &UnitRegistry) -> Result<String> {
        Ok(format!("{}\n", fmt_num(units.cm(&self.xl)?)))
    }
}

/// `MARKER`: zero-length reference point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Marker {}

fields!(Marker, "MARKER", {});

impl Marker {
    pub fn render(&self, _units: &UnitRegistry) -> Result<String> {
        Ok(String::new())
    }
}

/// `FAISCEAU`: prints the beam coordinates at this point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Faisceau {}

fields!(Faisceau, "FAISCEAU", {});

impl Faisceau {
    pub fn render(&self, _units: &UnitRegistry) -> Result<String> {
        Ok(String::new())
    }
}

/// `END`: terminates the input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct End {}

fields!(End, "END", {});

impl End {
    pub fn render(&self, _units: &UnitRegistry) -> Result<String> {
        Ok(String::new())
    }
}

/// `QUADRUPO`: quadrupole with Enge-type fringe fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct Quadrupole {
    #[serde(default)]
    pub il: i64,
    pub xl: Quantity,
    pub r0: Quantity,
    pub b0: Quantity,
    #[serde(default = "zero_cm")]
    pub xe: Quantity,
    #[serde(default = "zero_cm")]
    pub lam_e: Quantity,
    #[serde(default = "quadrupole_fringe")]
    pub fringe_entrance: [f64; 6],
    #[serde(default = "zero_cm")]
    pub xs: Quantity,
    #[serde(default = "zero_cm")]
    pub lam_s: Quantity,
    #[serde(default = "quadrupole_fringe")]
    pub fringe_exit: [f64; 6],
    #[serde(default = "default_step")]
    pub xpas: Quantity,
    #[serde(default = "kpos_centered")]
    pub kpos: i64,
    #[serde(default = "zero_cm")]
    pub xce: Quantity,
    #[serde(default = "zero_cm")]
    pub yce: Quantity,
    #[serde(default = "zero_rad")]
    pub ale: Quantity,
}

fields!(Quadrupole, "QUADRUPO", {
    "IL" => il,
    "XL" => xl,
    "R0" => r0,
    "B0" => b0,
    "XE" => xe,
    "LAM_E" => lam_e,
    "XS" => xs,
    "LAM_S" => lam_s,
    "XPAS" => xpas,
    "KPOS" => kpos,
    "XCE" => xce,
    "YCE" => yce,
    "ALE" => ale,
});

impl Quadrupole {
    pub fn new(xl: Quantity, r0: Quantity, b0: Quantity) -> Self {
        Self {
            il: 0,
            xl,
            r0,
            b0,
            xe: zero_cm(),
            lam_e: zero_cm(),
            fringe_entrance: QUADRUPOLE_FRINGE,
            xs: zero_cm(),
            lam_s: zero_cm(),
            fringe_exit: QUADRUPOLE_FRINGE,
            xpas: default_step(),
            kpos: kpos_centered(),
            xce: zero_cm(),
            yce: zero_cm(),
            ale: zero_rad(),
        }
    }

    pub fn render(&self, units: &UnitRegistry) -> Result<String> {
        let lines = [
            self.il.to_string(),
            format!(
                "{} {} {}",
                fmt_num(units.cm(&self.xl)?),
                fmt_num(units.cm(&self.r0)?),
                fmt_num(units.kilogauss(&self.b0)?)
            ),
            format!(
                "{} {}",
                fmt_num(units.cm(&self.xe)?),
                fmt_num(units.cm(&self.lam_e)?)
            ),
            fringe_line(&self.fringe_entrance),
            format!(
                "{} {}",
                fmt_num(units.cm(&self.xs)?),
                fmt_num(units.cm(&self.lam_s)?)
            ),
            fringe_line(&self.fringe_exit),
            fmt_num(units.cm(&self.xpas)?),
            format!(
                "{} {} {} {}",
                self.kpos,
                fmt_num(units.cm(&self.xce)?),
                fmt_num(units.cm(&self.yce)?),
                fmt_num(units.radian(&self.ale)?)
            ),
        ];
        Ok(lines.join("\n") + "\n")
    }
}

/// `BEND`: sector dipole described by its straight length and tilt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct Bend {
    #[serde(default)]
    pub il: i64,
    pub xl: Quantity,
    #[serde(default = "zero_rad")]
    pub sk: Quantity,
    pub b1: Quantity,
    #[serde(default = "zero_cm")]
    pub x_e: Quantity,
    #[serde(default = "zero_cm")]
    pub lam_e: Quantity,
    #[serde(default = "zero_rad")]
    pub w_e: Quantity,
    #[serde(default = "bend_fringe")]
    pub fringe_entrance: [f64; 6],
    #[serde(default = "zero_cm")]
    pub x_s: Quantity,
    #[serde(default = "zero_cm")]
    pub lam_s: Quantity,
    #[serde(default = "zero_rad")]
    pub w_s: Quantity,
    #[serde(default = "bend_fringe")]
    pub fringe_exit: [f64; 6],
    #[serde(default = "default_step")]
    pub xpas: Quantity,
    #[serde(default = "kpos_automatic")]
    pub kpos: i64,
    #[serde(default = "zero_cm")]
    pub xce: Quantity,
    #[serde(default = "zero_cm")]
    pub yce: Quantity,
    #[serde(default = "zero_rad")]
    pub ale: Quantity,
}

fields!(Bend, "BEND", {
    "IL" => il,
    "XL" => xl,
    "SK" => sk,
    "B1" => b1,
    "X_E" => x_e,
    "LAM_E" => lam_e,
    "W_E" => w_e,
    "X_S" => x_s,
    "LAM_S" => lam_s,
    "W_S" => w_s,
    "XPAS" => xpas,
    "KPOS" => kpos,
    "XCE" => xce,
    "YCE" => yce,
    "ALE" => ale,
});

impl Bend {
    pub fn new(xl: Quantity, b1: Quantity) -> Self {
        Self {
            il: 0,
            xl,
            sk: zero_rad(),
            b1,
            x_e: zero_cm(),
            lam_e: zero_cm(),
            w_e: zero_rad(),
            fringe_entrance: BEND_FRINGE,
            x_s: zero_cm(),
            lam_s: zero_cm(),
            w_s: zero_rad(),
            fringe_exit: BEND_FRINGE,
            xpas: default_step(),
            kpos: kpos_automatic(),
            xce: zero_cm(),
            yce: zero_cm(),
            ale: zero_rad(),
        }
    }

    pub fn render(&self, units: &UnitRegistry) -> Result<String> {
        let lines = [
            self.il.to_string(),
            format!(
                "{} {} {}",
                fmt_num(units.cm(&self.xl)?),
                fmt_num(units.radian(&self.sk)?),
                fmt_num(units.kilogauss(&self.b1)?)
            ),
            format!(
                "{} {} {}",
                fmt_num(units.cm(&self.x_e)?),
                fmt_num(units.cm(&self.lam_e)?),
                fmt_num(units.radian(&self.w_e)?)
            ),
            fringe_line(&self.fringe_entrance),
            format!(
                "{} {} {}",
                fmt_num(units.cm(&self.x_s)?),
                fmt_num(units.cm(&self.lam_s)?),
                fmt_num(units.radian(&self.w_s)?)
            ),
            fringe_line(&self.fringe_exit),
            fmt_num(units.cm(&self.xpas)?),
            format!(
                "{} {} {} {}",
                self.kpos,
                fmt_num(units.cm(&self.xce)?),
                fmt_num(units.cm(&self.yce)?),
                fmt_num(units.radian(&self.ale)?)
            ),
        ];
        Ok(lines.join("\n") + "\n")
    }
}
