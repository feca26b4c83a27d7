//! Quantities and unit conversion.
//!
//! Units are represented by their dimensional exponents and a scale factor
//! relative to the SI coherent unit of that dimension. Angles are tracked as
//! their own dimension so that `mrad` never silently converts to `cm`.
//!
//! There is no process-wide unit registry: a [`UnitRegistry`] is built by the
//! caller and passed explicitly to every rendering or conversion call.
//!
//! ```rust
//! use zgoubidoo::units::{Quantity, UnitRegistry};
//! let units = UnitRegistry::default();
//! assert!((units.cm("1 m").unwrap() - 100.0).abs() < 1e-9);
//! let q: Quantity = "10 kilogauss".parse().unwrap();
//! assert!((units.tesla(&q).unwrap() - 1.0).abs() < 1e-12);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ZgoubiError};

/// Speed of light in vacuum (m/s).
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;
/// Elementary charge (C).
pub const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19;
const MEV: f64 = 1.0e6 * ELEMENTARY_CHARGE;

static QUANTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)\s*(.*?)\s*$")
        .expect("quantity pattern is valid")
});

/// Dimensional exponents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimensions {
    pub length: i8,
    pub mass: i8,
    pub time: i8,
    pub current: i8,
    pub angle: i8,
}

impl Dimensions {
    pub const DIMENSIONLESS: Dimensions = Dimensions::new(0, 0, 0, 0, 0);
    pub const LENGTH: Dimensions = Dimensions::new(1, 0, 0, 0, 0);
    pub const MASS: Dimensions = Dimensions::new(0, 1, 0, 0, 0);
    pub const TIME: Dimensions = Dimensions::new(0, 0, 1, 0, 0);
    pub const CURRENT: Dimensions = Dimensions::new(0, 0, 0, 1, 0);
    pub const ANGLE: Dimensions = Dimensions::new(0, 0, 0, 0, 1);
    pub const VELOCITY: Dimensions = Dimensions::new(1, 0, -1, 0, 0);
    pub const ENERGY: Dimensions = Dimensions::new(2, 1, -2, 0, 0);
    pub const MOMENTUM: Dimensions = Dimensions::new(1, 1, -1, 0, 0);
    pub const CHARGE: Dimensions = Dimensions::new(0, 0, 1, 1, 0);
    pub const MAGNETIC_FIELD: Dimensions = Dimensions::new(0, 1, -2, -1, 0);
    pub const RIGIDITY: Dimensions = Dimensions::new(1, 1, -2, -1, 0);

    pub const fn new(length: i8, mass: i8, time: i8, current: i8, angle: i8) -> Self {
        Self {
            length,
            mass,
            time,
            current,
            angle,
        }
    }

    /// `None` when an exponent leaves the `i8` range.
    fn combine(self, other: Dimensions, sign: i8) -> Option<Self> {
        let term = |a: i8, b: i8| b.checked_mul(sign).and_then(|b| a.checked_add(b));
        Some(Self {
            length: term(self.length, other.length)?,
            mass: term(self.mass, other.mass)?,
            time: term(self.time, other.time)?,
            current: term(self.current, other.current)?,
            angle: term(self.angle, other.angle)?,
        })
    }

    fn powi(self, n: i8) -> Option<Self> {
        Some(Self {
            length: self.length.checked_mul(n)?,
            mass: self.mass.checked_mul(n)?,
            time: self.time.checked_mul(n)?,
            current: self.current.checked_mul(n)?,
            angle: self.angle.checked_mul(n)?,
        })
    }
}

/// A resolved unit: dimensions plus scale to the SI coherent unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    dims: Dimensions,
    scale: f64,
}

impl Unit {
    pub const DIMENSIONLESS: Unit = Unit::new(Dimensions::DIMENSIONLESS, 1.0);

    pub const fn new(dims: Dimensions, scale: f64) -> Self {
        Self { dims, scale }
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// `None` when the resulting exponents overflow.
    pub fn multiply(&self, other: &Unit) -> Option<Unit> {
        Some(Unit::new(
            self.dims.combine(other.dims, 1)?,
            self.scale * other.scale,
        ))
    }

    pub fn divide(&self, other: &Unit) -> Option<Unit> {
        Some(Unit::new(
            self.dims.combine(other.dims, -1)?,
            self.scale / other.scale,
        ))
    }

    pub fn powi(&self, n: i8) -> Option<Unit> {
        Some(Unit::new(self.dims.powi(n)?, self.scale.powi(n as i32)))
    }
}

/// A magnitude with a unit expression, e.g. `10 cm` or `3.5 kilogauss*cm`.
///
/// The unit expression is kept as text and resolved against a
/// [`UnitRegistry`] only when converted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Quantity {
    magnitude: f64,
    unit: String,
}

impl Quantity {
    pub fn new(magnitude: f64, unit: impl Into<String>) -> Self {
        Self {
            magnitude,
            unit: unit.into(),
        }
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{}", self.magnitude)
        } else {
            write!(f, "{} {}", self.magnitude, self.unit)
        }
    }
}

impl FromStr for Quantity {
    type Err = ZgoubiError;

    fn from_str(s: &str) -> Result<Self> {
        let caps = QUANTITY_RE
            .captures(s)
            .ok_or_else(|| ZgoubiError::units(format!("cannot parse quantity '{}'", s)))?;
        let magnitude = caps[1]
            .parse::<f64>()
            .map_err(|e| ZgoubiError::units(format!("invalid magnitude in '{}': {}", s, e)))?;
        Ok(Self::new(magnitude, caps[2].to_string()))
    }
}

impl TryFrom<String> for Quantity {
    type Error = ZgoubiError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Quantity> for String {
    fn from(q: Quantity) -> Self {
        q.to_string()
    }
}

/// Anything the conversion helpers accept: a quantity or its textual form.
pub trait AsQuantity {
    fn as_quantity(&self) -> Result<Quantity>;
}

impl AsQuantity for Quantity {
    fn as_quantity(&self) -> Result<Quantity> {
        Ok(self.clone())
    }
}

impl AsQuantity for &Quantity {
    fn as_quantity(&self) -> Result<Quantity> {
        Ok((*self).clone())
    }
}

impl AsQuantity for &str {
    fn as_quantity(&self) -> Result<Quantity> {
        self.parse()
    }
}

impl AsQuantity for String {
    fn as_quantity(&self) -> Result<Quantity> {
        self.parse()
    }
}

/// Symbol table of known units; the explicit replacement for a global registry.
#[derive(Debug, Clone)]
pub struct UnitRegistry {
    units: HashMap<String, Unit>,
}

impl Default for UnitRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register_defaults();
        registry
    }
}

impl UnitRegistry {
    pub fn empty() -> Self {
        Self {
            units: HashMap::new(),
        }
    }

    pub fn define(&mut self, symbol: impl Into<String>, unit: Unit) {
        self.units.insert(symbol.into(), unit);
    }

    pub fn is_defined(&self, symbol: &str) -> bool {
        self.units.contains_key(symbol)
    }

    fn register_defaults(&mut self) {
        use Dimensions as D;

        let tesla = Unit::new(D::MAGNETIC_FIELD, 1.0);
        let table: &[(&[&str], Unit)] = &[
            (&["", "dimensionless"], Unit::DIMENSIONLESS),
            (&["m", "meter"], Unit::new(D::LENGTH, 1.0)),
            (&["km", "kilometer"], Unit::new(D::LENGTH, 1.0e3)),
            (&["cm", "centimeter"], Unit::new(D::LENGTH, 1.0e-2)),
            (&["mm", "millimeter"], Unit::new(D::LENGTH, 1.0e-3)),
            (&["um", "micrometer"], Unit::new(D::LENGTH, 1.0e-6)),
            (&["kg", "kilogram"], Unit::new(D::MASS, 1.0)),
            (&["g", "gram"], Unit::new(D::MASS, 1.0e-3)),
            (&["s", "second"], Unit::new(D::TIME, 1.0)),
            (&["ms", "millisecond"], Unit::new(D::TIME, 1.0e-3)),
            (&["us", "microsecond"], Unit::new(D::TIME, 1.0e-6)),
            (&["ns", "nanosecond"], Unit::new(D::TIME, 1.0e-9)),
            (&["A", "ampere"], Unit::new(D::CURRENT, 1.0)),
            (&["C", "coulomb"], Unit::new(D::CHARGE, 1.0)),
            (&["e"], Unit::new(D::CHARGE, ELEMENTARY_CHARGE)),
            (&["rad", "radian"], Unit::new(D::ANGLE, 1.0)),
            (&["mrad", "milliradian"], Unit::new(D::ANGLE, 1.0e-3)),
            (&["urad", "microradian"], Unit::new(D::ANGLE, 1.0e-6)),
            (
                &["deg", "degree"],
                Unit::new(D::ANGLE, std::f64::consts::PI / 180.0),
            ),
            (&["T", "tesla"], tesla),
            (&["G", "gauss"], Unit::new(D::MAGNETIC_FIELD, 1.0e-4)),
            (&["kG", "kilogauss"], Unit::new(D::MAGNETIC_FIELD, 1.0e-1)),
            (&["c"], Unit::new(D::VELOCITY, SPEED_OF_LIGHT)),
            (&["J", "joule"], Unit::new(D::ENERGY, 1.0)),
            (&["eV"], Unit::new(D::ENERGY, MEV * 1.0e-6)),
            (&["keV"], Unit::new(D::ENERGY, MEV * 1.0e-3)),
            (&["MeV"], Unit::new(D::ENERGY, MEV)),
            (&["GeV"], Unit::new(D::ENERGY, MEV * 1.0e3)),
            (&["MeV_c"], Unit::new(D::MOMENTUM, MEV / SPEED_OF_LIGHT)),
            (&["GeV_c"], Unit::new(D::MOMENTUM, MEV * 1.0e3 / SPEED_OF_LIGHT)),
            (
                &["MeV_c2"],
                Unit::new(D::MASS, MEV / (SPEED_OF_LIGHT * SPEED_OF_LIGHT)),
            ),
            (
                &["GeV_c2"],
                Unit::new(D::MASS, MEV * 1.0e3 / (SPEED_OF_LIGHT * SPEED_OF_LIGHT)),
            ),
        ];

        for (symbols, unit) in table {
            for symbol in *symbols {
                self.define(*symbol, *unit);
            }
        }
    }

    /// Resolves a unit expression such as `kilogauss*cm`, `MeV/c**2` or `m^-1`.
    pub fn resolve(&self, expr: &str) -> Result<Unit> {
        let normalized = expr.replace("**", "^");
        let normalized = normalized.trim();
        if let Some(unit) = self.units.get(normalized) {
            return Ok(*unit);
        }

        let mut segments = Vec::new();
        let mut start = 0;
        let mut divide = false;
        for (i, c) in normalized.char_indices() {
            if c == '*' || c == '/' {
                segments.push((divide, &normalized[start..i]));
                divide = c == '/';
                start = i + 1;
            }
        }
        segments.push((divide, &normalized[start..]));

        let mut result = Unit::DIMENSIONLESS;
        for (divide, segment) in segments {
            let segment = segment.trim();
            let (symbol, exponent) = match segment.split_once('^') {
                Some((symbol, exponent)) => {
                    let exponent = exponent.trim().parse::<i8>().map_err(|_| {
                        ZgoubiError::units(format!("invalid exponent in unit '{}'", expr))
                    })?;
                    (symbol.trim(), exponent)
                }
                None => (segment, 1),
            };
            if symbol.is_empty() {
                return Err(ZgoubiError::units(format!("malformed unit expression '{}'", expr)));
            }
            let base = self
                .units
                .get(symbol)
                .ok_or_else(|| ZgoubiError::units(format!("unknown unit '{}'", symbol)))?;
            let overflow =
                || ZgoubiError::units(format!("unit exponent out of range in '{}'", expr));
            let term = base.powi(exponent).ok_or_else(overflow)?;
            result = if divide {
                result.divide(&term)
            } else {
                result.multiply(&term)
            }
            .ok_or_else(overflow)?;
        }
        Ok(result)
    }

    /// Parses a quantity and checks that its unit resolves.
    pub fn parse(&self, s: &str) -> Result<Quantity> {
        let q: Quantity = s.parse()?;
        self.resolve(q.unit())?;
        Ok(q)
    }

    /// Magnitude of `q` expressed in `target`.
    pub fn convert(&self, q: &Quantity, target: &str) -> Result<f64> {
        let from = self.resolve(q.unit())?;
        let to = self.resolve(target)?;
        if from.dims() != to.dims() {
            return Err(ZgoubiError::units(format!(
                "cannot convert '{}' to '{}': incompatible dimensions",
                q, target
            )));
        }
        Ok(q.magnitude() * (from.scale() / to.scale()))
    }

    /// Sum of two quantities, expressed in the unit of `a`.
    pub fn add(&self, a: &Quantity, b: &Quantity) -> Result<Quantity> {
        let b_in_a = self.convert(b, a.unit())?;
        Ok(Quantity::new(a.magnitude() + b_in_a, a.unit()))
    }

    pub fn has_dimensions(&self, q: &Quantity, dims: Dimensions) -> Result<bool> {
        Ok(self.resolve(q.unit())?.dims() == dims)
    }

    pub fn m(&self, q: impl AsQuantity) -> Result<f64> {
        self.convert(&q.as_quantity()?, "m")
    }

    pub fn cm(&self, q: impl AsQuantity) -> Result<f64> {
        self.convert(&q.as_quantity()?, "cm")
    }

    pub fn mm(&self, q: impl AsQuantity) -> Result<f64> {
        self.convert(&q.as_quantity()?, "mm")
    }

    pub fn degree(&self, q: impl AsQuantity) -> Result<f64> {
        self.convert(&q.as_quantity()?, "degree")
    }

    pub fn radian(&self, q: impl AsQuantity) -> Result<f64> {
        self.convert(&q.as_quantity()?, "radian")
    }

    pub fn tesla(&self, q: impl AsQuantity) -> Result<f64> {
        self.convert(&q.as_quantity()?, "tesla")
    }

    pub fn gauss(&self, q: impl AsQuantity) -> Result<f64> {
        self.convert(&q.as_quantity()?, "gauss")
    }

    pub fn kilogauss(&self, q: impl AsQuantity) -> Result<f64> {
        self.convert(&q.as_quantity()?, "kilogauss")
    }

    /// Magnetic rigidity in kG.cm, Zgoubi's unit for BORO.
    pub fn kilogauss_cm(&self, q: impl AsQuantity) -> Result<f64> {
        self.convert(&q.as_quantity()?, "kilogauss*cm")
    }

    pub fn mev(&self, q: impl AsQuantity) -> Result<f64> {
        self.convert(&q.as_quantity()?, "MeV")
    }

    pub fn mev_c(&self, q: impl AsQuantity) -> Result<f64> {
        self.convert(&q.as_quantity()?, "MeV_c")
    }

    pub fn mev_c2(&self, q: impl AsQuantity) -> Result<f64> {
        self.convert(&q.as_quantity()?, "MeV_c2")
    }

    pub fn coulomb(&self, q: impl AsQuantity) -> Result<f64> {
        self.convert(&q.as_quantity()?, "coulomb")
    }

    pub fn second(&self, q: impl AsQuantity) -> Result<f64> {
        self.convert(&q.as_quantity()?, "second")
    }
}
