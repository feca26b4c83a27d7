//! # Zgoubi commands
//!
//! The closed set of record kinds that can appear in an [`Input`](crate::input::Input).
//!
//! ## Module Structure
//!
//! - **`class`**: filter discriminators (`CommandClass`, `Selector`)
//! - **`objet`**: initial ensembles (`Objet2`, `MCObjet3`) and particle coordinates
//! - **`particule`**: particle species definition (`Particule`)
//! - **`elements`**: optical elements and control commands (`Drift`, `Quadrupole`, `Bend`, ...)
//!
//! Every kind declares the fields it exposes for bulk configuration through the
//! `fields!` macro; the container never probes a command for attributes it
//! did not declare.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::units::{Quantity, UnitRegistry};
use crate::value::Value;

/// Generates `FIELDS`, `get` and `set` for a command kind from a
/// `"NAME" => field` table.
macro_rules! fields {
    ($ty:ident, $keyword:expr, {}) => {
        impl $ty {
            pub const FIELDS: &'static [&'static str] = &[];

            pub fn get(&self, _name: &str) -> Option<$crate::value::Value> {
                None
            }

            pub fn set(
                &mut self,
                _name: &str,
                _value: $crate::value::Value,
            ) -> $crate::error::Result<bool> {
                Ok(false)
            }
        }
    };
    ($ty:ident, $keyword:expr, { $($name:literal => $field:ident),+ $(,)? }) => {
        impl $ty {
            /// Field names exposed for bulk configuration.
            pub const FIELDS: &'static [&'static str] = &[$($name),+];

            pub fn get(&self, name: &str) -> Option<$crate::value::Value> {
                use $crate::value::FieldValue;
                match name {
                    $($name => Some(self.$field.to_value()),)+
                    _ => None,
                }
            }

            pub fn set(
                &mut self,
                name: &str,
                value: $crate::value::Value,
            ) -> $crate::error::Result<bool> {
                match name {
                    $($name => {
                        $crate::value::assign_field(&mut self.$field, value, $keyword, name)?;
                        Ok(true)
                    })+
                    _ => Ok(false),
                }
            }
        }
    };
}

mod class;
mod elements;
mod objet;
mod particule;

pub use class::{CommandClass, Selector};
pub use elements::{Bend, Drift, End, Faisceau, Marker, Quadrupole};
pub use objet::{MCObjet3, Objet2, ParticleCoordinates, TwissPlane};
pub use particule::{ParticleSpecies, Particule};

/// A command shared between an input and the views filtered from it.
pub type Record = Rc<RefCell<Command>>;

/// Position (cm) and orientation (rad) of an element face in the global frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

impl Frame {
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    pub fn origin() -> Self {
        Self::default()
    }

    /// Moves `distance` centimetres along the current heading.
    pub fn advance(&self, distance: f64) -> Self {
        Self {
            x: self.x + distance * self.theta.cos(),
            y: self.y + distance * self.theta.sin(),
            theta: self.theta,
        }
    }
}

/// The kind-specific payload of a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Element {
    Objet2(Objet2),
    MCObjet3(MCObjet3),
    Particule(Particule),
    Drift(Drift),
    Marker(Marker),
    Quadrupole(Quadrupole),
    Bend(Bend),
    Faisceau(Faisceau),
    End(End),
}

macro_rules! dispatch {
    ($self:expr, $e:ident => $body:expr) => {
        match $self {
            Element::Objet2($e) => $body,
            Element::MCObjet3($e) => $body,
            Element::Particule($e) => $body,
            Element::Drift($e) => $body,
            Element::Marker($e) => $body,
            Element::Quadrupole($e) => $body,
            Element::Bend($e) => $body,
            Element::Faisceau($e) => $body,
            Element::End($e) => $body,
        }
    };
}

impl Element {
    pub fn keyword(&self) -> &'static str {
        match self {
            Element::Objet2(_) => "OBJET",
            Element::MCObjet3(_) => "MCOBJET",
            Element::Particule(_) => "PARTICUL",
            Element::Drift(_) => "DRIFT",
            Element::Marker(_) => "MARKER",
            Element::Quadrupole(_) => "QUADRUPO",
            Element::Bend(_) => "BEND",
            Element::Faisceau(_) => "FAISCEAU",
            Element::End(_) => "END",
        }
    }

    /// The concrete class of this element.
    pub fn class(&self) -> CommandClass {
        match self {
            Element::Objet2(_) => CommandClass::Objet2,
            Element::MCObjet3(_) => CommandClass::MCObjet3,
            Element::Particule(_) => CommandClass::Particule,
            Element::Drift(_) => CommandClass::Drift,
            Element::Marker(_) => CommandClass::Marker,
            Element::Quadrupole(_) => CommandClass::Quadrupole,
            Element::Bend(_) => CommandClass::Bend,
            Element::Faisceau(_) => CommandClass::Faisceau,
            Element::End(_) => CommandClass::End,
        }
    }

    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Element::Objet2(_) => Objet2::FIELDS,
            Element::MCObjet3(_) => MCObjet3::FIELDS,
            Element::Particule(_) => Particule::FIELDS,
            Element::Drift(_) => Drift::FIELDS,
            Element::Marker(_) => Marker::FIELDS,
            Element::Quadrupole(_) => Quadrupole::FIELDS,
            Element::Bend(_) => Bend::FIELDS,
            Element::Faisceau(_) => Faisceau::FIELDS,
            Element::End(_) => End::FIELDS,
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        dispatch!(self, e => e.get(name))
    }

    pub fn set(&mut self, name: &str, value: Value) -> Result<bool> {
        dispatch!(self, e => e.set(name, value))
    }

    /// Body lines in Zgoubi's free format, each terminated by a newline.
    pub fn render(&self, units: &UnitRegistry) -> Result<String> {
        dispatch!(self, e => e.render(units))
    }

    /// Whether the element occupies space along the beamline.
    pub fn patchable(&self) -> bool {
        matches!(
            self,
            Element::Drift(_) | Element::Marker(_) | Element::Quadrupole(_) | Element::Bend(_)
        )
    }

    pub fn length(&self) -> Option<&Quantity> {
        match self {
            Element::Drift(d) => Some(&d.xl),
            Element::Quadrupole(q) => Some(&q.xl),
            Element::Bend(b) => Some(&b.xl),
            _ => None,
        }
    }
}

/// A labelled command: the unit stored in an input line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    #[serde(rename = "LABEL1", default, skip_serializing_if = "Option::is_none")]
    pub label1: Option<String>,
    #[serde(rename = "LABEL2", default, skip_serializing_if = "Option::is_none")]
    pub label2: Option<String>,
    #[serde(skip)]
    pub entry: Option<Frame>,
    #[serde(skip)]
    pub sortie: Option<Frame>,
    #[serde(flatten)]
    pub element: Element,
}

impl Command {
    pub fn new(element: impl Into<Element>) -> Self {
        Self {
            label1: None,
            label2: None,
            entry: None,
            sortie: None,
            element: element.into(),
        }
    }

    pub fn with_label1(mut self, label: impl Into<String>) -> Self {
        self.label1 = Some(label.into());
        self
    }

    pub fn with_label2(mut self, label: impl Into<String>) -> Self {
        self.label2 = Some(label.into());
        self
    }

    pub fn keyword(&self) -> &'static str {
        self.element.keyword()
    }

    pub fn class(&self) -> CommandClass {
        self.element.class()
    }

    pub fn is_instance_of(&self, class: CommandClass) -> bool {
        class.matches(self.class())
    }

    pub fn is_end(&self) -> bool {
        matches!(self.element, Element::End(_))
    }

    pub fn patchable(&self) -> bool {
        self.element.patchable()
    }

    pub fn length(&self) -> Option<&Quantity> {
        self.element.length()
    }

    /// All field names settable through bulk configuration.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut names = vec!["LABEL1", "LABEL2"];
        names.extend_from_slice(self.element.fields());
        names
    }

    /// `None` when the field is not declared; `Some(Value::Nil)` when declared but unset.
    pub fn get(&self, name: &str) -> Option<Value> {
        match name {
            "LABEL1" => Some(self.label1.clone().into()),
            "LABEL2" => Some(self.label2.clone().into()),
            _ => self.element.get(name),
        }
    }

    /// True when the field is declared and currently holds a value.
    pub fn has_value(&self, name: &str) -> bool {
        matches!(self.get(name), Some(v) if !v.is_nil())
    }

    /// Sets a declared field; returns `false` when the field is not declared.
    pub fn set(&mut self, name: &str, value: Value) -> Result<bool> {
        let keyword = self.keyword();
        match name {
            "LABEL1" => {
                crate::value::assign_field(&mut self.label1, value, keyword, name)?;
                Ok(true)
            }
            "LABEL2" => {
                crate::value::assign_field(&mut self.label2, value, keyword, name)?;
                Ok(true)
            }
            _ => self.element.set(name, value),
        }
    }

    /// Particle-count bound of objet-like commands.
    pub fn imax(&self) -> Option<usize> {
        match &self.element {
            Element::Objet2(o) => Some(o.imax()),
            Element::MCObjet3(o) => o.imax,
            _ => None,
        }
    }

    pub fn as_objet2_mut(&mut self) -> Option<&mut Objet2> {
        match &mut self.element {
            Element::Objet2(o) => Some(o),
            _ => None,
        }
    }

    pub fn into_record(self) -> Record {
        Rc::new(RefCell::new(self))
    }

    fn header(&self) -> String {
        let line = format!(
            " '{}' {} {}",
            self.keyword(),
            self.label1.as_deref().unwrap_or(""),
            self.label2.as_deref().unwrap_or("")
        );
        format!("\n{}\n", line.trim_end())
    }

    /// Full textual form: keyword/label header followed by the element body.
    pub fn render(&self, units: &UnitRegistry) -> Result<String> {
        Ok(self.header() + &self.element.render(units)?)
    }
}

macro_rules! element_conversions {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Element {
                fn from(e: $ty) -> Self {
                    Element::$ty(e)
                }
            }

            impl From<$ty> for Command {
                fn from(e: $ty) -> Self {
                    Command::new(e)
                }
            }
        )+
    };
}

element_conversions!(Objet2, MCObjet3, Particule, Drift, Marker, Quadrupole, Bend, Faisceau, End);

impl From<Element> for Command {
    fn from(element: Element) -> Self {
        Command::new(element)
    }
}

/// Formats a number for Zgoubi's free-format reader.
pub(crate) fn fmt_num(x: f64) -> String {
    let magnitude = x.abs();
    if x == 0.0 || (1e-4..1e8).contains(&magnitude) {
        format!("{}", x)
    } else {
        format!("{:e}", x)
    }
}
