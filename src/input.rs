//! # Zgoubi input
//!
//! An [`Input`] is the ordered list of commands that makes up a Zgoubi input
//! file. It supports filtering by command class, bulk configuration of the
//! commands it holds, validation, and writing to disk, either as-is or bound
//! to a [`Beam`] whose distribution is spread over one generated input per
//! slice.
//!
//! Commands are shared (`Rc<RefCell<_>>`) between an input and the views
//! filtered from it: configuring a filtered view configures the original.
//!
//! ```rust
//! use zgoubidoo::commands::{CommandClass, Drift, Marker};
//! use zgoubidoo::input::Input;
//! use zgoubidoo::units::Quantity;
//!
//! let mut zi = Input::new("test_beamline");
//! zi += Marker::default().into();
//! zi += Drift::new(Quantity::new(1.0, "m")).into();
//! assert_eq!(zi.len(), 2);
//! assert_eq!(zi.contains(&[CommandClass::Drift.into()]), 1);
//! ```

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::ops::AddAssign;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::beam::Beam;
use crate::commands::{Command, CommandClass, End, Record, Selector};
use crate::error::{Result, ZgoubiError};
use crate::units::{Dimensions, Quantity, UnitRegistry};
use crate::value::Value;

pub const ZGOUBI_INPUT_FILENAME: &str = "zgoubi.dat";
/// Maximum number of particles Zgoubi accepts in a single objet.
pub const ZGOUBI_IMAX: usize = 10_000;

static NAME_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[ '"()]"#).expect("name pattern is valid"));

/// A structural check over an input.
pub type Validator = fn(&Input) -> Result<bool>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    #[default]
    Truncate,
    Append,
}

/// Where an input was written.
#[derive(Debug)]
pub enum GeneratedPath {
    /// A caller-provided directory; never removed by `cleanup`.
    Directory(PathBuf),
    /// A temporary directory owned by the input until `cleanup`.
    Temporary(TempDir),
}

impl GeneratedPath {
    pub fn path(&self) -> &Path {
        match self {
            GeneratedPath::Directory(path) => path,
            GeneratedPath::Temporary(dir) => dir.path(),
        }
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self, GeneratedPath::Temporary(_))
    }
}

#[derive(Debug)]
pub struct Input {
    name: String,
    line: Vec<Record>,
    paths: Vec<GeneratedPath>,
    inputs: Vec<Input>,
    optical_length: Quantity,
}

impl Default for Input {
    fn default() -> Self {
        Self::new("beamline")
    }
}

impl Input {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_line(name, Vec::new())
    }

    /// Wraps an existing line; the records stay shared with their other owners.
    pub fn from_line(name: impl Into<String>, line: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            line,
            paths: Vec::new(),
            inputs: Vec::new(),
            optical_length: Quantity::new(0.0, "m"),
        }
    }

    pub fn from_commands(
        name: impl Into<String>,
        commands: impl IntoIterator<Item = Command>,
    ) -> Self {
        Self::from_line(name, commands.into_iter().map(Command::into_record).collect())
    }

    pub fn push(&mut self, command: Command) {
        self.line.push(command.into_record());
    }

    pub fn push_record(&mut self, record: Record) {
        self.line.push(record);
    }

    pub fn len(&self) -> usize {
        self.line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Record> {
        self.line.get(index).ok_or_else(|| {
            ZgoubiError::input(format!(
                "index {} out of range for input '{}' of length {}",
                index,
                self.name,
                self.line.len()
            ))
        })
    }

    /// Records whose class matches any of `selectors`, in line order.
    ///
    /// A name that does not denote a known class yields no match at all.
    fn matching(&self, selectors: &[Selector]) -> Vec<Record> {
        let Some(classes) = selectors
            .iter()
            .map(Selector::resolve)
            .collect::<Option<Vec<CommandClass>>>()
        else {
            return Vec::new();
        };
        self.line
            .iter()
            .filter(|record| {
                let command = record.borrow();
                classes.iter().any(|class| command.is_instance_of(*class))
            })
            .cloned()
            .collect()
    }

    fn filtered_name(name: &str, selectors: &[Selector]) -> String {
        let labels: Vec<&str> = selectors.iter().map(Selector::label).collect();
        let raw = format!("{}_filtered_by_{}", name, labels.join("_")).replace(',', "_");
        NAME_NOISE
            .replace_all(&raw, "")
            .trim_end_matches('_')
            .to_string()
    }

    /// A new input sharing every record that matches one of `selectors`.
    pub fn filter(&self, selectors: &[Selector]) -> Input {
        let line = self.matching(selectors);
        let name = Self::filtered_name(&self.name, selectors);
        debug!(input = %self.name, filtered = %name, matches = line.len(), "input filtered");
        Input::from_line(name, line)
    }

    /// Number of records matching `selectors`; zero means not contained.
    pub fn contains(&self, selectors: &[Selector]) -> usize {
        self.matching(selectors).len()
    }

    /// Sets `field` on every command that currently holds a non-null value for it.
    ///
    /// Returns the number of commands updated.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<usize> {
        let value = value.into();
        let mut updated = 0;
        for record in &self.line {
            let mut command = record.borrow_mut();
            if command.has_value(field) {
                command.set(field, value.clone())?;
                updated += 1;
            }
        }
        Ok(updated)
    }

    /// Replaces every command by `f(command)`, preserving order and length.
    pub fn apply<F>(&mut self, mut f: F)
    where
        F: FnMut(Command) -> Command,
    {
        self.line = self
            .line
            .iter()
            .map(|record| f(record.borrow().clone()).into_record())
            .collect();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn paths(&self) -> &[GeneratedPath] {
        &self.paths
    }

    /// Inputs generated by the last beam materializations, one per slice.
    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn keywords(&self) -> Vec<&'static str> {
        self.line.iter().map(|r| r.borrow().keyword()).collect()
    }

    pub fn line(&self) -> &[Record] {
        &self.line
    }

    pub fn optical_length(&self) -> &Quantity {
        &self.optical_length
    }

    pub fn labels(&self) -> Vec<String> {
        self.labels1()
    }

    pub fn labels1(&self) -> Vec<String> {
        self.line
            .iter()
            .map(|r| r.borrow().label1.clone().unwrap_or_default())
            .collect()
    }

    pub fn labels2(&self) -> Vec<String> {
        self.line
            .iter()
            .map(|r| r.borrow().label2.clone().unwrap_or_default())
            .collect()
    }

    pub fn increase_optical_length(&mut self, length: &Quantity, units: &UnitRegistry) -> Result<()> {
        if !units.has_dimensions(length, Dimensions::LENGTH)? {
            return Err(ZgoubiError::units(format!(
                "optical length increment must be a length, got '{}'",
                length
            )));
        }
        if length.magnitude() < 0.0 {
            return Err(ZgoubiError::input(format!(
                "optical length cannot decrease (increment {})",
                length
            )));
        }
        self.optical_length = units.add(&self.optical_length, length)?;
        Ok(())
    }

    /// Runs `validators` in order; the first failure is returned.
    pub fn validate(&self, validators: &[Validator]) -> Result<bool> {
        for validator in validators {
            validator(self)?;
        }
        Ok(true)
    }

    /// Renders `name` followed by every command of `line`.
    ///
    /// Appends an `END` command to `line` itself when it does not already end with one.
    pub fn build(name: &str, line: &mut Vec<Record>, units: &UnitRegistry) -> Result<String> {
        let terminated = line.last().is_some_and(|r| r.borrow().is_end());
        if !terminated {
            line.push(Command::new(End::default()).into_record());
        }
        let mut rendered = name.to_string();
        for record in line.iter() {
            rendered.push_str(&record.borrow().render(units)?);
        }
        Ok(rendered)
    }

    /// The Zgoubi input text; terminates the line with `END` if needed.
    pub fn render(&mut self, units: &UnitRegistry) -> Result<String> {
        Self::build(&self.name, &mut self.line, units)
    }

    /// Validates (optionally), renders and writes to `path/filename`.
    ///
    /// Returns the number of bytes written.
    pub fn write(
        &mut self,
        filename: &str,
        path: &Path,
        mode: WriteMode,
        validators: Option<&[Validator]>,
        units: &UnitRegistry,
    ) -> Result<usize> {
        if let Some(validators) = validators {
            self.validate(validators)?;
        }
        let contents = self.render(units)?;
        let target = path.join(filename);
        let mut file = match mode {
            WriteMode::Truncate => File::create(&target)?,
            WriteMode::Append => OpenOptions::new().create(true).append(true).open(&target)?,
        };
        file.write_all(contents.as_bytes())?;
        debug!(input = %self.name, path = %target.display(), bytes = contents.len(), "input written");
        Ok(contents.len())
    }

    /// Writes this input, or the inputs generated by binding `beam` to it.
    ///
    /// Without a beam, this input is written to `path/filename`. With a beam,
    /// one input per slice is generated, each starting with the beam's objet
    /// and particle, and written to its own temporary directory. The
    /// directories are released by [`Input::cleanup`].
    pub fn materialize(
        &mut self,
        beam: Option<&Beam>,
        filename: &str,
        path: &Path,
        units: &UnitRegistry,
    ) -> Result<&mut Self> {
        let Some(beam) = beam else {
            self.paths.push(GeneratedPath::Directory(path.to_path_buf()));
            self.write(filename, path, WriteMode::Truncate, None, units)?;
            return Ok(self);
        };

        let bound = [
            Selector::from(CommandClass::Objet),
            Selector::from(CommandClass::MCObjet),
            Selector::from(CommandClass::Particule),
        ];
        if self.contains(&bound) > 0 {
            return Err(ZgoubiError::input_with_help(
                "input already has particle/objet, cannot bind beam",
                "remove the 'Particule' and 'Objet' commands before applying a beam",
            ));
        }

        let particle = beam.particle();
        if beam.distribution().is_none() {
            info!(input = %self.name, "materializing beam without distribution");
            let mut objet = beam.objet(beam.brho().clone());
            if let Some(o) = objet.as_objet2_mut() {
                o.clear();
            }
            self.generate(objet, &particle, filename, units)?;
            return Ok(self);
        }

        let slices = beam.slices();
        info!(input = %self.name, slices = slices.len(), "materializing beam distribution");
        for (index, slice) in slices.iter().enumerate() {
            if slice.len() > ZGOUBI_IMAX {
                return Err(ZgoubiError::input_with_help(
                    format!(
                        "Trying to track too many particles in slice {} ({} > IMAX={})",
                        index,
                        slice.len(),
                        ZGOUBI_IMAX
                    ),
                    "Try to increase the number of slices.",
                ));
            }
            let mut objet = beam.objet(beam.brho().clone());
            if let Some(o) = objet.as_objet2_mut() {
                o.clear();
                o.load(slice);
            }
            self.generate(objet, &particle, filename, units)?;
        }
        Ok(self)
    }

    /// Writes `[objet, particle, ..line]` into a fresh temporary directory and
    /// records both the directory and the generated input.
    fn generate(
        &mut self,
        objet: Command,
        particle: &Command,
        filename: &str,
        units: &UnitRegistry,
    ) -> Result<()> {
        let mut line = Vec::with_capacity(self.line.len() + 3);
        line.push(objet.into_record());
        line.push(particle.clone().into_record());
        line.extend(self.line.iter().cloned());
        let mut generated = Input::from_line(self.name.clone(), line);

        let dir = tempfile::Builder::new().prefix("zgoubidoo_").tempdir()?;
        let dir_path = dir.path().to_path_buf();
        self.paths.push(GeneratedPath::Temporary(dir));
        generated.write(filename, &dir_path, WriteMode::Truncate, None, units)?;
        debug!(input = %self.name, path = %dir_path.display(), "generated input written");
        self.inputs.push(generated);
        Ok(())
    }

    /// Releases every temporary directory and forgets all recorded paths.
    ///
    /// Plain directories are left untouched; removal failures are logged.
    pub fn cleanup(&mut self) {
        for handle in self.paths.drain(..) {
            if let GeneratedPath::Temporary(dir) = handle {
                let path = dir.path().to_path_buf();
                if let Err(e) = dir.close() {
                    warn!(path = %path.display(), error = %e, "failed to remove temporary directory");
                }
            }
        }
    }
}

impl AddAssign<Command> for Input {
    fn add_assign(&mut self, command: Command) {
        self.push(command);
    }
}

impl Extend<Command> for Input {
    fn extend<I: IntoIterator<Item = Command>>(&mut self, commands: I) {
        self.line
            .extend(commands.into_iter().map(Command::into_record));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filtered_names_are_sanitized() {
        let selectors = [
            Selector::from(CommandClass::Objet2),
            Selector::from("Particule"),
        ];
        assert_eq!(
            Input::filtered_name("beamline", &selectors),
            "beamline_filtered_by_Objet2_Particule"
        );
        assert_eq!(
            Input::filtered_name("my line", &[Selector::from("Quadrupole")]),
            "myline_filtered_by_Quadrupole"
        );
        assert_eq!(Input::filtered_name("beamline", &[]), "beamline_filtered_by");
        assert_eq!(
            Input::filtered_name("a,b", &[Selector::from("Drift")]),
            "a_b_filtered_by_Drift"
        );
        assert_eq!(
            Input::filtered_name("(x)", &[Selector::from("'Bend',")]),
            "x_filtered_by_Bend"
        );
    }

    #[test]
    fn build_appends_end_exactly_once() {
        let units = UnitRegistry::default();
        let mut line = Vec::new();
        let first = Input::build("x", &mut line, &units).unwrap();
        assert_eq!(first, "x\n 'END'\n");
        assert_eq!(line.len(), 1);
        let second = Input::build("x", &mut line, &units).unwrap();
        assert_eq!(first, second);
        assert_eq!(line.len(), 1);
    }

    #[test]
    fn out_of_range_access_is_an_input_error() {
        let input = Input::default();
        let err = input.get(0).unwrap_err();
        assert!(err.is_input());
        assert!(err.to_string().contains("out of range"));
    }
}
