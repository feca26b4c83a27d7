//! Beamline description files.
//!
//! A description names the input, lists its commands and optionally defines
//! a beam. YAML (`.yaml`, `.yml`) and JSON (`.json`) are accepted.
//!
//! ```yaml
//! name: transfer_line
//! output:
//!   filename: zgoubi.dat
//! line:
//!   - LABEL1: D1
//!     Drift: { XL: 1 m }
//!   - Quadrupole: { XL: 40 cm, R0: 10 cm, B0: 0.5 T }
//! beam:
//!   particle: proton
//!   brho: 1.5 T*m
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::beam::{Beam, Distribution, Slicing};
use crate::commands::{Command, ParticleSpecies, Particule};
use crate::error::{Result, ZgoubiError};
use crate::input::{Input, ZGOUBI_INPUT_FILENAME};
use crate::units::Quantity;

fn default_name() -> String {
    "beamline".to_string()
}

fn default_filename() -> String {
    ZGOUBI_INPUT_FILENAME.to_string()
}

fn default_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_validate() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_filename")]
    pub filename: String,
    #[serde(default = "default_path")]
    pub path: PathBuf,
    /// Run every validator before writing.
    #[serde(default = "default_validate")]
    pub validate: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            filename: default_filename(),
            path: default_path(),
            validate: default_validate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamConfig {
    pub particle: ParticleSpecies,
    pub brho: Quantity,
    #[serde(default)]
    pub distribution: Option<Distribution>,
    #[serde(default)]
    pub slicing: Option<Slicing>,
}

impl BeamConfig {
    pub fn to_beam(&self) -> Beam {
        let mut beam = Beam::new(Particule::from_species(self.particle), self.brho.clone());
        if let Some(distribution) = &self.distribution {
            beam = beam.with_distribution(distribution.clone());
        }
        match self.slicing {
            Some(Slicing::Count(n)) => beam.with_slices(n),
            Some(Slicing::Size(n)) => beam.with_slice_size(n),
            None => beam,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamlineConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub line: Vec<Command>,
    #[serde(default)]
    pub beam: Option<BeamConfig>,
}

impl BeamlineConfig {
    /// Loads a description, picking the format from the file extension.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&source),
            Some("json") => Self::from_json(&source),
            other => Err(ZgoubiError::Config(format!(
                "unsupported description format '{}' for {}",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }

    pub fn from_yaml(source: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn to_input(&self) -> Input {
        Input::from_commands(self.name.clone(), self.line.iter().cloned())
    }

    pub fn to_beam(&self) -> Option<Beam> {
        self.beam.as_ref().map(BeamConfig::to_beam)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTION: &str = r#"
name: transfer_line
line:
  - LABEL1: D1
    Drift: { XL: 1 m }
  - Quadrupole: { XL: 40 cm, R0: 10 cm, B0: 0.5 T }
  - Marker: {}
beam:
  particle: proton
  brho: 1.5 T*m
  distribution:
    - { Y: 0.1, T: 0.0 }
    - { Y: -0.1, D: 1.001 }
  slicing: { count: 2 }
"#;

    #[test]
    fn yaml_description_builds_input_and_beam() {
        let config = BeamlineConfig::from_yaml(DESCRIPTION).unwrap();
        assert_eq!(config.output, OutputConfig::default());

        let input = config.to_input();
        assert_eq!(input.name(), "transfer_line");
        assert_eq!(input.keywords(), vec!["DRIFT", "QUADRUPO", "MARKER"]);
        assert_eq!(input.labels1(), vec!["D1", "", ""]);

        let beam = config.to_beam().unwrap();
        assert_eq!(beam.brho(), &Quantity::new(1.5, "T*m"));
        assert_eq!(beam.slices().len(), 2);
        assert_eq!(beam.distribution().unwrap().particles()[1].d, 1.001);
    }

    #[test]
    fn json_description_is_accepted() {
        let config = BeamlineConfig::from_json(
            r#"{"name": "j", "line": [{"End": {}}], "output": {"validate": false}}"#,
        )
        .unwrap();
        assert!(!config.output.validate);
        assert_eq!(config.output.filename, "zgoubi.dat");
        assert!(config.to_beam().is_none());
        assert_eq!(config.to_input().keywords(), vec!["END"]);
    }

    #[test]
    fn malformed_description_is_reported() {
        let err = BeamlineConfig::from_yaml("line: [ { Drift: { XL: fast } } ]").unwrap_err();
        assert!(matches!(err, ZgoubiError::Yaml(_)));
    }
}
