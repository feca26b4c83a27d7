//! The zgoubidoo command-line interface.
//!
//! A thin shell over the library: every subcommand loads a beamline
//! description, builds an [`Input`](crate::input::Input) from it and calls
//! the corresponding library operation.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use crate::cli::args::{Command, ZgoubidooArgs};
use crate::commands::Selector;
use crate::config::BeamlineConfig;
use crate::error::Result;
use crate::input::{GeneratedPath, Input};
use crate::units::UnitRegistry;
use crate::validation::InputValidator;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = ZgoubidooArgs::parse();

    let result = match args.command {
        Command::Write {
            file,
            out,
            filename,
            no_validate,
        } => handle_write(&file, out, filename, no_validate),
        Command::Render { file } => handle_render(&file),
        Command::Keywords { file } => handle_keywords(&file),
        Command::Filter { file, selectors } => handle_filter(&file, &selectors),
        Command::Validate { file } => handle_validate(&file),
    };

    if let Err(e) = result {
        eprintln!("{:?}", miette::Report::new(e));
        process::exit(1);
    }
}

/// `zgoubi.dat` -> `zgoubi_3.dat`
fn slice_filename(filename: &str, index: usize) -> String {
    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_{}.{}", stem, index, ext),
        None => format!("{}_{}", stem, index),
    }
}

fn handle_write(
    file: &Path,
    out: Option<PathBuf>,
    filename: Option<String>,
    no_validate: bool,
) -> Result<()> {
    let config = BeamlineConfig::load(file)?;
    let units = UnitRegistry::default();
    let out_dir = out.unwrap_or_else(|| config.output.path.clone());
    let filename = filename.unwrap_or_else(|| config.output.filename.clone());
    let validate = config.output.validate && !no_validate;
    fs::create_dir_all(&out_dir)?;

    let mut input = config.to_input();
    let Some(beam) = config.to_beam() else {
        if validate {
            input.validate(InputValidator::ALL)?;
        }
        input.materialize(None, &filename, &out_dir, &units)?;
        let target = out_dir.join(&filename);
        output::print_written(&target, fs::metadata(&target)?.len() as usize);
        return Ok(());
    };

    input.materialize(Some(&beam), &filename, &out_dir, &units)?;
    let exported = export_slices(input.inputs(), input.paths(), &filename, &out_dir, validate);
    input.cleanup();
    for (target, bytes) in exported? {
        output::print_written(&target, bytes as usize);
    }
    Ok(())
}

/// Copies every generated slice to `out_dir/<stem>_<index>.<ext>`.
///
/// All slices are validated first; nothing is copied unless every one passes.
fn export_slices(
    generated: &[Input],
    paths: &[GeneratedPath],
    filename: &str,
    out_dir: &Path,
    validate: bool,
) -> Result<Vec<(PathBuf, u64)>> {
    if validate {
        for input in generated {
            input.validate(InputValidator::ALL)?;
        }
    }
    paths
        .iter()
        .enumerate()
        .map(|(index, handle)| {
            let target = out_dir.join(slice_filename(filename, index));
            let bytes = fs::copy(handle.path().join(filename), &target)?;
            Ok((target, bytes))
        })
        .collect()
}

fn handle_render(file: &Path) -> Result<()> {
    let config = BeamlineConfig::load(file)?;
    let mut input = config.to_input();
    output::print_rendered(&input.render(&UnitRegistry::default())?);
    Ok(())
}

fn handle_keywords(file: &Path) -> Result<()> {
    let input = BeamlineConfig::load(file)?.to_input();
    output::print_keywords(&input.keywords(), &input.labels1());
    Ok(())
}

fn handle_filter(file: &Path, selectors: &[String]) -> Result<()> {
    let input = BeamlineConfig::load(file)?.to_input();
    let selectors: Vec<Selector> = selectors.iter().map(|s| Selector::from(s.as_str())).collect();
    let mut filtered = input.filter(&selectors);
    output::print_rendered(&filtered.render(&UnitRegistry::default())?);
    Ok(())
}

fn handle_validate(file: &Path) -> Result<()> {
    let input = BeamlineConfig::load(file)?.to_input();
    input.validate(InputValidator::ALL)?;
    output::print_valid(input.name(), input.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{self, Marker, Objet2};
    use crate::input::WriteMode;
    use crate::units::Quantity;

    #[test]
    fn slice_filenames_keep_the_extension() {
        assert_eq!(slice_filename("zgoubi.dat", 0), "zgoubi_0.dat");
        assert_eq!(slice_filename("input", 2), "input_2");
    }

    fn write_into(input: &mut Input, dir: &Path, units: &UnitRegistry) -> GeneratedPath {
        fs::create_dir_all(dir).unwrap();
        input
            .write("zgoubi.dat", dir, WriteMode::Truncate, None, units)
            .unwrap();
        GeneratedPath::Directory(dir.to_path_buf())
    }

    #[test]
    fn no_slice_is_exported_when_one_is_invalid() {
        let units = UnitRegistry::default();
        let scratch = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();

        let mut valid = Input::from_commands(
            "slice",
            [commands::Command::new(Objet2::new(Quantity::new(1.0, "T*m")))],
        );
        let mut invalid =
            Input::from_commands("slice", [commands::Command::new(Marker::default())]);
        let paths = vec![
            write_into(&mut valid, &scratch.path().join("0"), &units),
            write_into(&mut invalid, &scratch.path().join("1"), &units),
        ];
        let generated = [valid, invalid];

        let err = export_slices(&generated, &paths, "zgoubi.dat", out.path(), true).unwrap_err();
        assert!(err.is_input());
        assert!(!out.path().join("zgoubi_0.dat").exists());
        assert!(!out.path().join("zgoubi_1.dat").exists());

        let exported = export_slices(&generated, &paths, "zgoubi.dat", out.path(), false).unwrap();
        assert_eq!(exported.len(), 2);
        assert!(out.path().join("zgoubi_0.dat").exists());
        assert!(out.path().join("zgoubi_1.dat").exists());
    }
}
