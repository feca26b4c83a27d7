//! Subcommands of the `zgoubidoo` binary.
//!
//! Every subcommand takes a beamline description file; `write` also accepts
//! overrides for the description's output settings.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "zgoubidoo",
    version,
    about = "Assemble, validate and write Zgoubi input files from beamline descriptions."
)]
pub struct ZgoubidooArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write the Zgoubi input file(s) for a beamline description.
    Write {
        /// The path to the beamline description (YAML or JSON).
        #[arg(required = true)]
        file: PathBuf,
        /// Output directory; overrides the description's `output.path`.
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Output file name; overrides the description's `output.filename`.
        #[arg(long)]
        filename: Option<String>,
        /// Skip validation before writing.
        #[arg(long)]
        no_validate: bool,
    },
    /// Print the rendered Zgoubi input to stdout.
    Render {
        #[arg(required = true)]
        file: PathBuf,
    },
    /// List the keywords of every command in the line.
    Keywords {
        #[arg(required = true)]
        file: PathBuf,
    },
    /// Render only the commands matching the given classes (e.g. `Magnet Drift`).
    Filter {
        #[arg(required = true)]
        file: PathBuf,
        #[arg(required = true)]
        selectors: Vec<String>,
    },
    /// Run every validator and report the first failure.
    Validate {
        #[arg(required = true)]
        file: PathBuf,
    },
}
