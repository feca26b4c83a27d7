//! # zgoubidoo
//!
//! Assemble, filter, validate and write input files for the Zgoubi
//! ray-tracing code.
//!
//! The central type is [`Input`], an ordered list of shared [`Command`]s.
//! Unit conversions go through an explicit [`UnitRegistry`] that is passed to
//! every rendering call.

pub use crate::commands::{Command, CommandClass, Record, Selector};
pub use crate::error::{Result, ZgoubiError};
pub use crate::input::{Input, Validator, WriteMode, ZGOUBI_IMAX, ZGOUBI_INPUT_FILENAME};
pub use crate::units::{Quantity, UnitRegistry};
pub use crate::validation::InputValidator;

pub mod beam;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod plotting;
pub mod survey;
pub mod units;
pub mod validation;
pub mod value;
