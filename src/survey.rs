//! Straight-line placement of beamline elements.
//!
//! Walks the patchable commands of an input in order, records the entry and
//! exit frames of each one, and feeds their lengths into the input's optical
//! length. Elements are laid end to end along the current heading; bends do
//! not rotate the frame.
//!
//! A negative length (a backwards drift) moves the frame backwards but does
//! not count toward the optical length, which only grows.

use tracing::debug;

use crate::commands::Frame;
use crate::error::Result;
use crate::input::Input;
use crate::units::{Quantity, UnitRegistry};

/// Places every patchable command starting at `start`; returns the final frame.
///
/// Every length is converted before anything is placed, so an error leaves
/// the input untouched.
pub fn survey(input: &mut Input, start: Frame, units: &UnitRegistry) -> Result<Frame> {
    let mut placements: Vec<(usize, f64, Option<Quantity>)> = Vec::new();
    for (index, record) in input.line().iter().enumerate() {
        let command = record.borrow();
        if !command.patchable() {
            continue;
        }
        let length = command.length().cloned();
        let distance = match &length {
            Some(l) => units.cm(l)?,
            None => 0.0,
        };
        placements.push((index, distance, length));
    }

    let mut frame = start;
    let mut lengths = Vec::new();
    let mut backwards = 0;
    for (index, distance, length) in placements {
        let mut command = input.get(index)?.borrow_mut();
        command.entry = Some(frame);
        frame = frame.advance(distance);
        command.sortie = Some(frame);
        match length {
            Some(_) if distance < 0.0 => backwards += 1,
            Some(l) => lengths.push(l),
            None => {}
        }
    }

    for length in &lengths {
        input.increase_optical_length(length, units)?;
    }
    debug!(
        input = %input.name(),
        elements = lengths.len(),
        backwards,
        "survey complete"
    );
    Ok(frame)
}
