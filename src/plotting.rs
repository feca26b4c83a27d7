//! Beamline overlay: entry and exit markers for every placed element.
//!
//! Drawing is delegated to an [`Artist`], so any backend (SVG writer, GUI
//! canvas, test recorder) can be plugged in.

use crate::commands::Command;
use crate::input::Input;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    /// Green square at the element entrance.
    Entry,
    /// Black square at the element exit.
    Exit,
}

pub trait Artist {
    /// Draws a marker at (`x`, `y`), both in centimetres.
    fn marker(&mut self, x: f64, y: f64, style: MarkerStyle);

    /// Draws the element itself. The default draws nothing.
    fn element(&mut self, _command: &Command) {}
}

/// Draws every patchable, surveyed command of `beamline`.
///
/// Commands that were never placed (no entry or exit frame) are skipped.
pub fn plot(beamline: &Input, artist: &mut dyn Artist, with_elements: bool) {
    for record in beamline.line() {
        let command = record.borrow();
        if !command.patchable() {
            continue;
        }
        let (Some(entry), Some(sortie)) = (command.entry, command.sortie) else {
            continue;
        };
        if with_elements {
            artist.element(&command);
        }
        artist.marker(entry.x, entry.y, MarkerStyle::Entry);
        artist.marker(sortie.x, sortie.y, MarkerStyle::Exit);
    }
}
