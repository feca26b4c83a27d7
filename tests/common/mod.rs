//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use zgoubidoo::beam::{Beam, Distribution};
use zgoubidoo::commands::{
    Bend, Command, Drift, Marker, Objet2, ParticleCoordinates, Particule, Quadrupole,
};
use zgoubidoo::{Input, Quantity};

pub fn q(magnitude: f64, unit: &str) -> Quantity {
    Quantity::new(magnitude, unit)
}

/// `OBJET, PARTICUL, DRIFT, QUADRUPO, DRIFT, BEND, MARKER`
pub fn transfer_line() -> Input {
    Input::from_commands(
        "transfer_line",
        [
            Command::new(Objet2::new(q(1.5, "T*m"))).with_label1("BUNCH"),
            Command::new(Particule::proton()),
            Command::new(Drift::new(q(1.0, "m"))).with_label1("D1"),
            Command::new(Quadrupole::new(q(40.0, "cm"), q(10.0, "cm"), q(0.5, "T"))).with_label1("Q1"),
            Command::new(Drift::new(q(50.0, "cm"))).with_label1("D2"),
            Command::new(Bend::new(q(2.0, "m"), q(1.2, "T"))).with_label1("B1"),
            Command::new(Marker::default()).with_label1("M1"),
        ],
    )
}

/// An optical line with no objet or particle, ready to receive a beam.
pub fn bare_line() -> Input {
    Input::from_commands(
        "bare",
        [
            Command::new(Drift::new(q(1.0, "m"))),
            Command::new(Quadrupole::new(q(40.0, "cm"), q(10.0, "cm"), q(0.5, "T"))),
            Command::new(Marker::default()),
        ],
    )
}

pub fn distribution(n: usize) -> Distribution {
    (0..n)
        .map(|i| ParticleCoordinates::new(i as f64 * 1e-3, 0.0, 0.0, 0.0, 0.0, 1.0))
        .collect()
}

pub fn proton_beam() -> Beam {
    Beam::new(Particule::proton(), q(1.5, "T*m"))
}
