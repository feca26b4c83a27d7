use serde::{Deserialize, Serialize};

use super::fmt_num;
use crate::error::Result;
use crate::units::{Quantity, UnitRegistry};

/// Species with built-in `PARTICUL` constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleSpecies {
    Proton,
    Electron,
    Positron,
    Muon,
}

/// `PARTICUL`: mass, charge, gyromagnetic anomaly and lifetime of the tracked species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particule {
    #[serde(rename = "M")]
    pub mass: Quantity,
    #[serde(rename = "Q")]
    pub charge: Quantity,
    #[serde(rename = "G")]
    pub g: f64,
    #[serde(rename = "tau")]
    pub lifetime: Quantity,
}

fields!(Particule, "PARTICUL", {
    "M" => mass,
    "Q" => charge,
    "G" => g,
    "tau" => lifetime,
});

impl Particule {
    pub fn new(mass: Quantity, charge: Quantity, g: f64, lifetime: Quantity) -> Self {
        Self {
            mass,
            charge,
            g,
            lifetime,
        }
    }

    pub fn proton() -> Self {
        Self::new(
            Quantity::new(938.272_088_16, "MeV_c2"),
            Quantity::new(1.0, "e"),
            1.792_847_344_6,
            Quantity::new(1e99, "s"),
        )
    }

    pub fn electron() -> Self {
        Self::new(
            Quantity::new(0.510_998_950, "MeV_c2"),
            Quantity::new(-1.0, "e"),
            1.159_652_181_28e-3,
            Quantity::new(1e99, "s"),
        )
    }

    pub fn positron() -> Self {
        Self {
            charge: Quantity::new(1.0, "e"),
            ..Self::electron()
        }
    }

    pub fn muon() -> Self {
        Self::new(
            Quantity::new(105.658_375_5, "MeV_c2"),
            Quantity::new(-1.0, "e"),
            1.165_920_89e-3,
            Quantity::new(2.196_981_1e-6, "s"),
        )
    }

    pub fn from_species(species: ParticleSpecies) -> Self {
        match species {
            ParticleSpecies::Proton => Self::proton(),
            ParticleSpecies::Electron => Self::electron(),
            ParticleSpecies::Positron => Self::positron(),
            ParticleSpecies::Muon => Self::muon(),
        }
    }

    pub fn render(&self, units: &UnitRegistry) -> Result<String> {
        Ok(format!(
            "{} {} {} {} 0\n",
            fmt_num(units.mev_c2(&self.mass)?),
            fmt_num(units.coulomb(&self.charge)?),
            fmt_num(self.g),
            fmt_num(units.second(&self.lifetime)?),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proton_renders_in_zgoubi_units() {
        let units = UnitRegistry::default();
        let body = Particule::proton().render(&units).unwrap();
        let fields: Vec<&str> = body.split_whitespace().collect();
        assert_eq!(fields.len(), 5);
        let mass: f64 = fields[0].parse().unwrap();
        assert!((mass - 938.272_088_16).abs() < 1e-6);
        let charge: f64 = fields[1].parse().unwrap();
        assert!((charge - 1.602_176_634e-19).abs() < 1e-27);
        assert_eq!(fields[3], "1e99");
    }

    #[test]
    fn positron_mirrors_electron_charge() {
        let e = Particule::electron();
        let p = Particule::positron();
        assert_eq!(e.mass, p.mass);
        assert_eq!(p.charge.magnitude(), 1.0);
    }
}
