//! Beam definition bound to an input when materializing it.
//!
//! A beam carries the tracked species, the reference rigidity and, optionally,
//! a particle distribution split into slices. Each slice becomes one
//! generated input.

use serde::{Deserialize, Serialize};

use crate::commands::{Command, Objet2, ParticleCoordinates, Particule};
use crate::units::Quantity;

/// An ordered set of initial particle coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distribution {
    particles: Vec<ParticleCoordinates>,
}

impl Distribution {
    pub fn new(particles: Vec<ParticleCoordinates>) -> Self {
        Self { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[ParticleCoordinates] {
        &self.particles
    }
}

impl FromIterator<ParticleCoordinates> for Distribution {
    fn from_iter<I: IntoIterator<Item = ParticleCoordinates>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// How a distribution is cut into slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slicing {
    /// A fixed number of slices whose sizes differ by at most one.
    Count(usize),
    /// Consecutive slices of at most this many particles.
    Size(usize),
}

impl Default for Slicing {
    fn default() -> Self {
        Slicing::Count(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Beam {
    particle: Particule,
    brho: Quantity,
    distribution: Option<Distribution>,
    slicing: Slicing,
}

impl Beam {
    pub fn new(particle: Particule, brho: Quantity) -> Self {
        Self {
            particle,
            brho,
            distribution: None,
            slicing: Slicing::default(),
        }
    }

    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = Some(distribution);
        self
    }

    pub fn with_slices(mut self, count: usize) -> Self {
        self.slicing = Slicing::Count(count.max(1));
        self
    }

    pub fn with_slice_size(mut self, size: usize) -> Self {
        self.slicing = Slicing::Size(size.max(1));
        self
    }

    pub fn brho(&self) -> &Quantity {
        &self.brho
    }

    pub fn distribution(&self) -> Option<&Distribution> {
        self.distribution.as_ref()
    }

    pub fn slicing(&self) -> Slicing {
        self.slicing
    }

    /// A fresh `PARTICUL` command for this beam's species.
    pub fn particle(&self) -> Command {
        Command::new(self.particle.clone())
    }

    /// A fresh, empty `OBJET` configured with the given rigidity.
    pub fn objet(&self, boro: Quantity) -> Command {
        Command::new(Objet2::new(boro))
    }

    /// The distribution cut according to the slicing; empty without a distribution.
    pub fn slices(&self) -> Vec<&[ParticleCoordinates]> {
        let Some(distribution) = &self.distribution else {
            return Vec::new();
        };
        let particles = distribution.particles();
        match self.slicing {
            Slicing::Size(size) => particles.chunks(size.max(1)).collect(),
            Slicing::Count(count) => {
                let count = count.max(1);
                let base = particles.len() / count;
                let extra = particles.len() % count;
                let mut slices = Vec::with_capacity(count);
                let mut start = 0;
                for i in 0..count {
                    let len = base + usize::from(i < extra);
                    slices.push(&particles[start..start + len]);
                    start += len;
                }
                slices
            }
        }
    }
}
