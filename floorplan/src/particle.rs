//! Particle pool: the sole owner of every live airflow particle.
//!
//! Particles are plain values in a `Vec`. Nothing else holds a reference to
//! them, so removing one from the pool is final.

#[cfg(test)]
#[path = "particle_test.rs"]
mod particle_test;

use rand::Rng;

use crate::consts::{CULL_MARGIN_PX, TURBULENCE};
use crate::preset::EntityKind;
use crate::viewport::{Point, Viewport};

/// A short-lived airflow sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Radius in pixels.
    pub r: f64,
    /// Remaining lifetime in frames.
    pub life: f64,
    /// Kind of the emitting device; selects the render color.
    pub kind: EntityKind,
}

impl Particle {
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Apply one frame of turbulence and integration, then age by one frame.
    fn advect<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.vx += uniform(rng, -TURBULENCE, TURBULENCE);
        self.vy += uniform(rng, -TURBULENCE, TURBULENCE);
        self.x += self.vx;
        self.y += self.vy;
        self.life -= 1.0;
    }
}

/// Draw from `[lo, hi)`. Degenerate ranges return `lo` instead of panicking.
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    lo + (hi - lo) * rng.random::<f64>()
}

/// All live particles.
#[derive(Debug, Clone, Default)]
pub struct ParticlePool {
    particles: Vec<Particle>,
}

impl ParticlePool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Advect every particle once, then drop the expired and the escaped.
    ///
    /// Culling bounds come from `viewport` as it is now, so a resize takes
    /// effect on the next call. Returns the number of particles removed.
    pub fn advect_and_cull<R: Rng + ?Sized>(&mut self, viewport: &Viewport, rng: &mut R) -> usize {
        let before = self.particles.len();
        self.particles.retain_mut(|p| {
            p.advect(rng);
            p.life > 0.0 && viewport.contains_with_margin(p.position(), CULL_MARGIN_PX)
        });
        before - self.particles.len()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Live particles emitted by devices of `kind`.
    #[must_use]
    pub fn count_kind(&self, kind: EntityKind) -> usize {
        self.particles.iter().filter(|p| p.kind == kind).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
