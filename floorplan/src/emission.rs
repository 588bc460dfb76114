//! Emission and advection: one simulation frame.
//!
//! Each frame every device spawns its preset's `particles_per_frame` new
//! particles from its facing edge, then the whole pool (new particles
//! included) is advected and culled once.

#[cfg(test)]
#[path = "emission_test.rs"]
mod emission_test;

use rand::Rng;

use crate::consts::{
    LIFETIME_BASE, LIFETIME_SPREAD, RADIUS_BASE, RADIUS_SPREAD, SPAWN_JITTER_PX, SPEED_FACTOR_MAX, SPEED_FACTOR_MIN,
};
use crate::entity::{Entity, Registry};
use crate::particle::{Particle, ParticlePool, uniform};
use crate::preset::{Emission, Presets};
use crate::viewport::{Point, Viewport};

/// Counters for one frame step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    pub spawned: usize,
    pub culled: usize,
    /// Devices skipped because their geometry or preset was unusable.
    pub skipped: usize,
}

/// Point on the device's facing edge that particles leave from.
///
/// The center pushed by half the width/height projected on `angle`.
#[must_use]
pub fn outlet(entity: &Entity) -> Point {
    let c = entity.center();
    Point::new(
        c.x + entity.angle.cos() * (entity.width / 2.0),
        c.y + entity.angle.sin() * (entity.height / 2.0),
    )
}

/// Spawn one frame's worth of particles from `entity` into `pool`.
pub fn spawn_from<R: Rng + ?Sized>(entity: &Entity, emission: Emission, pool: &mut ParticlePool, rng: &mut R) -> usize {
    let origin = outlet(entity);
    let half_spread = emission.spread_deg.to_radians() / 2.0;

    for _ in 0..emission.particles_per_frame {
        let dir = entity.angle + uniform(rng, -half_spread, half_spread);
        let speed = emission.speed * uniform(rng, SPEED_FACTOR_MIN, SPEED_FACTOR_MAX);
        pool.spawn(Particle {
            x: origin.x + uniform(rng, -SPAWN_JITTER_PX, SPAWN_JITTER_PX),
            y: origin.y + uniform(rng, -SPAWN_JITTER_PX, SPAWN_JITTER_PX),
            vx: dir.cos() * speed,
            vy: dir.sin() * speed,
            r: RADIUS_BASE + uniform(rng, 0.0, RADIUS_SPREAD),
            life: LIFETIME_BASE + uniform(rng, 0.0, LIFETIME_SPREAD),
            kind: entity.kind,
        });
    }
    emission.particles_per_frame as usize
}

/// Spawn from every device, without advecting.
///
/// A device with unusable geometry or no emission preset is skipped and the
/// rest still emit.
pub fn emit_all<R: Rng + ?Sized>(
    registry: &Registry,
    presets: &Presets,
    pool: &mut ParticlePool,
    rng: &mut R,
) -> StepStats {
    let mut stats = StepStats::default();
    for (index, entity) in registry.devices() {
        if !entity.is_well_formed() {
            log::debug!("skipping malformed device {index} ({})", entity.type_key);
            stats.skipped += 1;
            continue;
        }
        let Some(emission) = presets.emission(&entity.type_key) else {
            log::debug!("no emission preset for device {index} ({})", entity.type_key);
            stats.skipped += 1;
            continue;
        };
        stats.spawned += spawn_from(entity, emission, pool, rng);
    }
    stats
}

/// Run one frame: spawn from all devices, then advect and cull the pool.
pub fn step<R: Rng + ?Sized>(
    registry: &Registry,
    presets: &Presets,
    pool: &mut ParticlePool,
    viewport: &Viewport,
    rng: &mut R,
) -> StepStats {
    let mut stats = emit_all(registry, presets, pool, rng);
    stats.culled = pool.advect_and_cull(viewport, rng);
    stats
}
