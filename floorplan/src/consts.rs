//! Shared numeric constants for the floorplan crate.

use std::f64::consts::FRAC_PI_4;

// ── Interaction ─────────────────────────────────────────────────

/// Angle added to a device on click-without-drag (45°).
pub const ROTATE_STEP: f64 = FRAC_PI_4;

/// Inset from the viewport edge used when drag clamping is enabled.
pub const CLAMP_INSET_PX: f64 = 10.0;

// ── Emission ────────────────────────────────────────────────────

/// Half-width of the uniform spawn-position jitter, per axis.
pub const SPAWN_JITTER_PX: f64 = 5.0;

/// Lower bound of the speed multiplier drawn for each new particle.
pub const SPEED_FACTOR_MIN: f64 = 1.1;

/// Upper bound of the speed multiplier drawn for each new particle.
pub const SPEED_FACTOR_MAX: f64 = 1.7;

/// Minimum particle lifetime in frames.
pub const LIFETIME_BASE: f64 = 60.0;

/// Extra lifetime drawn uniformly from `[0, LIFETIME_SPREAD)`.
pub const LIFETIME_SPREAD: f64 = 40.0;

/// Minimum particle radius in pixels.
pub const RADIUS_BASE: f64 = 2.0;

/// Extra radius drawn uniformly from `[0, RADIUS_SPREAD)`.
pub const RADIUS_SPREAD: f64 = 1.5;

// ── Advection ───────────────────────────────────────────────────

/// Per-axis turbulence: velocity += U(-TURBULENCE, TURBULENCE) every frame.
pub const TURBULENCE: f64 = 0.025;

/// Extra space around the viewport before a particle is culled.
pub const CULL_MARGIN_PX: f64 = 10.0;

// ── Rendering ───────────────────────────────────────────────────

/// Corner radius of entity bodies.
pub const CORNER_RADIUS_PX: f64 = 10.0;

/// Length of the emission arrow past the facing edge.
pub const ARROW_LENGTH_PX: f64 = 16.0;

/// Half-height of the emission arrow's base.
pub const ARROW_HALF_WIDTH_PX: f64 = 5.0;
