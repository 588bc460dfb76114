//! Rendering: draws the floor plan, its entities and the particle field.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It reads the registry and the particle pool and produces pixels; it does
//! not mutate any simulation state.
//!
//! Fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`. A
//! failure while drawing one entity is logged and the remaining entities are
//! still drawn, so a single bad entity cannot blank the frame.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::consts::{ARROW_HALF_WIDTH_PX, ARROW_LENGTH_PX, CORNER_RADIUS_PX};
use crate::entity::{Entity, Registry};
use crate::particle::ParticlePool;
use crate::preset::EntityKind;
use crate::viewport::{Point, Viewport};

/// Translucent border drawn around every entity body.
const BODY_STROKE: &str = "rgba(255,255,255,.25)";

/// Label text color.
const LABEL_FILL: &str = "#e8e6f3";

const LABEL_FONT: &str = "12px \"Noto Sans TC\", sans-serif";

/// Particle fill color for a device kind.
#[must_use]
pub fn particle_fill(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Ac => "rgba(56,189,248,0.25)",
        EntityKind::Fan | EntityKind::Furniture => "rgba(74,222,128,0.25)",
    }
}

/// Emission arrow color, or `None` for kinds that do not emit.
#[must_use]
pub fn arrow_fill(kind: EntityKind) -> Option<&'static str> {
    match kind {
        EntityKind::Ac => Some("rgba(56,189,248,.7)"),
        EntityKind::Fan => Some("rgba(74,222,128,.7)"),
        EntityKind::Furniture => None,
    }
}

/// Arrow triangle in entity-local coordinates (origin at the center, +x facing).
#[must_use]
pub fn arrow_points(entity: &Entity) -> [Point; 3] {
    let tip_x = entity.width / 2.0;
    [
        Point::new(tip_x, 0.0),
        Point::new(tip_x + ARROW_LENGTH_PX, -ARROW_HALF_WIDTH_PX),
        Point::new(tip_x + ARROW_LENGTH_PX, ARROW_HALF_WIDTH_PX),
    ]
}

/// Rotation applied to the entity body. Furniture never rotates.
#[must_use]
pub fn body_rotation(entity: &Entity) -> f64 {
    if entity.is_device() { entity.angle } else { 0.0 }
}

/// Draw the full scene: clear, particles, then entities in append order.
///
/// # Errors
///
/// Returns `Err` if setting the base transform fails. Per-entity failures are
/// logged and skipped.
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    registry: &Registry,
    particles: &ParticlePool,
    viewport: &Viewport,
) -> Result<(), JsValue> {
    // Layer 1: clear in CSS pixel space.
    ctx.set_transform(viewport.dpr, 0.0, 0.0, viewport.dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, viewport.width, viewport.height);

    // Layer 2: airflow.
    draw_particles(ctx, particles)?;

    // Layer 3: entities, bottom first.
    ctx.set_text_baseline("middle");
    ctx.set_text_align("center");
    ctx.set_font(LABEL_FONT);
    for (index, entity) in registry.iter().enumerate() {
        if !entity.is_well_formed() {
            log::warn!("not drawing malformed entity {index} ({})", entity.type_key);
            continue;
        }
        if let Err(e) = draw_entity(ctx, entity) {
            log::warn!("draw failed for entity {index} ({}): {e:?}", entity.type_key);
        }
    }
    Ok(())
}

fn draw_particles(ctx: &CanvasRenderingContext2d, particles: &ParticlePool) -> Result<(), JsValue> {
    for p in particles.iter() {
        ctx.set_fill_style_str(particle_fill(p.kind));
        ctx.begin_path();
        ctx.arc(p.x, p.y, p.r, 0.0, 2.0 * PI)?;
        ctx.fill();
    }
    Ok(())
}

fn draw_entity(ctx: &CanvasRenderingContext2d, entity: &Entity) -> Result<(), JsValue> {
    let center = entity.center();

    ctx.save();
    let body = draw_body(ctx, entity, center);
    ctx.restore();
    body?;

    // Label stays horizontal, centered on the unrotated box.
    ctx.set_fill_style_str(LABEL_FILL);
    ctx.fill_text(&entity.label, center.x, center.y)?;
    Ok(())
}

fn draw_body(ctx: &CanvasRenderingContext2d, entity: &Entity, center: Point) -> Result<(), JsValue> {
    ctx.translate(center.x, center.y)?;
    ctx.rotate(body_rotation(entity))?;

    ctx.set_fill_style_str(&entity.color);
    ctx.set_stroke_style_str(BODY_STROKE);
    round_rect_path(ctx, -entity.width / 2.0, -entity.height / 2.0, entity.width, entity.height, CORNER_RADIUS_PX);
    ctx.fill();
    ctx.stroke();

    if let Some(fill) = arrow_fill(entity.kind) {
        let [a, b, c] = arrow_points(entity);
        ctx.begin_path();
        ctx.move_to(a.x, a.y);
        ctx.line_to(b.x, b.y);
        ctx.line_to(c.x, c.y);
        ctx.close_path();
        ctx.set_fill_style_str(fill);
        ctx.fill();
    }
    Ok(())
}

fn round_rect_path(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
    let r = r.min(w / 2.0).min(h / 2.0);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.line_to(x + w - r, y);
    ctx.quadratic_curve_to(x + w, y, x + w, y + r);
    ctx.line_to(x + w, y + h - r);
    ctx.quadratic_curve_to(x + w, y + h, x + w - r, y + h);
    ctx.line_to(x + r, y + h);
    ctx.quadratic_curve_to(x, y + h, x, y + h - r);
    ctx.line_to(x, y + r);
    ctx.quadratic_curve_to(x, y, x + r, y);
    ctx.close_path();
}
