use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::{CLAMP_INSET_PX, ROTATE_STEP};
use crate::emission::{self, StepStats};
use crate::entity::{Entity, Registry};
use crate::error::EngineError;
use crate::hit::hit_test;
use crate::input::InputState;
use crate::particle::ParticlePool;
use crate::preset::Presets;
use crate::render;
use crate::snapshot::{DEFAULT_AC_TEMP, SceneSnapshot};
use crate::template::RoomTemplate;
use crate::viewport::{Point, Viewport};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Seed used when the host supplies none and there is no browser entropy.
pub const DEFAULT_SEED: u64 = 0x5eed_f10a;

const CURSOR_DEFAULT: &str = "default";
const CURSOR_GRAB: &str = "grab";
const CURSOR_GRABBING: &str = "grabbing";

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    EntityMoved { index: usize, x: f64, y: f64 },
    EntityRotated { index: usize, angle: f64 },
    SetCursor(String),
}

/// Construction-time engine settings.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Keep dragged entities inside the viewport, inset by [`CLAMP_INSET_PX`].
    pub clamp_drag: bool,
    /// RNG seed for emission and turbulence. `None` lets the host pick one.
    pub seed: Option<u64>,
    pub presets: Presets,
}

/// Core engine state: everything that does not need the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub registry: Registry,
    pub particles: ParticlePool,
    pub input: InputState,
    pub viewport: Viewport,
    presets: Presets,
    clamp_drag: bool,
    rng: SmallRng,
    ac_temp: f64,
    room_template: RoomTemplate,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            registry: Registry::new(),
            particles: ParticlePool::new(),
            input: InputState::default(),
            viewport: Viewport::default(),
            presets: config.presets,
            clamp_drag: config.clamp_drag,
            rng: SmallRng::seed_from_u64(config.seed.unwrap_or(DEFAULT_SEED)),
            ac_temp: DEFAULT_AC_TEMP,
            room_template: RoomTemplate::default(),
        }
    }

    // --- Scene ---

    /// Add a furniture preset centered in the viewport. Unknown types are a no-op.
    pub fn add_furniture(&mut self, key: &str) -> Option<usize> {
        let index = self.registry.add_furniture(&self.presets, key, self.viewport.center());
        if index.is_none() {
            log::debug!("ignoring unknown furniture type {key:?}");
        }
        index
    }

    /// Add a device preset (`fan` / `ac`) centered in the viewport. Unknown kinds are a no-op.
    pub fn add_device(&mut self, key: &str) -> Option<usize> {
        let index = self.registry.add_device(&self.presets, key, self.viewport.center());
        if index.is_none() {
            log::debug!("ignoring unknown device kind {key:?}");
        }
        index
    }

    /// Drop every entity and particle and end any pointer session.
    pub fn clear(&mut self) {
        self.registry.clear();
        self.particles.clear();
        self.input = InputState::Idle;
    }

    /// Replace the scene with a starter layout. Returns the number of entities placed.
    pub fn load_template(&mut self, template: RoomTemplate) -> usize {
        self.clear();
        let placed = template
            .layout()
            .iter()
            .filter_map(|&(key, x, y)| self.registry.add_furniture_at(&self.presets, key, x, y))
            .count();
        self.room_template = template;
        log::info!("loaded room template {template} ({placed} entities)");
        placed
    }

    pub fn set_ac_temp(&mut self, celsius: f64) {
        self.ac_temp = celsius;
    }

    // --- Viewport ---

    /// Update viewport dimensions and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport.set(width_css, height_css, dpr);
    }

    // --- Input events (floor-plan coordinates) ---

    /// Press: pick the top-most entity under the pointer, if any.
    pub fn on_pointer_down(&mut self, pt: Point) -> Vec<Action> {
        let picked = hit_test(pt, &self.registry).and_then(|i| self.registry.get(i).map(|e| (i, e)));
        let Some((index, entity)) = picked else {
            self.input = InputState::Idle;
            return vec![Action::SetCursor(CURSOR_DEFAULT.into())];
        };
        let offset = Point::new(pt.x - entity.x, pt.y - entity.y);
        self.input = InputState::Pressed { index, offset, press: pt };
        vec![Action::SetCursor(CURSOR_GRABBING.into())]
    }

    /// Move: drag the held entity, or report the hover cursor.
    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        let (Some(index), Some(offset)) = (self.input.held(), self.input.offset()) else {
            return vec![self.hover_cursor(pt)];
        };
        let viewport = self.viewport;
        let clamp = self.clamp_drag;
        let Some(entity) = self.registry.get_mut(index) else {
            log::debug!("held entity {index} no longer exists");
            self.input = InputState::Idle;
            return Vec::new();
        };

        let mut x = pt.x - offset.x;
        let mut y = pt.y - offset.y;
        if clamp {
            x = clamp_axis(x, entity.width, viewport.width);
            y = clamp_axis(y, entity.height, viewport.height);
        }
        entity.x = x;
        entity.y = y;

        self.input = InputState::Dragging { index, offset };
        vec![Action::EntityMoved { index, x, y }]
    }

    /// Release: a press that never moved rotates a device by 45°.
    ///
    /// Rotation fires wherever the pointer is released.
    pub fn on_pointer_up(&mut self, pt: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        if let InputState::Pressed { index, .. } = self.input {
            if let Some(entity) = self.registry.get_mut(index).filter(|e| e.is_device()) {
                entity.angle += ROTATE_STEP;
                actions.push(Action::EntityRotated { index, angle: entity.angle });
            }
        }
        self.input = InputState::Idle;
        actions.push(self.hover_cursor(pt));
        actions
    }

    /// Cancel behaves exactly like a release.
    pub fn on_pointer_cancel(&mut self, pt: Point) -> Vec<Action> {
        self.on_pointer_up(pt)
    }

    fn hover_cursor(&self, pt: Point) -> Action {
        let cursor = if hit_test(pt, &self.registry).is_some() { CURSOR_GRAB } else { CURSOR_DEFAULT };
        Action::SetCursor(cursor.into())
    }

    // --- Simulation ---

    /// One frame: emit from every device, then advect and cull all particles.
    pub fn step(&mut self) -> StepStats {
        emission::step(&self.registry, &self.presets, &mut self.particles, &self.viewport, &mut self.rng)
    }

    // --- Queries ---

    #[must_use]
    pub fn entity(&self, index: usize) -> Option<&Entity> {
        self.registry.get(index)
    }

    #[must_use]
    pub fn presets(&self) -> &Presets {
        &self.presets
    }

    #[must_use]
    pub fn ac_temp(&self) -> f64 {
        self.ac_temp
    }

    #[must_use]
    pub fn room_template(&self) -> RoomTemplate {
        self.room_template
    }

    /// The scene as a plain record for the suggestion service.
    #[must_use]
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot::capture(&self.registry, &self.viewport, self.ac_temp, self.room_template.as_str())
    }
}

/// Clamp a top-left coordinate to `[inset, extent - size - inset]`.
///
/// When the entity is wider than the room the lower bound wins.
fn clamp_axis(v: f64, size: f64, extent: f64) -> f64 {
    v.min(extent - size - CLAMP_INSET_PX).max(CLAMP_INSET_PX)
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    ///
    /// Without a configured seed one is drawn from `Math.random`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingContext`] if the canvas has no 2D context.
    pub fn new(canvas: HtmlCanvasElement, mut config: EngineConfig) -> Result<Self, EngineError> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or(EngineError::MissingContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| EngineError::MissingContext)?;
        if config.seed.is_none() {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
            let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
            config.seed = Some(seed);
        }
        Ok(Self { canvas, ctx, core: EngineCore::new(config) })
    }

    // --- Delegated scene operations ---

    pub fn add_furniture(&mut self, key: &str) -> Option<usize> {
        self.core.add_furniture(key)
    }

    pub fn add_device(&mut self, key: &str) -> Option<usize> {
        self.core.add_device(key)
    }

    pub fn clear(&mut self) {
        self.core.clear();
    }

    pub fn load_template(&mut self, template: RoomTemplate) -> usize {
        self.core.load_template(template)
    }

    pub fn set_ac_temp(&mut self, celsius: f64) {
        self.core.set_ac_temp(celsius);
    }

    // --- Viewport ---

    /// Update viewport dimensions and resize the canvas backing store to match.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.set_viewport(width_css, height_css, dpr);
        let (w, h) = self.core.viewport.backing_size();
        self.canvas.set_width(w);
        self.canvas.set_height(h);
    }

    // --- Input events (client coordinates plus the canvas rect origin) ---

    pub fn on_pointer_down(&mut self, client: Point, origin: Point) -> Vec<Action> {
        let pt = self.core.viewport.client_to_plan(client, origin);
        self.core.on_pointer_down(pt)
    }

    pub fn on_pointer_move(&mut self, client: Point, origin: Point) -> Vec<Action> {
        let pt = self.core.viewport.client_to_plan(client, origin);
        self.core.on_pointer_move(pt)
    }

    pub fn on_pointer_up(&mut self, client: Point, origin: Point) -> Vec<Action> {
        let pt = self.core.viewport.client_to_plan(client, origin);
        self.core.on_pointer_up(pt)
    }

    pub fn on_pointer_cancel(&mut self, client: Point, origin: Point) -> Vec<Action> {
        let pt = self.core.viewport.client_to_plan(client, origin);
        self.core.on_pointer_cancel(pt)
    }

    // --- Frame ---

    pub fn step(&mut self) -> StepStats {
        self.core.step()
    }

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a canvas call outside the per-entity loop fails.
    pub fn render(&self) -> Result<(), JsValue> {
        render::draw(&self.ctx, &self.core.registry, &self.core.particles, &self.core.viewport)
    }

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    #[must_use]
    pub fn snapshot(&self) -> SceneSnapshot {
        self.core.snapshot()
    }
}
