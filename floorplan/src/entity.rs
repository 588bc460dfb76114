//! Entity model: placed furniture and devices, and the registry that owns them.
//!
//! The [`Registry`] is an append-ordered list. Later entries are drawn on top
//! and hit-tested first. Entities are addressed by index; they are only
//! removed all at once through [`Registry::clear`], so an index stays valid
//! for the lifetime of a scene.

#[cfg(test)]
#[path = "entity_test.rs"]
mod entity_test;

use serde::{Deserialize, Serialize};

use crate::preset::{EntityKind, Preset, Presets};
use crate::viewport::Point;

/// A placed object on the floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    /// Preset key this entity was created from.
    #[serde(rename = "type")]
    pub type_key: String,
    /// Left edge in floor-plan pixels.
    pub x: f64,
    /// Top edge in floor-plan pixels.
    pub y: f64,
    #[serde(rename = "w")]
    pub width: f64,
    #[serde(rename = "h")]
    pub height: f64,
    /// Facing direction in radians, 0 points right. Always 0 for furniture.
    pub angle: f64,
    pub color: String,
    pub label: String,
}

impl Entity {
    /// Build an entity from a preset with its top-left at `(x, y)`.
    #[must_use]
    pub fn from_preset(type_key: &str, preset: &Preset, x: f64, y: f64) -> Self {
        Self {
            kind: preset.kind,
            type_key: type_key.to_owned(),
            x,
            y,
            width: preset.width,
            height: preset.height,
            angle: 0.0,
            color: preset.color.clone(),
            label: preset.label.clone(),
        }
    }

    /// Geometric center of the unrotated bounding box.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[must_use]
    pub fn is_device(&self) -> bool {
        self.kind.is_device()
    }

    /// Whether geometry is usable for emission and drawing.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let finite = [self.x, self.y, self.width, self.height, self.angle]
            .iter()
            .all(|v| v.is_finite());
        finite && self.width > 0.0 && self.height > 0.0
    }
}

/// Ordered collection of placed entities.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entities: Vec<Entity>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a furniture entity centered on `center`.
    ///
    /// Returns `None` without touching the registry if `key` is not a
    /// furniture preset.
    pub fn add_furniture(&mut self, presets: &Presets, key: &str, center: Point) -> Option<usize> {
        let preset = presets.furniture(key)?;
        Some(self.push_centered(key, preset, center))
    }

    /// Append a device entity (`fan` / `ac`) centered on `center`.
    ///
    /// Returns `None` without touching the registry if `key` is not a device preset.
    pub fn add_device(&mut self, presets: &Presets, key: &str, center: Point) -> Option<usize> {
        let preset = presets.device(key)?;
        Some(self.push_centered(key, preset, center))
    }

    /// Append a furniture entity with its top-left corner at `(x, y)`.
    pub fn add_furniture_at(&mut self, presets: &Presets, key: &str, x: f64, y: f64) -> Option<usize> {
        let preset = presets.furniture(key)?;
        self.entities.push(Entity::from_preset(key, preset, x, y));
        Some(self.entities.len() - 1)
    }

    fn push_centered(&mut self, key: &str, preset: &Preset, center: Point) -> usize {
        let x = center.x - preset.width / 2.0;
        let y = center.y - preset.height / 2.0;
        self.entities.push(Entity::from_preset(key, preset, x, y));
        self.entities.len() - 1
    }

    /// Remove every entity.
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Entity> {
        self.entities.get_mut(index)
    }

    /// All entities in append (draw) order.
    #[must_use]
    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Devices with their indices, in append order.
    pub fn devices(&self) -> impl Iterator<Item = (usize, &Entity)> {
        self.entities.iter().enumerate().filter(|(_, e)| e.is_device())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
