//! Presets: immutable templates for every placeable entity type.
//!
//! A [`Presets`] table maps a type key (`"sofa"`, `"fan"`, ...) to a
//! [`Preset`] carrying default geometry, appearance and, for devices, the
//! emission parameters. The table is built once (either [`Presets::builtin`]
//! or [`Presets::from_json`]) and only read afterwards; entities refer to
//! their preset by type key.

#[cfg(test)]
#[path = "preset_test.rs"]
mod preset_test;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The kind of a placed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Static furniture; blocks nothing, emits nothing, never rotates.
    Furniture,
    /// Electric fan.
    Fan,
    /// Air conditioner.
    Ac,
}

impl EntityKind {
    /// Whether this kind emits particles and rotates on click.
    #[must_use]
    pub fn is_device(self) -> bool {
        matches!(self, Self::Fan | Self::Ac)
    }

    /// Wire name used in snapshots and preset tables.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Furniture => "furniture",
            Self::Fan => "fan",
            Self::Ac => "ac",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = PresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "furniture" => Ok(Self::Furniture),
            "fan" => Ok(Self::Fan),
            "ac" => Ok(Self::Ac),
            other => Err(PresetError::UnknownKind(other.to_owned())),
        }
    }
}

/// Errors raised while loading a preset table.
#[derive(Debug, thiserror::Error)]
pub enum PresetError {
    /// The JSON document could not be parsed.
    #[error("preset table parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    /// A kind name did not match any [`EntityKind`].
    #[error("unknown entity kind: {0}")]
    UnknownKind(String),

    /// A preset's size is zero, negative or not finite.
    #[error("preset {key} has invalid size {width}x{height}")]
    InvalidSize { key: String, width: f64, height: f64 },

    /// A device preset is missing its emission block.
    #[error("device preset {0} has no emission parameters")]
    MissingEmission(String),

    /// A furniture preset carries an emission block.
    #[error("furniture preset {0} must not emit")]
    UnexpectedEmission(String),
}

/// Per-frame particle emission parameters for a device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Emission {
    /// Particles spawned by one device in one frame.
    pub particles_per_frame: u32,
    /// Base particle speed in pixels per frame.
    pub speed: f64,
    /// Full angular spread of the emission cone, in degrees.
    pub spread_deg: f64,
}

/// Default geometry and appearance for one entity type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub kind: EntityKind,
    #[serde(alias = "w")]
    pub width: f64,
    #[serde(alias = "h")]
    pub height: f64,
    /// CSS fill color of the body.
    pub color: String,
    /// Display text, may include a pictographic glyph.
    pub label: String,
    /// Present for devices only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emission: Option<Emission>,
}

impl Preset {
    fn furniture(width: f64, height: f64, color: &str, label: &str) -> Self {
        Self { kind: EntityKind::Furniture, width, height, color: color.to_owned(), label: label.to_owned(), emission: None }
    }

    fn device(kind: EntityKind, width: f64, height: f64, color: &str, label: &str, emission: Emission) -> Self {
        Self { kind, width, height, color: color.to_owned(), label: label.to_owned(), emission: Some(emission) }
    }
}

/// Read-only table of presets keyed by type.
#[derive(Debug, Clone, PartialEq)]
pub struct Presets {
    by_type: HashMap<String, Preset>,
}

impl Presets {
    /// The built-in table: six furniture types plus `fan` and `ac`.
    #[must_use]
    pub fn builtin() -> Self {
        let entries = [
            ("sofa", Preset::furniture(120.0, 60.0, "#1f3a5f", "沙發 🛋️")),
            ("table", Preset::furniture(90.0, 60.0, "#334155", "桌子 🪑")),
            ("bed", Preset::furniture(140.0, 70.0, "#3b3566", "床鋪 🛏️")),
            ("desk", Preset::furniture(110.0, 60.0, "#2b3a4a", "書桌 📚")),
            ("tv", Preset::furniture(100.0, 40.0, "#2f3646", "電視櫃 📺")),
            ("other", Preset::furniture(60.0, 80.0, "#0f3d3e", "其他物體 🧊")),
            (
                "fan",
                Preset::device(
                    EntityKind::Fan,
                    70.0,
                    50.0,
                    "#1e3a5f",
                    "風扇 🌀",
                    Emission { particles_per_frame: 12, speed: 2.2, spread_deg: 18.0 },
                ),
            ),
            (
                "ac",
                Preset::device(
                    EntityKind::Ac,
                    120.0,
                    46.0,
                    "#14532d",
                    "冷氣 ❄️",
                    Emission { particles_per_frame: 18, speed: 2.8, spread_deg: 12.0 },
                ),
            ),
        ];
        Self { by_type: entries.into_iter().map(|(k, p)| (k.to_owned(), p)).collect() }
    }

    /// Parse and validate a preset table from a JSON object keyed by type.
    ///
    /// # Errors
    ///
    /// Returns [`PresetError`] if the JSON is malformed or any preset fails
    /// validation (non-positive size, device without emission, furniture with
    /// emission).
    pub fn from_json(json: &str) -> Result<Self, PresetError> {
        let by_type: HashMap<String, Preset> = serde_json::from_str(json)?;
        for (key, preset) in &by_type {
            validate(key, preset)?;
        }
        Ok(Self { by_type })
    }

    /// Look up any preset by type key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Preset> {
        self.by_type.get(key)
    }

    /// Look up a furniture preset. Device keys return `None`.
    #[must_use]
    pub fn furniture(&self, key: &str) -> Option<&Preset> {
        self.get(key).filter(|p| p.kind == EntityKind::Furniture)
    }

    /// Look up a device preset. Furniture keys return `None`.
    #[must_use]
    pub fn device(&self, key: &str) -> Option<&Preset> {
        self.get(key).filter(|p| p.kind.is_device())
    }

    /// Emission parameters for a type key, if it names a device.
    #[must_use]
    pub fn emission(&self, key: &str) -> Option<Emission> {
        self.device(key).and_then(|p| p.emission)
    }

    /// All type keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.by_type.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

impl Default for Presets {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate(key: &str, preset: &Preset) -> Result<(), PresetError> {
    let sized = |v: f64| v.is_finite() && v > 0.0;
    if !sized(preset.width) || !sized(preset.height) {
        return Err(PresetError::InvalidSize { key: key.to_owned(), width: preset.width, height: preset.height });
    }
    match (preset.kind.is_device(), preset.emission.is_some()) {
        (true, false) => Err(PresetError::MissingEmission(key.to_owned())),
        (false, true) => Err(PresetError::UnexpectedEmission(key.to_owned())),
        _ => Ok(()),
    }
}
