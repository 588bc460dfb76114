//! Scene snapshot and suggestion wire types.
//!
//! The snapshot is the plain record sent to the suggestion service; the
//! response carries display-only suggestion text and comfort/energy metrics.
//! Nothing here feeds back into simulation state.
//!
//! The service historically keyed its metrics in Chinese (`舒適度評分` and
//! friends); both those keys and the English snake-case names are accepted.

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::Registry;
use crate::preset::EntityKind;
use crate::viewport::Viewport;

/// Default air-conditioner set point in °C.
pub const DEFAULT_AC_TEMP: f64 = 26.0;

/// Shown when the service answered with no suggestions.
pub const EMPTY_SUGGESTIONS_LINE: &str = "目前沒有建議，請先在畫布擺放一些物件再試一次。";

// =============================================================
// Request
// =============================================================

/// Canvas size in CSS pixels. Captured values are whole numbers; posted
/// values may be any number.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

/// One placed entity as sent to the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    #[serde(rename = "type")]
    pub type_key: String,
    pub kind: EntityKind,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Radians, rounded to three decimals.
    #[serde(default)]
    pub angle: f64,
}

/// The full scene as a plain record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSnapshot {
    pub ac_temp: f64,
    pub room_template: String,
    pub canvas_size: CanvasSize,
    pub items: Vec<ItemSnapshot>,
}

impl Default for SceneSnapshot {
    fn default() -> Self {
        Self {
            ac_temp: DEFAULT_AC_TEMP,
            room_template: "custom".to_owned(),
            canvas_size: CanvasSize::default(),
            items: Vec::new(),
        }
    }
}

impl SceneSnapshot {
    /// Capture the registry and viewport as they are now.
    #[must_use]
    pub fn capture(registry: &Registry, viewport: &Viewport, ac_temp: f64, room_template: &str) -> Self {
        let items = registry
            .iter()
            .map(|e| ItemSnapshot {
                type_key: e.type_key.clone(),
                kind: e.kind,
                x: round_half_up(e.x),
                y: round_half_up(e.y),
                w: round_half_up(e.width),
                h: round_half_up(e.height),
                angle: (e.angle * 1000.0).round() / 1000.0,
            })
            .collect();
        Self {
            ac_temp,
            room_template: room_template.to_owned(),
            canvas_size: CanvasSize { width: round_half_up(viewport.width), height: round_half_up(viewport.height) },
            items,
        }
    }
}

/// Round with ties toward positive infinity.
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

// =============================================================
// Response
// =============================================================

/// Energy index as sent by the service: a score or a level word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnergyIndex {
    Score(f64),
    Level(String),
}

impl EnergyIndex {
    /// Numeric value used to pick a display level.
    #[must_use]
    pub fn value(&self) -> f64 {
        match self {
            Self::Score(v) => *v,
            Self::Level(word) => match word.as_str() {
                "低" => 25.0,
                "高" => 85.0,
                _ => 60.0,
            },
        }
    }
}

impl fmt::Display for EnergyIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Score(v) => write!(f, "{v}"),
            Self::Level(word) => f.write_str(word),
        }
    }
}

/// Comfort and energy metrics. Every field is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(default, alias = "舒適度評分", skip_serializing_if = "Option::is_none")]
    pub comfort_score: Option<f64>,
    #[serde(default, alias = "能耗指數", skip_serializing_if = "Option::is_none")]
    pub energy_index: Option<EnergyIndex>,
    #[serde(default, alias = "氣流效率", skip_serializing_if = "Option::is_none")]
    pub airflow_efficiency: Option<f64>,
    #[serde(default, alias = "建議冷氣溫度", skip_serializing_if = "Option::is_none")]
    pub recommended_ac_temp: Option<f64>,
}

/// Display band for a 0–100 metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricLevel {
    Low,
    Mid,
    High,
}

impl MetricLevel {
    /// `[0, 40)` is low, anything else below 70 is mid, the rest high.
    #[must_use]
    pub fn from_value(v: f64) -> Self {
        if (0.0..40.0).contains(&v) {
            Self::Low
        } else if v < 70.0 {
            Self::Mid
        } else {
            Self::High
        }
    }

    /// CSS class applied to the metric element.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Low => "metric-low",
            Self::Mid => "metric-mid",
            Self::High => "metric-high",
        }
    }
}

/// Which metric a readout belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricField {
    Comfort,
    Energy,
    Airflow,
    RecommendedTemp,
}

/// Text and color band for one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct Readout {
    pub field: MetricField,
    pub text: String,
    /// `None` for the recommended temperature, which is not banded.
    pub level: Option<MetricLevel>,
}

/// Each metric's English key and its legacy Chinese key.
const METRIC_KEYS: [(&str, &str); 4] = [
    ("comfort_score", "舒適度評分"),
    ("energy_index", "能耗指數"),
    ("airflow_efficiency", "氣流效率"),
    ("recommended_ac_temp", "建議冷氣溫度"),
];

impl Metrics {
    /// Read metrics from a JSON object that may spell a key both ways.
    /// When both spellings are present the English key wins.
    ///
    /// # Errors
    ///
    /// Returns the serde error if a metric has the wrong type.
    pub fn from_object(object: &serde_json::Map<String, serde_json::Value>) -> Result<Self, serde_json::Error> {
        let mut object = object.clone();
        for (english, legacy) in METRIC_KEYS {
            if object.contains_key(english) {
                object.remove(legacy);
            }
        }
        serde_json::from_value(serde_json::Value::Object(object))
    }

    /// Readouts for every metric that is present and finite.
    #[must_use]
    pub fn readouts(&self) -> Vec<Readout> {
        let mut out = Vec::new();
        if let Some(v) = self.comfort_score.filter(|v| v.is_finite()) {
            out.push(Readout { field: MetricField::Comfort, text: format!("{v}"), level: Some(MetricLevel::from_value(v)) });
        }
        if let Some(energy) = &self.energy_index {
            if !matches!(energy, EnergyIndex::Score(v) if !v.is_finite()) {
                out.push(Readout {
                    field: MetricField::Energy,
                    text: energy.to_string(),
                    level: Some(MetricLevel::from_value(energy.value())),
                });
            }
        }
        if let Some(v) = self.airflow_efficiency.filter(|v| v.is_finite()) {
            out.push(Readout { field: MetricField::Airflow, text: format!("{v}"), level: Some(MetricLevel::from_value(v)) });
        }
        if let Some(v) = self.recommended_ac_temp.filter(|v| v.is_finite()) {
            out.push(Readout { field: MetricField::RecommendedTemp, text: format!("{v}°C"), level: None });
        }
        out
    }
}

/// Body returned by `POST /api/suggestions`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SuggestionResponse {
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Metrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Lines for the suggestion list.
///
/// An empty answer becomes a single prompt to place objects first; a failure
/// becomes a single error line.
#[must_use]
pub fn suggestion_lines<E: fmt::Display>(result: &Result<SuggestionResponse, E>) -> Vec<String> {
    match result {
        Ok(resp) if resp.suggestions.is_empty() => vec![EMPTY_SUGGESTIONS_LINE.to_owned()],
        Ok(resp) => resp.suggestions.clone(),
        Err(e) => vec![format!("產生建議時發生錯誤：{e}")],
    }
}
