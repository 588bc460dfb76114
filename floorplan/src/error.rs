//! Errors surfaced by the browser-facing engine.

use wasm_bindgen::JsValue;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The canvas refused a 2D context (or returned something else).
    #[error("canvas has no 2d rendering context")]
    MissingContext,
    /// A browser API call threw.
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for EngineError {
    fn from(value: JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}
