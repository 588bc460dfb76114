//! Layout advisor: scene snapshot → LLM prompt → display-only suggestions.
//!
//! DESIGN
//! ======
//! The model is asked for a JSON object with a suggestion list and four
//! metrics. Models do not always comply, so plain text is accepted too: it is
//! split into lines, bullet markers are stripped and at most six lines are
//! kept. Nothing returned here ever reaches simulation state.

use std::sync::Arc;

use floorplan::snapshot::{ItemSnapshot, Metrics, SceneSnapshot, SuggestionResponse};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::llm::LlmChat;
use crate::llm::types::{LlmError, Message};

pub const DEFAULT_ADVISOR_MAX_TOKENS: u32 = 1024;

/// Upper bound on suggestions returned to the page.
pub const MAX_SUGGESTIONS: usize = 6;

/// Returned with 200 when the model produced no text.
pub const EMPTY_OUTPUT_LINE: &str = "（模型沒有返回內容）請稍後再試。";

const BUSY_LINE: &str = "服務暫時忙碌或金鑰/網路有問題，請稍後再試。";
const TIMEOUT_LINE: &str = "請稍後重試或簡化畫布上的物件。";
const NOT_CONFIGURED_LINE: &str = "建議服務尚未設定，請聯絡管理員。";

const SYSTEM_PROMPT: &str = "\
您是台灣的居家節能顧問。台灣夏季高溫潮濕（濕度常超過 70%），午後西曬嚴重。\
使用者會提供一張平面圖上的家具與空調設備清單，座標單位為像素，角度為出風方向（0 度朝右、順時針增加）。\
只能針對清單中出現的物件提出建議，不要假設其他物件。\
若有大型家具擋住風扇或冷氣的出風方向，請指出並建議如何移動。";

const OUTPUT_INSTRUCTIONS: &str = "\
請輸出 3~6 點可執行的建議（每點一句話），重點包含：
1) 風扇/冷氣的方向或位置如何調整（若有）
2) 哪些大型家具需要移動或避開出風口
3) 為何能省電或提升舒適（簡短）
只輸出一個 JSON 物件，格式為：
{\"建議\": [\"...\"], \"舒適度評分\": 0-100, \"能耗指數\": 0-100, \"氣流效率\": 0-100, \"建議冷氣溫度\": 整數}";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("LLM not configured")]
    LlmNotConfigured,
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

impl AdvisorError {
    /// User-facing lines sent alongside the error.
    #[must_use]
    pub fn fallback_lines(&self) -> Vec<String> {
        let line = match self {
            Self::LlmNotConfigured => NOT_CONFIGURED_LINE,
            Self::Llm(LlmError::Timeout) => TIMEOUT_LINE,
            Self::Llm(_) => BUSY_LINE,
        };
        vec![line.to_owned()]
    }
}

/// One item as shown to the model, with the angle in degrees.
#[derive(Debug, Serialize)]
struct PromptItem<'a> {
    #[serde(rename = "type")]
    type_key: &'a str,
    kind: &'a str,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    angle_deg: f64,
}

impl<'a> From<&'a ItemSnapshot> for PromptItem<'a> {
    fn from(item: &'a ItemSnapshot) -> Self {
        Self {
            type_key: &item.type_key,
            kind: item.kind.as_str(),
            x: item.x,
            y: item.y,
            w: item.w,
            h: item.h,
            angle_deg: (item.angle.to_degrees() * 10.0).round() / 10.0,
        }
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Ask the model for layout suggestions.
///
/// # Errors
///
/// Returns [`AdvisorError::LlmNotConfigured`] without an LLM client, or
/// [`AdvisorError::Llm`] if the call fails.
pub async fn advise(
    llm: Option<&Arc<dyn LlmChat>>,
    snapshot: &SceneSnapshot,
    max_tokens: u32,
) -> Result<SuggestionResponse, AdvisorError> {
    let llm = llm.ok_or(AdvisorError::LlmNotConfigured)?;
    let prompt = build_scene_prompt(snapshot);
    info!(items = snapshot.items.len(), prompt_len = prompt.len(), "advisor: request");

    let response = llm.chat(max_tokens, SYSTEM_PROMPT, &[Message::user(prompt)]).await?;
    info!(
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        stop_reason = %response.stop_reason,
        "advisor: response"
    );

    let advice = parse_advice(&response.text());
    if advice.suggestions.first().map(String::as_str) == Some(EMPTY_OUTPUT_LINE) {
        warn!("advisor: model returned no text");
    }
    Ok(advice)
}

// =============================================================================
// PROMPT
// =============================================================================

/// The user message: scene facts followed by output instructions.
#[must_use]
pub fn build_scene_prompt(snapshot: &SceneSnapshot) -> String {
    let items: Vec<PromptItem<'_>> = snapshot.items.iter().map(PromptItem::from).collect();
    let items_json = serde_json::to_string(&items).unwrap_or_else(|_| "[]".to_owned());
    format!(
        "模擬畫布與擺設資訊：\n\
         - 畫布尺寸（像素）：{} x {}\n\
         - 空調設定溫度：{}°C\n\
         - 房型：{}\n\
         - 物件清單（位置/尺寸/角度）：{}\n\n{}",
        snapshot.canvas_size.width,
        snapshot.canvas_size.height,
        snapshot.ac_temp,
        snapshot.room_template,
        items_json,
        OUTPUT_INSTRUCTIONS,
    )
}

// =============================================================================
// OUTPUT PARSING
// =============================================================================

/// Turn model text into a response. Never fails: unusable text degrades to
/// line splitting, and empty text to a single placeholder line.
#[must_use]
pub fn parse_advice(text: &str) -> SuggestionResponse {
    let text = text.trim();
    if text.is_empty() {
        return SuggestionResponse { suggestions: vec![EMPTY_OUTPUT_LINE.to_owned()], ..Default::default() };
    }

    if let Some(advice) = parse_structured(text) {
        return advice;
    }

    SuggestionResponse { suggestions: clean_lines(text.lines()), ..Default::default() }
}

fn parse_structured(text: &str) -> Option<SuggestionResponse> {
    let body = strip_code_fence(text);
    if !body.starts_with('{') {
        return None;
    }
    let value = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "advisor: JSON output did not parse; using plain lines");
            return None;
        }
    };
    let Some(object) = value.as_object() else {
        return None;
    };
    // English key first, as for the metrics.
    let listed = object.get("suggestions").or_else(|| object.get("建議"));
    let listed = match listed.map(Vec::<String>::deserialize).transpose() {
        Ok(listed) => listed.unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, "advisor: suggestion list malformed; using plain lines");
            return None;
        }
    };
    let metrics = match Metrics::from_object(object) {
        Ok(metrics) => Some(metrics).filter(|m| *m != Metrics::default()),
        Err(e) => {
            warn!(error = %e, "advisor: metrics malformed; dropping them");
            None
        }
    };
    let suggestions = clean_lines(listed.iter().map(String::as_str));
    Some(SuggestionResponse { suggestions, metrics, error: None })
}

/// Strip a surrounding Markdown code fence (```json ... ```), if any.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Trim bullets and whitespace, drop blanks, keep the first [`MAX_SUGGESTIONS`].
fn clean_lines<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<String> {
    lines
        .map(|line| line.trim_matches(|c: char| c == '-' || c == '•' || c == ' ').trim())
        .filter(|line| !line.is_empty())
        .take(MAX_SUGGESTIONS)
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "advisor_test.rs"]
mod tests;
