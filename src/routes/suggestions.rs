//! `POST /api/suggestions`: scene snapshot in, display-only advice out.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use floorplan::snapshot::{SceneSnapshot, SuggestionResponse};

use crate::llm::types::LlmError;
use crate::services::advisor::{self, AdvisorError};
use crate::state::AppState;

/// `POST /api/suggestions`: ask the advisor about the posted scene.
///
/// Failures still answer with a `SuggestionResponse` body: `error` set and
/// `suggestions` holding lines the page can show as-is.
pub async fn create_suggestions(
    State(state): State<AppState>,
    Json(snapshot): Json<SceneSnapshot>,
) -> Result<Json<SuggestionResponse>, (StatusCode, Json<SuggestionResponse>)> {
    match advisor::advise(state.llm.as_ref(), &snapshot, state.max_tokens).await {
        Ok(advice) => Ok(Json(advice)),
        Err(e) => {
            tracing::warn!(error = %e, items = snapshot.items.len(), "suggestion request failed");
            Err((advisor_error_to_status(&e), Json(error_body(&e))))
        }
    }
}

pub(crate) fn advisor_error_to_status(err: &AdvisorError) -> StatusCode {
    match err {
        AdvisorError::LlmNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        AdvisorError::Llm(LlmError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
        AdvisorError::Llm(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_body(err: &AdvisorError) -> SuggestionResponse {
    SuggestionResponse { suggestions: err.fallback_lines(), metrics: None, error: Some(err.to_string()) }
}

#[cfg(test)]
#[path = "suggestions_test.rs"]
mod tests;
