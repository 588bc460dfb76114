//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. The
//! service keeps no scene state of its own: every request carries its full
//! snapshot, so the only shared pieces are the optional LLM client and the
//! advisor's token budget.

use std::sync::Arc;

use crate::llm::LlmChat;
use crate::services::advisor::DEFAULT_ADVISOR_MAX_TOKENS;

/// Shared application state. Clone is required by Axum.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no LLM is configured; the suggestion route then answers 503.
    pub llm: Option<Arc<dyn LlmChat>>,
    pub max_tokens: u32,
}

impl AppState {
    #[must_use]
    pub fn new(llm: Option<Arc<dyn LlmChat>>, max_tokens: u32) -> Self {
        Self { llm, max_tokens }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(None, DEFAULT_ADVISOR_MAX_TOKENS)
    }
}

#[cfg(test)]
#[path = "state_helpers_test.rs"]
pub mod test_helpers;
