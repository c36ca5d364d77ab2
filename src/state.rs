//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the persona, the conversation store, the optional LLM client
//! with its generation options, and the rate limiter.

use std::sync::Arc;

use crate::llm::LlmChat;
use crate::llm::types::GenerationOptions;
use crate::persona::Persona;
use crate::rate_limit::RateLimiter;
use crate::sessions::SessionStore;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub persona: Arc<Persona>,
    /// Precomputed from the persona once at startup.
    pub system_prompt: Arc<str>,
    pub sessions: SessionStore,
    /// Optional LLM client. `None` if LLM env vars are not configured.
    pub llm: Option<Arc<dyn LlmChat>>,
    pub options: GenerationOptions,
    /// In-memory rate limiter for chat turns.
    pub rate_limiter: RateLimiter,
}

impl AppState {
    #[must_use]
    pub fn new(
        persona: Persona,
        sessions: SessionStore,
        llm: Option<Arc<dyn LlmChat>>,
        options: GenerationOptions,
        rate_limiter: RateLimiter,
    ) -> Self {
        let system_prompt: Arc<str> = persona.system_prompt().into();
        Self { persona: Arc::new(persona), system_prompt, sessions, llm, options, rate_limiter }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;
    use crate::rate_limit::RateLimitConfig;

    /// Create a test `AppState` with no LLM configured.
    #[must_use]
    pub fn test_app_state() -> AppState {
        AppState::new(
            Persona::builtin(),
            SessionStore::default(),
            None,
            GenerationOptions::default(),
            RateLimiter::with_config(RateLimitConfig::default()),
        )
    }

    /// Create a test `AppState` with a mock LLM.
    #[must_use]
    pub fn test_app_state_with_llm(llm: Arc<dyn LlmChat>) -> AppState {
        AppState { llm: Some(llm), ..test_app_state() }
    }

    /// Open a conversation and return its ID.
    pub async fn seed_session(state: &AppState) -> uuid::Uuid {
        state
            .sessions
            .create(&state.persona.greeting)
            .await
            .expect("empty store should accept a session")
            .id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_is_precomputed_from_persona() {
        let state = test_helpers::test_app_state();
        assert_eq!(&*state.system_prompt, state.persona.system_prompt().as_str());
    }

    #[tokio::test]
    async fn seeded_session_starts_with_greeting() {
        let state = test_helpers::test_app_state();
        let id = test_helpers::seed_session(&state).await;
        let snap = state.sessions.snapshot(id).await.unwrap();
        assert_eq!(snap.messages[0].text, state.persona.greeting);
    }
}
