//! Chat service — one reader message → one model call → one reply.
//!
//! DESIGN
//! ======
//! A turn validates and records the user message, sends the whole history
//! with the persona system prompt to the model, and appends exactly one
//! model message. The conversation lock is released while the model call
//! is in flight; the `pending` flag keeps a second turn from starting.
//!
//! ERROR HANDLING
//! ==============
//! Anything that goes wrong with the model call (no client configured,
//! transport, HTTP status, unparseable body) is logged and answered with
//! the persona's failure text. Callers only see errors for requests that
//! never reached the model: unknown conversation, rejected input, limits.
//! If the request is dropped while the model call is in flight, a guard
//! closes the turn with the failure text so the conversation is not left
//! pending.

use std::time::Instant;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::conversation::{RenderedMessage, TurnRejected};
use crate::error_code::ErrorCode;
use crate::llm::types::LlmError;
use crate::rate_limit::RateLimitError;
use crate::sessions::{SessionError, SessionStore};
use crate::state::AppState;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Rejected(#[from] TurnRejected),
    #[error("rate limited: {0}")]
    RateLimited(#[from] RateLimitError),
}

impl ErrorCode for ChatError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Session(e) => e.error_code(),
            Self::Rejected(e) => e.error_code(),
            Self::RateLimited(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Session(e) => e.retryable(),
            Self::Rejected(e) => e.retryable(),
            Self::RateLimited(e) => e.retryable(),
        }
    }
}

/// Outcome of a completed turn.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TurnReply {
    /// The model message appended to the conversation.
    pub message: RenderedMessage,
    /// `false` when the reply is the failure text.
    pub delivered: bool,
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Run one user turn against the conversation `session_id`.
///
/// # Errors
///
/// Returns [`ChatError`] when the turn is refused before reaching the model.
pub async fn send_message(state: &AppState, session_id: Uuid, text: &str) -> Result<TurnReply, ChatError> {
    let max_chars = state.sessions.config().max_input_chars;

    // Validate before spending rate-limit budget on a message that would be refused.
    state
        .sessions
        .with_conversation(session_id, Instant::now(), |c| {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Err(TurnRejected::EmptyInput)
            } else if c.is_pending() {
                Err(TurnRejected::Busy)
            } else if trimmed.chars().count() > max_chars {
                Err(TurnRejected::TooLong { max: max_chars })
            } else {
                Ok(())
            }
        })
        .await??;

    state.rate_limiter.check_and_record(session_id)?;

    let turn = state
        .sessions
        .with_conversation(session_id, Instant::now(), |c| c.begin_turn(text, max_chars, Instant::now()))
        .await??;

    info!(%session_id, history_len = turn.history.len(), "chat: turn started");
    let guard = TurnGuard::new(state, session_id);

    let outcome = match &state.llm {
        Some(llm) => llm
            .generate(&state.system_prompt, &turn.history, &state.options)
            .await
            .map_err(Some),
        None => Err(None),
    };

    let persona = &state.persona;
    let completed = match outcome {
        Ok(response) => {
            info!(
                %session_id,
                model = %response.model,
                finish_reason = %response.finish_reason,
                input_tokens = response.input_tokens,
                output_tokens = response.output_tokens,
                sources = response.sources.len(),
                "chat: model reply"
            );
            state
                .rate_limiter
                .record_tokens(session_id, response.total_tokens());
            state
                .sessions
                .with_conversation(session_id, Instant::now(), |c| {
                    c.complete_turn(response, &persona.empty_response_text, Instant::now())
                        .render()
                })
                .await
                .map(|message| TurnReply { message, delivered: true })
        }
        Err(err) => {
            log_failure(session_id, err.as_ref());
            state
                .sessions
                .with_conversation(session_id, Instant::now(), |c| {
                    c.fail_turn(&persona.failure_text, Instant::now()).render()
                })
                .await
                .map(|message| TurnReply { message, delivered: false })
        }
    };

    guard.disarm();

    // The conversation can only vanish mid-turn if it was deleted meanwhile.
    completed.map_err(|e| {
        warn!(%session_id, error = %e, "chat: conversation removed during turn");
        ChatError::from(e)
    })
}

// =============================================================================
// CANCELLATION
// =============================================================================

/// Closes an open turn with the failure text if `send_message` is dropped
/// before it appends the reply (client disconnect, timeout).
struct TurnGuard {
    sessions: SessionStore,
    session_id: Uuid,
    failure_text: String,
    armed: bool,
}

impl TurnGuard {
    fn new(state: &AppState, session_id: Uuid) -> Self {
        Self {
            sessions: state.sessions.clone(),
            session_id,
            failure_text: state.persona.failure_text.clone(),
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for TurnGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        warn!(session_id = %self.session_id, "chat: turn abandoned, closing it");

        let sessions = self.sessions.clone();
        let session_id = self.session_id;
        let failure_text = std::mem::take(&mut self.failure_text);
        handle.spawn(async move {
            // Deleted or already completed conversations need nothing.
            let _ = sessions
                .with_conversation(session_id, Instant::now(), |c| {
                    if c.is_pending() {
                        c.fail_turn(&failure_text, Instant::now());
                    }
                })
                .await;
        });
    }
}

fn log_failure(session_id: Uuid, err: Option<&LlmError>) {
    match err {
        Some(e) => {
            let retryable = e.retryable();
            error!(%session_id, error = %e, retryable, "chat: model call failed");
        }
        None => error!(%session_id, "chat: LLM not configured"),
    }
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
