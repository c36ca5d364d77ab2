//! Conversation state for one reader.
//!
//! DESIGN
//! ======
//! A conversation is an append-only list of messages seeded with the
//! persona greeting, plus a `pending` flag that allows at most one model
//! call in flight. A turn is split in two so no lock is held across the
//! network call:
//!
//! 1. `begin_turn` validates input, appends the user message, sets
//!    `pending`, and returns the history snapshot to send.
//! 2. `complete_turn` / `fail_turn` append exactly one model message and
//!    clear `pending`.
//!
//! Sources are stored as returned by the provider; deduplication happens
//! when the transcript is rendered.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::citations::{Citation, citations_for};
use crate::llm::types::{ChatResponse, GroundingLink, Message, Role};

// =============================================================================
// TYPES
// =============================================================================

/// A stored conversation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    /// Present only when the model cited at least one page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<GroundingLink>>,
}

impl ChatMessage {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into(), sources: None }
    }

    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self { role: Role::Model, text: text.into(), sources: None }
    }

    /// Render for the widget: sources deduplicated and labelled.
    #[must_use]
    pub fn render(&self) -> RenderedMessage {
        RenderedMessage {
            role: self.role,
            text: self.text.clone(),
            sources: self
                .sources
                .as_deref()
                .map(citations_for)
                .filter(|c| !c.is_empty()),
        }
    }
}

/// A message as returned by the HTTP API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedMessage {
    pub role: Role,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<Citation>>,
}

/// Why a user turn was not started. History is untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TurnRejected {
    #[error("message is empty")]
    EmptyInput,
    #[error("a reply is still being generated")]
    Busy,
    #[error("message exceeds {max} characters")]
    TooLong { max: usize },
}

impl crate::error_code::ErrorCode for TurnRejected {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "E_EMPTY_INPUT",
            Self::Busy => "E_BUSY",
            Self::TooLong { .. } => "E_TOO_LONG",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Busy)
    }
}

/// History snapshot for one in-flight turn.
#[derive(Debug, Clone)]
pub struct PendingTurn {
    /// Every prior message plus the new user message, oldest first.
    pub history: Vec<Message>,
}

// =============================================================================
// CONVERSATION
// =============================================================================

#[derive(Debug, Clone)]
pub struct Conversation {
    pub id: Uuid,
    messages: Vec<ChatMessage>,
    pending: bool,
    last_active: Instant,
}

impl Conversation {
    /// Start a conversation whose first message is the model greeting.
    #[must_use]
    pub fn new(id: Uuid, greeting: &str, now: Instant) -> Self {
        Self { id, messages: vec![ChatMessage::model(greeting)], pending: false, last_active: now }
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    #[must_use]
    pub fn last_active(&self) -> Instant {
        self.last_active
    }

    /// Validate input and open a turn.
    ///
    /// # Errors
    ///
    /// Returns [`TurnRejected`] for blank input, a turn already in flight, or
    /// input longer than `max_chars` characters (after trimming).
    pub fn begin_turn(&mut self, input: &str, max_chars: usize, now: Instant) -> Result<PendingTurn, TurnRejected> {
        let text = input.trim();
        if text.is_empty() {
            return Err(TurnRejected::EmptyInput);
        }
        if self.pending {
            return Err(TurnRejected::Busy);
        }
        if text.chars().count() > max_chars {
            return Err(TurnRejected::TooLong { max: max_chars });
        }

        self.messages.push(ChatMessage::user(text));
        self.pending = true;
        self.last_active = now;

        let history = self
            .messages
            .iter()
            .map(|m| Message { role: m.role, text: m.text.clone() })
            .collect();
        Ok(PendingTurn { history })
    }

    /// Append the model reply for the open turn.
    ///
    /// Empty output is replaced by `empty_text`. Sources are attached only
    /// when the provider returned at least one.
    pub fn complete_turn(&mut self, response: ChatResponse, empty_text: &str, now: Instant) -> &ChatMessage {
        let text = response.text.unwrap_or_else(|| empty_text.to_string());
        let sources = (!response.sources.is_empty()).then_some(response.sources);
        self.finish(ChatMessage { role: Role::Model, text, sources }, now)
    }

    /// Append the fixed failure reply for the open turn.
    pub fn fail_turn(&mut self, failure_text: &str, now: Instant) -> &ChatMessage {
        self.finish(ChatMessage::model(failure_text), now)
    }

    fn finish(&mut self, message: ChatMessage, now: Instant) -> &ChatMessage {
        self.pending = false;
        self.last_active = now;
        self.messages.push(message);
        // Just pushed, so the list is non-empty.
        &self.messages[self.messages.len() - 1]
    }

    /// All messages rendered for display.
    #[must_use]
    pub fn transcript(&self) -> Vec<RenderedMessage> {
        self.messages().iter().map(ChatMessage::render).collect()
    }
}

#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;
