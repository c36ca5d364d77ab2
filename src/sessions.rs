//! In-memory conversation store.
//!
//! DESIGN
//! ======
//! Conversations live in a `HashMap<Uuid, Conversation>` behind a tokio
//! `RwLock`. Nothing is persisted: a restart starts every reader over with
//! the greeting. Idle conversations expire after a TTL and are swept by
//! the expiry task; an expired conversation that has not been swept yet is
//! already reported as not found.
//!
//! Conversations with a turn in flight never expire.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::conversation::{Conversation, RenderedMessage};

const DEFAULT_SESSION_TTL_SECS: u64 = 3600;
const DEFAULT_MAX_SESSIONS: usize = 10_000;
const DEFAULT_MAX_INPUT_CHARS: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub ttl: Duration,
    pub max_sessions: usize,
    pub max_input_chars: usize,
}

impl SessionConfig {
    /// - `CHAT_SESSION_TTL_SECS`: idle lifetime, default 3600
    /// - `CHAT_MAX_SESSIONS`: live conversation cap, default 10 000
    /// - `CHAT_MAX_INPUT_CHARS`: longest accepted message, default 2000
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            ttl: Duration::from_secs(crate::env_parse("CHAT_SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)),
            max_sessions: crate::env_parse("CHAT_MAX_SESSIONS", DEFAULT_MAX_SESSIONS),
            max_input_chars: crate::env_parse("CHAT_MAX_INPUT_CHARS", DEFAULT_MAX_INPUT_CHARS),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            max_sessions: DEFAULT_MAX_SESSIONS,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
        }
    }
}

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("conversation not found: {0}")]
    NotFound(Uuid),
    #[error("too many active conversations (max {max})")]
    Full { max: usize },
}

impl crate::error_code::ErrorCode for SessionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_SESSION_NOT_FOUND",
            Self::Full { .. } => "E_SESSIONS_FULL",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Full { .. })
    }
}

/// Read-only view of a conversation for the API.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub pending: bool,
    pub messages: Vec<RenderedMessage>,
}

impl From<&Conversation> for SessionSnapshot {
    fn from(convo: &Conversation) -> Self {
        Self { id: convo.id, pending: convo.is_pending(), messages: convo.transcript() }
    }
}

// =============================================================================
// STORE
// =============================================================================

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Conversation>>>,
    config: SessionConfig,
}

impl SessionStore {
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self { inner: Arc::new(RwLock::new(HashMap::new())), config }
    }

    #[must_use]
    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// Open a new conversation seeded with `greeting`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Full`] when the cap is reached even after
    /// sweeping expired conversations.
    pub async fn create(&self, greeting: &str) -> Result<SessionSnapshot, SessionError> {
        self.create_at(greeting, Instant::now()).await
    }

    pub(crate) async fn create_at(&self, greeting: &str, now: Instant) -> Result<SessionSnapshot, SessionError> {
        let mut map = self.inner.write().await;
        if map.len() >= self.config.max_sessions {
            prune_locked(&mut map, now, self.config.ttl);
            if map.len() >= self.config.max_sessions {
                return Err(SessionError::Full { max: self.config.max_sessions });
            }
        }
        let id = Uuid::new_v4();
        let convo = Conversation::new(id, greeting, now);
        let snapshot = SessionSnapshot::from(&convo);
        map.insert(id, convo);
        Ok(snapshot)
    }

    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] for unknown or expired conversations.
    pub async fn snapshot(&self, id: Uuid) -> Result<SessionSnapshot, SessionError> {
        self.snapshot_at(id, Instant::now()).await
    }

    pub(crate) async fn snapshot_at(&self, id: Uuid, now: Instant) -> Result<SessionSnapshot, SessionError> {
        let map = self.inner.read().await;
        map.get(&id)
            .filter(|c| !is_expired(c, now, self.config.ttl))
            .map(SessionSnapshot::from)
            .ok_or(SessionError::NotFound(id))
    }

    /// Run `f` against a live conversation under the write lock.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] for unknown or expired conversations.
    pub async fn with_conversation<R>(
        &self,
        id: Uuid,
        now: Instant,
        f: impl FnOnce(&mut Conversation) -> R,
    ) -> Result<R, SessionError> {
        let mut map = self.inner.write().await;
        let convo = map
            .get_mut(&id)
            .filter(|c| !is_expired(c, now, self.config.ttl))
            .ok_or(SessionError::NotFound(id))?;
        Ok(f(convo))
    }

    /// Returns `true` if the conversation existed.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }

    /// Drop idle conversations. Returns the removed ids.
    pub async fn prune_expired(&self, now: Instant) -> Vec<Uuid> {
        let mut map = self.inner.write().await;
        prune_locked(&mut map, now, self.config.ttl)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn is_expired(convo: &Conversation, now: Instant, ttl: Duration) -> bool {
    !convo.is_pending() && now.saturating_duration_since(convo.last_active()) > ttl
}

fn prune_locked(map: &mut HashMap<Uuid, Conversation>, now: Instant, ttl: Duration) -> Vec<Uuid> {
    let expired: Vec<Uuid> = map
        .iter()
        .filter(|(_, c)| is_expired(c, now, ttl))
        .map(|(id, _)| *id)
        .collect();
    for id in &expired {
        map.remove(id);
    }
    expired
}

#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;
