//! Chat routes — conversation lifecycle and message turns.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::conversation::TurnRejected;
use crate::error_code::{ErrorBody, ErrorCode};
use crate::services::chat::{self as chat_svc, ChatError, TurnReply};
use crate::sessions::{SessionError, SessionSnapshot};
use crate::state::AppState;

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// Error response: HTTP status plus the structured JSON body.
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        Self { status: chat_error_to_status(&err), body: ErrorBody::from_error(&err) }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        Self::from(ChatError::Session(err))
    }
}

pub(crate) fn chat_error_to_status(err: &ChatError) -> StatusCode {
    match err {
        ChatError::Session(SessionError::NotFound(_)) => StatusCode::NOT_FOUND,
        ChatError::Session(SessionError::Full { .. }) => StatusCode::SERVICE_UNAVAILABLE,
        ChatError::Rejected(TurnRejected::EmptyInput | TurnRejected::TooLong { .. }) => StatusCode::BAD_REQUEST,
        ChatError::Rejected(TurnRejected::Busy) => StatusCode::CONFLICT,
        ChatError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
    }
}

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

/// Widget header details.
#[derive(Debug, Serialize)]
pub struct PersonaInfo {
    pub agent_name: String,
    pub article_title: String,
    pub article_url: String,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /api/chat/persona` — header details for the widget.
pub async fn persona(State(state): State<AppState>) -> Json<PersonaInfo> {
    Json(PersonaInfo {
        agent_name: state.persona.agent_name.clone(),
        article_title: state.persona.article_title.clone(),
        article_url: state.persona.article_url.clone(),
    })
}

/// `POST /api/chat/sessions` — open a conversation seeded with the greeting.
pub async fn create_session(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.sessions.create(&state.persona.greeting).await?;
    tracing::info!(session_id = %snapshot.id, "chat: conversation opened");
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// `GET /api/chat/sessions/:id` — full transcript.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    Ok(Json(state.sessions.snapshot(id).await?))
}

/// `DELETE /api/chat/sessions/:id` — forget a conversation.
pub async fn delete_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    if !state.sessions.remove(id).await {
        return Err(SessionError::NotFound(id).into());
    }
    state.rate_limiter.forget(id);
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/chat/sessions/:id/messages` — run one turn.
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<TurnReply>, ApiError> {
    let reply = chat_svc::send_message(&state, id, &req.text)
        .await
        .map_err(|e| {
            tracing::warn!(session_id = %id, code = e.error_code(), error = %e, "chat: turn refused");
            ApiError::from(e)
        })?;
    Ok(Json(reply))
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
