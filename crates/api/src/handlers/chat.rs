//! # Chat Handlers
//!
//! Session lifecycle and chat turns. A session is created explicitly,
//! addressed by id on every turn, and discarded when the visitor leaves;
//! the session store is the only shared chat state in the process.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use portfolio_core::errors::AssistantError;

use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: Uuid,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Start a fresh chat session.
#[axum::debug_handler]
pub async fn create_session(
    State(state): State<Arc<ApiState>>,
) -> Json<CreateSessionResponse> {
    let session_id = state.sessions.create().await;
    Json(CreateSessionResponse { session_id })
}

/// Discard a session and its history.
#[axum::debug_handler]
pub async fn end_session(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.end(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError(AssistantError::NotFound(format!(
            "Session {id} not found"
        ))))
    }
}

/// One chat turn: retrieve grounding context, complete against the session
/// history, and record the exchange.
///
/// Generation failures never surface here; the responder degrades to a
/// fallback reply on its own.
#[axum::debug_handler]
pub async fn chat(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = payload.message.trim();
    if message.is_empty() {
        return Err(AppError(AssistantError::Validation(
            "Message must not be empty".to_string(),
        )));
    }

    let session = state.sessions.get(payload.session_id).await.ok_or_else(|| {
        AppError(AssistantError::NotFound(format!(
            "Session {} not found",
            payload.session_id
        )))
    })?;

    // Only this session is locked for the duration of the turn; other
    // sessions and the store itself stay available.
    let mut session = session.lock().await;
    let reply = state.responder.respond(&mut session, message).await;
    Ok(Json(ChatResponse { reply }))
}
