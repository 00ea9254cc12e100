//! Route handler functions for all API endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use bulls_chat::analyze_intent;
use bulls_core::{ChatRequest, ChatResponse, Query};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub uptime_secs: u64,
    pub classifier: String,
}

// =============================================================================
// Handler functions
// =============================================================================

/// GET / - welcome banner.
pub async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to BullsAI - Your AI Stock Analysis Assistant".to_string(),
    })
}

/// GET /health - liveness plus the active classifier.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "BullsAI Backend".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        classifier: state.resolver.classifier_name().to_string(),
    })
}

/// POST /api/chat - resolve one query to one answer.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload?;

    let message = request
        .message
        .ok_or_else(|| ApiError::BadRequest("Field 'message' is required".to_string()))?;
    let session_id = request
        .session_id
        .unwrap_or_else(|| state.config.chat.default_session_id.clone());

    tracing::info!(
        session_id = %session_id,
        message_len = message.len(),
        "Chat request received"
    );

    let query = Query {
        message,
        session_id,
    };
    let answer = state.resolver.resolve(&query).map_err(|e| {
        tracing::info!(session_id = %query.session_id, error = %e, "Chat request not answered");
        ApiError::from(e)
    })?;

    let intent = analyze_intent(&query.message);
    tracing::debug!(
        session_id = %query.session_id,
        ?intent,
        sources = answer.sources.len(),
        "Chat answer resolved"
    );

    Ok(Json(ChatResponse::from_answer(
        answer,
        query.session_id,
        intent,
    )))
}
