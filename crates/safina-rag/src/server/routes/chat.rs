//! Chat endpoint

use axum::{extract::State, Json};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{ChatRequest, ChatResponse};

/// POST /chat - answer one user message in the context of its history
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let ChatRequest {
        session_id,
        message,
        history,
    } = request;

    let response = state
        .pipeline()
        .chat(session_id, history.unwrap_or_default(), message)
        .await?;

    Ok(Json(response))
}
