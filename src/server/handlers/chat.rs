use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::chat::history::RawTurn;
use crate::core::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub history: Vec<RawTurn>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub ok: bool,
    pub answer: String,
    #[serde(rename = "threadId")]
    pub thread_id: String,
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatBody>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = body.message.as_deref().unwrap_or_default();
    let outcome = state.pipeline.answer(message, &body.history).await?;

    Ok(Json(ChatResponse {
        ok: true,
        answer: outcome.text,
        thread_id: outcome.thread_id,
    }))
}
