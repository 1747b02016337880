use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::core::errors::ApiError;
use crate::llm::types::{ChatMessage, ChatRequest};
use crate::state::AppState;

pub async fn root() -> &'static str {
    "Sukhothai Assist: OK"
}

/// Static diagnostics: credential presence, allowed origins, retrieval
/// flag and a build stamp. Makes no upstream calls.
pub async fn healthz(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "ok": true,
        "hasKey": !state.config.openai_api_key.is_empty(),
        "origins": state.config.allowed_origins,
        "fastMode": !state.config.enable_retrieval,
        "version": format!(
            "{}-{}",
            env!("CARGO_PKG_VERSION"),
            state.started_at.to_rfc3339()
        ),
    }))
}

/// Exercises the primary model with a trivial prompt to confirm it is
/// reachable.
pub async fn status(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let request = ChatRequest::new(vec![ChatMessage::user("Sag nur deinen Modellnamen.")])
        .with_max_completion_tokens(16);

    let reply = state
        .provider
        .chat(request, &state.config.engine.primary_model)
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(json!({
        "ok": true,
        "model": state.config.engine.primary_model,
        "reply": reply,
    })))
}
