use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::core::errors::ApiError;
use crate::mailer::TranscriptMail;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReserveBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Widgets send this as a number or a string.
    #[serde(default)]
    pub persons: Option<Value>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Records a reservation request. There is no persistence: the only side
/// effect is the outbound mail, sent from a detached task.
pub async fn reserve(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ReserveBody>,
) -> Result<Json<Value>, ApiError> {
    let name = required(body.name.as_deref())?;
    let phone = required(body.phone.as_deref())?;
    let persons = persons_field(body.persons.as_ref())?;
    let date = required(body.date.as_deref())?;
    let time = required(body.time.as_deref())?;

    let mail = TranscriptMail::reservation(name, phone, &persons, date, time, body.note.as_deref());
    let mailer = Arc::clone(&state.mailer);
    tokio::spawn(async move {
        if let Err(err) = mailer.send(&mail).await {
            tracing::warn!("Reservation mail failed: {}", err);
        }
    });

    Ok(Json(json!({ "ok": true, "msg": "Erfasst. Wir melden uns." })))
}

fn required(field: Option<&str>) -> Result<&str, ApiError> {
    match field.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ApiError::BadRequest("Felder fehlen".to_string())),
    }
}

fn persons_field(field: Option<&Value>) -> Result<String, ApiError> {
    match field {
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(ApiError::BadRequest("Felder fehlen".to_string())),
    }
}
