use serde::{Deserialize, Serialize};

/// Turns kept after sanitization; one turn = one user+assistant pair.
pub const MAX_TURNS: usize = 10;
/// Character ceiling applied to each turn's content.
pub const MAX_TURN_CHARS: usize = 1200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

/// A caller-supplied history entry before validation. Role and content
/// may be absent or junk; sanitization decides what survives.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTurn {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl RawTurn {
    pub fn new(role: &str, content: &str) -> Self {
        Self {
            role: Some(role.to_string()),
            content: Some(content.to_string()),
        }
    }
}

/// Drops malformed entries, clamps content to [`MAX_TURN_CHARS`] and keeps
/// only the most recent [`MAX_TURNS`] turns, oldest dropped first.
pub fn sanitize_history(raw: &[RawTurn]) -> Vec<ChatTurn> {
    let mut turns: Vec<ChatTurn> = raw
        .iter()
        .filter_map(|entry| {
            let role = match entry.role.as_deref().map(str::trim) {
                Some("user") => Role::User,
                Some("assistant") => Role::Assistant,
                _ => return None,
            };
            let content = entry.content.as_deref()?;
            if content.is_empty() {
                return None;
            }
            Some(ChatTurn {
                role,
                content: truncate_chars(content, MAX_TURN_CHARS),
            })
        })
        .collect();

    let keep = MAX_TURNS * 2;
    if turns.len() > keep {
        turns.drain(..turns.len() - keep);
    }
    turns
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
