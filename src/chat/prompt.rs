//! Prompt assembly: one system instruction carrying the persona and the
//! business facts, followed by the sanitized history and the new message.

use super::history::ChatTurn;
use crate::llm::types::ChatMessage;

pub struct BotProfile {
    pub name: &'static str,
    pub style: &'static str,
    pub address: &'static str,
    pub opening_hours: &'static [(&'static str, &'static str)],
    pub links: &'static [(&'static str, &'static str)],
}

pub const BOT: BotProfile = BotProfile {
    name: "Sukhothai Assist",
    style: "klar, freundlich, keine Floskeln, kein Gendern",
    address: "Bochumer Straße 15, 45549 Sprockhövel",
    opening_hours: &[
        ("Mo", "17:30-23:00"),
        ("Di", "17:30-23:00"),
        ("Mi", "17:30-23:00"),
        ("Do", "17:30-23:00"),
        ("Fr", "17:30-23:00"),
        ("Sa", "17:30-23:00"),
        ("So", "12:00-14:30, 17:30-23:00"),
    ],
    links: &[
        ("Karte", "https://www.sukhothai-sprockhoevel.de/karte/"),
        ("Google Maps", "https://maps.app.goo.gl/AnSHY9QvbdWJpZYeA"),
        (
            "Gutschein",
            "https://www.yovite.com/Restaurant-Gutschein-R-84849891.html?REF=REST",
        ),
    ],
};

pub fn system_prompt() -> String {
    let hours = BOT
        .opening_hours
        .iter()
        .map(|(day, times)| format!("{day} {times}"))
        .collect::<Vec<_>>()
        .join(", ");
    let links = BOT
        .links
        .iter()
        .map(|(label, url)| format!("- {label}: {url}"))
        .collect::<Vec<_>>()
        .join("\n");

    [
        r#"Du bist der Live-Agent für das Thai-Restaurant "Sukhothai"."#.to_string(),
        format!("Sprache: Deutsch. Stil: {}.", BOT.style),
        "Regeln:".to_string(),
        "- Keine Zusagen, die du nicht sicher weißt.".to_string(),
        "- Wenn unklar: Rückfragen stellen.".to_string(),
        "- Reservierungen nie final bestätigen. Immer Kontaktdaten aufnehmen.".to_string(),
        format!("Öffnungszeiten: {hours}"),
        format!("Adresse: {}", BOT.address),
        "Nützliche Links (falls relevant, kurz verlinken):".to_string(),
        links,
        "Wenn möglich, kurze klare Sätze. Keine Füllwörter.".to_string(),
    ]
    .join("\n")
}

/// Builds the ordered message list for the engine. A non-empty retrieval
/// context is appended to the system message as a `Kontext:` block.
pub fn build_messages(history: &[ChatTurn], user_message: &str, context: &str) -> Vec<ChatMessage> {
    let mut system = system_prompt();
    if !context.is_empty() {
        system.push_str("\n\nKontext:\n");
        system.push_str(context);
    }

    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system));
    messages.extend(
        history
            .iter()
            .map(|turn| ChatMessage {
                role: turn.role.as_str().to_string(),
                content: turn.content.clone(),
            }),
    );
    messages.push(ChatMessage::user(user_message));
    messages
}
