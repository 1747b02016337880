//! Transcript mailing. Every chat exchange and reservation request is
//! handed to a [`TranscriptMailer`] from a detached task; mail is
//! observability, not a correctness dependency, so failures are logged
//! and never reach the caller.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::chat::history::ChatTurn;
use crate::core::config::AppConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("smtp send failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptMail {
    pub subject: String,
    pub body: String,
}

impl TranscriptMail {
    /// Transcript of one chat exchange: sanitized history, the new user
    /// message and the produced answer, one `ROLE: content` paragraph each.
    pub fn chat_exchange(
        kind: &str,
        thread_id: &str,
        history: &[ChatTurn],
        message: &str,
        answer: &str,
    ) -> Self {
        let mut lines: Vec<String> = history
            .iter()
            .map(|turn| format!("{}: {}", turn.role.as_str().to_uppercase(), turn.content))
            .collect();
        lines.push(format!("USER: {message}"));
        lines.push(format!("ASSISTANT: {answer}"));

        Self {
            subject: format!("[Sukhothai Bot] {kind} #{thread_id}"),
            body: lines.join("\n\n"),
        }
    }

    pub fn reservation(
        name: &str,
        phone: &str,
        persons: &str,
        date: &str,
        time: &str,
        note: Option<&str>,
    ) -> Self {
        let body = [
            "Neue Reservierungsanfrage:".to_string(),
            format!("Name: {name}"),
            format!("Telefon: {phone}"),
            format!("Personen: {persons}"),
            format!("Datum: {date}"),
            format!("Uhrzeit: {time}"),
            format!("Notiz: {}", note.unwrap_or("-")),
        ]
        .join("\n");

        Self {
            subject: format!("[Sukhothai Reservierung] {date} {time} – {persons} Pers."),
            body,
        }
    }
}

#[async_trait]
pub trait TranscriptMailer: Send + Sync {
    async fn send(&self, mail: &TranscriptMail) -> Result<(), MailError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpMailer {
    /// Builds the mailer from config. Returns `None` when the SMTP host
    /// or the addresses are not configured.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, MailError> {
        let (Some(host), Some(from), Some(to)) = (
            config.smtp_host.as_deref(),
            config.email_from.as_deref(),
            config.email_to.as_deref(),
        ) else {
            return Ok(None);
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?.port(587);
        if let (Some(user), Some(pass)) = (config.smtp_user.clone(), config.smtp_pass.clone()) {
            builder = builder.credentials(Credentials::new(user, pass));
        }

        Ok(Some(Self {
            transport: builder.build(),
            from: from.parse()?,
            to: to.parse()?,
        }))
    }
}

#[async_trait]
impl TranscriptMailer for SmtpMailer {
    async fn send(&self, mail: &TranscriptMail) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(mail.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body.clone())?;

        self.transport.send(message).await?;
        Ok(())
    }
}

/// Stands in when SMTP is not configured; transcripts are dropped with a
/// debug line so the serving path stays unchanged.
pub struct NoopMailer;

#[async_trait]
impl TranscriptMailer for NoopMailer {
    async fn send(&self, mail: &TranscriptMail) -> Result<(), MailError> {
        tracing::debug!("mail disabled, dropping transcript '{}'", mail.subject);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::history::Role;

    #[test]
    fn chat_transcript_uppercases_roles_and_separates_paragraphs() {
        let history = vec![ChatTurn {
            role: Role::User,
            content: "Habt ihr offen?".to_string(),
        }];
        let mail = TranscriptMail::chat_exchange(
            "FAQ",
            "a1b2c3d4",
            &history,
            "Und Parkplätze?",
            "Ja, direkt vorm Haus.",
        );

        assert_eq!(mail.subject, "[Sukhothai Bot] FAQ #a1b2c3d4");
        assert_eq!(
            mail.body,
            "USER: Habt ihr offen?\n\nUSER: Und Parkplätze?\n\nASSISTANT: Ja, direkt vorm Haus."
        );
    }

    #[test]
    fn reservation_mail_carries_all_fields_and_a_dash_for_no_note() {
        let mail = TranscriptMail::reservation("Anna", "0151 2345", "4", "2026-09-01", "19:00", None);

        assert_eq!(
            mail.subject,
            "[Sukhothai Reservierung] 2026-09-01 19:00 – 4 Pers."
        );
        assert!(mail.body.contains("Name: Anna"));
        assert!(mail.body.contains("Telefon: 0151 2345"));
        assert!(mail.body.contains("Notiz: -"));
    }

    #[test]
    fn reservation_note_is_included_when_present() {
        let mail = TranscriptMail::reservation(
            "Ben",
            "0170 111",
            "2",
            "2026-09-02",
            "18:30",
            Some("Fensterplatz"),
        );
        assert!(mail.body.contains("Notiz: Fensterplatz"));
    }

    #[test]
    fn unconfigured_smtp_yields_no_mailer() {
        let mailer = SmtpMailer::from_config(&AppConfig::default()).unwrap();
        assert!(mailer.is_none());
    }
}
