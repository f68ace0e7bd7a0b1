use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
};
use std::time::Duration;
use tracing::{error, info};

use crate::{Settings, error::NotifyError};

use super::Notifier;

pub const DEFAULT_SUBJECT: &str = "🌤️ Tu pronostico del dia";

/// Sends the report as a plain-text + HTML email over SMTP with STARTTLS.
#[derive(Clone)]
pub struct EmailNotifier {
    smtp_server: String,
    smtp_port: u16,
    from: String,
    password: String,
    to: String,
    timeout: Duration,
}

impl std::fmt::Debug for EmailNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailNotifier")
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("from", &self.from)
            .field("to", &self.to)
            .finish_non_exhaustive()
    }
}

impl EmailNotifier {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            smtp_server: settings.smtp_server.clone(),
            smtp_port: settings.smtp_port,
            from: settings.email_from.clone(),
            password: settings.email_password.clone(),
            to: settings.email_to.clone(),
            timeout: Duration::from_secs(settings.request_timeout_secs),
        }
    }

    fn build_message(&self, text: &str, subject: &str) -> Result<Message, NotifyError> {
        let message = Message::builder()
            .from(parse_mailbox(&self.from)?)
            .to(parse_mailbox(&self.to)?)
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(
                text.to_string(),
                to_html(text),
            ))?;

        Ok(message)
    }

    async fn deliver(&self, text: &str, subject: &str) -> Result<(), NotifyError> {
        let message = self.build_message(text, subject)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.smtp_server)?
            .port(self.smtp_port)
            .credentials(Credentials::new(self.from.clone(), self.password.clone()))
            .timeout(Some(self.timeout))
            .build();

        transport.send(message).await?;
        Ok(())
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn send(&self, message: &str, subject: Option<&str>) -> bool {
        let subject = subject.unwrap_or(DEFAULT_SUBJECT);

        match self.deliver(message, subject).await {
            Ok(()) => {
                info!(to = %self.to, "email sent");
                true
            }
            Err(e) => {
                error!(
                    server = %self.smtp_server,
                    port = self.smtp_port,
                    "Error sending email: {e}"
                );
                false
            }
        }
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address.parse().map_err(|source| NotifyError::Address {
        address: address.to_string(),
        source,
    })
}

/// Minimal HTML rendering: newlines become `<br>`, `**bold**` becomes `<strong>`.
pub fn to_html(text: &str) -> String {
    let escaped = text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");

    let mut body = String::with_capacity(escaped.len());
    for (i, part) in escaped.split("**").enumerate() {
        if i % 2 == 1 {
            body.push_str("<strong>");
            body.push_str(part);
            body.push_str("</strong>");
        } else {
            body.push_str(part);
        }
    }
    let body = body.replace('\n', "<br>");

    format!(
        "<html>\n<body style=\"font-family: -apple-system, Arial, sans-serif; padding: 20px; max-width: 500px;\">\n{body}\n</body>\n</html>\n"
    )
}
