use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::{
    Settings,
    config::non_blank,
    error::{NotifyError, truncate_body},
};

use super::Notifier;

pub const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Posts the report to a chat through the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramNotifier {
    base_url: String,
    token: Option<String>,
    chat_id: Option<String>,
    timeout: Duration,
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("base_url", &self.base_url)
            .field("chat_id", &self.chat_id)
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

impl TelegramNotifier {
    /// Blank credentials count as missing.
    pub fn new(token: Option<String>, chat_id: Option<String>, timeout: Duration) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: non_blank(token),
            chat_id: non_blank(chat_id),
            timeout,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.telegram_bot_token.clone(),
            settings.telegram_chat_id.clone(),
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    /// Point the notifier at another API host, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn post(&self, token: &str, chat_id: &str, text: &str) -> Result<(), NotifyError> {
        let http = Client::builder().timeout(self.timeout).build()?;
        let url = format!(
            "{}/bot{}/sendMessage",
            self.base_url.trim_end_matches('/'),
            token
        );

        let res = http
            .post(url)
            .json(&SendMessage {
                chat_id,
                text,
                parse_mode: "Markdown",
            })
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    /// Telegram messages have no subject; it is ignored.
    async fn send(&self, message: &str, _subject: Option<&str>) -> bool {
        let (Some(token), Some(chat_id)) = (self.token.as_deref(), self.chat_id.as_deref()) else {
            warn!("Telegram not configured: bot token or chat id missing");
            return false;
        };

        match self.post(token, chat_id, message).await {
            Ok(()) => {
                info!(chat_id, "telegram message sent");
                true
            }
            Err(e) => {
                error!("Error sending Telegram message: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "123456:SECRET-TOKEN";

    #[tokio::test]
    async fn transport_error_hides_token() {
        // Nothing listens on port 1.
        let n = TelegramNotifier::new(
            Some(TOKEN.into()),
            Some("42".into()),
            Duration::from_secs(2),
        )
        .with_base_url("http://127.0.0.1:1");

        let err = n.post(TOKEN, "42", "hola").await.unwrap_err();
        assert!(matches!(err, NotifyError::Http(_)));
        assert!(!err.to_string().contains("SECRET-TOKEN"), "{err}");
        assert!(!format!("{err:?}").contains("SECRET-TOKEN"));
    }

    #[test]
    fn blank_credentials_are_missing() {
        let n =
            TelegramNotifier::new(Some(String::new()), Some(" ".into()), Duration::from_secs(1));
        assert!(n.token.is_none());
        assert!(n.chat_id.is_none());
    }
}
