use async_trait::async_trait;
use std::{fmt::Debug, str::FromStr};

use crate::{Settings, error::ConfigError};

pub mod email;
pub mod multi;
pub mod telegram;

pub use email::EmailNotifier;
pub use multi::MultiNotifier;
pub use telegram::TelegramNotifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationMethod {
    Email,
    Telegram,
    Both,
}

impl NotificationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationMethod::Email => "email",
            NotificationMethod::Telegram => "telegram",
            NotificationMethod::Both => "both",
        }
    }

    pub const fn all() -> &'static [NotificationMethod] {
        &[
            NotificationMethod::Email,
            NotificationMethod::Telegram,
            NotificationMethod::Both,
        ]
    }
}

impl std::fmt::Display for NotificationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationMethod {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "email" => Ok(NotificationMethod::Email),
            "telegram" | "chat-bot" | "chatbot" => Ok(NotificationMethod::Telegram),
            "both" => Ok(NotificationMethod::Both),
            _ => Err(ConfigError::UnknownMethod(value.to_string())),
        }
    }
}

/// A delivery channel.
///
/// Delivery failures are handled inside the channel: they are logged and
/// reported as `false`, never returned as errors, so one broken channel can't
/// stop the others.
#[async_trait]
pub trait Notifier: Send + Sync + Debug {
    async fn send(&self, message: &str, subject: Option<&str>) -> bool;
}

/// Build the channel (or fan-out of channels) selected by `settings.notification_method`.
pub fn notifier_from_settings(settings: &Settings) -> Result<Box<dyn Notifier>, ConfigError> {
    let boxed: Box<dyn Notifier> = match settings.notification_method()? {
        NotificationMethod::Email => Box::new(EmailNotifier::from_settings(settings)),
        NotificationMethod::Telegram => Box::new(TelegramNotifier::from_settings(settings)),
        NotificationMethod::Both => Box::new(MultiNotifier::new(vec![
            Box::new(EmailNotifier::from_settings(settings)),
            Box::new(TelegramNotifier::from_settings(settings)),
        ])),
    };

    Ok(boxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_as_str_roundtrip() {
        for m in NotificationMethod::all() {
            let parsed: NotificationMethod = m.as_str().parse().expect("roundtrip should succeed");
            assert_eq!(*m, parsed);
        }
    }

    #[test]
    fn chat_bot_alias_and_case() {
        assert_eq!(
            "chat-bot".parse::<NotificationMethod>().unwrap(),
            NotificationMethod::Telegram
        );
        assert_eq!(
            " Both ".parse::<NotificationMethod>().unwrap(),
            NotificationMethod::Both
        );
    }

    #[test]
    fn unknown_method_error() {
        let err = "fax".parse::<NotificationMethod>().unwrap_err();
        assert!(err.to_string().contains("Unknown notification method 'fax'"));
    }

    #[test]
    fn factory_builds_each_method() {
        for m in NotificationMethod::all() {
            let settings = Settings {
                notification_method: m.as_str().to_string(),
                ..Settings::default()
            };
            let notifier = notifier_from_settings(&settings).unwrap();
            let debug = format!("{notifier:?}");

            match m {
                NotificationMethod::Email => assert!(debug.starts_with("EmailNotifier")),
                NotificationMethod::Telegram => assert!(debug.starts_with("TelegramNotifier")),
                NotificationMethod::Both => {
                    assert!(debug.starts_with("MultiNotifier"));
                    assert!(debug.contains("EmailNotifier"));
                    assert!(debug.contains("TelegramNotifier"));
                }
            }
        }
    }

    #[test]
    fn factory_rejects_unknown_method() {
        let settings = Settings {
            notification_method: "carrier-pigeon".into(),
            ..Settings::default()
        };
        let err = notifier_from_settings(&settings).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownMethod(m) if m == "carrier-pigeon"));
    }
}
