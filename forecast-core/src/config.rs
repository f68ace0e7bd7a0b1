use anyhow::{Context, Result, anyhow};
use chrono_tz::Tz;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::{error::ConfigError, notifier::NotificationMethod};

/// Process-wide settings. Built once at startup and passed by reference afterwards.
///
/// Example TOML:
/// ```toml
/// city = "Barcelona"
/// latitude = 41.3888
/// longitude = 2.159
/// timezone = "Europe/Madrid"
/// notification_method = "both"
/// telegram_bot_token = "123:abc"
/// telegram_chat_id = "42"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    /// IANA timezone name, also sent to the provider.
    pub timezone: String,

    /// One of "email", "telegram" (or "chat-bot"), "both".
    pub notification_method: String,

    pub smtp_server: String,
    pub smtp_port: u16,
    pub email_from: String,
    /// App password for the sending account.
    pub email_password: String,
    pub email_to: String,

    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,

    /// Upper bound for each outgoing HTTP or SMTP exchange.
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            city: "Barcelona".to_string(),
            latitude: 41.3888,
            longitude: 2.159,
            timezone: "Europe/Madrid".to_string(),
            notification_method: NotificationMethod::Email.as_str().to_string(),
            smtp_server: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            email_from: String::new(),
            email_password: String::new(),
            email_to: String::new(),
            telegram_bot_token: None,
            telegram_chat_id: None,
            request_timeout_secs: 10,
        }
    }
}

impl Settings {
    /// Return the notification method as a strongly-typed value.
    pub fn notification_method(&self) -> Result<NotificationMethod, ConfigError> {
        NotificationMethod::from_str(&self.notification_method)
    }

    /// Parse the configured timezone.
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimezone(self.timezone.clone()))
    }

    /// Fail fast on values that would only blow up halfway through a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.notification_method()?;
        self.tz()?;
        Ok(())
    }

    /// Load settings: defaults, then the TOML file (if any), then the process environment.
    ///
    /// `path` overrides the platform config location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_file_path()?,
        };

        let mut settings = Self::load_file(&path)?;
        settings.apply_env(|key| std::env::var(key).ok())?;
        settings.validate()?;

        Ok(settings)
    }

    /// Read a TOML file, or return the defaults if it doesn't exist yet.
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        // A blank credential is an absent one.
        settings.telegram_bot_token = non_blank(settings.telegram_bot_token);
        settings.telegram_chat_id = non_blank(settings.telegram_chat_id);

        Ok(settings)
    }

    /// Save settings as TOML, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(self).context("Failed to serialize settings to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "daily-forecast", "forecast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Override fields from environment-style variables. Unset or empty keys are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("CITY") {
            self.city = v;
        }
        if let Some(v) = get("LATITUDE") {
            self.latitude = parse_value("LATITUDE", v)?;
        }
        if let Some(v) = get("LONGITUDE") {
            self.longitude = parse_value("LONGITUDE", v)?;
        }
        if let Some(v) = get("TIMEZONE") {
            self.timezone = v;
        }
        if let Some(v) = get("NOTIFICATION_METHOD") {
            self.notification_method = v;
        }
        if let Some(v) = get("SMTP_SERVER") {
            self.smtp_server = v;
        }
        if let Some(v) = get("SMTP_PORT") {
            self.smtp_port = parse_value("SMTP_PORT", v)?;
        }
        if let Some(v) = get("EMAIL_FROM") {
            self.email_from = v;
        }
        if let Some(v) = get("EMAIL_PASSWORD") {
            self.email_password = v;
        }
        if let Some(v) = get("EMAIL_TO") {
            self.email_to = v;
        }
        if let Some(v) = get("TELEGRAM_BOT_TOKEN") {
            self.telegram_bot_token = Some(v);
        }
        if let Some(v) = get("TELEGRAM_CHAT_ID") {
            self.telegram_chat_id = Some(v);
        }
        if let Some(v) = get("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_value("REQUEST_TIMEOUT_SECS", v)?;
        }

        Ok(())
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_value<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}
