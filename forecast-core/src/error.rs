use chrono::NaiveDate;

/// Errors raised while loading or interpreting [`Settings`](crate::Settings).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "Unknown notification method '{0}'. Supported methods: email, telegram (alias chat-bot), both."
    )]
    UnknownMethod(String),

    #[error("Invalid timezone '{0}'. Expected an IANA name such as \"Europe/Madrid\".")]
    InvalidTimezone(String),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// Errors raised by the forecast provider. All of them are fatal to a run.
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Forecast provider request failed with status {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Failed to parse forecast JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Malformed forecast payload: {0}")]
    Malformed(String),

    #[error("No daily forecast available for {0}")]
    NotFound(NaiveDate),
}

/// Delivery failures. Channels log these and report `false` instead of returning them.
#[derive(Debug, thiserror::Error)]
pub(crate) enum NotifyError {
    #[error("invalid email address '{address}': {source}")]
    Address {
        address: String,
        source: lettre::address::AddressError,
    },

    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("request rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

// Bot API URLs embed the token, so they never reach an error message.
impl From<reqwest::Error> for NotifyError {
    fn from(e: reqwest::Error) -> Self {
        NotifyError::Http(e.without_url())
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
