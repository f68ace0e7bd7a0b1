use anyhow::Context;
use clap::{Parser, Subcommand};
use forecast_core::{NotificationMethod, OpenMeteoProvider, Settings, pipeline};
use inquire::{CustomType, Password, Select, Text};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::logging;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Daily weather forecast report")]
pub struct Cli {
    /// Settings file (TOML). Defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Also append logs to this file.
    #[arg(long, global = true, default_value = "weather.log")]
    pub log_file: PathBuf,

    /// Log to the console only.
    #[arg(long, global = true)]
    pub no_log_file: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum Command {
    /// Fetch the forecast, render the report and send it (default).
    Run,

    /// Fetch the forecast and print the report without sending it.
    Preview,

    /// Interactively write the settings file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let Cli {
            config,
            log_file,
            no_log_file,
            command,
        } = self;
        let command = command.unwrap_or(Command::Run);

        // Values from .env only fill variables that aren't already set.
        dotenv::dotenv().ok();

        let log_file = match command {
            Command::Configure => None,
            _ if no_log_file => None,
            _ => Some(log_file.as_path()),
        };
        logging::init(log_file)?;

        match command {
            Command::Run => {
                let settings = load_settings(config.as_deref())?;
                let delivered = pipeline::run(&settings).await?;
                if !delivered {
                    warn!("report was not delivered by any channel");
                }
            }
            Command::Preview => {
                let settings = load_settings(config.as_deref())?;
                let provider = OpenMeteoProvider::from_settings(&settings)
                    .context("Failed to initialize forecast client")?;
                let now = pipeline::local_now(settings.tz()?);

                let report = pipeline::build_report(&settings, &provider, now)
                    .await
                    .inspect_err(|e| error!("forecast preview failed: {e}"))?;
                println!("{report}");
            }
            Command::Configure => {
                let path = match config {
                    Some(p) => p,
                    None => Settings::config_file_path()?,
                };
                configure(&path)?;
            }
        }

        Ok(())
    }
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let settings =
        Settings::load(path).inspect_err(|e| error!("invalid configuration: {e:#}"))?;
    info!(
        city = %settings.city,
        method = %settings.notification_method,
        "settings loaded"
    );
    Ok(settings)
}

fn configure(path: &Path) -> anyhow::Result<()> {
    let mut s = Settings::load_file(path)?;

    s.city = Text::new("City name:").with_default(&s.city).prompt()?;
    s.latitude = CustomType::<f64>::new("Latitude:")
        .with_default(s.latitude)
        .prompt()?;
    s.longitude = CustomType::<f64>::new("Longitude:")
        .with_default(s.longitude)
        .prompt()?;
    s.timezone = Text::new("Timezone (IANA name):")
        .with_default(&s.timezone)
        .prompt()?;

    let methods = NotificationMethod::all().to_vec();
    let current = s
        .notification_method()
        .ok()
        .and_then(|m| methods.iter().position(|x| *x == m))
        .unwrap_or(0);
    let method = Select::new("Notification method:", methods)
        .with_starting_cursor(current)
        .prompt()?;
    s.notification_method = method.as_str().to_string();

    if matches!(method, NotificationMethod::Email | NotificationMethod::Both) {
        s.smtp_server = Text::new("SMTP server:")
            .with_default(&s.smtp_server)
            .prompt()?;
        s.smtp_port = CustomType::<u16>::new("SMTP port:")
            .with_default(s.smtp_port)
            .prompt()?;
        s.email_from = Text::new("From address:")
            .with_default(&s.email_from)
            .prompt()?;
        let password = Password::new("App password (empty keeps the current one):")
            .without_confirmation()
            .prompt()?;
        if !password.is_empty() {
            s.email_password = password;
        }
        s.email_to = Text::new("Send reports to:")
            .with_default(&s.email_to)
            .prompt()?;
    }

    if matches!(method, NotificationMethod::Telegram | NotificationMethod::Both) {
        let token = Password::new("Telegram bot token (empty keeps the current one):")
            .without_confirmation()
            .prompt()?;
        if !token.is_empty() {
            s.telegram_bot_token = Some(token);
        }
        let chat_id = Text::new("Telegram chat id:")
            .with_default(s.telegram_chat_id.as_deref().unwrap_or_default())
            .prompt()?;
        s.telegram_chat_id = Some(chat_id).filter(|c| !c.trim().is_empty());
    }

    s.validate()?;
    s.save(path)?;

    println!("Settings saved to {}", path.display());
    Ok(())
}
