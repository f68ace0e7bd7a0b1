//! Core library for the daily `forecast` job.
//!
//! This crate defines:
//! - Settings loading (defaults, TOML file, environment)
//! - The Open-Meteo client and WMO code tables
//! - Report rendering
//! - Delivery channels (email, Telegram, fan-out)
//! - The single-run pipeline tying them together
//!
//! It is used by `forecast-cli`, but the pipeline can be driven by any binary.

pub mod config;
pub mod error;
pub mod formatter;
pub mod model;
pub mod notifier;
pub mod pipeline;
pub mod provider;

pub use config::Settings;
pub use error::{ConfigError, ForecastError};
pub use model::{Condition, DaySummary, HourForecast};
pub use notifier::{NotificationMethod, Notifier, notifier_from_settings};
pub use provider::{OpenMeteoProvider, WeatherProvider};
