use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::fmt::Debug;

use crate::{
    error::ForecastError,
    model::{DaySummary, HourForecast},
};

pub mod open_meteo;
pub mod wmo;

pub use open_meteo::OpenMeteoProvider;

/// Source of forecast records. `now` is local time in the configured timezone.
///
/// Each call performs its own round-trip; the two may run concurrently.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Remaining hours of today, current hour included, in chronological order.
    async fn today_hourly(&self, now: NaiveDateTime) -> Result<Vec<HourForecast>, ForecastError>;

    /// Summary for the day after `now`. Fails with [`ForecastError::NotFound`] if absent.
    async fn tomorrow_summary(&self, now: NaiveDateTime) -> Result<DaySummary, ForecastError>;
}
