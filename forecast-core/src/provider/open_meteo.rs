use async_trait::async_trait;
use chrono::{Days, NaiveDate, NaiveDateTime, Timelike};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    Settings,
    error::{ForecastError, truncate_body},
    model::{DaySummary, HourForecast, normalize_pop},
    provider::wmo,
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

const HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,precipitation_probability,weather_code,wind_speed_10m";
const DAILY_FIELDS: &str =
    "weather_code,temperature_2m_max,temperature_2m_min,precipitation_probability_max";
const FORECAST_DAYS: u8 = 3;

/// Open-Meteo forecast client for a single fixed location.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    latitude: f64,
    longitude: f64,
    timezone: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(
        latitude: f64,
        longitude: f64,
        timezone: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ForecastError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            latitude,
            longitude,
            timezone: timezone.into(),
            http,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ForecastError> {
        Self::new(
            settings.latitude,
            settings.longitude,
            settings.timezone.clone(),
            Duration::from_secs(settings.request_timeout_secs),
        )
    }

    /// Point the client at another endpoint, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// One GET against the forecast endpoint. No retry.
    #[instrument(skip(self), fields(lat = self.latitude, lon = self.longitude))]
    pub async fn fetch_forecast(&self) -> Result<ForecastPayload, ForecastError> {
        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("latitude", self.latitude.to_string()),
                ("longitude", self.longitude.to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", self.timezone.clone()),
                ("forecast_days", FORECAST_DAYS.to_string()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ForecastError::Provider {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let payload: ForecastPayload = serde_json::from_str(&body)?;
        debug!(
            hours = payload.hourly.time.len(),
            days = payload.daily.time.len(),
            "forecast received"
        );

        Ok(payload)
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn today_hourly(
        &self,
        now: NaiveDateTime,
    ) -> Result<Vec<HourForecast>, ForecastError> {
        let payload = self.fetch_forecast().await?;
        hourly_for_today(&payload, now)
    }

    async fn tomorrow_summary(&self, now: NaiveDateTime) -> Result<DaySummary, ForecastError> {
        let payload = self.fetch_forecast().await?;
        let tomorrow = now
            .date()
            .checked_add_days(Days::new(1))
            .ok_or_else(|| ForecastError::Malformed(format!("no day after {}", now.date())))?;
        summary_for_day(&payload, tomorrow)
    }
}

/// Raw forecast response. Every series is index-aligned with its `time` array.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPayload {
    pub hourly: HourlySeries,
    pub daily: DailySeries,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HourlySeries {
    pub time: Vec<String>,
    pub temperature_2m: Vec<f64>,
    pub relative_humidity_2m: Vec<f64>,
    pub apparent_temperature: Vec<f64>,
    pub precipitation_probability: Vec<Option<f64>>,
    pub weather_code: Vec<i32>,
    pub wind_speed_10m: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailySeries {
    pub time: Vec<String>,
    pub weather_code: Vec<i32>,
    pub temperature_2m_max: Vec<f64>,
    pub temperature_2m_min: Vec<f64>,
    pub precipitation_probability_max: Vec<Option<f64>>,
}

/// Remaining hours of `now`'s calendar day, current hour included, in provider order.
pub fn hourly_for_today(
    payload: &ForecastPayload,
    now: NaiveDateTime,
) -> Result<Vec<HourForecast>, ForecastError> {
    let h = &payload.hourly;
    let today = now.date();
    let mut hours = Vec::new();

    for (i, raw) in h.time.iter().enumerate() {
        let time = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
            .map_err(|_| ForecastError::Malformed(format!("invalid hourly time '{raw}'")))?;

        if time.date() != today || time.hour() < now.hour() {
            continue;
        }

        let code = at(&h.weather_code, i, "weather_code")?;
        let (icon, description) = wmo::glyph_and_description(code);
        let pop = at(&h.precipitation_probability, i, "precipitation_probability")?;
        let humidity = at(&h.relative_humidity_2m, i, "relative_humidity_2m")?;

        hours.push(HourForecast {
            time,
            temp: at(&h.temperature_2m, i, "temperature_2m")?,
            feels_like: at(&h.apparent_temperature, i, "apparent_temperature")?,
            description: description.to_string(),
            icon: icon.to_string(),
            pop: normalize_pop(pop.unwrap_or(0.0)),
            humidity: humidity.round().clamp(0.0, 100.0) as u8,
            wind_speed: at(&h.wind_speed_10m, i, "wind_speed_10m")?,
        });
    }

    Ok(hours)
}

/// The daily entry for `date`, or [`ForecastError::NotFound`].
pub fn summary_for_day(
    payload: &ForecastPayload,
    date: NaiveDate,
) -> Result<DaySummary, ForecastError> {
    let d = &payload.daily;

    for (i, raw) in d.time.iter().enumerate() {
        let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| ForecastError::Malformed(format!("invalid daily date '{raw}'")))?;

        if day != date {
            continue;
        }

        let min = at(&d.temperature_2m_min, i, "temperature_2m_min")?;
        let max = at(&d.temperature_2m_max, i, "temperature_2m_max")?;
        let pop = at(
            &d.precipitation_probability_max,
            i,
            "precipitation_probability_max",
        )?;

        return Ok(DaySummary {
            date,
            temp_min: min.min(max),
            temp_max: max.max(min),
            main_condition: wmo::condition(at(&d.weather_code, i, "weather_code")?),
            total_pop: normalize_pop(pop.unwrap_or(0.0)),
        });
    }

    Err(ForecastError::NotFound(date))
}

fn at<T: Copy>(series: &[T], i: usize, field: &str) -> Result<T, ForecastError> {
    series.get(i).copied().ok_or_else(|| {
        ForecastError::Malformed(format!("'{field}' has no value at index {i}"))
    })
}
