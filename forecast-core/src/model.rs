use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Forecast for a single hour, in the provider's local time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourForecast {
    pub time: NaiveDateTime,
    pub temp: f64,
    pub feels_like: f64,
    pub description: String,
    pub icon: String,
    /// Probability of precipitation in `[0, 1]`.
    pub pop: f64,
    pub humidity: u8,
    pub wind_speed: f64,
}

/// Coarse condition category used by the daily summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Fog,
    #[default]
    Unknown,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Clear => "Clear",
            Condition::Clouds => "Clouds",
            Condition::Rain => "Rain",
            Condition::Drizzle => "Drizzle",
            Condition::Thunderstorm => "Thunderstorm",
            Condition::Snow => "Snow",
            Condition::Fog => "Fog",
            Condition::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of a whole future day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub temp_min: f64,
    pub temp_max: f64,
    pub main_condition: Condition,
    /// Highest probability of precipitation over the day, in `[0, 1]`.
    pub total_pop: f64,
}

/// Converts a provider percentage into a probability in `[0, 1]`.
pub fn normalize_pop(percent: f64) -> f64 {
    (percent / 100.0).clamp(0.0, 1.0)
}
