//! One run of the job: fetch, render, deliver.

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use tracing::{error, info};

use crate::{
    Settings,
    error::ForecastError,
    formatter::render_full_report,
    notifier::{Notifier, notifier_from_settings},
    provider::{OpenMeteoProvider, WeatherProvider},
};

/// Current wall-clock time in `tz`.
pub fn local_now(tz: Tz) -> NaiveDateTime {
    Utc::now().with_timezone(&tz).naive_local()
}

/// Fetch today's hours and tomorrow's summary concurrently and render the report.
pub async fn build_report(
    settings: &Settings,
    provider: &dyn WeatherProvider,
    now: NaiveDateTime,
) -> Result<String, ForecastError> {
    let (hourly, tomorrow) = tokio::try_join!(
        provider.today_hourly(now),
        provider.tomorrow_summary(now)
    )?;

    info!(hours = hourly.len(), tomorrow = %tomorrow.date, "forecast data fetched");

    Ok(render_full_report(&hourly, &tomorrow, &settings.city, now))
}

/// Run the pipeline at a fixed `now`. Returns whether any channel delivered.
///
/// Fetch or render failures abort before anything is sent.
pub async fn run_at(
    settings: &Settings,
    provider: &dyn WeatherProvider,
    notifier: &dyn Notifier,
    now: NaiveDateTime,
) -> Result<bool> {
    info!(city = %settings.city, "starting forecast report");

    let report = match build_report(settings, provider, now).await {
        Ok(report) => report,
        Err(e) => {
            error!(city = %settings.city, "forecast run failed: {e}");
            return Err(e).with_context(|| format!("Failed to build report for {}", settings.city));
        }
    };

    let delivered = notifier.send(&report, None).await;
    if delivered {
        info!("notification sent");
    } else {
        error!("notification failed on every channel");
    }

    Ok(delivered)
}

/// Run the pipeline against the live provider with channels chosen by `settings`.
pub async fn run(settings: &Settings) -> Result<bool> {
    let tz = settings.tz()?;
    let notifier = notifier_from_settings(settings)?;
    let provider = OpenMeteoProvider::from_settings(settings)
        .context("Failed to initialize forecast client")?;

    run_at(settings, &provider, notifier.as_ref(), local_now(tz)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Condition, DaySummary, HourForecast};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct StubProvider {
        tomorrow_missing: bool,
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn today_hourly(
            &self,
            now: NaiveDateTime,
        ) -> Result<Vec<HourForecast>, ForecastError> {
            Ok(vec![HourForecast {
                time: now,
                temp: 15.0,
                feels_like: 14.0,
                description: "Despejado".into(),
                icon: "☀️".into(),
                pop: 0.0,
                humidity: 50,
                wind_speed: 3.0,
            }])
        }

        async fn tomorrow_summary(&self, now: NaiveDateTime) -> Result<DaySummary, ForecastError> {
            let date = now.date().succ_opt().unwrap();
            if self.tomorrow_missing {
                return Err(ForecastError::NotFound(date));
            }
            Ok(DaySummary {
                date,
                temp_min: 9.0,
                temp_max: 16.0,
                main_condition: Condition::Clear,
                total_pop: 0.0,
            })
        }
    }

    #[derive(Debug, Default)]
    struct Recorder {
        ok: bool,
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for Recorder {
        async fn send(&self, message: &str, _subject: Option<&str>) -> bool {
            self.sent.lock().unwrap().push(message.to_string());
            self.ok
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(21, 5, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn delivers_rendered_report() {
        let settings = Settings::default();
        let provider = StubProvider { tomorrow_missing: false };
        let notifier = Recorder { ok: true, ..Default::default() };

        let delivered = run_at(&settings, &provider, &notifier, now()).await.unwrap();

        assert!(delivered);
        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].starts_with("🌙 Buenas noches"));
        assert!(sent[0].contains("**Barcelona**"));
    }

    #[tokio::test]
    async fn channel_failure_is_not_an_error() {
        let settings = Settings::default();
        let provider = StubProvider { tomorrow_missing: false };
        let notifier = Recorder::default();

        let delivered = run_at(&settings, &provider, &notifier, now()).await.unwrap();
        assert!(!delivered);
    }

    #[tokio::test]
    async fn fetch_failure_aborts_before_dispatch() {
        let settings = Settings::default();
        let provider = StubProvider { tomorrow_missing: true };
        let notifier = Recorder { ok: true, ..Default::default() };

        let err = run_at(&settings, &provider, &notifier, now()).await.unwrap_err();

        assert!(err.to_string().contains("Barcelona"));
        assert!(matches!(
            err.downcast_ref::<ForecastError>(),
            Some(ForecastError::NotFound(_))
        ));
        assert!(notifier.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_method_fails_before_fetching() {
        let settings = Settings {
            notification_method: "smoke-signals".into(),
            ..Settings::default()
        };
        let err = run(&settings).await.unwrap_err();
        assert!(err.to_string().contains("Unknown notification method"));
    }
}
