//! Renders forecast records into the Spanish, emoji-annotated report.
//!
//! Everything here is pure: the current time is always passed in.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};

use crate::model::{DaySummary, HourForecast};

pub const NO_HOURLY_DATA: &str = "No hay datos horarios disponibles.";

/// Hourly lines get a rain indicator above this probability.
pub const RAIN_INDICATOR_THRESHOLD: f64 = 0.2;
/// The summary gets a rain warning above this probability.
pub const RAIN_WARNING_THRESHOLD: f64 = 0.5;

const DIVIDER_WIDTH: usize = 35;

/// Greeting for the given hour of the day (0-23).
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        0..=11 => "☀️ Buenos dias",
        12..=19 => "🌤️ Buenas tardes",
        _ => "🌙 Buenas noches",
    }
}

/// Spanish word for an English condition key. Unknown keys pass through unchanged.
pub fn localized_condition(key: &str) -> &str {
    match key {
        "Clear" => "Despejado",
        "Clouds" => "Nublado",
        "Rain" => "Lluvia",
        "Drizzle" => "Llovizna",
        "Thunderstorm" => "Tormenta",
        "Snow" => "Nieve",
        "Mist" | "Fog" => "Niebla",
        other => other,
    }
}

pub fn render_hourly(forecasts: &[HourForecast]) -> String {
    if forecasts.is_empty() {
        return NO_HOURLY_DATA.to_string();
    }

    let mut lines = vec!["📅 **HOY HORA A HORA**".to_string(), String::new()];

    for f in forecasts {
        let rain = if f.pop > RAIN_INDICATOR_THRESHOLD {
            format!(" 💧{}%", percent(f.pop))
        } else {
            String::new()
        };

        lines.push(format!(
            "  {}  {}  {:.0}°C  {}{}",
            f.time.format("%H:%M"),
            f.icon,
            f.temp,
            f.description,
            rain
        ));
    }

    lines.join("\n")
}

pub fn render_summary(summary: &DaySummary) -> String {
    let condition = localized_condition(summary.main_condition.as_str());

    let warning = if summary.total_pop > RAIN_WARNING_THRESHOLD {
        format!(
            "\n  ⚠️ Probabilidad de lluvia: {}%",
            percent(summary.total_pop)
        )
    } else {
        String::new()
    };

    format!(
        "📆 **MAÑANA** ({} {:02})\n\n  🌡️ {:.0}°C - {:.0}°C\n  🌤️ {}{}",
        weekday_es(summary.date.weekday()),
        summary.date.day(),
        summary.temp_min,
        summary.temp_max,
        condition,
        warning
    )
}

/// The full message: greeting, header, hourly block, tomorrow's summary and footer.
pub fn render_full_report(
    hourly: &[HourForecast],
    tomorrow: &DaySummary,
    city: &str,
    now: NaiveDateTime,
) -> String {
    let divider = "─".repeat(DIVIDER_WIDTH);

    let report = format!(
        "\n{greeting}\n\n🏙️ Pronostico para **{city}**\n📅 {date}\n\n{divider}\n\n{hourly}\n\n{divider}\n\n{summary}\n\n{divider}\n\n_Generado automaticamente a las {time}_\n",
        greeting = greeting(now.hour()),
        date = long_date_es(now.date()),
        hourly = render_hourly(hourly),
        summary = render_summary(tomorrow),
        time = now.format("%H:%M"),
    );

    report.trim().to_string()
}

fn percent(probability: f64) -> u32 {
    (probability * 100.0).round() as u32
}

/// e.g. "martes, 10 de marzo de 2026"
fn long_date_es(date: NaiveDate) -> String {
    format!(
        "{}, {:02} de {} de {}",
        weekday_es(date.weekday()),
        date.day(),
        month_es(date.month()),
        date.year()
    )
}

fn weekday_es(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "lunes",
        Weekday::Tue => "martes",
        Weekday::Wed => "miércoles",
        Weekday::Thu => "jueves",
        Weekday::Fri => "viernes",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}

fn month_es(month: u32) -> &'static str {
    const MONTHS: [&str; 12] = [
        "enero",
        "febrero",
        "marzo",
        "abril",
        "mayo",
        "junio",
        "julio",
        "agosto",
        "septiembre",
        "octubre",
        "noviembre",
        "diciembre",
    ];
    MONTHS[(month.clamp(1, 12) - 1) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Condition;

    fn hour(h: u32, pop: f64) -> HourForecast {
        HourForecast {
            time: NaiveDate::from_ymd_opt(2026, 3, 10)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap(),
            temp: 14.3,
            feels_like: 13.0,
            description: "Lluvia ligera".into(),
            icon: "🌦️".into(),
            pop,
            humidity: 70,
            wind_speed: 6.0,
        }
    }

    fn day(condition: Condition, total_pop: f64) -> DaySummary {
        DaySummary {
            date: NaiveDate::from_ymd_opt(2026, 3, 11).unwrap(),
            temp_min: 10.0,
            temp_max: 18.0,
            main_condition: condition,
            total_pop,
        }
    }

    #[test]
    fn greeting_bands() {
        assert_eq!(greeting(0), greeting(11));
        assert!(greeting(0).contains("Buenos dias"));
        assert!(greeting(12).contains("Buenas tardes"));
        assert!(greeting(19).contains("Buenas tardes"));
        assert!(greeting(20).contains("Buenas noches"));
        assert!(greeting(23).contains("Buenas noches"));
    }

    #[test]
    fn empty_hourly_is_no_data_sentence() {
        let out = render_hourly(&[]);
        assert_eq!(out, NO_HOURLY_DATA);
        assert!(!out.is_empty());
    }

    #[test]
    fn hourly_line_layout() {
        let out = render_hourly(&[hour(9, 0.0)]);
        let line = out.lines().last().unwrap();
        assert_eq!(line, "  09:00  🌦️  14°C  Lluvia ligera");
    }

    #[test]
    fn rain_indicator_only_above_threshold() {
        let at_threshold = render_hourly(&[hour(9, 0.2)]);
        assert!(!at_threshold.contains('💧'));

        let above = render_hourly(&[hour(9, 0.21)]);
        assert!(above.contains("💧21%"));
    }

    #[test]
    fn summary_range_and_condition() {
        let out = render_summary(&day(Condition::Clouds, 0.1));
        assert!(out.contains("10°C - 18°C"));
        assert!(out.contains("Nublado"));
        assert!(out.contains("miércoles 11"));
        assert!(!out.contains("⚠️"));
    }

    #[test]
    fn rain_warning_only_above_threshold() {
        assert!(!render_summary(&day(Condition::Rain, 0.5)).contains("⚠️"));

        let out = render_summary(&day(Condition::Rain, 0.7));
        assert!(out.contains("⚠️ Probabilidad de lluvia: 70%"));
    }

    #[test]
    fn untranslated_condition_passes_through() {
        assert_eq!(localized_condition("Unknown"), "Unknown");
        assert_eq!(localized_condition("Mist"), "Niebla");
        assert!(render_summary(&day(Condition::Unknown, 0.0)).contains("Unknown"));
    }

    #[test]
    fn full_report_sections_in_order() {
        let now = NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let report = render_full_report(
            &[hour(9, 0.6)],
            &day(Condition::Rain, 0.7),
            "Barcelona",
            now,
        );

        assert!(report.starts_with("☀️ Buenos dias"));
        assert!(report.ends_with("_Generado automaticamente a las 09:30_"));
        assert!(report.contains("**Barcelona**"));
        assert!(report.contains("martes, 10 de marzo de 2026"));
        assert_eq!(report.matches(&"─".repeat(DIVIDER_WIDTH)).count(), 3);

        let hourly_at = report.find("HOY HORA A HORA").unwrap();
        let summary_at = report.find("MAÑANA").unwrap();
        assert!(hourly_at < summary_at);
    }
}
