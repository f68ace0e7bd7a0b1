//! WMO weather interpretation codes as returned by Open-Meteo.
//!
//! See: https://open-meteo.com/en/docs#weathervariables

use crate::model::Condition;

/// Glyph and description used for codes missing from the table.
pub const FALLBACK: (&str, &str) = ("🌡️", "Desconocido");

/// Glyph and Spanish description for a WMO code.
pub fn glyph_and_description(code: i32) -> (&'static str, &'static str) {
    match code {
        0 => ("☀️", "Despejado"),
        1 => ("🌤️", "Mayormente despejado"),
        2 => ("⛅", "Parcialmente nublado"),
        3 => ("☁️", "Nublado"),
        45 => ("🌫️", "Niebla"),
        48 => ("🌫️", "Niebla con escarcha"),
        51 => ("🌧️", "Llovizna ligera"),
        53 => ("🌧️", "Llovizna moderada"),
        55 => ("🌧️", "Llovizna intensa"),
        56 => ("🌧️", "Llovizna helada ligera"),
        57 => ("🌧️", "Llovizna helada intensa"),
        61 => ("🌦️", "Lluvia ligera"),
        63 => ("🌧️", "Lluvia moderada"),
        65 => ("🌧️", "Lluvia intensa"),
        66 => ("🌧️", "Lluvia helada ligera"),
        67 => ("🌧️", "Lluvia helada intensa"),
        71 => ("❄️", "Nieve ligera"),
        73 => ("❄️", "Nieve moderada"),
        75 => ("❄️", "Nieve intensa"),
        77 => ("❄️", "Granizo"),
        80 => ("🌦️", "Chubascos ligeros"),
        81 => ("🌧️", "Chubascos moderados"),
        82 => ("🌧️", "Chubascos intensos"),
        85 => ("🌨️", "Chubascos de nieve ligeros"),
        86 => ("🌨️", "Chubascos de nieve intensos"),
        95 => ("⛈️", "Tormenta"),
        96 => ("⛈️", "Tormenta con granizo ligero"),
        99 => ("⛈️", "Tormenta con granizo intenso"),
        _ => FALLBACK,
    }
}

/// Coarse category for a WMO code, used by the daily summary.
pub fn condition(code: i32) -> Condition {
    match code {
        0 | 1 => Condition::Clear,
        2 | 3 => Condition::Clouds,
        45 | 48 => Condition::Fog,
        51 | 53 | 55 | 56 | 57 => Condition::Drizzle,
        61 | 63 | 65 | 66 | 67 | 80 | 81 | 82 => Condition::Rain,
        71 | 73 | 75 | 77 | 85 | 86 => Condition::Snow,
        95 | 96 | 99 => Condition::Thunderstorm,
        _ => Condition::Unknown,
    }
}
