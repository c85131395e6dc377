//! Human-readable rendering of a lookup result.
//!
//! The weather payload is whatever the forecast service returned, so every
//! field is optional here: missing values are left out rather than guessed.

use chrono::NaiveDate;
use cityweather_core::CityWeatherResult;
use serde_json::Value;

pub fn summary(result: &CityWeatherResult) -> String {
    let weather = result.weather.as_value();
    let mut lines = vec![format!(
        "{} ({:.4}, {:.4})",
        result.city, result.latitude, result.longitude
    )];

    if let Some(tz) = weather.get("timezone").and_then(Value::as_str) {
        lines.push(format!("Timezone: {tz}"));
    }

    if let Some(current) = weather.get("current_weather") {
        let parts: Vec<String> = [
            number(current, "temperature").map(|t| format!("{t:.1}°C")),
            number(current, "weathercode").map(|c| describe_wmo_code(c).to_string()),
            number(current, "windspeed").map(|w| format!("wind {w:.1} km/h")),
        ]
        .into_iter()
        .flatten()
        .collect();

        if !parts.is_empty() {
            lines.push(format!("Now: {}", parts.join(", ")));
        }
    }

    if let Some(current) = weather.get("current") {
        if let Some(h) = number(current, "relativehumidity_2m") {
            lines.push(format!("Humidity: {h:.0}%"));
        }
        if let Some(p) = number(current, "surface_pressure") {
            lines.push(format!("Pressure: {p:.1} hPa"));
        }
    }

    if let Some(daily) = weather.get("daily") {
        let rows = daily_rows(daily);
        if !rows.is_empty() {
            lines.push("Forecast:".to_string());
            lines.extend(rows.into_iter().map(|row| format!("  {row}")));
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn daily_rows(daily: &Value) -> Vec<String> {
    let Some(days) = daily.get("time").and_then(Value::as_array) else {
        return Vec::new();
    };

    days.iter()
        .enumerate()
        .map(|(i, day)| {
            let raw = day.as_str().unwrap_or_default();
            let label = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(|d| d.format("%a %d %b").to_string())
                .unwrap_or_else(|_| raw.to_string());

            let temps =
                match (nth(daily, "temperature_2m_min", i), nth(daily, "temperature_2m_max", i)) {
                    (Some(min), Some(max)) => Some(format!("{min:.1}°C .. {max:.1}°C")),
                    (Some(min), None) => Some(format!("min {min:.1}°C")),
                    (None, Some(max)) => Some(format!("max {max:.1}°C")),
                    (None, None) => None,
                };
            let condition = nth(daily, "weathercode", i).map(|c| describe_wmo_code(c).to_string());

            std::iter::once(label)
                .chain(temps)
                .chain(condition)
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect()
}

fn number(obj: &Value, key: &str) -> Option<f64> {
    obj.get(key).and_then(Value::as_f64)
}

fn nth(obj: &Value, key: &str, i: usize) -> Option<f64> {
    obj.get(key)?.as_array()?.get(i)?.as_f64()
}

/// Short description of a WMO weather interpretation code.
fn describe_wmo_code(code: f64) -> &'static str {
    match code as i64 {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 | 48 => "Fog",
        51 | 53 | 55 => "Drizzle",
        56 | 57 => "Freezing drizzle",
        61 | 63 | 65 => "Rain",
        66 | 67 => "Freezing rain",
        71 | 73 | 75 => "Snow",
        77 => "Snow grains",
        80..=82 => "Rain showers",
        85 | 86 => "Snow showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with hail",
        _ => "Unknown",
    }
}
