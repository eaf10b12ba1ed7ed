//! Plain-text rendering of the weather display.

use std::fmt::Write;

use stormwatch_ui::{LocationStatus, WeatherView};
use stormwatch_weather::ForecastEntry;

/// Render the whole display. `symbol` is the temperature unit, e.g. `°F`.
pub fn view(view: &WeatherView, symbol: &str) -> String {
    let mut out = String::new();

    if let Some(weather) = &view.weather {
        let _ = writeln!(out, "{}", weather.city.to_uppercase());
        let _ = writeln!(
            out,
            "{} ({})",
            weather.condition.label, weather.condition.description
        );
        let _ = writeln!(
            out,
            "{}{}   H: {}{}  L: {}{}",
            weather.rounded_temperature(),
            symbol,
            weather.rounded_high(),
            symbol,
            weather.rounded_low(),
            symbol
        );
        if let Some(icon) = weather.condition.icon_url() {
            let _ = writeln!(out, "{}", icon);
        }
    }

    if !view.clock.is_empty() {
        let _ = writeln!(out, "{}", view.clock);
    }

    if let Some(forecast) = &view.forecast {
        if !forecast.is_empty() {
            out.push('\n');
            for entry in forecast {
                let _ = writeln!(out, "{}", forecast_line(entry, symbol));
            }
        }
    }

    if let LocationStatus::Failed(message) = &view.location {
        let _ = writeln!(out, "\n{}", message);
    }

    if let Some(error) = &view.error {
        let _ = writeln!(out, "\n{}", error);
    }

    out
}

fn forecast_line(entry: &ForecastEntry, symbol: &str) -> String {
    let day = entry
        .weekday()
        .map(|d| d.to_uppercase())
        .unwrap_or_else(|| "---".to_string());
    let temp = entry
        .rounded_temperature()
        .map(|t| format!("{}{}", t, symbol))
        .unwrap_or_else(|| "--".to_string());

    format!("{:<4} {:>6}  {}", day, temp, entry.condition.label)
}

/// Favorites list, marking the displayed city
pub fn favorites(favorites: &[String], current: Option<&str>) -> String {
    if favorites.is_empty() {
        return "No favorites yet.\n".to_string();
    }

    let mut out = String::new();
    for city in favorites {
        let marker = if Some(city.as_str()) == current { "*" } else { " " };
        let _ = writeln!(out, "{} {}", marker, city);
    }
    out
}
