use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp layout of the forecast feed (`dt_txt`)
pub const FORECAST_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Geographic position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Key for both the current-conditions and the forecast lookup
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates(Coordinates),
}

impl LocationQuery {
    pub fn city(name: impl Into<String>) -> Self {
        Self::City(name.into())
    }

    pub fn coordinates(latitude: f64, longitude: f64) -> Self {
        Self::Coordinates(Coordinates {
            latitude,
            longitude,
        })
    }

    /// Query-string parameters identifying the location
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::City(name) => vec![("q", name.clone())],
            Self::Coordinates(c) => vec![
                ("lat", c.latitude.to_string()),
                ("lon", c.longitude.to_string()),
            ],
        }
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::City(name) => f.write_str(name),
            Self::Coordinates(c) => c.fmt(f),
        }
    }
}

/// Weather condition as reported by the source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Condition {
    /// Short group label, e.g. "Clouds"
    pub label: String,
    /// Longer text, e.g. "broken clouds"
    pub description: String,
    /// Icon code, e.g. "04d"
    pub icon: String,
}

impl Condition {
    /// URL of the 2x icon image, `None` when the source sent no icon code
    pub fn icon_url(&self) -> Option<String> {
        if self.icon.is_empty() {
            return None;
        }
        Some(format!("{}/{}@2x.png", ICON_BASE_URL, self.icon))
    }
}

/// Current conditions for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Display name returned by the source
    pub city: String,
    pub condition: Condition,
    pub temperature: f64,
    pub temp_min: f64,
    pub temp_max: f64,
}

/// Whole degrees for display; halves go up, so -2.5 shows as -2.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

impl WeatherSnapshot {
    pub fn rounded_temperature(&self) -> i64 {
        round_half_up(self.temperature)
    }

    pub fn rounded_high(&self) -> i64 {
        round_half_up(self.temp_max)
    }

    pub fn rounded_low(&self) -> i64 {
        round_half_up(self.temp_min)
    }
}

/// One timestamped forecast sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Source timestamp, `YYYY-MM-DD HH:MM:SS` (UTC)
    pub timestamp: String,
    pub condition: Condition,
    pub temperature: Option<f64>,
}

impl ForecastEntry {
    pub fn time(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, FORECAST_TIMESTAMP_FORMAT).ok()
    }

    pub fn rounded_temperature(&self) -> Option<i64> {
        self.temperature.map(round_half_up)
    }

    /// Short weekday name ("Mon") of the sample
    pub fn weekday(&self) -> Option<String> {
        self.time().map(|t| t.format("%a").to_string())
    }
}

/// Weather source errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Location not found: {0}")]
    LocationNotFound(String),
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("Service unavailable (status {0})")]
    ServiceUnavailable(u16),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Geolocation errors
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Geolocation is not supported")]
    Unsupported,
    #[error("Location service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("Location request timed out")]
    Timeout,
}
