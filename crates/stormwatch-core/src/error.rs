//! Centralized error types for Stormwatch.
//!
//! Every failure the lookup flow can hit is convertible to [`AppError`], which
//! carries a short message suitable for showing next to the weather display.
//! The full error (with source) is kept for logging.

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Location error: {0}")]
    Location(#[from] LocationError),
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Storage(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            AppError::Location(e) => e.user_message(),
        }
    }
}

/// Local persisted state errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Malformed stored value: {0}")]
    Malformed(String),
}

impl StorageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StorageError::ReadFailed(_) => "Saved data could not be read.",
            StorageError::WriteFailed(_) => "Failed to save your changes. Please try again.",
            StorageError::Malformed(_) => "Saved data was unreadable and has been ignored.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::MissingSetting(_) => "A required setting is missing. Check your settings.",
        }
    }
}

/// Weather lookup errors, split by which lookup failed.
///
/// The two lookup variants carry fixed messages: a failed current-conditions
/// lookup and a failed forecast lookup are reported differently.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("City lookup failed: {0}")]
    CityNotFound(String),

    #[error("Coordinate lookup failed: {0}")]
    LocationNotFound(String),

    #[error("Forecast lookup failed: {0}")]
    ForecastUnavailable(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::CityNotFound(_) => "City not found. Please try again.",
            WeatherError::LocationNotFound(_) => "Location not found. Please try again.",
            WeatherError::ForecastUnavailable(_) => {
                "Unable to fetch forecast data. Please try again."
            }
        }
    }
}

/// Geolocation errors.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Geolocation unsupported")]
    Unsupported,

    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

impl LocationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationError::Unsupported => "Geolocation is not supported on this system.",
            LocationError::Unavailable(_) => {
                "Location permission denied. You can search by city instead."
            }
        }
    }
}
