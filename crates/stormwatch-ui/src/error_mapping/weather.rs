use stormwatch_core::{AppError, WeatherError};
use stormwatch_weather::{LocationQuery, WeatherError as SourceError};

/// Current-conditions failure; the message depends on how the location was given.
pub fn conditions_error(query: &LocationQuery, e: SourceError) -> AppError {
    let detail = format!("{}: {}", query, e);
    match query {
        LocationQuery::City(_) => AppError::Weather(WeatherError::CityNotFound(detail)),
        LocationQuery::Coordinates(_) => {
            AppError::Weather(WeatherError::LocationNotFound(detail))
        }
    }
}

/// Forecast failure; always the same message whatever the cause.
pub fn forecast_error(query: &LocationQuery, e: SourceError) -> AppError {
    AppError::Weather(WeatherError::ForecastUnavailable(format!("{}: {}", query, e)))
}
