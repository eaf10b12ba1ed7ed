use stormwatch_core::{AppError, LocationError};
use stormwatch_weather::LocationError as ProviderError;

pub fn location_error(e: ProviderError) -> AppError {
    match e {
        ProviderError::Unsupported => AppError::Location(LocationError::Unsupported),
        other => AppError::Location(LocationError::Unavailable(other.to_string())),
    }
}
