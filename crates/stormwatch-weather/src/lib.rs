//! Weather data for Stormwatch
//!
//! Current conditions and 3-hourly forecasts from OpenWeatherMap, the
//! one-sample-per-day forecast normalizer, and geolocation providers.

pub mod forecast;
pub mod location;
pub mod provider;
pub mod types;

pub use forecast::{normalize, DEFAULT_SAMPLES_PER_DAY};
pub use location::{
    request_position, FixedLocation, GeolocationOptions, IpGeolocator,
    LocationProvider, UnsupportedLocation,
};
pub use provider::{OpenWeatherClient, WeatherSource};
pub use types::*;
