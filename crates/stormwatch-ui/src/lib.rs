//! Presentation-side state for Stormwatch: the lookup flow behind the
//! weather display, the clock, and user-facing error messages.

pub mod error_mapping;
pub mod models;

pub use models::clock_model::{format_clock, spawn_clock};
pub use models::weather_model::{LocationStatus, LookupSettings, WeatherModel, WeatherView};
