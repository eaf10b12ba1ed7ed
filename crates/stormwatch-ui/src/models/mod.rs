pub mod clock_model;
pub mod weather_model;
