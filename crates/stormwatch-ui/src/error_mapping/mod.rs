//! Maps crate-level errors to stormwatch_core::AppError for consistent
//! user-facing messages. One module per source of errors.

mod location;
mod storage;
mod weather;

pub use location::location_error;
pub use storage::storage_error;
pub use weather::{conditions_error, forecast_error};
