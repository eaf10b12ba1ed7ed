//! Forecast down-sampling: one representative sample per calendar day.

use crate::types::ForecastEntry;

/// Samples per day in the 3-hour forecast feed
pub const DEFAULT_SAMPLES_PER_DAY: usize = 8;

/// Keep the first sample of each day's block.
///
/// Selects indices `0, k, 2k, ...` and preserves order, so the output length
/// is `ceil(len / k)`. A `k` of 0 is treated as 1.
pub fn normalize(series: &[ForecastEntry], samples_per_day: usize) -> Vec<ForecastEntry> {
    series
        .iter()
        .step_by(samples_per_day.max(1))
        .cloned()
        .collect()
}
