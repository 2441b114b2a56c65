//! Aggregations behind every report page
//!
//! Each submodule takes the records of a page's population (already
//! filtered by state and year) and reduces them to plain result structs.
//! Nothing here knows about rendering.

pub mod comparison;
pub mod composition;
pub mod governance;
pub mod profitability;
pub mod results;
pub mod shareholder;

/// `part` as a percentage of `whole`; undefined for an empty whole
#[must_use]
pub fn percentage(part: f64, whole: f64) -> Option<f64> {
    (whole != 0.0).then(|| part / whole * 100.0)
}

/// Percentage for counts
#[must_use]
pub fn count_percentage(part: usize, whole: usize) -> Option<f64> {
    percentage(part as f64, whole as f64)
}

/// Arithmetic mean; `None` for no values
#[must_use]
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Round to two decimal places
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
