//! Miscellaneous numeric utilities.

use thiserror::Error;

/// Errors from building a stepped range
#[derive(Error, Debug, PartialEq)]
pub enum RangeError {
    #[error("Step must be positive and finite, got {0}")]
    InvalidStep(f64),
    #[error("Range bounds must be finite and ascending, got [{0}, {1}]")]
    InvalidBounds(f64, f64),
    #[error("Range would hold {0:.0} points, more than the limit of {}", MAX_RANGE_POINTS)]
    TooManyPoints(f64),
}

/// Most points a stepped range will produce
pub const MAX_RANGE_POINTS: usize = 100_000;

/// Round to one decimal place, halves away from zero.
///
/// ```rust
/// use exposure_calc::algo::misc::round_to_tenth;
///
/// assert_eq!(round_to_tenth(187.18956), 187.2);
/// assert_eq!(round_to_tenth(-0.25), -0.3);
/// ```
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Values from `start` to `stop` inclusive in increments of `step`.
///
/// Each value is computed as `start + i * step` so errors do not accumulate.
/// `stop` is included when it lands on the grid to within a millionth of a step.
/// Ranges longer than [`MAX_RANGE_POINTS`] are rejected.
pub fn stepped_range(start: f64, stop: f64, step: f64) -> Result<Vec<f64>, RangeError> {
    if !step.is_finite() || step <= 0.0 {
        return Err(RangeError::InvalidStep(step));
    }
    if !start.is_finite() || !stop.is_finite() || stop < start {
        return Err(RangeError::InvalidBounds(start, stop));
    }

    let count = ((stop - start) / step + 1e-6).floor() + 1.0;
    if !count.is_finite() || count > MAX_RANGE_POINTS as f64 {
        return Err(RangeError::TooManyPoints(count));
    }
    let count = count as usize;
    Ok((0..count).map(|i| start + i as f64 * step).collect())
}
