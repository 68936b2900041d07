//! Decimal rounding of reported values.
//!
//! Values are rounded on their exact decimal expansion rather than by
//! scaling with a power of ten, so `round_to(2.675, 2)` is `2.67` (the
//! binary value is just below the midpoint) and repeated rounding is stable.

/// Number of decimal places kept for every reported time and ratio
pub const DECIMAL_PLACES: usize = 5;

/// Round `value` to `places` decimal digits.
///
/// Non-finite values are returned unchanged.
///
/// # Examples
///
/// ```
/// use speedup_eval::stats::rounding::round_to;
///
/// assert_eq!(round_to(10.0 / 3.0, 5), 3.33333);
/// assert_eq!(round_to(2.675, 2), 2.67);
/// ```
pub fn round_to(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    // The float formatter produces the correctly rounded decimal expansion
    format!("{:.*}", places, value)
        .parse::<f64>()
        .unwrap_or(value)
}

/// Round to [`DECIMAL_PLACES`].
pub fn round5(value: f64) -> f64 {
    round_to(value, DECIMAL_PLACES)
}
