//! One-sigma trimming for repeated timing measurements.
//!
//! A single slow trial (a scheduling hiccup, a cold cache) would otherwise
//! drag the mean of a handful of runs. The sample is fitted once, every value
//! outside one standard deviation of that fit is dropped, and the survivors
//! are fitted again.

use super::normal::NormalFit;
use super::rounding::round5;

/// Result of trimming a sample to one standard deviation around its mean.
#[derive(Debug, Clone)]
pub struct SigmaTrim {
    /// Fit over the full sample
    pub initial: NormalFit,
    /// Exclusive lower bound (mean - std_dev)
    pub lower: f64,
    /// Exclusive upper bound (mean + std_dev)
    pub upper: f64,
    /// Samples strictly inside the bounds, in input order
    pub retained: Vec<f64>,
    /// Number of samples that fell outside the bounds
    pub excluded: usize,
}

impl SigmaTrim {
    /// Trim `samples` to the open interval `(μ - σ, μ + σ)` of their fit.
    ///
    /// # Returns
    ///
    /// * `Some(trim)` - Trim result
    /// * `None` - If samples is empty
    ///
    /// # Examples
    ///
    /// ```
    /// use speedup_eval::stats::SigmaTrim;
    ///
    /// let trim = SigmaTrim::apply(&[1.0, 4.0, 5.0, 6.0, 9.0]).unwrap();
    /// assert_eq!(trim.retained, vec![4.0, 5.0, 6.0]);
    /// assert_eq!(trim.excluded, 2);
    /// ```
    pub fn apply(samples: &[f64]) -> Option<Self> {
        let initial = NormalFit::fit(samples)?;
        let (lower, upper) = initial.one_sigma_bounds();

        let retained: Vec<f64> = samples
            .iter()
            .copied()
            .filter(|&value| value > lower && value < upper)
            .collect();
        let excluded = samples.len() - retained.len();

        Some(SigmaTrim {
            initial,
            lower,
            upper,
            retained,
            excluded,
        })
    }

    /// Mean of the refitted retained samples, rounded to five decimals.
    ///
    /// An empty retained set yields `0.0`. This is also what a single-sample
    /// or constant column produces: its standard deviation is zero, so the
    /// open interval is empty.
    pub fn mean(&self) -> f64 {
        match NormalFit::fit(&self.retained) {
            Some(fit) => round5(fit.mean),
            None => 0.0,
        }
    }
}

/// Robust mean of one timing column.
///
/// Returns `None` only for an empty input.
///
/// # Examples
///
/// ```
/// use speedup_eval::stats::robust_mean;
///
/// // The 9.0 trial is rejected before averaging
/// assert_eq!(robust_mean(&[1.0, 1.1, 0.9, 1.0, 9.0]), Some(1.0));
/// // A lone sample is rejected too
/// assert_eq!(robust_mean(&[5.0]), Some(0.0));
/// ```
pub fn robust_mean(samples: &[f64]) -> Option<f64> {
    SigmaTrim::apply(samples).map(|trim| trim.mean())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_robust_mean_empty() {
        assert_eq!(robust_mean(&[]), None);
    }

    #[test]
    fn test_robust_mean_single_sample_is_zero() {
        assert_eq!(robust_mean(&[5.0]), Some(0.0));
    }

    #[test]
    fn test_robust_mean_constant_sample_is_zero() {
        assert_eq!(robust_mean(&[2.5, 2.5, 2.5, 2.5]), Some(0.0));
    }

    #[test]
    fn test_robust_mean_rejects_outlier() {
        let samples = [1.0, 1.1, 0.9, 1.0, 9.0];
        let trim = SigmaTrim::apply(&samples).unwrap();

        assert!(!trim.retained.contains(&9.0));
        assert_eq!(trim.excluded, 1);
        assert_eq!(trim.mean(), 1.0);
    }

    #[test]
    fn test_bounds_are_exclusive() {
        // mean 2, population std dev 1: 1.0 and 3.0 sit exactly on the bounds
        let samples = [1.0, 1.0, 3.0, 3.0];
        let trim = SigmaTrim::apply(&samples).unwrap();

        assert_eq!(trim.lower, 1.0);
        assert_eq!(trim.upper, 3.0);
        assert!(trim.retained.is_empty());
        assert_eq!(trim.mean(), 0.0);
    }

    #[test]
    fn test_retained_preserves_order() {
        let samples = [6.0, 1.0, 5.0, 9.0, 4.0];
        let trim = SigmaTrim::apply(&samples).unwrap();
        assert_eq!(trim.retained, vec![6.0, 5.0, 4.0]);
    }

    #[test]
    fn test_result_is_rounded() {
        let samples = [0.1234561, 0.1234562, 0.1234563, 0.9];
        let mean = robust_mean(&samples).unwrap();
        assert_eq!(mean, 0.12346);
    }

    proptest! {
        /// Re-estimating on the retained subset of symmetric data keeps the centre.
        #[test]
        fn prop_stable_on_retained_subset(
            centre in 1.0f64..100.0,
            inner in 0.01f64..1.0,
            spread in 1.5f64..5.0,
        ) {
            let outer = inner * spread;
            let samples = [centre - outer, centre - inner, centre, centre + inner, centre + outer];

            let trim = SigmaTrim::apply(&samples).unwrap();
            let first = trim.mean();
            let second = robust_mean(&trim.retained).unwrap();

            prop_assert!((first - centre).abs() <= 1e-5);
            prop_assert!((first - second).abs() <= 2e-5);
        }

        /// The estimate never leaves the range of the input.
        #[test]
        fn prop_mean_within_range(samples in prop::collection::vec(0.001f64..50.0, 2..40)) {
            let mean = robust_mean(&samples).unwrap();
            let min = samples.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

            prop_assert!(mean == 0.0 || (mean >= min - 1e-5 && mean <= max + 1e-5));
        }
    }
}
