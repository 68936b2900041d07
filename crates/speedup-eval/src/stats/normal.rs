//! Maximum-likelihood fit of a normal distribution.

/// Location and scale of a normal distribution fitted to a sample.
///
/// The maximum-likelihood estimates are the sample mean and the
/// *population* standard deviation (divisor `n`, not `n - 1`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalFit {
    pub mean: f64,
    pub std_dev: f64,
}

impl NormalFit {
    /// Fit a normal distribution to `samples`.
    ///
    /// # Returns
    ///
    /// * `Some(fit)` - The fitted parameters
    /// * `None` - If samples is empty
    ///
    /// # Examples
    ///
    /// ```
    /// use speedup_eval::stats::NormalFit;
    ///
    /// let fit = NormalFit::fit(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
    /// assert_eq!(fit.mean, 5.0);
    /// assert_eq!(fit.std_dev, 2.0);
    /// ```
    pub fn fit(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let count = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / count;
        let variance = samples.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / count;

        Some(NormalFit {
            mean,
            std_dev: variance.sqrt(),
        })
    }

    /// Open interval `(mean - std_dev, mean + std_dev)`.
    pub fn one_sigma_bounds(&self) -> (f64, f64) {
        (self.mean - self.std_dev, self.mean + self.std_dev)
    }
}
