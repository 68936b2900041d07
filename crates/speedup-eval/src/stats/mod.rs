//! Statistical reduction of repeated timing trials
//!
//! This module turns a column of repeated measurements into a single robust
//! value: a normal fit, a one-sigma trim, a refit, and decimal rounding.
//!
//! # Examples
//!
//! ```
//! use speedup_eval::stats::{robust_mean, NormalFit, SigmaTrim};
//!
//! // Five trials of the same run, the last one hit by a scheduling hiccup
//! let samples = vec![0.52, 0.50, 0.51, 0.49, 1.90];
//!
//! let fit = NormalFit::fit(&samples).unwrap();
//! let trim = SigmaTrim::apply(&samples).unwrap();
//! assert_eq!(trim.excluded, 1);
//! assert!(trim.mean() < fit.mean);
//!
//! assert_eq!(robust_mean(&samples), Some(trim.mean()));
//! ```

pub mod normal;
pub mod rounding;
pub mod trim;

// Re-export main types and functions
pub use normal::NormalFit;
pub use rounding::{round5, round_to, DECIMAL_PLACES};
pub use trim::{robust_mean, SigmaTrim};
