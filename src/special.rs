//! Chi-squared CDF provider used by the Philips search.
//!
//! The Philips search converts an acceptance number `c` into a sample size
//! through the median of the chi-squared distribution with `2(c+1)` degrees of
//! freedom. The CDF is supplied through the [`ChiSquaredCdf`] trait so hosts
//! can inject their own special-function implementation; [`GammaChiSquared`]
//! is the default, backed by `statrs`.
//!
//! # Formula
//!
//! ```text
//! F(x; k) = P(k/2, x/2)
//! ```
//!
//! where `P(a, x)` is the regularized lower incomplete gamma function.
//!
//! # References
//!
//! - Abramowitz, M. & Stegun, I.A. (1964). *Handbook of Mathematical Functions*,
//!   26.4.19 (chi-square probability function).

use crate::error::SamplingError;
use statrs::function::gamma::checked_gamma_lr;

/// Cumulative distribution function of the chi-squared distribution.
///
/// Any `Fn(f64, f64) -> f64` closure taking `(x, degrees_of_freedom)` also
/// implements this trait.
pub trait ChiSquaredCdf {
    /// Returns `P(X <= x)` for `X ~ χ²(degrees_of_freedom)`.
    fn cdf(&self, x: f64, degrees_of_freedom: f64) -> Result<f64, SamplingError>;

    /// A point known to lie below the median, where a median scan may start.
    ///
    /// Defaults to 0, which is correct for any CDF.
    fn median_lower_bound(&self, _degrees_of_freedom: f64) -> f64 {
        0.0
    }
}

/// Default provider: regularized lower incomplete gamma from `statrs`.
///
/// # Examples
///
/// ```
/// use u_acceptance::special::{ChiSquaredCdf, GammaChiSquared};
///
/// // χ²(2) is exponential with mean 2: F(x) = 1 - e^(-x/2)
/// let f = GammaChiSquared.cdf(2.0, 2.0).unwrap();
/// assert!((f - (1.0 - (-1.0_f64).exp())).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GammaChiSquared;

impl ChiSquaredCdf for GammaChiSquared {
    fn cdf(&self, x: f64, degrees_of_freedom: f64) -> Result<f64, SamplingError> {
        if x <= 0.0 {
            return Ok(0.0);
        }
        checked_gamma_lr(degrees_of_freedom / 2.0, x / 2.0)
            .map_err(|e| SamplingError::SpecialFunction(e.to_string()))
    }

    /// `k - 1`: the median of χ²(k) lies in `(k - 2/3, k)` (Chen & Rubin, 1986).
    fn median_lower_bound(&self, degrees_of_freedom: f64) -> f64 {
        (degrees_of_freedom - 1.0).max(0.0)
    }
}

impl<F> ChiSquaredCdf for F
where
    F: Fn(f64, f64) -> f64,
{
    fn cdf(&self, x: f64, degrees_of_freedom: f64) -> Result<f64, SamplingError> {
        Ok(self(x, degrees_of_freedom))
    }
}
