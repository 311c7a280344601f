//! Acceptance probabilities under the three sampling models.
//!
//! # Formulas
//!
//! For a plan `(n, c)` and defect rate `x`:
//!
//! ```text
//! Hypergeometric:  R = round(N·x)
//!                  L(x) = Σ_{k=0}^{c} C(R, k)·C(N - R, n - k) / C(N, n)
//! Binomial:        L(x) = Σ_{k=0}^{c} C(n, k)·x^k·(1 - x)^(n - k)
//! Poisson:         λ = n·x
//!                  L(x) = Σ_{k=0}^{c} λ^k / k! · e^(-λ)
//! ```
//!
//! Every term is evaluated in log space and exponentiated on its own, so
//! neither `C(N, n)` for lots of a few thousand items nor `(1 - x)^n` for
//! large samples overflows or underflows before the division. Each point
//! costs O(c). The sums are not clamped; rounding can push a result
//! marginally outside `[0, 1]`.

use statrs::function::factorial::{ln_binomial, ln_factorial};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Probability model used to evaluate an OC curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DistributionMode {
    /// Sampling without replacement from a lot of known size `N`.
    Hypergeometric,
    /// Sampling from an infinite lot (or with replacement).
    #[default]
    Binomial,
    /// Poisson approximation of the binomial model for small defect rates.
    Poisson,
}

impl DistributionMode {
    /// All modes in display order.
    pub const ALL: [DistributionMode; 3] = [
        DistributionMode::Hypergeometric,
        DistributionMode::Binomial,
        DistributionMode::Poisson,
    ];

    /// Whether the model depends on the lot size `N`.
    pub fn uses_lot_size(&self) -> bool {
        matches!(self, DistributionMode::Hypergeometric)
    }
}

impl std::fmt::Display for DistributionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DistributionMode::Hypergeometric => "hypergeometric",
            DistributionMode::Binomial => "binomial",
            DistributionMode::Poisson => "Poisson",
        };
        f.write_str(name)
    }
}

/// Probability of accepting a lot with defect rate `x`, i.e. `P(X <= c)`.
///
/// `lot_size` is only read in hypergeometric mode, where it must be at least
/// `n`. No further validation is performed; see [`crate::oc::OcCurve::compute`]
/// for the checked entry point.
///
/// # Examples
///
/// ```
/// use u_acceptance::oc::{acceptance_probability, DistributionMode};
///
/// // c = 0: accept only a clean sample, L(x) = (1 - x)^n
/// let p = acceptance_probability(DistributionMode::Binomial, 10, 0, 0, 0.1);
/// assert!((p - 0.9_f64.powi(10)).abs() < 1e-12);
/// ```
pub fn acceptance_probability(mode: DistributionMode, n: u32, c: u32, lot_size: u32, x: f64) -> f64 {
    // at most n defects can be observed, so c > n behaves like c = n
    let c = c.min(n);
    if x <= 0.0 {
        return 1.0;
    }
    match mode {
        DistributionMode::Hypergeometric => {
            let lot = u64::from(lot_size);
            let defectives = (lot as f64 * x).round().min(lot as f64) as u64;
            let sample = u64::from(n);
            let ln_total = ln_binomial(lot, sample);
            (0..=u64::from(c).min(defectives))
                .map(|k| {
                    let ln_ways = ln_binomial(defectives, k)
                        + ln_binomial(lot - defectives, sample - k);
                    (ln_ways - ln_total).exp()
                })
                .sum()
        }
        DistributionMode::Binomial => {
            if x >= 1.0 {
                return if c == n { 1.0 } else { 0.0 };
            }
            let (ln_x, ln_rest) = (x.ln(), (-x).ln_1p());
            (0..=c)
                .map(|k| {
                    let ln_term = ln_binomial(u64::from(n), u64::from(k))
                        + f64::from(k) * ln_x
                        + f64::from(n - k) * ln_rest;
                    ln_term.exp()
                })
                .sum()
        }
        DistributionMode::Poisson => {
            let lambda = x * f64::from(n);
            if lambda == 0.0 {
                return 1.0;
            }
            let ln_lambda = lambda.ln();
            (0..=c)
                .map(|k| (f64::from(k) * ln_lambda - lambda - ln_factorial(u64::from(k))).exp())
                .sum()
        }
    }
}

/// Evaluates the OC curve at every rate in `rates`.
///
/// Returns one acceptance probability per input rate, in the same order.
///
/// # Examples
///
/// ```
/// use u_acceptance::oc::{evaluate_oc, DistributionMode};
///
/// let probs = evaluate_oc(DistributionMode::Poisson, 20, 1, 0, &[0.0, 0.05, 0.5]);
/// assert_eq!(probs.len(), 3);
/// assert!((probs[0] - 1.0).abs() < 1e-12);
/// assert!(probs[1] > probs[2]);
/// ```
///
/// # Complexity
///
/// Time: O(|rates| · c).
pub fn evaluate_oc(mode: DistributionMode, n: u32, c: u32, lot_size: u32, rates: &[f64]) -> Vec<f64> {
    rates
        .iter()
        .map(|&x| acceptance_probability(mode, n, c, lot_size, x))
        .collect()
}
