//! Single sampling plans and lot sizes.
//!
//! A single sampling plan `(n, c)` draws `n` items from a lot and accepts the
//! lot if at most `c` of them are defective. Both searches produce plans, and
//! hosts may also enter plans by hand; in either case [`SamplingPlan::new`]
//! enforces the numeric domain `1 <= n <= MAX_SAMPLE_SIZE`, `c <= n`.
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.,
//!   Chapter 15: Lot-by-Lot Acceptance Sampling for Attributes.

use crate::error::SamplingError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest sample size a plan may have; searches give up beyond it.
pub const MAX_SAMPLE_SIZE: u32 = 2000;

/// Lot size used when the host does not supply one.
pub const DEFAULT_LOT_SIZE: u32 = 1000;

/// A single sampling plan: inspect `n` items, accept with at most `c` defects.
///
/// # Invariants
///
/// - `1 <= n <= MAX_SAMPLE_SIZE`
/// - `c <= n`
///
/// # Examples
///
/// ```
/// use u_acceptance::plan::SamplingPlan;
///
/// let plan = SamplingPlan::new(50, 2).unwrap();
/// assert_eq!((plan.n(), plan.c()), (50, 2));
///
/// assert!(SamplingPlan::new(5, 6).is_err());
/// assert!(SamplingPlan::new(0, 0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SamplingPlan {
    n: u32,
    c: u32,
}

impl SamplingPlan {
    /// Creates a plan after checking `1 <= n <= MAX_SAMPLE_SIZE` and `c <= n`.
    pub fn new(n: u32, c: u32) -> Result<Self, SamplingError> {
        if n == 0 || n > MAX_SAMPLE_SIZE {
            return Err(SamplingError::InvalidSampleSize { n });
        }
        if c > n {
            return Err(SamplingError::AcceptanceNumberExceedsSampleSize { n, c });
        }
        Ok(Self { n, c })
    }

    /// Builds a plan from search cursors that are known to be in range.
    pub(crate) fn from_search(n: u32, c: u32) -> Self {
        debug_assert!(n >= 1 && n <= MAX_SAMPLE_SIZE && c <= n);
        Self { n, c }
    }

    /// Sample size.
    pub fn n(&self) -> u32 {
        self.n
    }

    /// Acceptance number (maximum tolerated defects in the sample).
    pub fn c(&self) -> u32 {
        self.c
    }
}

impl std::fmt::Display for SamplingPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(n={}, c={})", self.n, self.c)
    }
}

/// Size `N` of the lot a sample is drawn from.
///
/// Only the hypergeometric model uses it; the binomial and Poisson models
/// assume an infinite lot and ignore the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LotSize(u32);

impl LotSize {
    /// Creates a lot size; `N` must be positive.
    pub fn new(size: u32) -> Result<Self, SamplingError> {
        if size == 0 {
            return Err(SamplingError::EmptyLot);
        }
        Ok(Self(size))
    }

    /// The number of items in the lot.
    pub fn get(&self) -> u32 {
        self.0
    }

    /// Checks `N >= n` for the given plan.
    pub fn check_plan(&self, plan: &SamplingPlan) -> Result<(), SamplingError> {
        if self.0 < plan.n {
            return Err(SamplingError::LotSmallerThanSample {
                lot_size: self.0,
                n: plan.n,
            });
        }
        Ok(())
    }

    /// The lot size raised to at least `n`.
    ///
    /// A sample can never be larger than its lot, so searches that walk `n`
    /// upwards evaluate against `max(N, n)`.
    pub fn at_least(&self, n: u32) -> Self {
        Self(self.0.max(n))
    }
}

impl Default for LotSize {
    fn default() -> Self {
        Self(DEFAULT_LOT_SIZE)
    }
}

/// Checks that `value` is a defect rate in `[0, 1]`.
pub(crate) fn check_rate(name: &'static str, value: f64) -> Result<f64, SamplingError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(SamplingError::InvalidRate { name, value })
    }
}

/// Checks that `value` is a probability in `[0, 1]`.
pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<f64, SamplingError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(SamplingError::InvalidProbability { name, value })
    }
}
