//! Error type shared by the plan constructors and the plan searches.
//!
//! The numeric kernels ([`crate::combinatorics`], [`crate::oc::evaluate_oc`],
//! [`crate::search::steepness`]) never fail. Errors only appear where values
//! cross the public boundary (sample sizes, rates, probabilities) and when a
//! search gives up.

/// Errors reported by boundary validation and by the plan searches.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SamplingError {
    /// Sample size outside `1..=MAX_SAMPLE_SIZE`.
    #[error("sample size n={n} is outside 1..={max}", max = crate::plan::MAX_SAMPLE_SIZE)]
    InvalidSampleSize { n: u32 },

    /// Acceptance number larger than the sample size.
    #[error("acceptance number c={c} exceeds sample size n={n}")]
    AcceptanceNumberExceedsSampleSize { n: u32, c: u32 },

    /// Hypergeometric lot smaller than the sample drawn from it.
    #[error("lot size N={lot_size} is smaller than sample size n={n}")]
    LotSmallerThanSample { lot_size: u32, n: u32 },

    /// Lot size of zero.
    #[error("lot size must be positive")]
    EmptyLot,

    /// A defect rate outside `[0, 1]` (or NaN).
    #[error("{name} rate {value} is outside [0, 1]")]
    InvalidRate { name: &'static str, value: f64 },

    /// A probability outside `[0, 1]` (or NaN).
    #[error("{name} probability {value} is outside [0, 1]")]
    InvalidProbability { name: &'static str, value: f64 },

    /// A steepness target that is not positive and finite.
    #[error("steepness target {value} must be positive and finite")]
    InvalidSteepness { value: f64 },

    /// Grid resolution of zero.
    #[error("grid needs at least one step")]
    EmptyGrid,

    /// The search ran past `MAX_SAMPLE_SIZE` without a feasible plan.
    #[error("no feasible plan with n <= {max} (gave up at n={n}, c={c})", max = crate::plan::MAX_SAMPLE_SIZE)]
    NotConverged { n: u32, c: u32 },

    /// The injected special-function provider rejected its arguments.
    #[error("special function evaluation failed: {0}")]
    SpecialFunction(String),
}
