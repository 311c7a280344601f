//! Operating characteristic (OC) curves.
//!
//! The OC curve `L(p)` of a single sampling plan `(n, c)` is the probability
//! of accepting a lot whose true defect rate is `p`, i.e. `P(X <= c)` where `X`
//! counts the defectives in a sample of `n`.
//!
//! # Models
//!
//! - [`DistributionMode::Hypergeometric`] — finite lot of size `N`, sampling
//!   without replacement (exact)
//! - [`DistributionMode::Binomial`] — infinite lot / sampling with replacement
//! - [`DistributionMode::Poisson`] — rare-defect approximation with `λ = n·p`
//!
//! # Derived curves
//!
//! - [`OcCurve::aoq`] — Average Outgoing Quality `AOQ(p) = p · L(p)`
//! - [`OcCurve::aoql`] — AOQ limit, the maximum of the AOQ over the rate grid
//! - [`OcCurve::average_total_inspection`] — `ATI(p) = n·L(p) + N·(1 - L(p))`
//! - [`OcCurve::operating_indifference_point`] — first grid rate with `L(p) <= 0.5`
//!
//! # References
//!
//! - Montgomery, D.C. (2019). *Introduction to Statistical Quality Control*, 8th ed.,
//!   Section 15.2: Single-Sampling Plans for Attributes.
//! - Schilling, E.G. & Neubauer, D.V. (2017). *Acceptance Sampling in Quality
//!   Control*, 3rd ed.

mod curve;
mod evaluate;

pub use curve::{rate_grid, OcCurve};
pub use evaluate::{acceptance_probability, evaluate_oc, DistributionMode};
