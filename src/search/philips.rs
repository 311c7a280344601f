//! Indifference-point (Philips) plan search.
//!
//! The requirement fixes the indifference point `p₀.₅`, where the OC curve
//! crosses 50% acceptance, and a minimum relative steepness `h₀` of the curve
//! there. Under the Poisson model the steepness of plan `(n, c)` at rate `p` is
//!
//! ```text
//! h(n, c, p) = 2·(n·p)^(c+1) / c! · e^(-n·p)
//! ```
//!
//! # Algorithm
//!
//! For `c = 0, 1, 2, ...`:
//!
//! 1. `n` is derived from the median `x` of χ²(2(c+1)) on a grid of step
//!    `1/500`: the smallest grid value with `F(x) >= 0.5`, then
//!    `n = ceil(x / (2·p₀.₅))`.
//! 2. Stop when `h(n, c, p₀.₅) >= h₀`.
//!
//! The search gives up once a derived `n` would exceed
//! [`MAX_SAMPLE_SIZE`].
//!
//! # Reference
//!
//! Hamaker, H.C. (1950). "The theory of sampling inspection plans",
//! *Philips Technical Review* 11(9), pp. 260-270.

use log::{debug, trace};

use super::{PlanSearch, SearchStatus, StepMode, PHILIPS_GRID_STEPS};
use crate::combinatorics::factorial;
use crate::error::SamplingError;
use crate::plan::{SamplingPlan, MAX_SAMPLE_SIZE};
use crate::special::{ChiSquaredCdf, GammaChiSquared};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Indifference point `p₀.₅` and steepness target `h₀`.
///
/// # Examples
///
/// ```
/// use u_acceptance::search::IndifferenceConstraint;
///
/// let c = IndifferenceConstraint::new(0.10, 2.0).unwrap();
/// assert_eq!(c.rate(), 0.10);
///
/// assert!(IndifferenceConstraint::new(0.0, 2.0).is_err());
/// assert!(IndifferenceConstraint::new(0.10, -1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndifferenceConstraint {
    rate: f64,
    steepness: f64,
}

impl IndifferenceConstraint {
    /// Creates the requirement.
    ///
    /// # Errors
    ///
    /// - [`SamplingError::InvalidRate`] unless `0 < rate <= 1`
    /// - [`SamplingError::InvalidSteepness`] unless `steepness` is positive and finite
    pub fn new(rate: f64, steepness: f64) -> Result<Self, SamplingError> {
        if !(rate > 0.0 && rate <= 1.0) {
            return Err(SamplingError::InvalidRate {
                name: "indifference",
                value: rate,
            });
        }
        if !(steepness.is_finite() && steepness > 0.0) {
            return Err(SamplingError::InvalidSteepness { value: steepness });
        }
        Ok(Self { rate, steepness })
    }

    /// Indifference rate `p₀.₅`.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Steepness target `h₀`.
    pub fn steepness(&self) -> f64 {
        self.steepness
    }

    /// Slope of the tangent the requirement prescribes at `(p₀.₅, 0.5)`.
    pub fn target_slope(&self) -> f64 {
        target_slope(self.rate, self.steepness)
    }
}

impl Default for IndifferenceConstraint {
    fn default() -> Self {
        Self {
            rate: 0.15,
            steepness: 1.5,
        }
    }
}

/// Relative steepness `h = 2·(n·p)^(c+1) / c! · e^(-n·p)` of plan `(n, c)` at rate `p`.
///
/// # Examples
///
/// ```
/// use u_acceptance::search::steepness;
///
/// // n·p = 1, c = 0: h = 2/e
/// let h = steepness(10, 0, 0.1);
/// assert!((h - 2.0 / std::f64::consts::E).abs() < 1e-12);
/// ```
pub fn steepness(n: u32, c: u32, p: f64) -> f64 {
    let np = f64::from(n) * p;
    2.0 * np.powi(c as i32 + 1) / factorial(c) * (-np).exp()
}

/// Slope `-h₀ · 0.5 / p₀.₅` of the OC tangent at the indifference point.
pub fn target_slope(p: f64, h0: f64) -> f64 {
    -h0 * 0.5 / p
}

/// Sample size the Philips method pairs with acceptance number `c` at
/// indifference rate `p`.
///
/// Scans `x = i / 500` for the first value with `F(x; 2(c+1)) >= 0.5` and
/// returns `ceil(x / (2p))`. The scan starts at the provider's
/// [`median_lower_bound`](ChiSquaredCdf::median_lower_bound).
///
/// # Errors
///
/// - [`SamplingError::NotConverged`] if the scan passes the `x` that would
///   give `n > MAX_SAMPLE_SIZE`
/// - any error of the CDF provider
///
/// # Examples
///
/// ```
/// use u_acceptance::search::required_sample_size;
/// use u_acceptance::special::GammaChiSquared;
///
/// // median of χ²(2) is 2·ln 2 ≈ 1.386 -> 1.388 on the grid, / 0.3 -> 4.63
/// assert_eq!(required_sample_size(0, 0.15, &GammaChiSquared).unwrap(), 5);
/// ```
pub fn required_sample_size<P>(c: u32, p: f64, provider: &P) -> Result<u32, SamplingError>
where
    P: ChiSquaredCdf + ?Sized,
{
    let dof = 2.0 * (f64::from(c) + 1.0);
    let steps = f64::from(PHILIPS_GRID_STEPS);
    let x_limit = 2.0 * p * f64::from(MAX_SAMPLE_SIZE);

    let mut i = (provider.median_lower_bound(dof) * steps).floor() as u64;
    loop {
        i += 1;
        let x = i as f64 / steps;
        if x > x_limit {
            debug!("philips: chi-squared scan for c={c} passed x={x_limit}");
            return Err(SamplingError::NotConverged {
                n: MAX_SAMPLE_SIZE + 1,
                c,
            });
        }
        let cdf = provider.cdf(x, dof)?;
        if cdf >= 0.5 {
            trace!("philips: cdf({x}; {dof}) = {cdf}");
            return Ok((x / 2.0 / p).ceil() as u32);
        }
    }
}

/// Steepness of a plan compared with the target.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhilipsVerdict {
    /// Steepness of the plan at `p₀.₅`.
    pub actual: f64,
    /// Required steepness `h₀`.
    pub target: f64,
}

impl PhilipsVerdict {
    /// Whether the plan is at least as steep as required.
    pub fn is_compliant(&self) -> bool {
        self.actual >= self.target
    }
}

/// Indifference-point plan search configuration.
///
/// # Examples
///
/// ```
/// use u_acceptance::search::{IndifferenceConstraint, PhilipsSearch, StepMode};
///
/// let search = PhilipsSearch::new(IndifferenceConstraint::default());
/// let plan = search.search(StepMode::Direct).unwrap();
/// assert_eq!((plan.n(), plan.c()), (25, 3));
/// assert!(search.verdict(plan).is_compliant());
/// ```
#[derive(Debug, Clone)]
pub struct PhilipsSearch<P = GammaChiSquared> {
    constraint: IndifferenceConstraint,
    provider: P,
}

impl PhilipsSearch<GammaChiSquared> {
    /// Creates a search using the `statrs`-backed chi-squared CDF.
    pub fn new(constraint: IndifferenceConstraint) -> Self {
        Self::with_provider(constraint, GammaChiSquared)
    }
}

impl<P: ChiSquaredCdf> PhilipsSearch<P> {
    /// Creates a search with an injected chi-squared CDF.
    pub fn with_provider(constraint: IndifferenceConstraint, provider: P) -> Self {
        Self {
            constraint,
            provider,
        }
    }

    /// The requirement being searched for.
    pub fn constraint(&self) -> IndifferenceConstraint {
        self.constraint
    }

    /// Steepness of an arbitrary plan at the indifference rate.
    pub fn is_plan_ok(&self, plan: SamplingPlan) -> f64 {
        steepness(plan.n(), plan.c(), self.constraint.rate)
    }

    /// Steepness of an arbitrary plan together with the target.
    pub fn verdict(&self, plan: SamplingPlan) -> PhilipsVerdict {
        PhilipsVerdict {
            actual: self.is_plan_ok(plan),
            target: self.constraint.steepness,
        }
    }

    /// Sample size paired with acceptance number `c`.
    pub fn sample_size_for(&self, c: u32) -> Result<u32, SamplingError> {
        required_sample_size(c, self.constraint.rate, &self.provider)
    }

    fn candidate(&self, c: u32) -> Result<(SamplingPlan, f64), SamplingError> {
        let n = self.sample_size_for(c)?;
        if n > MAX_SAMPLE_SIZE || c > n {
            return Err(SamplingError::NotConverged { n, c });
        }
        let h = steepness(n, c, self.constraint.rate);
        debug!("philips: c={c} n={n} h={h}");
        Ok((SamplingPlan::from_search(n, c), h))
    }

    /// Finds the plan; both modes return the same result.
    ///
    /// # Errors
    ///
    /// [`SamplingError::NotConverged`] when the required `n` exceeds
    /// `MAX_SAMPLE_SIZE`, or an error of the CDF provider.
    pub fn search(&self, mode: StepMode) -> Result<SamplingPlan, SamplingError> {
        match mode {
            StepMode::Direct => self.search_direct(),
            StepMode::Incremental => self.stepper().run(),
        }
    }

    fn search_direct(&self) -> Result<SamplingPlan, SamplingError> {
        let target = self.constraint.steepness;
        let mut c = 0;
        let (mut plan, mut h) = self.candidate(c)?;
        while h < target {
            c += 1;
            (plan, h) = self.candidate(c)?;
        }
        Ok(plan)
    }

    /// Starts an incremental search at `c = 0`.
    pub fn stepper(&self) -> PhilipsState<'_, P> {
        PhilipsState {
            search: self,
            c: 0,
            steps: 0,
            finished: None,
        }
    }
}

/// Cursor of an incremental indifference-point search; one `c` per step.
#[derive(Debug)]
pub struct PhilipsState<'a, P = GammaChiSquared> {
    search: &'a PhilipsSearch<P>,
    c: u32,
    steps: usize,
    finished: Option<SearchStatus>,
}

impl<P> PhilipsState<'_, P> {
    /// Acceptance number examined by the next step.
    pub fn c(&self) -> u32 {
        self.c
    }
}

impl<P: ChiSquaredCdf> PlanSearch for PhilipsState<'_, P> {
    fn step(&mut self) -> SearchStatus {
        if let Some(status) = &self.finished {
            return status.clone();
        }

        self.steps += 1;
        let status = match self.search.candidate(self.c) {
            Ok((plan, h)) if h >= self.search.constraint.steepness => SearchStatus::Found(plan),
            Ok((plan, _)) => {
                self.c += 1;
                return SearchStatus::Running(plan);
            }
            Err(e) => SearchStatus::Failed(e),
        };
        self.finished = Some(status.clone());
        status
    }

    fn current(&self) -> Option<SamplingPlan> {
        match &self.finished {
            Some(SearchStatus::Found(plan)) => Some(*plan),
            Some(_) => None,
            None => self
                .search
                .sample_size_for(self.c)
                .ok()
                .filter(|&n| n <= MAX_SAMPLE_SIZE && self.c <= n)
                .map(|n| SamplingPlan::from_search(n, self.c)),
        }
    }

    fn steps_taken(&self) -> usize {
        self.steps
    }
}
