//! Sampling plan search.
//!
//! Two independent strategies find the smallest plan meeting a quality
//! requirement:
//!
//! - [`GuentherSearch`]: two-point search: acceptance at the AQL must be at
//!   least `1 - α`, acceptance at the LQ at most `β`. Bounded by
//!   [`MAX_SAMPLE_SIZE`](crate::plan::MAX_SAMPLE_SIZE).
//! - [`PhilipsSearch`]: indifference-point search: the OC curve must pass
//!   through `(p₀.₅, 0.5)` with steepness at least `h₀`.
//!
//! Both can run to completion in one call ([`StepMode::Direct`]) or be driven
//! one candidate at a time through a state machine implementing
//! [`PlanSearch`] ([`StepMode::Incremental`]), e.g. from a UI timer for an
//! animated search. Cancelling an incremental search means simply not calling
//! [`PlanSearch::step`] again.
//!
//! # Examples
//!
//! ```
//! use u_acceptance::search::{GuentherConstraints, GuentherSearch, PlanSearch, SearchStatus};
//! use u_acceptance::oc::DistributionMode;
//! use u_acceptance::plan::LotSize;
//!
//! let search = GuentherSearch::new(
//!     GuentherConstraints::default(),
//!     DistributionMode::Binomial,
//!     LotSize::default(),
//! );
//!
//! let mut state = search.stepper();
//! let mut visited = 0;
//! let plan = loop {
//!     match state.step() {
//!         SearchStatus::Running(_) => visited += 1,
//!         SearchStatus::Found(plan) => break plan,
//!         SearchStatus::Failed(e) => panic!("{e}"),
//!     }
//! };
//! assert_eq!((plan.n(), plan.c()), (38, 4));
//! assert!(visited > 0);
//! ```
//!
//! # References
//!
//! - Günther, H. (1972). "Zur Bestimmung von Stichprobenplänen",
//!   *Metrika* 18, pp. 119-133.
//! - Hamaker, H.C. (1950). "The theory of sampling inspection plans",
//!   *Philips Technical Review* 11(9), pp. 260-270.

mod guenther;
mod philips;

pub use guenther::{
    ConstraintPoint, GuentherConstraints, GuentherOutcome, GuentherSearch, GuentherState,
    GuentherVerdict,
};
pub use philips::{
    required_sample_size, steepness, target_slope, IndifferenceConstraint, PhilipsSearch,
    PhilipsState, PhilipsVerdict,
};

use crate::error::SamplingError;
use crate::plan::SamplingPlan;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rate grid resolution used when charting Günther plans.
pub const GUENTHER_GRID_STEPS: u32 = 200;

/// Rate grid resolution of Philips charts and of the chi-squared median scan.
pub const PHILIPS_GRID_STEPS: u32 = 500;

/// How a search is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StepMode {
    /// Nested loops, run to completion.
    #[default]
    Direct,
    /// The step state machine, driven to completion.
    Incremental,
}

/// Outcome of one search step.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchStatus {
    /// The candidate just examined did not qualify; more steps are needed.
    Running(SamplingPlan),
    /// The search finished with this plan.
    Found(SamplingPlan),
    /// The search gave up.
    Failed(SamplingError),
}

impl SearchStatus {
    /// Whether this status ends the search.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SearchStatus::Running(_))
    }
}

/// A plan search that advances one candidate per call.
///
/// Once a terminal status has been returned, further calls to
/// [`step`](PlanSearch::step) return the same status without doing work.
pub trait PlanSearch {
    /// Examines the next candidate.
    fn step(&mut self) -> SearchStatus;

    /// The candidate that the next call to [`step`](PlanSearch::step) examines,
    /// or the final plan once the search has finished.
    fn current(&self) -> Option<SamplingPlan>;

    /// Number of candidates examined so far.
    fn steps_taken(&self) -> usize;

    /// Steps until a terminal status and converts it into a `Result`.
    fn run(&mut self) -> Result<SamplingPlan, SamplingError> {
        loop {
            match self.step() {
                SearchStatus::Running(_) => continue,
                SearchStatus::Found(plan) => return Ok(plan),
                SearchStatus::Failed(e) => return Err(e),
            }
        }
    }
}
