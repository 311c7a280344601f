//! Two-point (AQL / LQ) plan search.
//!
//! # Requirement
//!
//! Given the producer's point `(p₁, 1 - α)` and the consumer's point `(p₂, β)`:
//!
//! ```text
//! L(p₁) >= 1 - α    (AQL met)
//! L(p₂) <= β        (LQ met)
//! ```
//!
//! # Algorithm
//!
//! For `c = 0, 1, 2, ...` the sample size starts at `c + 1` and grows while the
//! AQL is met but the LQ is not. Growing `n` lowers the whole OC curve, so the
//! walk stops either when the LQ becomes met (both met: done) or when the AQL
//! breaks (this `c` is infeasible: try `c + 1`). The search gives up once `n`
//! would exceed [`MAX_SAMPLE_SIZE`].

use log::debug;

use super::{PlanSearch, SearchStatus, StepMode};
use crate::error::SamplingError;
use crate::oc::{acceptance_probability, DistributionMode};
use crate::plan::{check_probability, check_rate, LotSize, SamplingPlan, MAX_SAMPLE_SIZE};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A `(rate, probability)` point the OC curve is compared against.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstraintPoint {
    rate: f64,
    probability: f64,
}

impl ConstraintPoint {
    /// Creates a point; both coordinates must lie in `[0, 1]`.
    pub fn new(rate: f64, probability: f64) -> Result<Self, SamplingError> {
        Ok(Self {
            rate: check_rate("constraint", rate)?,
            probability: check_probability("constraint", probability)?,
        })
    }

    /// Defect rate.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Acceptance probability bound at [`rate`](Self::rate).
    pub fn probability(&self) -> f64 {
        self.probability
    }
}

/// The AQL and LQ points of a two-point requirement.
///
/// # Examples
///
/// ```
/// use u_acceptance::search::{ConstraintPoint, GuentherConstraints};
///
/// let c = GuentherConstraints::new(
///     ConstraintPoint::new(0.01, 0.95).unwrap(),
///     ConstraintPoint::new(0.05, 0.10).unwrap(),
/// );
/// assert_eq!(c.aql().rate(), 0.01);
///
/// // defaults: AQL (5%, 95%), LQ (20%, 10%)
/// let d = GuentherConstraints::default();
/// assert_eq!(d.lq().probability(), 0.10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GuentherConstraints {
    aql: ConstraintPoint,
    lq: ConstraintPoint,
}

impl GuentherConstraints {
    /// Combines the producer's (AQL) and consumer's (LQ) points.
    pub fn new(aql: ConstraintPoint, lq: ConstraintPoint) -> Self {
        Self { aql, lq }
    }

    /// Acceptable quality level: `(p₁, 1 - α)`, minimum acceptance.
    pub fn aql(&self) -> ConstraintPoint {
        self.aql
    }

    /// Limiting quality: `(p₂, β)`, maximum acceptance.
    pub fn lq(&self) -> ConstraintPoint {
        self.lq
    }
}

impl Default for GuentherConstraints {
    fn default() -> Self {
        Self {
            aql: ConstraintPoint {
                rate: 0.05,
                probability: 0.95,
            },
            lq: ConstraintPoint {
                rate: 0.20,
                probability: 0.10,
            },
        }
    }
}

/// Which of the two points a plan meets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GuentherVerdict {
    /// `L(p₁) >= 1 - α`.
    pub aql_ok: bool,
    /// `L(p₂) <= β`.
    pub lq_ok: bool,
}

/// The four combinations of a [`GuentherVerdict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GuentherOutcome {
    /// Both points met.
    Satisfied,
    /// AQL met, LQ violated: the plan is too lenient.
    LqViolated,
    /// LQ met, AQL violated: the plan is too strict.
    AqlViolated,
    /// Neither point met.
    BothViolated,
}

impl GuentherVerdict {
    /// Whether both points are met.
    pub fn is_ok(&self) -> bool {
        self.aql_ok && self.lq_ok
    }

    /// Classifies the verdict.
    pub fn outcome(&self) -> GuentherOutcome {
        match (self.aql_ok, self.lq_ok) {
            (true, true) => GuentherOutcome::Satisfied,
            (true, false) => GuentherOutcome::LqViolated,
            (false, true) => GuentherOutcome::AqlViolated,
            (false, false) => GuentherOutcome::BothViolated,
        }
    }
}

/// Two-point plan search configuration.
///
/// In hypergeometric mode every candidate is evaluated against a lot of
/// `max(N, n)` items.
///
/// # Examples
///
/// ```
/// use u_acceptance::search::{GuentherConstraints, GuentherSearch, StepMode};
/// use u_acceptance::oc::DistributionMode;
/// use u_acceptance::plan::LotSize;
///
/// let search = GuentherSearch::new(
///     GuentherConstraints::default(),
///     DistributionMode::Binomial,
///     LotSize::default(),
/// );
/// let plan = search.search(StepMode::Direct).unwrap();
/// assert_eq!((plan.n(), plan.c()), (38, 4));
/// assert!(search.is_plan_ok(plan).is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GuentherSearch {
    constraints: GuentherConstraints,
    mode: DistributionMode,
    lot_size: LotSize,
}

impl GuentherSearch {
    /// Creates a search for `constraints` under the given model.
    pub fn new(constraints: GuentherConstraints, mode: DistributionMode, lot_size: LotSize) -> Self {
        Self {
            constraints,
            mode,
            lot_size,
        }
    }

    /// The requirement being searched for.
    pub fn constraints(&self) -> GuentherConstraints {
        self.constraints
    }

    /// Probability model.
    pub fn mode(&self) -> DistributionMode {
        self.mode
    }

    /// Checks an arbitrary plan against both points.
    ///
    /// Like the search itself, this evaluates against a lot of `max(N, n)`
    /// items, so a plan larger than the configured lot is not rejected. Use
    /// [`check_plan`](Self::check_plan) to refuse such plans instead.
    pub fn is_plan_ok(&self, plan: SamplingPlan) -> GuentherVerdict {
        self.verdict(plan.n(), plan.c())
    }

    /// Checks a hand-entered plan against both points.
    ///
    /// # Errors
    ///
    /// [`SamplingError::LotSmallerThanSample`] if the model is hypergeometric
    /// and `n` exceeds the configured lot size.
    pub fn check_plan(&self, plan: SamplingPlan) -> Result<GuentherVerdict, SamplingError> {
        if self.mode.uses_lot_size() {
            self.lot_size.check_plan(&plan)?;
        }
        Ok(self.is_plan_ok(plan))
    }

    fn verdict(&self, n: u32, c: u32) -> GuentherVerdict {
        let lot = self.lot_size.at_least(n).get();
        let aql = self.constraints.aql;
        let lq = self.constraints.lq;
        GuentherVerdict {
            aql_ok: acceptance_probability(self.mode, n, c, lot, aql.rate) >= aql.probability,
            lq_ok: acceptance_probability(self.mode, n, c, lot, lq.rate) <= lq.probability,
        }
    }

    /// Finds the plan; both modes return the same result.
    ///
    /// # Errors
    ///
    /// [`SamplingError::NotConverged`] if no plan with `n <= MAX_SAMPLE_SIZE`
    /// meets both points.
    pub fn search(&self, mode: StepMode) -> Result<SamplingPlan, SamplingError> {
        match mode {
            StepMode::Direct => self.search_direct(),
            StepMode::Incremental => self.stepper().run(),
        }
    }

    fn search_direct(&self) -> Result<SamplingPlan, SamplingError> {
        let mut c = 0;
        loop {
            let mut n = c;
            let verdict = loop {
                n += 1;
                if n > MAX_SAMPLE_SIZE {
                    debug!("guenther: giving up at n={n}, c={c}");
                    return Err(SamplingError::NotConverged { n, c });
                }
                let v = self.verdict(n, c);
                if !(v.aql_ok && !v.lq_ok) {
                    break v;
                }
            };
            if verdict.aql_ok {
                debug!("guenther: found n={n}, c={c}");
                return Ok(SamplingPlan::from_search(n, c));
            }
            debug!("guenther: AQL violated at n={n}, c={c}; raising c");
            c += 1;
        }
    }

    /// Starts an incremental search at `(n, c) = (1, 0)`.
    pub fn stepper(&self) -> GuentherState<'_> {
        GuentherState {
            search: self,
            n: 1,
            c: 0,
            steps: 0,
            finished: None,
        }
    }
}

/// Cursor of an incremental two-point search.
///
/// Each [`step`](PlanSearch::step) evaluates the current `(n, c)` and either
/// raises `n`, finishes, or moves to `(c + 2, c + 1)`.
#[derive(Debug, Clone)]
pub struct GuentherState<'a> {
    search: &'a GuentherSearch,
    n: u32,
    c: u32,
    steps: usize,
    finished: Option<SearchStatus>,
}

impl GuentherState<'_> {
    /// Sample size cursor.
    pub fn n(&self) -> u32 {
        self.n
    }

    /// Acceptance number cursor.
    pub fn c(&self) -> u32 {
        self.c
    }
}

impl PlanSearch for GuentherState<'_> {
    fn step(&mut self) -> SearchStatus {
        if let Some(status) = &self.finished {
            return status.clone();
        }

        let (n, c) = (self.n, self.c);
        if n > MAX_SAMPLE_SIZE {
            debug!("guenther: giving up at n={n}, c={c}");
            let status = SearchStatus::Failed(SamplingError::NotConverged { n, c });
            self.finished = Some(status.clone());
            return status;
        }

        self.steps += 1;
        let plan = SamplingPlan::from_search(n, c);
        let verdict = self.search.verdict(n, c);
        debug!("guenther step {}: {plan} -> {:?}", self.steps, verdict.outcome());

        match verdict.outcome() {
            GuentherOutcome::Satisfied => {
                let status = SearchStatus::Found(plan);
                self.finished = Some(status.clone());
                status
            }
            GuentherOutcome::LqViolated => {
                self.n += 1;
                SearchStatus::Running(plan)
            }
            GuentherOutcome::AqlViolated | GuentherOutcome::BothViolated => {
                self.c += 1;
                self.n = self.c + 1;
                SearchStatus::Running(plan)
            }
        }
    }

    fn current(&self) -> Option<SamplingPlan> {
        match &self.finished {
            Some(SearchStatus::Found(plan)) => Some(*plan),
            Some(_) => None,
            None if self.n <= MAX_SAMPLE_SIZE => Some(SamplingPlan::from_search(self.n, self.c)),
            None => None,
        }
    }

    fn steps_taken(&self) -> usize {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binomial_default() -> GuentherSearch {
        GuentherSearch::new(
            GuentherConstraints::default(),
            DistributionMode::Binomial,
            LotSize::default(),
        )
    }

    fn constraints(p1: f64, a: f64, p2: f64, b: f64) -> GuentherConstraints {
        GuentherConstraints::new(
            ConstraintPoint::new(p1, a).expect("valid AQL"),
            ConstraintPoint::new(p2, b).expect("valid LQ"),
        )
    }

    #[test]
    fn constraint_point_validation() {
        assert!(ConstraintPoint::new(0.05, 0.95).is_ok());
        assert!(matches!(
            ConstraintPoint::new(1.5, 0.95),
            Err(SamplingError::InvalidRate { .. })
        ));
        assert!(matches!(
            ConstraintPoint::new(0.05, -0.1),
            Err(SamplingError::InvalidProbability { .. })
        ));
    }

    #[test]
    fn verdict_outcomes() {
        let v = |aql_ok, lq_ok| GuentherVerdict { aql_ok, lq_ok };
        assert_eq!(v(true, true).outcome(), GuentherOutcome::Satisfied);
        assert_eq!(v(true, false).outcome(), GuentherOutcome::LqViolated);
        assert_eq!(v(false, true).outcome(), GuentherOutcome::AqlViolated);
        assert_eq!(v(false, false).outcome(), GuentherOutcome::BothViolated);
        assert!(v(true, true).is_ok());
        assert!(!v(true, false).is_ok());
    }

    #[test]
    fn is_plan_ok_for_manual_plans() {
        let search = binomial_default();
        let lenient = SamplingPlan::new(5, 1).expect("valid plan");
        assert_eq!(search.is_plan_ok(lenient).outcome(), GuentherOutcome::LqViolated);

        let strict = SamplingPlan::new(100, 0).expect("valid plan");
        assert_eq!(search.is_plan_ok(strict).outcome(), GuentherOutcome::AqlViolated);
    }

    #[test]
    fn binomial_default_plan() {
        let plan = binomial_default().search(StepMode::Direct).expect("feasible");
        assert_eq!((plan.n(), plan.c()), (38, 4));
    }

    #[test]
    fn found_plan_is_minimal() {
        let search = binomial_default();
        let plan = search.search(StepMode::Direct).expect("feasible");
        assert!(search.is_plan_ok(plan).is_ok());

        // no smaller n works with the same c
        for n in plan.c().max(1)..plan.n() {
            let candidate = SamplingPlan::new(n, plan.c()).expect("valid plan");
            assert!(!search.is_plan_ok(candidate).is_ok(), "{candidate} also satisfies");
        }
        // no smaller c works with any n up to the bound
        for c in 0..plan.c() {
            for n in (c + 1)..=MAX_SAMPLE_SIZE.min(400) {
                let candidate = SamplingPlan::new(n, c).expect("valid plan");
                assert!(!search.is_plan_ok(candidate).is_ok(), "{candidate} also satisfies");
            }
        }
    }

    #[test]
    fn hypergeometric_and_poisson_plans() {
        let hg = GuentherSearch::new(
            GuentherConstraints::default(),
            DistributionMode::Hypergeometric,
            LotSize::new(1000).expect("valid lot"),
        );
        let plan = hg.search(StepMode::Direct).expect("feasible");
        assert_eq!((plan.n(), plan.c()), (38, 4));

        let poisson = GuentherSearch::new(
            GuentherConstraints::default(),
            DistributionMode::Poisson,
            LotSize::default(),
        );
        let plan = poisson.search(StepMode::Direct).expect("feasible");
        assert_eq!((plan.n(), plan.c()), (47, 5));
    }

    #[test]
    fn tighter_constraints_need_larger_samples() {
        let search = GuentherSearch::new(
            constraints(0.01, 0.95, 0.05, 0.10),
            DistributionMode::Binomial,
            LotSize::default(),
        );
        let plan = search.search(StepMode::Direct).expect("feasible");
        assert_eq!((plan.n(), plan.c()), (132, 3));
    }

    #[test]
    fn small_lot_is_raised_to_sample_size() {
        // N=10 is smaller than the plans the search visits; evaluation uses max(N, n)
        let search = GuentherSearch::new(
            GuentherConstraints::default(),
            DistributionMode::Hypergeometric,
            LotSize::new(10).expect("valid lot"),
        );
        let direct = search.search(StepMode::Direct);
        let incremental = search.search(StepMode::Incremental);
        assert_eq!(direct, incremental);
        let plan = direct.expect("whole-lot inspection is always decisive");
        assert!(search.is_plan_ok(plan).is_ok());
    }

    #[test]
    fn unreachable_lq_does_not_converge() {
        // LQ demands zero acceptance at 20%, which no n <= 2000 achieves
        let search = GuentherSearch::new(
            constraints(0.05, 0.0, 0.20, 0.0),
            DistributionMode::Binomial,
            LotSize::default(),
        );
        assert_eq!(
            search.search(StepMode::Direct),
            Err(SamplingError::NotConverged { n: 2001, c: 0 })
        );
        assert_eq!(
            search.search(StepMode::Incremental),
            Err(SamplingError::NotConverged { n: 2001, c: 0 })
        );
    }

    #[test]
    fn check_plan_rejects_plans_larger_than_the_lot() {
        let search = GuentherSearch::new(
            GuentherConstraints::default(),
            DistributionMode::Hypergeometric,
            LotSize::new(30).expect("valid lot"),
        );
        let too_big = SamplingPlan::new(38, 4).expect("valid plan");
        assert_eq!(
            search.check_plan(too_big),
            Err(SamplingError::LotSmallerThanSample { lot_size: 30, n: 38 })
        );
        let fits = SamplingPlan::new(20, 2).expect("valid plan");
        assert_eq!(search.check_plan(fits), Ok(search.is_plan_ok(fits)));

        // only the hypergeometric model reads the lot size
        let binomial = GuentherSearch::new(
            GuentherConstraints::default(),
            DistributionMode::Binomial,
            LotSize::new(30).expect("valid lot"),
        );
        assert!(binomial.check_plan(too_big).expect("lot not used").is_ok());
    }

    #[test]
    fn large_lot_hypergeometric_plan() {
        let points = constraints(0.01, 0.95, 0.02, 0.10);
        let hg = GuentherSearch::new(
            points,
            DistributionMode::Hypergeometric,
            LotSize::new(2000).expect("valid lot"),
        );
        let plan = hg.search(StepMode::Direct).expect("feasible");
        assert_eq!((plan.n(), plan.c()), (769, 11));
        assert!(hg.check_plan(plan).expect("plan fits the lot").is_ok());

        // sampling without replacement from a finite lot needs fewer items
        let binomial = GuentherSearch::new(points, DistributionMode::Binomial, LotSize::default());
        let plan = binomial.search(StepMode::Direct).expect("feasible");
        assert_eq!((plan.n(), plan.c()), (1235, 18));
    }

    #[test]
    fn nearly_coincident_points_do_not_converge() {
        // 10% vs 10.5%: separating them takes far more than 2000 items
        let search = GuentherSearch::new(
            constraints(0.10, 0.95, 0.105, 0.10),
            DistributionMode::Poisson,
            LotSize::default(),
        );
        let result = search.search(StepMode::Direct);
        assert!(
            matches!(result, Err(SamplingError::NotConverged { n: 2001, c }) if c > 100),
            "{result:?}"
        );
    }

    #[test]
    fn incremental_matches_direct() {
        let cases = [
            constraints(0.05, 0.95, 0.20, 0.10),
            constraints(0.01, 0.95, 0.05, 0.10),
            constraints(0.02, 0.90, 0.15, 0.05),
            constraints(0.10, 0.80, 0.30, 0.20),
        ];
        for mode in DistributionMode::ALL {
            for constraints in cases {
                let search = GuentherSearch::new(constraints, mode, LotSize::default());
                assert_eq!(
                    search.search(StepMode::Direct),
                    search.search(StepMode::Incremental),
                    "{mode}: {constraints:?}"
                );
            }
        }
    }

    #[test]
    fn stepper_walks_n_then_c() {
        let search = binomial_default();
        let mut state = search.stepper();
        assert_eq!(state.current(), SamplingPlan::new(1, 0).ok());

        // (1, 0) meets the AQL but not the LQ: n grows
        assert_eq!(
            state.step(),
            SearchStatus::Running(SamplingPlan::new(1, 0).expect("valid plan"))
        );
        assert_eq!((state.n(), state.c()), (2, 0));

        // (2, 0): 0.95² < 0.95 breaks the AQL: move to c = 1, n = 2
        state.step();
        assert_eq!((state.n(), state.c()), (2, 1));
        assert_eq!(state.steps_taken(), 2);
    }

    #[test]
    fn stepper_is_idempotent_after_finishing() {
        let search = binomial_default();
        let mut state = search.stepper();
        let plan = state.run().expect("feasible");
        let steps = state.steps_taken();

        assert_eq!(state.step(), SearchStatus::Found(plan));
        assert_eq!(state.steps_taken(), steps);
        assert_eq!(state.current(), Some(plan));
    }

    #[test]
    fn stepper_reports_failure_once_bound_is_hit() {
        let search = GuentherSearch::new(
            constraints(0.05, 0.0, 0.20, 0.0),
            DistributionMode::Binomial,
            LotSize::default(),
        );
        let mut state = search.stepper();
        let mut running = 0;
        loop {
            match state.step() {
                SearchStatus::Running(_) => running += 1,
                SearchStatus::Found(plan) => panic!("unexpected plan {plan}"),
                SearchStatus::Failed(_) => break,
            }
        }
        assert_eq!(running, MAX_SAMPLE_SIZE as usize);
        assert_eq!(state.current(), None);
        assert!(state.step().is_terminal());
    }
}
