//! OC curves sampled on an equally spaced rate grid.

use super::evaluate::{evaluate_oc, DistributionMode};
use crate::error::SamplingError;
use crate::plan::{LotSize, SamplingPlan};

/// Returns `steps + 1` equally spaced defect rates `i / steps`, `i = 0..=steps`.
///
/// # Examples
///
/// ```
/// use u_acceptance::oc::rate_grid;
///
/// let grid = rate_grid(4);
/// assert_eq!(grid, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// ```
pub fn rate_grid(steps: u32) -> Vec<f64> {
    let s = f64::from(steps);
    (0..=steps).map(|i| f64::from(i) / s).collect()
}

/// An OC curve evaluated on a rate grid, with its derived quality curves.
///
/// The curve is computed once for a `(mode, plan, lot size)` combination and
/// is read-only afterwards; a new plan produces a new curve.
///
/// # Examples
///
/// ```
/// use u_acceptance::oc::{DistributionMode, OcCurve};
/// use u_acceptance::plan::{LotSize, SamplingPlan};
///
/// let plan = SamplingPlan::new(38, 4).unwrap();
/// let curve = OcCurve::compute(DistributionMode::Binomial, plan, LotSize::default(), 200).unwrap();
///
/// assert_eq!(curve.rates().len(), 201);
/// assert!((curve.acceptance()[0] - 1.0).abs() < 1e-12);
///
/// // AOQL is the largest p·L(p) on the grid
/// let aoql = curve.aoql();
/// assert!(aoql > 0.0 && aoql < 0.1);
/// ```
#[derive(Debug, Clone)]
pub struct OcCurve {
    mode: DistributionMode,
    plan: SamplingPlan,
    lot_size: LotSize,
    steps: u32,
    rates: Vec<f64>,
    acceptance: Vec<f64>,
}

impl OcCurve {
    /// Evaluates the OC curve of `plan` on a grid with `steps` intervals.
    ///
    /// # Errors
    ///
    /// - [`SamplingError::EmptyGrid`] if `steps == 0`
    /// - [`SamplingError::LotSmallerThanSample`] in hypergeometric mode when `N < n`
    pub fn compute(
        mode: DistributionMode,
        plan: SamplingPlan,
        lot_size: LotSize,
        steps: u32,
    ) -> Result<Self, SamplingError> {
        if steps == 0 {
            return Err(SamplingError::EmptyGrid);
        }
        if mode.uses_lot_size() {
            lot_size.check_plan(&plan)?;
        }

        let rates = rate_grid(steps);
        let acceptance = evaluate_oc(mode, plan.n(), plan.c(), lot_size.get(), &rates);

        Ok(Self {
            mode,
            plan,
            lot_size,
            steps,
            rates,
            acceptance,
        })
    }

    /// Probability model the curve was evaluated with.
    pub fn mode(&self) -> DistributionMode {
        self.mode
    }

    /// The plan this curve describes.
    pub fn plan(&self) -> SamplingPlan {
        self.plan
    }

    /// Lot size used by the hypergeometric model.
    pub fn lot_size(&self) -> LotSize {
        self.lot_size
    }

    /// Number of grid intervals.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Grid rates, `0.0..=1.0`.
    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// Acceptance probability `L(p)` at each grid rate.
    pub fn acceptance(&self) -> &[f64] {
        &self.acceptance
    }

    /// `(rate, acceptance)` pairs in grid order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.rates.iter().copied().zip(self.acceptance.iter().copied())
    }

    /// Acceptance probability at an arbitrary rate, evaluated exactly rather
    /// than read from the grid.
    pub fn acceptance_at(&self, rate: f64) -> f64 {
        super::evaluate::acceptance_probability(
            self.mode,
            self.plan.n(),
            self.plan.c(),
            self.lot_size.get(),
            rate,
        )
    }

    /// Average Outgoing Quality `AOQ(p) = p · L(p)` at each grid rate.
    ///
    /// Assumes rejected lots are screened and cleared of defects, so the
    /// outgoing defect rate is `p` only for accepted lots.
    pub fn aoq(&self) -> Vec<f64> {
        self.points().map(|(p, l)| p * l).collect()
    }

    /// Average Outgoing Quality Limit: the largest AOQ value on the grid.
    ///
    /// This is a grid approximation; a finer grid moves it closer to the
    /// analytic maximum.
    pub fn aoql(&self) -> f64 {
        self.points().map(|(p, l)| p * l).fold(0.0, f64::max)
    }

    /// Average Total Inspection `ATI(p) = n·L(p) + N·(1 - L(p))` at each grid rate.
    ///
    /// Accepted lots cost the `n` sampled items, rejected lots are inspected
    /// completely. Only meaningful for a finite lot.
    pub fn average_total_inspection(&self) -> Vec<f64> {
        let n = f64::from(self.plan.n());
        let lot = f64::from(self.lot_size.get());
        self.acceptance.iter().map(|&l| n * l + lot * (1.0 - l)).collect()
    }

    /// The first grid rate at which `L(p) <= 0.5`.
    ///
    /// Returns 0.0 when the curve never drops to 0.5 on the grid.
    pub fn operating_indifference_point(&self) -> f64 {
        self.points()
            .find(|&(_, l)| l <= 0.5)
            .map_or(0.0, |(p, _)| p)
    }

    /// Forward-difference slope `(L[i+1] - L[i]) · steps` at the grid index
    /// nearest to `rate`.
    ///
    /// Returns `None` when the nearest index is the last grid point or `rate`
    /// lies outside `[0, 1]`.
    pub fn slope_at(&self, rate: f64) -> Option<f64> {
        if !(0.0..=1.0).contains(&rate) {
            return None;
        }
        let i = (rate * f64::from(self.steps)).round() as usize;
        let here = *self.acceptance.get(i)?;
        let next = *self.acceptance.get(i + 1)?;
        Some((next - here) * f64::from(self.steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binomial_curve(n: u32, c: u32, steps: u32) -> OcCurve {
        let plan = SamplingPlan::new(n, c).expect("valid plan");
        OcCurve::compute(DistributionMode::Binomial, plan, LotSize::default(), steps)
            .expect("valid curve")
    }

    #[test]
    fn grid_endpoints_and_length() {
        let grid = rate_grid(200);
        assert_eq!(grid.len(), 201);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[200], 1.0);
        assert!((grid[10] - 0.05).abs() < 1e-15);
    }

    #[test]
    fn compute_rejects_empty_grid() {
        let plan = SamplingPlan::new(10, 1).expect("valid plan");
        let err = OcCurve::compute(DistributionMode::Binomial, plan, LotSize::default(), 0);
        assert_eq!(err.unwrap_err(), SamplingError::EmptyGrid);
    }

    #[test]
    fn compute_checks_lot_only_for_hypergeometric() {
        let plan = SamplingPlan::new(60, 1).expect("valid plan");
        let lot = LotSize::new(50).expect("valid lot");
        assert_eq!(
            OcCurve::compute(DistributionMode::Hypergeometric, plan, lot, 100).unwrap_err(),
            SamplingError::LotSmallerThanSample { lot_size: 50, n: 60 }
        );
        assert!(OcCurve::compute(DistributionMode::Poisson, plan, lot, 100).is_ok());
    }

    #[test]
    fn curve_matches_pointwise_evaluation() {
        let curve = binomial_curve(20, 1, 20);
        for (p, l) in curve.points() {
            assert!((curve.acceptance_at(p) - l).abs() < 1e-15);
        }
    }

    #[test]
    fn aoq_is_zero_at_both_ends() {
        let curve = binomial_curve(20, 1, 100);
        let aoq = curve.aoq();
        assert_eq!(aoq[0], 0.0);
        assert!(aoq[100].abs() < 1e-15);
    }

    #[test]
    fn aoql_single_zero_acceptance_plan() {
        // c = 0: AOQ(p) = p(1-p)^n peaks at p = 1/(n+1)
        let n = 9;
        let curve = binomial_curve(n, 0, 1000);
        let p = 1.0 / f64::from(n + 1);
        let analytic = p * (1.0 - p).powi(n as i32);
        let aoql = curve.aoql();
        assert!(aoql <= analytic + 1e-12);
        assert!((aoql - analytic).abs() < 1e-4, "aoql={aoql}, analytic={analytic}");
    }

    #[test]
    fn aoql_is_max_of_aoq() {
        let curve = binomial_curve(38, 4, 200);
        let max = curve.aoq().into_iter().fold(f64::MIN, f64::max);
        assert_eq!(curve.aoql(), max);
    }

    #[test]
    fn ati_spans_sample_to_lot() {
        let plan = SamplingPlan::new(50, 2).expect("valid plan");
        let lot = LotSize::new(500).expect("valid lot");
        let curve = OcCurve::compute(DistributionMode::Hypergeometric, plan, lot, 100)
            .expect("valid curve");
        let ati = curve.average_total_inspection();
        assert!((ati[0] - 50.0).abs() < 1e-9, "p=0 inspects only the sample");
        assert!((ati[100] - 500.0).abs() < 1e-9, "p=1 inspects the whole lot");
        for w in ati.windows(2) {
            assert!(w[1] >= w[0] - 1e-9);
        }
    }

    #[test]
    fn indifference_point_of_c0_plan() {
        // (1-p)^10 = 0.5 at p ≈ 0.0670; first grid point at or beyond it is 0.068
        let curve = binomial_curve(10, 0, 500);
        let p = curve.operating_indifference_point();
        assert!((p - 0.068).abs() < 1e-12, "p={p}");
    }

    #[test]
    fn indifference_point_defaults_to_zero() {
        // c = n accepts every lot
        let curve = binomial_curve(5, 5, 50);
        assert_eq!(curve.operating_indifference_point(), 0.0);
    }

    #[test]
    fn slope_is_negative_and_bounded_on_grid() {
        let curve = binomial_curve(10, 0, 500);
        let slope = curve.slope_at(0.068).expect("interior point");
        // d/dp (1-p)^10 = -10 (1-p)^9 ≈ -5.3 near p = 0.068
        assert!(slope < 0.0);
        assert!((slope + 10.0 * (1.0_f64 - 0.068).powi(9)).abs() < 0.1, "slope={slope}");
        assert!(curve.slope_at(1.0).is_none());
        assert!(curve.slope_at(-0.1).is_none());
    }
}
