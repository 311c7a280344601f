//! Factorials and binomial coefficients.
//!
//! These are the terms of the hypergeometric, binomial and Poisson acceptance
//! probabilities and of the Philips steepness formula.
//!
//! # Precision
//!
//! Both functions work in `f64`. Factorials up to 16! are exact table lookups;
//! larger arguments are accumulated as a running product and lose precision
//! (and overflow to infinity beyond 170!). Binomial coefficients use the
//! multiplicative form, which never forms the large factorials but still
//! overflows once `C(n, k)` exceeds `f64::MAX` (e.g. `C(1100, 550)`). The OC
//! evaluation in [`crate::oc`] therefore works with their logarithms.
//!
//! # References
//!
//! - Knuth, D.E. (1997). *The Art of Computer Programming*, Vol. 1, 3rd ed.,
//!   Section 1.2.6: Binomial Coefficients.

/// Exact values of 0! through 16!.
const FACTORIALS: [f64; 17] = [
    1.0,
    1.0,
    2.0,
    6.0,
    24.0,
    120.0,
    720.0,
    5_040.0,
    40_320.0,
    362_880.0,
    3_628_800.0,
    39_916_800.0,
    479_001_600.0,
    6_227_020_800.0,
    87_178_291_200.0,
    1_307_674_368_000.0,
    20_922_789_888_000.0,
];

/// Computes n!.
///
/// Values up to 16! come from a table; above that the product is built
/// iteratively.
///
/// # Examples
///
/// ```
/// use u_acceptance::combinatorics::factorial;
///
/// assert_eq!(factorial(0), 1.0);
/// assert_eq!(factorial(5), 120.0);
/// assert_eq!(factorial(10), 3_628_800.0);
/// ```
pub fn factorial(n: u32) -> f64 {
    if let Some(&value) = FACTORIALS.get(n as usize) {
        return value;
    }
    (2..=n).fold(1.0, |acc, i| acc * f64::from(i))
}

/// Computes the binomial coefficient C(n, k).
///
/// Uses the running product
///
/// ```text
/// C(n, k) = ∏_{i=1}^{k} (n + 1 - i) / i
/// ```
///
/// which accepts any real `n`. For an integer `n < k` one factor becomes
/// zero, so the coefficient is 0 as expected; `k = 0` yields 1.
///
/// # Examples
///
/// ```
/// use u_acceptance::combinatorics::binomial;
///
/// assert_eq!(binomial(5.0, 2), 10.0);
/// assert_eq!(binomial(42.0, 0), 1.0);
/// assert_eq!(binomial(3.0, 5), 0.0);
/// ```
pub fn binomial(n: f64, k: u32) -> f64 {
    (1..=k).fold(1.0, |coeff, i| {
        let i = f64::from(i);
        coeff * (n + 1.0 - i) / i
    })
}
