//! # u-acceptance
//!
//! Acceptance sampling by attributes: operating characteristic (OC) curves of
//! single sampling plans and the search for plans that meet a quality
//! requirement.
//!
//! This crate is a pure numeric engine. It takes scalar inputs (plan, lot
//! size, model, constraint points) and returns OC values, derived quality
//! figures, plans and verdicts; charts, sliders and text belong to the host.
//!
//! ## Modules
//!
//! - [`combinatorics`] — Factorials and binomial coefficients
//! - [`plan`] — Sampling plans `(n, c)` and lot sizes with boundary validation
//! - [`oc`] — OC curves under hypergeometric, binomial and Poisson models; AOQ, AOQL, ATI
//! - [`search`] — Günther (AQL/LQ) and Philips (indifference point) plan search,
//!   direct or step by step
//! - [`special`] — Injectable chi-squared CDF used by the Philips search
//! - [`error`] — Error type
//!
//! ## Example
//!
//! ```
//! use u_acceptance::oc::{DistributionMode, OcCurve};
//! use u_acceptance::plan::LotSize;
//! use u_acceptance::search::{GuentherConstraints, GuentherSearch, StepMode, GUENTHER_GRID_STEPS};
//!
//! let search = GuentherSearch::new(
//!     GuentherConstraints::default(),
//!     DistributionMode::Binomial,
//!     LotSize::default(),
//! );
//! let plan = search.search(StepMode::Direct).unwrap();
//!
//! let curve = OcCurve::compute(DistributionMode::Binomial, plan, LotSize::default(), GUENTHER_GRID_STEPS).unwrap();
//! assert!(curve.aoql() < 0.1);
//! ```
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: evaluation and search hold no shared state and are
//!   safe to call from any thread
//! - **Explicit stepping**: incremental searches are state machines driven by
//!   the caller, so a UI timer and a test loop run the same code
//! - **Bounded**: every search stops at [`plan::MAX_SAMPLE_SIZE`]

pub mod combinatorics;
pub mod error;
pub mod oc;
pub mod plan;
pub mod search;
pub mod special;

pub use error::SamplingError;
