//! special — scalar special functions behind the significance formulas.
//!
//! Purpose
//! -------
//! Collect the numerical primitives the significance and uncertainty
//! routines are built on, each with a plain `f64 → f64` contract: normal
//! CDF and quantile, Poisson tail and mass, the log incomplete beta
//! function, inverse incomplete gamma and beta, Gauss ₂F₁, Tricomi U, and
//! the Li & Ma statistic.
//!
//! Key behaviors
//! -------------
//! - [`ndtr`] / [`ndtri`]: Φ and Φ⁻¹ through `statrs` complementary error
//!   functions.
//! - [`poisson_sf`], [`poisson_pmf`], [`ln_poisson_pmf`]: inclusive upper
//!   tail `P(X ≥ n)` and mass, valid for a zero mean.
//! - [`ln_beta_reg`], [`ln_gamma_lr`], [`ln_gamma_ur`]: logs of the
//!   regularized incomplete beta and gamma functions, usable far below the
//!   `f64` range.
//! - [`gammainccinv`], [`betaincinv`]: safeguarded Newton inverses of the
//!   regularized incomplete gamma and beta functions, solved on log
//!   residuals so extreme tails keep their relative precision.
//! - [`hyp2f1`], [`ln_hyp2f1`], [`hyperu`], [`ln_hyperu`]: hypergeometric
//!   functions at real arguments, with log variants for results outside
//!   the `f64` range.
//! - [`li_ma_significance`]: Li & Ma (1983) eq. 17.
//!
//! Invariants & assumptions
//! ------------------------
//! - Nothing in this module returns `Result`: out-of-domain arguments give
//!   NaN (or the appropriate infinity at a boundary), mirroring IEEE
//!   semantics. Precondition checks belong to the callers in
//!   [`crate::significance`] and [`crate::uncertainty`].
//! - Iterative routines log a `warn!` when they stop at their iteration
//!   cap and return their best estimate.
//!
//! Testing notes
//! -------------
//! - Every submodule carries unit tests against closed forms or reference
//!   values computed in 30-digit arithmetic.

pub mod beta;
pub mod gamma;
pub mod hypergeometric;
pub mod inverse;
pub mod li_ma;
pub mod normal;
pub mod poisson;
mod quadrature;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::beta::ln_beta_reg;
pub use self::gamma::{ln_gamma_lr, ln_gamma_ur};
pub use self::hypergeometric::{hyp2f1, hyperu, ln_hyp2f1, ln_hyperu};
pub use self::inverse::{betaincinv, gammainccinv};
pub use self::li_ma::li_ma_significance;
pub use self::normal::{ndtr, ndtri};
pub use self::poisson::{ln_poisson_pmf, poisson_pmf, poisson_sf};
