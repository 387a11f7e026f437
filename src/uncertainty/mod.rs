//! uncertainty — posteriors and credible bands for counting experiments.
//!
//! Purpose
//! -------
//! Quantify what an observed count says about the underlying source rate or
//! success fraction.
//!
//! Key behaviors
//! -------------
//! - [`posterior`], [`posterior_array`], [`posterior_grid`]: closed-form
//!   posterior density of a source rate with a background region.
//! - [`uncertainties_rate`], [`uncertainties_fraction`] and their `*_array`
//!   variants: flat-prior quantile bands through the inverse incomplete
//!   gamma and beta functions.
//! - [`DEFAULT_QUANTILES`] / [`ONE_SIGMA_SIGNIFICANCES`]: the median and
//!   one-sigma band used when callers have no preference.
//!
//! Invariants & assumptions
//! ------------------------
//! - Quantiles lie in `(0, 1)` and `k ≤ n`; both are checked up front.
//! - The posterior raises nothing: degenerate `alpha` or `rate` values give
//!   IEEE non-finite results.
//!
//! Downstream usage
//! ----------------
//! - `use poisson_regime::uncertainty::prelude::*;` imports the full surface.

pub mod posterior;
pub mod quantiles;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::posterior::{posterior, posterior_array, posterior_grid};
pub use self::quantiles::{
    DEFAULT_QUANTILES, ONE_SIGMA_SIGNIFICANCES, uncertainties_fraction,
    uncertainties_fraction_array, uncertainties_rate, uncertainties_rate_array,
};

// ---- Optional convenience prelude for downstream crates ------------------

pub mod prelude {
    pub use super::posterior::{posterior, posterior_array, posterior_grid};
    pub use super::quantiles::{
        DEFAULT_QUANTILES, ONE_SIGMA_SIGNIFICANCES, uncertainties_fraction,
        uncertainties_fraction_array, uncertainties_rate, uncertainties_rate_array,
    };
}
