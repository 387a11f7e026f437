//! significance — z-scores for counting experiments.
//!
//! Purpose
//! -------
//! Convert between one-sided p-values and significances, and score an
//! observed Poisson count against a background estimate.
//!
//! Key behaviors
//! -------------
//! - [`significance_from_pvalue`] / [`pvalue_from_significance`] and their
//!   `*_array` variants.
//! - [`quantiles_from_significances`] turning sigma levels into band
//!   quantiles.
//! - [`significance`] / [`significance_with_model`] covering the exact
//!   Poisson, Li & Ma, and systematic-bounded Li & Ma regimes, selected
//!   through [`BackgroundModel`].
//!
//! Invariants & assumptions
//! ------------------------
//! - All functions are pure; arrays are broadcast with the rules of
//!   [`crate::broadcast`].
//! - The only domain failure is a p-value not above [`TINY`].
//!
//! Downstream usage
//! ----------------
//! - `use poisson_regime::significance::prelude::*;` imports the full
//!   surface in one line.

pub mod conversion;
pub mod detection;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::conversion::{
    TINY, pvalue_from_significance, pvalue_from_significance_array, quantiles_from_significances,
    significance_from_pvalue, significance_from_pvalue_array,
};
pub use self::detection::{
    BackgroundModel, significance, significance_array, significance_with_model,
};

// ---- Optional convenience prelude for downstream crates ------------------

pub mod prelude {
    pub use super::conversion::{
        TINY, pvalue_from_significance, pvalue_from_significance_array,
        quantiles_from_significances, significance_from_pvalue, significance_from_pvalue_array,
    };
    pub use super::detection::{
        BackgroundModel, significance, significance_array, significance_with_model,
    };
}
