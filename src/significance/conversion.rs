//! conversion — one-sided p-values ↔ significances in units of sigma.
//!
//! Purpose
//! -------
//! Map tail probabilities to z-scores and back without ever forming
//! `1 − Φ(z)` explicitly, so both directions keep full relative precision in
//! the tails.
//!
//! Key behaviors
//! -------------
//! - [`significance_from_pvalue`]: `z = −Φ⁻¹(p)`. Rejects `p ≤ TINY`.
//! - [`pvalue_from_significance`]: `p = Φ(−z)`, the normal survival function
//!   at `z`. Total over the reals.
//! - `*_array` variants apply the same mapping element-wise to arrays of any
//!   dimension.
//!
//! Invariants & assumptions
//! ------------------------
//! - The two maps are inverses on `z ∈ [−7, 7]` / `p ∈ (0, 1)` up to
//!   floating-point rounding.
//! - `p = 1` is accepted and maps to `−∞`; NaN passes through unchanged.

use ndarray::{ArrayD, ArrayViewD};

use crate::{
    errors::StatResult,
    special::{ndtr, ndtri},
    validation::{validate_pvalue, validate_quantiles},
};

/// Smallest positive normal `f64`. P-values at or below it have no finite
/// significance.
pub const TINY: f64 = f64::MIN_POSITIVE;

/// Significance (z-score) of a one-sided p-value.
///
/// Errors
/// ------
/// - `StatError::PValueTooSmall` when `pvalue <= TINY`.
pub fn significance_from_pvalue(pvalue: f64) -> StatResult<f64> {
    validate_pvalue(pvalue)?;
    Ok(-ndtri(pvalue))
}

/// One-sided p-value of a significance, `Φ(−z)`.
#[inline]
pub fn pvalue_from_significance(zscore: f64) -> f64 {
    ndtr(-zscore)
}

/// Element-wise [`significance_from_pvalue`].
///
/// Every entry is validated before any is converted, so a failure never
/// leaves a partially computed result behind.
pub fn significance_from_pvalue_array(pvalues: &ArrayViewD<'_, f64>) -> StatResult<ArrayD<f64>> {
    pvalues.iter().try_for_each(|&p| validate_pvalue(p))?;
    Ok(pvalues.mapv(|p| -ndtri(p)))
}

/// Element-wise [`pvalue_from_significance`].
pub fn pvalue_from_significance_array(zscores: &ArrayViewD<'_, f64>) -> ArrayD<f64> {
    zscores.mapv(pvalue_from_significance)
}

/// Convert sigma levels into the quantiles of the posterior bands.
///
/// A level `s` maps to `Φ(−s)`, so `[0, −1, 1]` yields the median followed
/// by the upper and lower one-sigma tail probabilities.
///
/// Errors
/// ------
/// - `StatError::QuantileOutOfRange` when a level is so extreme that its
///   probability rounds to exactly `0` or `1` (or is NaN).
pub fn quantiles_from_significances(sigmas: &[f64]) -> StatResult<Vec<f64>> {
    let quantiles: Vec<f64> = sigmas.iter().map(|&s| pvalue_from_significance(s)).collect();
    validate_quantiles(&quantiles)?;
    Ok(quantiles)
}
