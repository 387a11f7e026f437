//! quantiles — uniform-prior uncertainty bands on counts and fractions.
//!
//! Purpose
//! -------
//! Turn an observed count (or a count out of a number of trials) into
//! posterior quantiles of the underlying rate (or success fraction) under a
//! flat prior.
//!
//! Key behaviors
//! -------------
//! - [`uncertainties_rate`]: the posterior of a Poisson rate after `k`
//!   events is Gamma(`k + 1`); band edges are `Q⁻¹(k + 1, q) / exposure`.
//! - [`uncertainties_fraction`]: the posterior of a binomial fraction after
//!   `k` of `n` is Beta(`k + 1`, `n + 1 − k`); band edges are
//!   `I⁻¹(k + 1, n + 1 − k; q)`.
//! - [`DEFAULT_QUANTILES`] holds the median and one-sigma tail probabilities,
//!   i.e. [`ONE_SIGMA_SIGNIFICANCES`] passed through `Φ(−s)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Quantiles must lie in the open interval `(0, 1)`; fractions require
//!   `k ≤ n`. Violations are rejected before any evaluation.
//! - Rate bounds are strictly positive; fraction bounds lie in `[0, 1]`.
//!
//! Conventions
//! -----------
//! - The rate inverse uses the *upper* incomplete gamma while the fraction
//!   inverse uses the *lower* incomplete beta. With the default quantiles
//!   the rate band therefore reads `[median, lower, upper]` and the fraction
//!   band `[median, upper, lower]`.

use ndarray::{ArrayD, ArrayViewD, Zip};

use crate::{
    broadcast::{broadcast_to, co_broadcast},
    errors::StatResult,
    special::{betaincinv, gammainccinv},
    validation::{validate_quantiles, validate_trials},
};

/// Sigma levels of the default bands: the median and ±1σ.
pub const ONE_SIGMA_SIGNIFICANCES: [f64; 3] = [0.0, -1.0, 1.0];

/// `Φ(−s)` for each of [`ONE_SIGMA_SIGNIFICANCES`].
pub const DEFAULT_QUANTILES: [f64; 3] = [0.5, 0.841_344_746_068_542_9, 0.158_655_253_931_457_05];

/// Quantiles of the posterior rate after observing `k` events.
///
/// Errors
/// ------
/// - `StatError::QuantileOutOfRange` for any `q ∉ (0, 1)`.
pub fn uncertainties_rate(k: u64, quantiles: &[f64], exposure: f64) -> StatResult<Vec<f64>> {
    validate_quantiles(quantiles)?;
    let shape = k as f64 + 1.0;
    Ok(quantiles.iter().map(|&q| gammainccinv(shape, q) / exposure).collect())
}

/// Quantiles of the posterior success fraction after `k` successes in `n`
/// trials.
///
/// Errors
/// ------
/// - `StatError::CountExceedsTrials` when `k > n`.
/// - `StatError::QuantileOutOfRange` for any `q ∉ (0, 1)`.
pub fn uncertainties_fraction(k: u64, n: u64, quantiles: &[f64]) -> StatResult<Vec<f64>> {
    validate_trials(k, n)?;
    validate_quantiles(quantiles)?;
    let (a, b) = fraction_shapes(k, n);
    Ok(quantiles.iter().map(|&q| betaincinv(a, b, q)).collect())
}

fn fraction_shapes(k: u64, n: u64) -> (f64, f64) {
    (k as f64 + 1.0, (n - k) as f64 + 1.0)
}

/// Element-wise [`uncertainties_rate`], broadcasting `k` against `q`.
///
/// Errors
/// ------
/// - `StatError::QuantileOutOfRange` for the first offending entry of `q`.
/// - `StatError::ShapeMismatch` when the shapes do not broadcast.
pub fn uncertainties_rate_array(
    k: &ArrayViewD<'_, u64>, quantiles: &ArrayViewD<'_, f64>, exposure: f64,
) -> StatResult<ArrayD<f64>> {
    validate_quantiles(quantiles.iter())?;
    let shape = co_broadcast(&[k.shape(), quantiles.shape()])?;
    let k = broadcast_to(k, &shape)?;
    let quantiles = broadcast_to(quantiles, &shape)?;

    Ok(Zip::from(&k)
        .and(&quantiles)
        .map_collect(|&k, &q| gammainccinv(k as f64 + 1.0, q) / exposure))
}

/// Element-wise [`uncertainties_fraction`], broadcasting `k`, `n` and `q`.
///
/// Errors
/// ------
/// - `StatError::ShapeMismatch` when the shapes do not broadcast.
/// - `StatError::CountExceedsTrials` for the first pair with `k > n`.
/// - `StatError::QuantileOutOfRange` for the first offending entry of `q`.
pub fn uncertainties_fraction_array(
    k: &ArrayViewD<'_, u64>, n: &ArrayViewD<'_, u64>, quantiles: &ArrayViewD<'_, f64>,
) -> StatResult<ArrayD<f64>> {
    let shape = co_broadcast(&[k.shape(), n.shape(), quantiles.shape()])?;
    let k = broadcast_to(k, &shape)?;
    let n = broadcast_to(n, &shape)?;
    k.iter().zip(n.iter()).try_for_each(|(&k, &n)| validate_trials(k, n))?;
    validate_quantiles(quantiles.iter())?;
    let quantiles = broadcast_to(quantiles, &shape)?;

    Ok(Zip::from(&k).and(&n).and(&quantiles).map_collect(|&k, &n, &q| {
        let (a, b) = fraction_shapes(k, n);
        betaincinv(a, b, q)
    }))
}
