//! posterior — closed-form posterior density of a source count rate.
//!
//! Purpose
//! -------
//! Evaluate the posterior density of the source rate given `n` counts in the
//! source region and `b` counts in a background region scaled by `alpha`,
//! after marginalizing the background rate.
//!
//! Key behaviors
//! -------------
//! - With `t₁ = 1 + b + n`, `h = ½ + b`, `h' = 3/2 + b` and
//!   `λ = exposure · rate`, the density is
//!   `Pois(n + b; λ) · U(h, t₁, (1 + 1/alpha) λ) / ₂F₁(h, t₁; h'; −1/alpha) · Γ(h')`.
//! - Each factor is evaluated as a logarithm and the sum exponentiated once,
//!   so large background counts do not overflow the intermediate `U` or
//!   `Γ` values.
//!
//! Invariants & assumptions
//! ------------------------
//! - The Poisson factor vanishes unless `n + b` is a non-negative integer.
//! - `alpha = 0` makes the ₂F₁ argument infinite and the density NaN; a zero
//!   rate with `n + b > 0` gives `0 · ∞ = NaN` as well. Neither is trapped.
//! - The density is normalized over `rate ≥ 0` at `exposure = 1`.

use ndarray::{ArrayD, ArrayViewD, Zip};
use statrs::function::gamma::ln_gamma;

use crate::{
    broadcast::{broadcast_to, co_broadcast},
    errors::StatResult,
    special::{ln_hyp2f1, ln_hyperu, ln_poisson_pmf},
};

/// Posterior density at `rate`.
///
/// Parameters
/// ----------
/// - `rate`: hypothesized source count rate (`≥ 0`).
/// - `n`: counts in the source region.
/// - `b`: counts in the background region.
/// - `alpha`: source-to-background exposure ratio (`> 0`).
/// - `exposure`: converts `rate` into expected counts; `1.0` by default in
///   callers that have no exposure.
pub fn posterior(rate: f64, n: u64, b: f64, alpha: f64, exposure: f64) -> f64 {
    let n = n as f64;
    let expected = exposure * rate;
    let t1 = 1.0 + b + n;
    let half_b = 0.5 + b;
    let three_half_b = 1.5 + b;

    let ln_density = ln_poisson_pmf(n + b, expected)
        + ln_hyperu(half_b, t1, (1.0 + 1.0 / alpha) * expected)
        - ln_hyp2f1(half_b, t1, three_half_b, -1.0 / alpha)
        + ln_gamma(three_half_b);
    ln_density.exp()
}

/// Element-wise [`posterior`] with broadcasting over `rate`, `n`, `b` and
/// `alpha`.
///
/// Errors
/// ------
/// - `StatError::ShapeMismatch` when the shapes do not broadcast.
pub fn posterior_array(
    rate: &ArrayViewD<'_, f64>, n: &ArrayViewD<'_, u64>, b: &ArrayViewD<'_, f64>,
    alpha: &ArrayViewD<'_, f64>, exposure: f64,
) -> StatResult<ArrayD<f64>> {
    let shape = co_broadcast(&[rate.shape(), n.shape(), b.shape(), alpha.shape()])?;
    let rate = broadcast_to(rate, &shape)?;
    let n = broadcast_to(n, &shape)?;
    let b = broadcast_to(b, &shape)?;
    let alpha = broadcast_to(alpha, &shape)?;

    Ok(Zip::from(&rate)
        .and(&n)
        .and(&b)
        .and(&alpha)
        .map_collect(|&rate, &n, &b, &alpha| posterior(rate, n, b, alpha, exposure)))
}

/// Tabulate the posterior over a grid of rates as `(rate, density)` pairs.
pub fn posterior_grid(
    rates: &[f64], n: u64, b: f64, alpha: f64, exposure: f64,
) -> Vec<(f64, f64)> {
    rates.iter().map(|&rate| (rate, posterior(rate, n, b, alpha, exposure))).collect()
}
