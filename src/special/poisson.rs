//! Poisson tail probability and probability mass.
//!
//! The tail uses the identity `P(X ≥ n) = P(n, λ)` (regularized lower
//! incomplete gamma), which stays valid for `λ = 0` where a Poisson
//! distribution object cannot be constructed.

use statrs::function::gamma::{gamma_lr, ln_gamma};

/// Upper tail `P(X ≥ n)` for `X ~ Poisson(mean)`.
///
/// Returns `1.0` for `n = 0`, `0.0` for `mean = 0` and `n > 0`, and NaN for
/// a negative or NaN mean.
pub fn poisson_sf(n: u64, mean: f64) -> f64 {
    if mean.is_nan() || mean < 0.0 {
        return f64::NAN;
    }
    if n == 0 {
        return 1.0;
    }
    if mean == 0.0 {
        return 0.0;
    }
    if mean.is_infinite() {
        return 1.0;
    }
    gamma_lr(n as f64, mean)
}

/// Natural log of the probability mass `P(X = x)` for `X ~ Poisson(mean)`.
///
/// `x` is real-valued: off the support (negative or fractional `x`) the mass
/// is zero and the log is `−∞`. The case `mean = 0` puts all mass on `x = 0`.
pub fn ln_poisson_pmf(x: f64, mean: f64) -> f64 {
    if x.is_nan() || mean.is_nan() || mean < 0.0 {
        return f64::NAN;
    }
    if x < 0.0 || x.fract() != 0.0 || mean.is_infinite() {
        return f64::NEG_INFINITY;
    }
    if mean == 0.0 {
        return if x == 0.0 { 0.0 } else { f64::NEG_INFINITY };
    }
    x * mean.ln() - mean - ln_gamma(x + 1.0)
}

/// Probability mass `P(X = x)` for `X ~ Poisson(mean)`; see [`ln_poisson_pmf`].
#[inline]
pub fn poisson_pmf(x: f64, mean: f64) -> f64 {
    ln_poisson_pmf(x, mean).exp()
}
