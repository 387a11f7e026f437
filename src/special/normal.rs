//! Standard normal CDF and quantile function.
//!
//! Both routines go through the complementary error function so that the
//! tails keep full relative precision: `ndtr(z)` for large negative `z` and
//! `ndtri(p)` for tiny `p` never pass through `1 - (something close to 1)`.

use std::f64::consts::SQRT_2;

use statrs::function::erf::{erfc, erfc_inv};

/// Standard normal CDF Φ(z).
///
/// Evaluated as `½ erfc(−z/√2)`. Returns `0.0` / `1.0` at `∓∞` and NaN for
/// NaN input.
#[inline]
pub fn ndtr(z: f64) -> f64 {
    0.5 * erfc(-z / SQRT_2)
}

/// Inverse of the standard normal CDF, `Φ⁻¹(p)`.
///
/// Evaluated as `−√2 erfc⁻¹(2p)`. Returns `−∞` at `p = 0`, `+∞` at `p = 1`.
/// Arguments outside `[0, 1]` are not meaningful and return infinities or
/// NaN as produced by the underlying `erfc_inv`.
#[inline]
pub fn ndtri(p: f64) -> f64 {
    -SQRT_2 * erfc_inv(2.0 * p)
}
