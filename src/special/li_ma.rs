//! Li & Ma (1983) detection significance, eq. 17.

/// Unsigned Li & Ma significance of `n_on` counts in the source region
/// against `n_off` counts in the background region, with `alpha` the
/// on/off exposure ratio.
///
/// `0 · ln 0` is taken as `0`, so empty on or off regions are valid. The
/// test statistic is clamped at zero before the square root: rounding can
/// push it slightly negative when `n_on ≈ alpha · n_off`, and NaN (from
/// `alpha = 0` with both counts zero) maps to `0` as well.
pub fn li_ma_significance(n_on: f64, n_off: f64, alpha: f64) -> f64 {
    let total = n_on + n_off;
    let on = xlogy(n_on, (1.0 + alpha) / alpha * (n_on / total));
    let off = xlogy(n_off, (1.0 + alpha) * (n_off / total));
    let ts = 2.0 * (on + off);
    ts.max(0.0).sqrt()
}

/// `x · ln y`, with the limit `0` at `x = 0`.
fn xlogy(x: f64, y: f64) -> f64 {
    if x == 0.0 && !y.is_nan() { 0.0 } else { x * y.ln() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    // Purpose
    // -------
    // Check eq. 17 against reference values, including empty regions.
    //
    // Given
    // -----
    // - (5, 10, 0.01), (5, 10, 0.011), (0, 10, 0.1), (3, 0, 0.5).
    //
    // Expect
    // ------
    // - Reference significances to a relative 1e−13.
    fn li_ma_significance_matches_reference() {
        assert_relative_eq!(li_ma_significance(5.0, 10.0, 0.01), 5.220_611_720_539_229, max_relative = 1e-13);
        assert_relative_eq!(li_ma_significance(5.0, 10.0, 0.011), 5.131_410_450_757_501, max_relative = 1e-13);
        assert_relative_eq!(li_ma_significance(0.0, 10.0, 0.1), 1.380_653_322_194_423_5, max_relative = 1e-13);
        assert_relative_eq!(li_ma_significance(3.0, 0.0, 0.5), 2.567_425_506_613_319, max_relative = 1e-13);
    }

    #[test]
    // Purpose
    // -------
    // Check the degenerate inputs.
    //
    // Given
    // -----
    // - An observation equal to its expectation, both regions empty, and
    //   alpha = 0 with a non-empty source region.
    //
    // Expect
    // ------
    // - (near) 0, 0, and +∞.
    fn li_ma_significance_degenerate_inputs() {
        assert_abs_diff_eq!(li_ma_significance(1.0, 10.0, 0.1), 0.0, epsilon = 1e-6);
        assert_eq!(li_ma_significance(0.0, 0.0, 0.5), 0.0);
        assert_eq!(li_ma_significance(2.0, 5.0, 0.0), f64::INFINITY);
    }
}
