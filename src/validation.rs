//! validation — shared input guards for conversions and uncertainty bands.
//!
//! Purpose
//! -------
//! Centralize the precondition checks of the public entry points so that
//! scalar and array variants reject exactly the same inputs with the same
//! [`StatError`] values.
//!
//! Key behaviors
//! -------------
//! - Reject p-values that are not strictly above
//!   [`TINY`](crate::significance::TINY).
//! - Reject quantiles outside the open interval `(0, 1)`, NaN included.
//! - Reject fraction requests with more successes than trials.
//! - Convert signed integer counts coming from dynamically typed callers
//!   into `u64`.
//!
//! Invariants & assumptions
//! ------------------------
//! - A NaN p-value is *not* rejected: the comparison `p <= TINY` is false
//!   for NaN, so it propagates to a NaN significance.
//! - A NaN quantile *is* rejected, because `0 < q < 1` is false for NaN.
//!
//! Conventions
//! -----------
//! - Validation is side-effect free and never allocates beyond the error
//!   payload.

use crate::errors::{StatError, StatResult};
use crate::significance::TINY;

/// Ensure a p-value can be converted into a finite significance.
///
/// Errors
/// ------
/// - `StatError::PValueTooSmall { value }` when `pvalue <= TINY`.
pub fn validate_pvalue(pvalue: f64) -> StatResult<()> {
    if pvalue <= TINY {
        return Err(StatError::PValueTooSmall { value: pvalue });
    }
    Ok(())
}

/// Ensure every quantile lies strictly inside `(0, 1)`.
///
/// Errors
/// ------
/// - `StatError::QuantileOutOfRange { value }` for the first offending
///   entry (NaN included).
pub fn validate_quantiles<'a, I>(quantiles: I) -> StatResult<()>
where
    I: IntoIterator<Item = &'a f64>,
{
    for &value in quantiles {
        if !(value > 0.0 && value < 1.0) {
            return Err(StatError::QuantileOutOfRange { value });
        }
    }
    Ok(())
}

/// Ensure `k` successes fit into `n` trials.
///
/// Errors
/// ------
/// - `StatError::CountExceedsTrials { k, n }` when `k > n`.
pub fn validate_trials(k: u64, n: u64) -> StatResult<()> {
    if k > n {
        return Err(StatError::CountExceedsTrials { k, n });
    }
    Ok(())
}

/// Convert a signed count into `u64`.
///
/// Errors
/// ------
/// - `StatError::NegativeCount { name, value }` when `value < 0`.
pub fn count_from_i64(name: &'static str, value: i64) -> StatResult<u64> {
    u64::try_from(value).map_err(|_| StatError::NegativeCount { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover every branch of the guards in this module, including
    // the NaN conventions documented at module level.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Check the p-value guard at and around the smallest normal double.
    //
    // Given
    // -----
    // - `0.0`, `TINY`, the next representable value above `TINY`, and NaN.
    //
    // Expect
    // ------
    // - `0.0` and `TINY` fail with `PValueTooSmall`.
    // - The value above `TINY` and NaN pass.
    fn validate_pvalue_rejects_values_at_or_below_tiny() {
        // Arrange
        let above = f64::from_bits(TINY.to_bits() + 1);

        // Act & Assert
        assert_eq!(validate_pvalue(0.0), Err(StatError::PValueTooSmall { value: 0.0 }));
        assert_eq!(validate_pvalue(TINY), Err(StatError::PValueTooSmall { value: TINY }));
        assert!(validate_pvalue(above).is_ok());
        assert!(validate_pvalue(f64::NAN).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Check that quantiles on the boundary, outside, or NaN are rejected.
    //
    // Given
    // -----
    // - Lists containing 0.0, 1.0, -0.1 and NaN next to valid entries.
    //
    // Expect
    // ------
    // - Each list fails with `QuantileOutOfRange`; a fully valid list passes.
    fn validate_quantiles_rejects_closed_interval_endpoints_and_nan() {
        // Arrange
        let bad = [vec![0.5, 0.0], vec![1.0], vec![0.2, -0.1, 0.3], vec![f64::NAN]];

        // Act & Assert
        for q in &bad {
            match validate_quantiles(q) {
                Err(StatError::QuantileOutOfRange { .. }) => (),
                other => panic!("expected QuantileOutOfRange for {q:?}, got {other:?}"),
            }
        }
        assert!(validate_quantiles(&[0.5, 0.1587, 0.8413]).is_ok());
        assert!(validate_quantiles(&[]).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Check the `k ≤ n` guard.
    //
    // Given
    // -----
    // - `(k, n)` pairs `(3, 3)`, `(0, 0)` and `(4, 3)`.
    //
    // Expect
    // ------
    // - The first two pass, the last fails with `CountExceedsTrials`.
    fn validate_trials_requires_k_at_most_n() {
        assert!(validate_trials(3, 3).is_ok());
        assert!(validate_trials(0, 0).is_ok());
        assert_eq!(validate_trials(4, 3), Err(StatError::CountExceedsTrials { k: 4, n: 3 }));
    }

    #[test]
    // Purpose
    // -------
    // Check signed-to-unsigned count conversion.
    //
    // Given
    // -----
    // - `7` and `-2`.
    //
    // Expect
    // ------
    // - `7` converts, `-2` fails with `NegativeCount` carrying the name.
    fn count_from_i64_rejects_negative_values() {
        assert_eq!(count_from_i64("k", 7), Ok(7));
        assert_eq!(
            count_from_i64("n", -2),
            Err(StatError::NegativeCount { name: "n", value: -2 })
        );
    }
}
