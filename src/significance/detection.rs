//! detection — significance of a Poisson excess over an estimated background.
//!
//! Purpose
//! -------
//! Score an on-source count `n` against `b` background counts scaled by the
//! exposure ratio `alpha`, in one of three background models selected by the
//! systematic-uncertainty parameter `k`.
//!
//! Key behaviors
//! -------------
//! - `k < 0` ([`BackgroundModel::Exact`]): the background `alpha · b` is taken
//!   as known exactly. The p-value is the Poisson tail `P(X ≥ n)` and is
//!   converted with [`significance_from_pvalue`]. The result is never signed
//!   by hand.
//! - `k = 0` ([`BackgroundModel::LiMa`]): classic Li & Ma (1983) eq. 17.
//! - `k > 0` ([`BackgroundModel::Systematic`]): Li & Ma with the exposure
//!   ratio inflated to `alpha · (k + 1)`, bounding a fractional systematic
//!   uncertainty `k` on the background normalization (Vianello 2018, eq. 7).
//! - In both Li & Ma models the magnitude is signed `+` for an excess
//!   (`n ≥ alpha · b`) and `−` for a deficit.
//!
//! Invariants & assumptions
//! ------------------------
//! - The only error is `PValueTooSmall`, reachable in the exact model when
//!   the tail probability underflows below `TINY`.
//! - `alpha = 0` or NaN inputs propagate through IEEE arithmetic.
//!
//! Conventions
//! -----------
//! - Counts are `u64`; the background `b` is real-valued.

use ndarray::{ArrayD, ArrayViewD, Zip};

use crate::{
    broadcast::{broadcast_to, co_broadcast, record_first, settle},
    errors::StatResult,
    significance::conversion::significance_from_pvalue,
    special::{li_ma_significance, poisson_sf},
};

/// How the background estimate enters the detection significance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundModel {
    /// Background known without uncertainty; Poisson tail probability.
    Exact,
    /// Background measured in an off region; Li & Ma.
    LiMa,
    /// Li & Ma with an upper bound `k > 0` on the fractional systematic
    /// uncertainty of `alpha`.
    Systematic(f64),
}

impl BackgroundModel {
    /// Classify the systematic-uncertainty parameter `k`.
    ///
    /// Negative `k` selects [`Exact`](Self::Exact), zero selects
    /// [`LiMa`](Self::LiMa), anything else (NaN included) selects
    /// [`Systematic`](Self::Systematic).
    pub fn from_k(k: f64) -> Self {
        if k < 0.0 {
            BackgroundModel::Exact
        } else if k == 0.0 {
            BackgroundModel::LiMa
        } else {
            BackgroundModel::Systematic(k)
        }
    }

    /// Exposure ratio handed to Li & Ma; `alpha` itself for the exact model.
    pub fn effective_alpha(&self, alpha: f64) -> f64 {
        match *self {
            BackgroundModel::Exact | BackgroundModel::LiMa => alpha,
            BackgroundModel::Systematic(k) => alpha * (k + 1.0),
        }
    }
}

/// Detection significance of `n` counts over `b` background counts.
///
/// Parameters
/// ----------
/// - `n`: observed counts in the source region.
/// - `b`: background counts.
/// - `alpha`: source-to-background exposure ratio; the expected background in
///   the source region is `alpha · b`.
/// - `k`: systematic-uncertainty parameter, see [`BackgroundModel::from_k`].
///   `0` gives classic Li & Ma.
///
/// Errors
/// ------
/// - `StatError::PValueTooSmall` from the exact model (`k < 0`) when the tail
///   probability is not above `TINY`.
pub fn significance(n: u64, b: f64, alpha: f64, k: f64) -> StatResult<f64> {
    significance_with_model(n, b, alpha, BackgroundModel::from_k(k))
}

/// [`significance`] with the background model named explicitly.
pub fn significance_with_model(
    n: u64, b: f64, alpha: f64, model: BackgroundModel,
) -> StatResult<f64> {
    let expected = alpha * b;
    log::trace!("significance: n = {n}, expected = {expected}, model = {model:?}");
    match model {
        BackgroundModel::Exact => significance_from_pvalue(poisson_sf(n, expected)),
        BackgroundModel::LiMa | BackgroundModel::Systematic(_) => {
            let sign = if n as f64 >= expected { 1.0 } else { -1.0 };
            Ok(sign * li_ma_significance(n as f64, b, model.effective_alpha(alpha)))
        }
    }
}

/// Element-wise [`significance`] with broadcasting over all four inputs.
///
/// Errors
/// ------
/// - `StatError::ShapeMismatch` when the shapes do not broadcast.
/// - The first `StatError::PValueTooSmall` met in iteration order.
pub fn significance_array(
    n: &ArrayViewD<'_, u64>, b: &ArrayViewD<'_, f64>, alpha: &ArrayViewD<'_, f64>,
    k: &ArrayViewD<'_, f64>,
) -> StatResult<ArrayD<f64>> {
    let shape = co_broadcast(&[n.shape(), b.shape(), alpha.shape(), k.shape()])?;
    let n = broadcast_to(n, &shape)?;
    let b = broadcast_to(b, &shape)?;
    let alpha = broadcast_to(alpha, &shape)?;
    let k = broadcast_to(k, &shape)?;

    let mut first_error = None;
    let out = Zip::from(&n)
        .and(&b)
        .and(&alpha)
        .and(&k)
        .map_collect(|&n, &b, &alpha, &k| {
            record_first(&mut first_error, significance(n, b, alpha, k))
        });
    settle(out, first_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StatError;
    use approx::assert_relative_eq;
    use ndarray::{ArrayD, IxDyn, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Model selection from k.
    // - Reference values for five counts over an expectation of 0.1 in all
    //   three models.
    // - Sign handling for deficits in each model.
    // - Broadcasting and error propagation of the array variant.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Check the k → model classification.
    //
    // Given
    // -----
    // - k ∈ {−1, −0.0, 0, 0.1}.
    //
    // Expect
    // ------
    // - Exact, LiMa (negative zero is not below zero), LiMa, Systematic(0.1).
    fn background_model_from_k_classifies_sign() {
        assert_eq!(BackgroundModel::from_k(-1.0), BackgroundModel::Exact);
        assert_eq!(BackgroundModel::from_k(-0.0), BackgroundModel::LiMa);
        assert_eq!(BackgroundModel::from_k(0.0), BackgroundModel::LiMa);
        assert_eq!(BackgroundModel::from_k(0.1), BackgroundModel::Systematic(0.1));
        assert_relative_eq!(
            BackgroundModel::Systematic(0.1).effective_alpha(0.01),
            0.011,
            max_relative = 1e-15
        );
    }

    #[test]
    // Purpose
    // -------
    // Check five counts over 10 background counts at alpha = 0.01.
    //
    // Given
    // -----
    // - k = −1, 0, 0.1.
    //
    // Expect
    // ------
    // - Exact: −Φ⁻¹(P(X ≥ 5; 0.1)) = 5.2485.
    // - Li & Ma: 5.2206; systematic: 5.1314, no larger than Li & Ma.
    fn significance_five_counts_over_small_background() {
        // Act
        let exact = significance(5, 10.0, 0.01, -1.0).expect("tail is above TINY");
        let li_ma = significance(5, 10.0, 0.01, 0.0).expect("Li & Ma never fails");
        let systematic = significance(5, 10.0, 0.01, 0.1).expect("Li & Ma never fails");

        // Assert
        assert_relative_eq!(exact, 5.248_483_907_581_598_6, max_relative = 1e-9);
        assert_relative_eq!(li_ma, 5.220_611_720_539_229, max_relative = 1e-12);
        assert_relative_eq!(systematic, 5.131_410_450_757_501, max_relative = 1e-12);
        assert!(systematic <= li_ma);
    }

    #[test]
    // Purpose
    // -------
    // Check deficit handling: Li & Ma is signed, the exact model is not.
    //
    // Given
    // -----
    // - n = 0 over an expectation of 1 (b = 10, alpha = 0.1).
    //
    // Expect
    // ------
    // - Li & Ma returns −1.3807.
    // - The exact model returns −∞ since P(X ≥ 0) = 1, with no sign flip.
    fn significance_deficit_signs() {
        let li_ma = significance(0, 10.0, 0.1, 0.0).expect("Li & Ma never fails");
        assert_relative_eq!(li_ma, -1.380_653_322_194_423_5, max_relative = 1e-12);

        let exact = significance(0, 10.0, 0.1, -1.0).expect("p = 1 is accepted");
        assert_eq!(exact, f64::NEG_INFINITY);
    }

    #[test]
    // Purpose
    // -------
    // Check that the exact model propagates an underflowing tail as an error.
    //
    // Given
    // -----
    // - n = 200 over an expectation of 0.01.
    //
    // Expect
    // ------
    // - `PValueTooSmall`.
    fn significance_exact_model_propagates_tiny_pvalue() {
        match significance(200, 1.0, 0.01, -1.0) {
            Err(StatError::PValueTooSmall { .. }) => (),
            other => panic!("expected PValueTooSmall, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Check broadcasting of a count vector against scalar parameters and a
    // per-column k.
    //
    // Given
    // -----
    // - n = [[5], [0]], b = 10, alpha = 0.01, k = [0, 0.1].
    //
    // Expect
    // ------
    // - A 2×2 result matching the scalar function entry by entry.
    fn significance_array_broadcasts_inputs() {
        // Arrange
        let n = array![[5_u64], [0]].into_dyn();
        let b = ArrayD::from_elem(IxDyn(&[]), 10.0);
        let alpha = ArrayD::from_elem(IxDyn(&[]), 0.01);
        let k = array![0.0, 0.1].into_dyn();

        // Act
        let out = significance_array(&n.view(), &b.view(), &alpha.view(), &k.view())
            .expect("shapes broadcast");

        // Assert
        assert_eq!(out.shape(), &[2, 2]);
        for (i, &ni) in [5_u64, 0].iter().enumerate() {
            for (j, &kj) in [0.0, 0.1].iter().enumerate() {
                let want = significance(ni, 10.0, 0.01, kj).expect("Li & Ma never fails");
                assert_relative_eq!(out[[i, j]], want);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Check the array variant's error paths.
    //
    // Given
    // -----
    // - Incompatible shapes [2] and [3]; an exact-model entry whose tail
    //   underflows.
    //
    // Expect
    // ------
    // - `ShapeMismatch`, then `PValueTooSmall`.
    fn significance_array_reports_shape_and_domain_errors() {
        let scalar = ArrayD::from_elem(IxDyn(&[]), 0.01);
        let n = array![1_u64, 2].into_dyn();
        let b = array![1.0, 2.0, 3.0].into_dyn();
        match significance_array(&n.view(), &b.view(), &scalar.view(), &scalar.view()) {
            Err(StatError::ShapeMismatch { .. }) => (),
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }

        let n = array![1_u64, 200].into_dyn();
        let b = ArrayD::from_elem(IxDyn(&[]), 1.0);
        let k = ArrayD::from_elem(IxDyn(&[]), -1.0);
        match significance_array(&n.view(), &b.view(), &scalar.view(), &k.view()) {
            Err(StatError::PValueTooSmall { .. }) => (),
            other => panic!("expected PValueTooSmall, got {other:?}"),
        }
    }
}
