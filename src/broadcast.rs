//! broadcast — NumPy-style shape broadcasting for element-wise routines.
//!
//! Purpose
//! -------
//! Let every scalar routine in the crate be lifted to arrays of arbitrary
//! dimension with the familiar broadcasting contract: shapes are aligned on
//! their trailing axes, and an axis of length 1 (or a missing leading axis)
//! stretches to match the other operand.
//!
//! Key behaviors
//! -------------
//! - [`broadcast_shape`] combines two shapes, [`co_broadcast`] folds any
//!   number of them.
//! - [`broadcast_to`] returns a zero-copy view of an operand stretched to a
//!   target shape.
//! - Incompatible shapes surface as `StatError::ShapeMismatch` instead of a
//!   panic.
//!
//! Conventions
//! -----------
//! - All array entry points take `ndarray::ArrayViewD` so scalars (0-d
//!   arrays), vectors and matrices share one code path. Callers holding a
//!   fixed-dimension array use `.view().into_dyn()`.

use ndarray::{ArrayD, ArrayViewD};

use crate::errors::{StatError, StatResult};

/// Broadcast two shapes against each other.
///
/// Errors
/// ------
/// - `StatError::ShapeMismatch` when some aligned axis pair has two
///   different lengths, neither of which is 1.
pub fn broadcast_shape(left: &[usize], right: &[usize]) -> StatResult<Vec<usize>> {
    let ndim = left.len().max(right.len());
    let mut shape = vec![0; ndim];

    for axis in 0..ndim {
        // Axis lengths counted from the trailing end; missing axes act as 1.
        let l = axis.checked_sub(ndim - left.len()).map_or(1, |i| left[i]);
        let r = axis.checked_sub(ndim - right.len()).map_or(1, |i| right[i]);
        shape[axis] = match (l, r) {
            (l, r) if l == r => l,
            (1, r) => r,
            (l, 1) => l,
            _ => {
                return Err(StatError::ShapeMismatch { left: left.to_vec(), right: right.to_vec() });
            }
        };
    }
    Ok(shape)
}

/// Broadcast any number of shapes into their common shape.
pub fn co_broadcast(shapes: &[&[usize]]) -> StatResult<Vec<usize>> {
    shapes.iter().try_fold(Vec::new(), |acc, shape| broadcast_shape(&acc, shape))
}

/// Stretch `view` to `shape` without copying.
///
/// Errors
/// ------
/// - `StatError::ShapeMismatch` when `view` is not broadcastable to `shape`.
pub fn broadcast_to<'a, A>(
    view: &'a ArrayViewD<'_, A>, shape: &[usize],
) -> StatResult<ArrayViewD<'a, A>> {
    view.broadcast(shape)
        .ok_or_else(|| StatError::ShapeMismatch { left: view.shape().to_vec(), right: shape.to_vec() })
}

/// Unwrap one element of a fallible element-wise map, remembering the
/// first error and substituting NaN so the map can run to completion.
pub(crate) fn record_first(slot: &mut Option<StatError>, value: StatResult<f64>) -> f64 {
    value.unwrap_or_else(|err| {
        slot.get_or_insert(err);
        f64::NAN
    })
}

/// Turn the output of a map driven by [`record_first`] into a result.
pub(crate) fn settle(out: ArrayD<f64>, slot: Option<StatError>) -> StatResult<ArrayD<f64>> {
    match slot {
        Some(err) => Err(err),
        None => Ok(out),
    }
}
