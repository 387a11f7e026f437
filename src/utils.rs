//! utils — Python operand extraction for the PyO3 bindings.
//!
//! Purpose
//! -------
//! Convert the duck-typed arguments accepted from Python (scalars, sequences,
//! numpy arrays, pandas objects) into owned `ndarray::ArrayD` operands that
//! the broadcasting entry points consume, and convert results back.
//!
//! Key behaviors
//! -------------
//! - [`extract_f64_operand`]: any real scalar or array-like becomes an
//!   `ArrayD<f64>`; scalars become 0-d arrays.
//! - [`extract_count_operand`]: integer scalars and integer-typed arrays
//!   become `ArrayD<u64>`. Floating-point input is rejected with
//!   `NonIntegerCount` and negative entries with `NegativeCount`, even when
//!   the float happens to hold an integral value.
//! - [`into_py_output`]: a 0-d result goes back as a Python `float`,
//!   anything else as a numpy array.
//!
//! Conventions
//! -----------
//! - Array-likes other than numpy arrays go through `numpy.asarray`, so
//!   nested lists and pandas objects behave as they do in numpy.

#[cfg(feature = "python-bindings")]
use ndarray::{ArrayD, IxDyn};

#[cfg(feature = "python-bindings")]
use numpy::{IntoPyArray, PyReadonlyArrayDyn};

#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::PyTypeError,
    prelude::*,
    types::{PyAny, PyBool, PyFloat, PyInt},
};

#[cfg(feature = "python-bindings")]
use crate::{errors::StatError, validation::count_from_i64};

#[cfg(feature = "python-bindings")]
fn as_numpy_array<'py>(py: Python<'py>, raw: &Bound<'py, PyAny>) -> PyResult<Bound<'py, PyAny>> {
    py.import("numpy")?.call_method1("asarray", (raw,))
}

/// Real-valued scalar or array-like as an owned dynamic-dimension array.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_operand<'py>(py: Python<'py>, raw: &Bound<'py, PyAny>) -> PyResult<ArrayD<f64>> {
    // Size-1 arrays also convert to float, so scalars are detected by type.
    if raw.is_instance_of::<PyFloat>() || raw.is_instance_of::<PyInt>() {
        return Ok(ArrayD::from_elem(IxDyn(&[]), raw.extract::<f64>()?));
    }
    if let Ok(arr) = raw.extract::<PyReadonlyArrayDyn<f64>>() {
        return Ok(arr.as_array().to_owned());
    }

    let arr = as_numpy_array(py, raw)?.call_method1("astype", ("float64",)).map_err(|_| {
        PyTypeError::new_err("expected a float, a sequence of floats, or a numpy.ndarray")
    })?;
    let arr = arr.extract::<PyReadonlyArrayDyn<f64>>()?;
    Ok(arr.as_array().to_owned())
}

/// Integer-valued scalar or array-like as an owned array of counts.
///
/// `name` is the Python argument name used in error messages.
#[cfg(feature = "python-bindings")]
pub fn extract_count_operand<'py>(
    py: Python<'py>, name: &'static str, raw: &Bound<'py, PyAny>,
) -> PyResult<ArrayD<u64>> {
    if raw.is_instance_of::<PyInt>() && !raw.is_instance_of::<PyBool>() {
        let value: i64 = raw.extract()?;
        return Ok(ArrayD::from_elem(IxDyn(&[]), count_from_i64(name, value)?));
    }
    if raw.is_instance_of::<PyFloat>() {
        return Err(StatError::NonIntegerCount { name, value: raw.extract()? }.into());
    }

    let arr = as_numpy_array(py, raw)?;
    let kind: String = arr.getattr("dtype")?.getattr("kind")?.extract()?;
    match kind.as_str() {
        "i" | "u" => {
            let ints = arr.call_method1("astype", ("int64",))?;
            let ints = ints.extract::<PyReadonlyArrayDyn<i64>>()?;
            let view = ints.as_array();
            let mut counts = Vec::with_capacity(view.len());
            for &value in view.iter() {
                counts.push(count_from_i64(name, value)?);
            }
            ArrayD::from_shape_vec(IxDyn(view.shape()), counts)
                .map_err(|e| PyTypeError::new_err(e.to_string()))
        }
        "f" => {
            let first = arr
                .call_method1("astype", ("float64",))?
                .call_method0("ravel")?
                .extract::<Vec<f64>>()?
                .first()
                .copied()
                .unwrap_or(f64::NAN);
            Err(StatError::NonIntegerCount { name, value: first }.into())
        }
        other => Err(PyTypeError::new_err(format!(
            "{name} must be integer (got an array of dtype kind {other:?})"
        ))),
    }
}

/// Return a 0-d result as a Python `float` and anything else as a numpy
/// array of the same shape.
#[cfg(feature = "python-bindings")]
pub fn into_py_output(py: Python<'_>, out: ArrayD<f64>) -> PyObject {
    if out.ndim() == 0 {
        let value = out.iter().next().copied().unwrap_or(f64::NAN);
        return PyFloat::new(py, value).into_any().unbind();
    }
    out.into_pyarray(py).into_any().unbind()
}
