//! poisson_regime — significance and credible bands for Poisson counting
//! experiments with background, with optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the same routines to Python via the `_poisson_regime` extension
//! module when the `python-bindings` feature is enabled.
//!
//! Key behaviors
//! -------------
//! - [`significance`]: p-value ↔ sigma conversions and the three-regime
//!   detection significance (exact Poisson, Li & Ma, systematic-bounded
//!   Li & Ma).
//! - [`uncertainty`]: the source-rate posterior and flat-prior quantile bands
//!   on rates and fractions.
//! - [`special`]: the special functions both are built on.
//! - [`broadcast`]: NumPy-style broadcasting used by every `*_array` entry
//!   point.
//! - With `python-bindings`, `#[pyfunction]` wrappers accept scalars or
//!   array-likes and return a `float` or a numpy array accordingly.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every routine is a pure function; there is no global state and all
//!   entry points are safe to call concurrently.
//! - Preconditions are reported through [`errors::StatError`]; IEEE
//!   non-finite results (e.g. `alpha = 0`) are returned, not raised.
//!
//! Conventions
//! -----------
//! - Counts are `u64`; Python callers passing floats or negative values for
//!   counts get `AssertionError`. A p-value at or below
//!   [`significance::TINY`] raises `ArithmeticError`.
//! - The default quantiles are the median and the ±1σ tail probabilities,
//!   [`uncertainty::DEFAULT_QUANTILES`].
//!
//! Downstream usage
//! ----------------
//! - Rust code imports from the inner modules, typically through their
//!   `prelude`s.
//! - The Python package imports `_poisson_regime` and re-exports its
//!   functions.
//!
//! Testing notes
//! -------------
//! - Numerical behavior is covered by unit tests in the inner modules and by
//!   the property and end-to-end tests under `tests/`.

pub mod broadcast;
pub mod errors;
pub mod significance;
pub mod special;
pub mod uncertainty;
pub mod utils;
pub mod validation;

#[cfg(feature = "python-bindings")]
use ndarray::{Array1, ArrayD, IxDyn};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    significance::{
        pvalue_from_significance_array, significance_array, significance_from_pvalue_array,
    },
    uncertainty::{
        DEFAULT_QUANTILES, posterior_array, uncertainties_fraction_array, uncertainties_rate_array,
    },
    utils::{extract_count_operand, extract_f64_operand, into_py_output},
};

#[cfg(feature = "python-bindings")]
fn quantiles_or_default<'py>(
    py: Python<'py>, q: Option<&Bound<'py, PyAny>>,
) -> PyResult<ArrayD<f64>> {
    match q {
        Some(q) => extract_f64_operand(py, q),
        None => Ok(Array1::from(DEFAULT_QUANTILES.to_vec()).into_dyn()),
    }
}

/// Significance (z-score) of one-sided p-values.
///
/// Raises `ArithmeticError` if any p-value is at or below the smallest
/// positive normal double.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "significance_from_pvalue", signature = (pvalue), text_signature = "(pvalue, /)")]
fn py_significance_from_pvalue<'py>(
    py: Python<'py>, pvalue: &Bound<'py, PyAny>,
) -> PyResult<PyObject> {
    let pvalue = extract_f64_operand(py, pvalue)?;
    let out = significance_from_pvalue_array(&pvalue.view())?;
    Ok(into_py_output(py, out))
}

/// One-sided p-values of significances, `Φ(−z)`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(name = "pvalue_from_significance", signature = (zscore), text_signature = "(zscore, /)")]
fn py_pvalue_from_significance<'py>(
    py: Python<'py>, zscore: &Bound<'py, PyAny>,
) -> PyResult<PyObject> {
    let zscore = extract_f64_operand(py, zscore)?;
    Ok(into_py_output(py, pvalue_from_significance_array(&zscore.view())))
}

/// Detection significance of `n` counts over `alpha · b` expected background.
///
/// `k < 0` treats the background as exact, `k = 0` is classic Li & Ma and
/// `k > 0` bounds a fractional systematic uncertainty on `alpha`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    name = "significance",
    signature = (n, b, alpha, k = None),
    text_signature = "(n, b, alpha, k=0)"
)]
fn py_significance<'py>(
    py: Python<'py>, n: &Bound<'py, PyAny>, b: &Bound<'py, PyAny>, alpha: &Bound<'py, PyAny>,
    k: Option<&Bound<'py, PyAny>>,
) -> PyResult<PyObject> {
    let n = extract_count_operand(py, "n", n)?;
    let b = extract_f64_operand(py, b)?;
    let alpha = extract_f64_operand(py, alpha)?;
    let k = match k {
        Some(k) => extract_f64_operand(py, k)?,
        None => ArrayD::from_elem(IxDyn(&[]), 0.0),
    };
    let out = significance_array(&n.view(), &b.view(), &alpha.view(), &k.view())?;
    Ok(into_py_output(py, out))
}

/// Posterior density of the source rate.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    name = "posterior",
    signature = (rate, n, b, alpha, exposure = 1.0),
    text_signature = "(rate, n, b, alpha, exposure=1.0)"
)]
fn py_posterior<'py>(
    py: Python<'py>, rate: &Bound<'py, PyAny>, n: &Bound<'py, PyAny>, b: &Bound<'py, PyAny>,
    alpha: &Bound<'py, PyAny>, exposure: f64,
) -> PyResult<PyObject> {
    let rate = extract_f64_operand(py, rate)?;
    let n = extract_count_operand(py, "n", n)?;
    let b = extract_f64_operand(py, b)?;
    let alpha = extract_f64_operand(py, alpha)?;
    let out = posterior_array(&rate.view(), &n.view(), &b.view(), &alpha.view(), exposure)?;
    Ok(into_py_output(py, out))
}

/// Flat-prior quantiles of a Poisson rate after `k` events.
///
/// By default returns the median, lower and upper one-sigma bounds.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    name = "uncertainties_rate",
    signature = (k, q = None, exposure = 1.0),
    text_signature = "(k, q=DEFAULT_QUANTILES, exposure=1.0)"
)]
fn py_uncertainties_rate<'py>(
    py: Python<'py>, k: &Bound<'py, PyAny>, q: Option<&Bound<'py, PyAny>>, exposure: f64,
) -> PyResult<PyObject> {
    let k = extract_count_operand(py, "k", k)?;
    let q = quantiles_or_default(py, q)?;
    let out = uncertainties_rate_array(&k.view(), &q.view(), exposure)?;
    Ok(into_py_output(py, out))
}

/// Flat-prior quantiles of a success fraction after `k` of `n`.
///
/// By default returns the median, upper and lower one-sigma bounds.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    name = "uncertainties_fraction",
    signature = (k, n, q = None),
    text_signature = "(k, n, q=DEFAULT_QUANTILES)"
)]
fn py_uncertainties_fraction<'py>(
    py: Python<'py>, k: &Bound<'py, PyAny>, n: &Bound<'py, PyAny>, q: Option<&Bound<'py, PyAny>>,
) -> PyResult<PyObject> {
    let k = extract_count_operand(py, "k", k)?;
    let n = extract_count_operand(py, "n", n)?;
    let q = quantiles_or_default(py, q)?;
    let out = uncertainties_fraction_array(&k.view(), &n.view(), &q.view())?;
    Ok(into_py_output(py, out))
}

/// _poisson_regime — PyO3 module initializer.
///
/// Registers the conversion, significance, posterior and uncertainty
/// functions together with the `DEFAULT_QUANTILES` and `TINY` constants.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _poisson_regime<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_significance_from_pvalue, m)?)?;
    m.add_function(wrap_pyfunction!(py_pvalue_from_significance, m)?)?;
    m.add_function(wrap_pyfunction!(py_significance, m)?)?;
    m.add_function(wrap_pyfunction!(py_posterior, m)?)?;
    m.add_function(wrap_pyfunction!(py_uncertainties_rate, m)?)?;
    m.add_function(wrap_pyfunction!(py_uncertainties_fraction, m)?)?;
    m.add("DEFAULT_QUANTILES", DEFAULT_QUANTILES.to_vec())?;
    m.add("TINY", significance::TINY)?;
    Ok(())
}
