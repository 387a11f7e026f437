//! errors — crate-wide error type for significance and uncertainty routines.
//!
//! Purpose
//! -------
//! Provide the single error enum and result alias used by every public entry
//! point of the crate, together with a conversion layer to Python exceptions
//! for PyO3-based bindings.
//!
//! Key behaviors
//! -------------
//! - Define [`StatError`] and [`StatResult`] as the canonical error and
//!   result types for conversions, detection significance, posterior and
//!   quantile computations.
//! - Classify every variant into one of two kinds via [`StatError::kind`]:
//!   [`StatErrorKind::Domain`] (no finite answer exists at `f64` precision)
//!   and [`StatErrorKind::Precondition`] (malformed counts, quantiles or
//!   shapes).
//! - Implement `From<StatError> for PyErr`, mapping domain failures to
//!   `ArithmeticError` and precondition failures to `AssertionError`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Errors are raised only for violated preconditions. IEEE floating-point
//!   behavior (e.g. `alpha = 0` producing ±∞ or NaN) is propagated through
//!   return values and never turned into a `StatError`.
//! - Every variant carries the offending value(s) so messages can be
//!   reported without access to the original inputs.
//!
//! Conventions
//! -----------
//! - Messages are phrased in terms of the violated constraint, e.g.
//!   "Quantile must be between zero and one".
//!
//! Testing notes
//! -------------
//! - Unit tests verify `Display` payload embedding and the kind mapping.
//!   The PyO3 conversion is exercised from Python.

#[cfg(feature = "python-bindings")]
use pyo3::{
    PyErr,
    exceptions::{PyArithmeticError, PyAssertionError},
};

pub type StatResult<T> = Result<T, StatError>;

/// The two failure classes a caller may need to tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatErrorKind {
    /// The input is valid in type but no finite result exists at `f64`
    /// precision.
    Domain,
    /// The input violates a documented precondition (integer counts,
    /// `k ≤ n`, quantiles in `(0, 1)`, broadcastable shapes).
    Precondition,
}

/// StatError — failure conditions for significance and uncertainty routines.
///
/// Variants
/// --------
/// - `PValueTooSmall { value }`
///   A p-value is not strictly greater than [`TINY`](crate::significance::TINY),
///   so no finite significance can be computed.
/// - `QuantileOutOfRange { value }`
///   A requested quantile lies outside the open interval `(0, 1)`.
/// - `CountExceedsTrials { k, n }`
///   Fraction uncertainties were requested with more successes than trials.
/// - `NonIntegerCount { name, value }`
///   A count argument arrived as a non-integer value (only reachable from
///   dynamically typed callers, e.g. the Python bindings).
/// - `NegativeCount { name, value }`
///   A count argument arrived as a negative integer.
/// - `ShapeMismatch { left, right }`
///   Two array arguments cannot be broadcast against each other.
#[derive(Debug, Clone, PartialEq)]
pub enum StatError {
    // ---- Domain ----
    PValueTooSmall { value: f64 },

    // ---- Preconditions ----
    QuantileOutOfRange { value: f64 },
    CountExceedsTrials { k: u64, n: u64 },
    NonIntegerCount { name: &'static str, value: f64 },
    NegativeCount { name: &'static str, value: i64 },
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },
}

impl StatError {
    /// Classify the error as a domain or a precondition failure.
    pub fn kind(&self) -> StatErrorKind {
        match self {
            StatError::PValueTooSmall { .. } => StatErrorKind::Domain,
            StatError::QuantileOutOfRange { .. }
            | StatError::CountExceedsTrials { .. }
            | StatError::NonIntegerCount { .. }
            | StatError::NegativeCount { .. }
            | StatError::ShapeMismatch { .. } => StatErrorKind::Precondition,
        }
    }
}

impl std::error::Error for StatError {}

impl std::fmt::Display for StatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Domain ----
            StatError::PValueTooSmall { value } => write!(
                f,
                "pvalue {value:e} is too small for a significance computation."
            ),

            // ---- Preconditions ----
            StatError::QuantileOutOfRange { value } => {
                write!(f, "Quantile must be between zero and one (got {value}).")
            }
            StatError::CountExceedsTrials { k, n } => {
                write!(f, "k must be smaller than n (got k = {k}, n = {n}).")
            }
            StatError::NonIntegerCount { name, value } => {
                write!(f, "{name} must be integer (got {value}).")
            }
            StatError::NegativeCount { name, value } => {
                write!(f, "{name} must be non-negative (got {value}).")
            }
            StatError::ShapeMismatch { left, right } => write!(
                f,
                "operands could not be broadcast together with shapes {left:?} {right:?}"
            ),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<StatError> for PyErr {
    fn from(err: StatError) -> PyErr {
        match err.kind() {
            StatErrorKind::Domain => PyArithmeticError::new_err(err.to_string()),
            StatErrorKind::Precondition => PyAssertionError::new_err(err.to_string()),
        }
    }
}
