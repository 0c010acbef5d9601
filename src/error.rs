//! Crate-wide error type.
//!
//! Follows the plain hand-rolled enum idiom used throughout qvnt's own
//! `qasm::int::error` and `qasm::ast::error` modules rather than reaching
//! for `thiserror`: a `Clone + Debug + PartialEq` enum plus a local
//! `Result<T>` alias.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Coefficient vector length is not a power of two, or exceeds 2^31, or
    /// `n` is zero or would exceed the 31-qubit limit on a 32-bit basis
    /// index.
    InvalidShape { len: usize },
    /// `‖state‖²` differs from 1 by more than `NORM_EPS`.
    NotNormalized { norm_sqr: f64 },
    /// No coefficient exceeds `EPS` in magnitude.
    AllZero,
    /// An `S`/`T`/`T†`/`S†` gate (or any non-real-orthogonal gate) was
    /// applied to an [`crate::state::RState`], or an adjoint was requested
    /// of a realization that does not support it.
    ContractViolation(String),
    /// A bounded search (BFS engine, Solovay-Kitaev recursion, MITM word
    /// search) exhausted its budget before meeting its target.
    BudgetExceeded(String),
    /// Textual emission or parsing failed.
    IOError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidShape { len } => {
                write!(f, "coefficient vector of length {len} is not a power of two in [2, 2^31]")
            }
            Error::NotNormalized { norm_sqr } => {
                write!(f, "state norm^2 = {norm_sqr} is not within 1e-4 of 1")
            }
            Error::AllZero => write!(f, "all coefficients are below EPS"),
            Error::ContractViolation(msg) => write!(f, "contract violation: {msg}"),
            Error::BudgetExceeded(msg) => write!(f, "search budget exceeded: {msg}"),
            Error::IOError(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
