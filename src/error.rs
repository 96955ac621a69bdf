use num_complex::Complex64;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures that callers are expected to branch on.
///
/// A root solver giving up is deliberately absent: that surfaces as `None`
/// from [`Polynomial::roots`](crate::Polynomial::roots), meaning "unknown".
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A complex root had no conjugate partner in the root set.
    #[error("conjugate pairing failed: no partner for root {root}")]
    UnpairedRoot { root: Complex64 },

    #[error("division by the zero polynomial")]
    DivisionByZero,
}
