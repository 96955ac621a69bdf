//! Real polynomials with pluggable root-finding.
//!
//! [`Polynomial`] is an immutable coefficient vector that lazily memoizes its
//! roots. Roots come from a [`RootSolver`] session, picked through a
//! [`SolverConfig`] (or the process-wide [`registry`]). On top of that we
//! have exact long [division](Division), [conjugate pairing](check_roots) of
//! noisy root sets, and extraction of common factors between two
//! polynomials with a [`Simplifier`].

mod cache;
mod conjugate;
mod division;
mod error;
mod fast;
mod poly;
mod quadratic;
pub mod registry;
mod robust;
mod simplify;
mod solver;
mod unit_roots;

#[cfg(any(test, feature = "arbitrary"))]
pub mod arbitrary;

pub use conjugate::{check_roots, smooth_root};
pub use division::{divide_coefficients, is_sentinel, Division};
pub use error::{Error, Result};
pub use fast::FastSolver;
pub use num_complex::Complex64;
pub use poly::Polynomial;
pub use robust::RobustSolver;
pub use simplify::{Simplification, Simplifier};
pub use solver::{RootSolver, SolverConfig, SolverFactory, Strategy};
pub use unit_roots::UnitRoots;

/// Coefficients (and root parts) this close to a reference value are
/// treated as equal to it.
pub const EPSILON: f64 = 1e-9;

/// A candidate common root `r` is accepted by the simplifier when
/// `|p(r)|` is below this.
pub const ROOT_TOLERANCE: f64 = 1e-12;

/// Snaps `x` to `target` if it is within [`EPSILON`] of it.
fn snap(x: f64, target: f64) -> f64 {
    if (x - target).abs() <= EPSILON {
        target
    } else {
        x
    }
}
