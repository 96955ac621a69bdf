//! The process-wide default solvers.
//!
//! Most code should take a [`SolverConfig`] as a parameter. This registry
//! exists for the convenience entry points such as
//! [`Polynomial::roots`](crate::Polynomial::roots), which have nowhere to
//! take one from. Each slot is swapped atomically, but nothing orders a
//! read against a concurrent swap: a reader sees either the old factory or
//! the new one. A session, once built, is unaffected by later swaps.

use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::{RootSolver, SolverConfig};

static REGISTRY: OnceLock<RwLock<SolverConfig>> = OnceLock::new();

fn registry() -> &'static RwLock<SolverConfig> {
    REGISTRY.get_or_init(|| RwLock::new(SolverConfig::default()))
}

/// A snapshot of the current default factories.
pub fn config() -> SolverConfig {
    registry().read().clone()
}

/// Installs a new default factory for the fast strategy.
pub fn set_fast_factory(factory: impl Fn() -> Box<dyn RootSolver> + Send + Sync + 'static) {
    registry().write().set_fast(Arc::new(factory));
}

/// Installs a new default factory for the robust strategy.
pub fn set_robust_factory(factory: impl Fn() -> Box<dyn RootSolver> + Send + Sync + 'static) {
    registry().write().set_robust(Arc::new(factory));
}

/// Puts the built-in factories back.
pub fn reset() {
    *registry().write() = SolverConfig::default();
}

/// A new session of the current default fast solver.
pub fn fast_solver() -> Box<dyn RootSolver> {
    // Build outside the lock, so a factory may itself consult the registry.
    let config = config();
    config.fast_solver()
}

/// A new session of the current default robust solver.
pub fn robust_solver() -> Box<dyn RootSolver> {
    let config = config();
    config.robust_solver()
}
