use std::fmt;
use std::sync::Arc;

use num_complex::Complex64;

use crate::{FastSolver, Polynomial, RobustSolver};

/// A numerical root-finding session.
///
/// A session is stateful and not reentrant: call [`RootSolver::clear`]
/// before reusing it for another polynomial, and don't share it between
/// threads while a `factorize`/`roots`/`clear` cycle is in progress.
pub trait RootSolver {
    /// Resets the session to its idle state.
    fn clear(&mut self);

    /// Tries to split `p` into real linear and quadratic factors.
    ///
    /// Returns `true` if at least part of `p` was factored. A constant
    /// polynomial has no roots, and implementations must report that without
    /// running any iteration.
    fn factorize(&mut self, p: &Polynomial) -> bool;

    /// The part of the polynomial that has not been factored. This is the
    /// original polynomial if `factorize` failed completely.
    fn remainder(&self) -> Polynomial;

    /// The roots found by the last successful `factorize`, and empty
    /// otherwise.
    fn roots(&self) -> &[Complex64];
}

/// Builds a fresh solver session.
pub type SolverFactory = Arc<dyn Fn() -> Box<dyn RootSolver> + Send + Sync>;

/// Which kind of solver to use.
#[derive(Clone)]
pub enum Strategy {
    /// Complete factorization, tuned for the common case of simple roots.
    Fast,
    /// Slower, but copes with multiple and nearly-multiple roots.
    Robust,
    Custom(SolverFactory),
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Fast => f.write_str("Fast"),
            Strategy::Robust => f.write_str("Robust"),
            Strategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// The solver factories handed to code that needs "the default" solver.
#[derive(Clone)]
pub struct SolverConfig {
    fast: SolverFactory,
    robust: SolverFactory,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            fast: Arc::new(|| Box::new(FastSolver::new()) as Box<dyn RootSolver>),
            robust: Arc::new(|| Box::new(RobustSolver::new()) as Box<dyn RootSolver>),
        }
    }
}

impl fmt::Debug for SolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverConfig").finish_non_exhaustive()
    }
}

impl SolverConfig {
    /// Replaces the factory for [`Strategy::Fast`].
    pub fn with_fast(
        mut self,
        factory: impl Fn() -> Box<dyn RootSolver> + Send + Sync + 'static,
    ) -> Self {
        self.fast = Arc::new(factory);
        self
    }

    /// Replaces the factory for [`Strategy::Robust`].
    pub fn with_robust(
        mut self,
        factory: impl Fn() -> Box<dyn RootSolver> + Send + Sync + 'static,
    ) -> Self {
        self.robust = Arc::new(factory);
        self
    }

    pub(crate) fn set_fast(&mut self, factory: SolverFactory) {
        self.fast = factory;
    }

    pub(crate) fn set_robust(&mut self, factory: SolverFactory) {
        self.robust = factory;
    }

    /// Creates a new, idle session for `strategy`.
    pub fn solver(&self, strategy: Strategy) -> Box<dyn RootSolver> {
        match strategy {
            Strategy::Fast => (self.fast)(),
            Strategy::Robust => (self.robust)(),
            Strategy::Custom(factory) => factory(),
        }
    }

    pub fn fast_solver(&self) -> Box<dyn RootSolver> {
        (self.fast)()
    }

    pub fn robust_solver(&self) -> Box<dyn RootSolver> {
        (self.robust)()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A solver that hands out a fixed root set, and records how it is used.
    pub(crate) struct FakeSolver {
        answer: Option<Vec<Complex64>>,
        factorizing: bool,
        remainder: Option<Polynomial>,
        roots: Vec<Complex64>,
        pub(crate) calls: usize,
    }

    impl FakeSolver {
        pub(crate) fn new(answer: Option<Vec<Complex64>>) -> Self {
            FakeSolver {
                answer,
                factorizing: false,
                remainder: None,
                roots: Vec::new(),
                calls: 0,
            }
        }
    }

    impl RootSolver for FakeSolver {
        fn clear(&mut self) {
            self.factorizing = false;
            self.remainder = None;
            self.roots.clear();
        }

        fn factorize(&mut self, p: &Polynomial) -> bool {
            assert!(!self.factorizing, "factorize called without clear");
            self.factorizing = true;
            if p.degree() == 0 {
                self.remainder = Some(p.clone());
                return true;
            }
            self.calls += 1;
            match &self.answer {
                Some(roots) => {
                    self.roots = roots.clone();
                    self.remainder = Some(Polynomial::value_of(p.leading(), &[]));
                    true
                }
                None => {
                    self.remainder = Some(p.clone());
                    false
                }
            }
        }

        fn remainder(&self) -> Polynomial {
            self.remainder.clone().unwrap_or_else(Polynomial::zero)
        }

        fn roots(&self) -> &[Complex64] {
            &self.roots
        }
    }

    #[test]
    fn failure_is_unknown_not_empty() {
        let p = Polynomial::of(&[1.0, 0.0, 1.0]);
        let mut failing = FakeSolver::new(None);
        assert!(p.roots_with(Some(&mut failing)).is_none());
        assert!(p.cached_roots().is_none());
        assert_eq!(failing.remainder(), p);
        assert!(failing.roots().is_empty());

        let constant = Polynomial::value_of(2.0, &[]);
        assert_eq!(constant.roots_with(Some(&mut failing)).unwrap().len(), 0);
    }

    #[test]
    fn sessions_are_cleared_and_results_cached() {
        let p = Polynomial::of(&[-1.0, 0.0, 1.0]);
        let roots = vec![Complex64::new(1.0, 0.0), Complex64::new(-1.0, 0.0)];
        let mut solver = FakeSolver::new(Some(roots.clone()));
        solver.factorize(&Polynomial::of(&[1.0, 1.0]));

        // A used session is cleared before being handed a new polynomial.
        assert_eq!(&*p.roots_with(Some(&mut solver)).unwrap(), &roots[..]);
        assert_eq!(&*p.roots_with(Some(&mut solver)).unwrap(), &roots[..]);
        assert_eq!(solver.calls, 2);
        assert_eq!(solver.remainder().coeffs(), &[1.0]);
    }

    #[test]
    fn partial_results_are_not_cached() {
        let p = Polynomial::of(&[0.0, -1.0, 0.0, 1.0]);
        let mut solver = FakeSolver::new(Some(vec![Complex64::new(0.0, 0.0)]));
        assert_eq!(p.roots_with(Some(&mut solver)).unwrap().len(), 1);
        assert!(p.cached_roots().is_none());
    }

    #[test]
    fn custom_strategies() {
        let config = SolverConfig::default()
            .with_robust(|| Box::new(FakeSolver::new(Some(vec![Complex64::new(7.0, 0.0)]))));
        let p = Polynomial::of(&[-7.0, 1.0]);
        let roots = p.roots_using(&config, Strategy::Robust).unwrap();
        assert_eq!(&*roots, &[Complex64::new(7.0, 0.0)]);

        let factory: SolverFactory =
            Arc::new(|| Box::new(FakeSolver::new(None)) as Box<dyn RootSolver>);
        let q = Polynomial::of(&[-3.0, 1.0]);
        assert!(q.roots_using(&config, Strategy::Custom(factory)).is_none());
        assert_eq!(format!("{:?}", Strategy::Fast), "Fast");
    }
}
