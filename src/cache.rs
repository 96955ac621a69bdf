use std::sync::Arc;

use num_complex::Complex64;
use parking_lot::RwLock;

/// A memoized root set attached to a [`Polynomial`](crate::Polynomial).
///
/// Two threads that both see the cache empty will both run a solver and
/// both store; the last store wins. The coefficients never change, so every
/// writer stores an equivalent answer and only the pointer swap has to be
/// atomic.
#[derive(Debug, Default)]
pub(crate) struct RootCache {
    roots: RwLock<Option<Arc<[Complex64]>>>,
}

impl RootCache {
    pub(crate) fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn with(roots: Arc<[Complex64]>) -> Self {
        RootCache {
            roots: RwLock::new(Some(roots)),
        }
    }

    pub(crate) fn get(&self) -> Option<Arc<[Complex64]>> {
        self.roots.read().clone()
    }

    pub(crate) fn store(&self, roots: Arc<[Complex64]>) {
        *self.roots.write() = Some(roots);
    }
}

impl Clone for RootCache {
    fn clone(&self) -> Self {
        RootCache {
            roots: RwLock::new(self.get()),
        }
    }
}
