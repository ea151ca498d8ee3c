//! The fitness-function contract evaluated by every optimizer.

use crate::vector::ParameterVector;

/// Scores a parameter vector. Higher fitness is better.
///
/// Implementations are shared by reference with the optimizer, so they may
/// be called from several evaluation threads; use interior mutability for
/// any bookkeeping.
pub trait FitnessFunction: Send + Sync {
    fn evaluate(&self, vector: &ParameterVector) -> f64;

    /// Notification that `vector` became the new best with `fitness`.
    fn on_new_best(&self, _fitness: f64, _vector: &ParameterVector) {}
}

impl<F> FitnessFunction for F
where
    F: Fn(&ParameterVector) -> f64 + Send + Sync,
{
    fn evaluate(&self, vector: &ParameterVector) -> f64 {
        self(vector)
    }
}
