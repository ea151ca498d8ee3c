//! Best-solution tracking shared by every optimizer.

use bbx_types::{FitnessFunction, ParameterVector};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A recorded best: the fitness and a private copy of the vector that scored it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestSolution {
    pub fitness: f64,
    pub vector: ParameterVector,
}

#[derive(Debug)]
struct BestState {
    fitness: f64,
    vector: Option<ParameterVector>,
}

/// Owns the single best fitness / best vector pair found so far.
///
/// All updates go through [`OptimizerBase::check_best`], which serializes
/// callers on one per-instance lock.
#[derive(Debug)]
pub struct OptimizerBase {
    state: Mutex<BestState>,
}

impl OptimizerBase {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BestState {
                fitness: f64::NEG_INFINITY,
                vector: None,
            }),
        }
    }

    /// Records `vector` as the new best if `fitness` is strictly greater than
    /// the current best. Ties keep the earlier vector.
    ///
    /// The compare, clone, replace and `on_new_best` notification all run
    /// under the lock, so the callback always observes a committed best.
    /// Returns whether the candidate was accepted.
    pub fn check_best(
        &self,
        fitness: f64,
        vector: &ParameterVector,
        fitness_fn: &dyn FitnessFunction,
    ) -> bool {
        let mut state = self.state.lock();
        // NaN is never recorded.
        if fitness.is_nan() || fitness <= state.fitness {
            return false;
        }

        if let Some(mut previous) = state.vector.take() {
            previous.dispose();
        }
        state.vector = Some(vector.clone());
        state.fitness = fitness;
        debug!("New best fitness {} at {}", fitness, vector);

        fitness_fn.on_new_best(fitness, vector);
        true
    }

    /// Best fitness so far, `-inf` before anything has been recorded.
    pub fn best_fitness(&self) -> f64 {
        self.state.lock().fitness
    }

    /// An independent snapshot of the current best, if any.
    pub fn best(&self) -> Option<BestSolution> {
        let state = self.state.lock();
        state.vector.as_ref().map(|vector| BestSolution {
            fitness: state.fitness,
            vector: vector.clone(),
        })
    }

    /// Tears down the recorded best vector.
    pub fn dispose(&self) {
        let mut state = self.state.lock();
        if let Some(mut vector) = state.vector.take() {
            vector.dispose();
        }
    }
}

impl Default for OptimizerBase {
    fn default() -> Self {
        Self::new()
    }
}
