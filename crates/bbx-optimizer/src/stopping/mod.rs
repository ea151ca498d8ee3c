//! Pluggable stopping criteria for iterative optimizers.
//!
//! A driving loop calls [`StoppingCriterion::start`] once when a run begins
//! and [`StoppingCriterion::check_stopping`] once per iteration. Criteria are
//! independent of any particular optimizer; they only see the read-only
//! [`OptimizerState`] the loop exposes.

mod max_iterations;
mod registry;
mod set;
mod train_time;
mod without_improvement;

pub use max_iterations::MaxIterations;
pub use registry::StoppingConfig;
pub use set::StoppingSet;
pub use train_time::MaxTrainTime;
pub use without_improvement::MaxIterationsWithoutImprovement;

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Read-only view of an iterative optimizer between iterations.
pub trait OptimizerState {
    fn current_iteration(&self) -> u64;
    fn current_fitness(&self) -> f64;
}

/// Plain iteration/fitness pair implementing [`OptimizerState`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterationSnapshot {
    pub iteration: u64,
    pub fitness: f64,
}

impl IterationSnapshot {
    pub fn new(iteration: u64, fitness: f64) -> Self {
        Self { iteration, fitness }
    }
}

impl OptimizerState for IterationSnapshot {
    fn current_iteration(&self) -> u64 {
        self.iteration
    }

    fn current_fitness(&self) -> f64 {
        self.fitness
    }
}

/// Lifecycle of a criterion: `Created -> Active -> Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CriterionPhase {
    Created,
    Active,
    Stopped,
}

/// A predicate deciding whether an iterative optimizer should terminate.
///
/// Once `check_stopping` has returned `true` the criterion stays stopped
/// until `start` is called again.
pub trait StoppingCriterion: Send + fmt::Debug {
    /// Stable kind name, as used by [`StoppingConfig`].
    fn name(&self) -> &'static str;

    /// Resets internal state at the beginning of a run.
    fn start(&mut self);

    /// Returns `true` to request termination.
    fn check_stopping(&mut self, state: &dyn OptimizerState) -> bool;

    fn phase(&self) -> CriterionPhase;
}

/// Phase bookkeeping shared by the concrete criteria.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Lifecycle {
    phase: CriterionPhase,
}

impl Lifecycle {
    pub(crate) fn new() -> Self {
        Self {
            phase: CriterionPhase::Created,
        }
    }

    pub(crate) fn phase(&self) -> CriterionPhase {
        self.phase
    }

    pub(crate) fn activate(&mut self) {
        self.phase = CriterionPhase::Active;
    }

    pub(crate) fn is_stopped(&self) -> bool {
        self.phase == CriterionPhase::Stopped
    }

    /// True when `check_stopping` arrives before `start`; the caller is
    /// expected to start itself.
    pub(crate) fn needs_start(&self, name: &str) -> bool {
        if self.phase == CriterionPhase::Created {
            warn!("{} checked before start(), starting implicitly", name);
            return true;
        }
        false
    }

    /// Latches `Stopped` when `stop` is set and passes the decision through.
    pub(crate) fn record(&mut self, stop: bool) -> bool {
        if stop {
            self.phase = CriterionPhase::Stopped;
        }
        stop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_exposes_state() {
        let snapshot = IterationSnapshot::new(4, 0.25);
        let state: &dyn OptimizerState = &snapshot;
        assert_eq!(state.current_iteration(), 4);
        assert_eq!(state.current_fitness(), 0.25);
    }

    #[test]
    fn lifecycle_latches_stop() {
        let mut lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.phase(), CriterionPhase::Created);
        assert!(lifecycle.needs_start("test"));

        lifecycle.activate();
        assert!(!lifecycle.needs_start("test"));
        assert!(!lifecycle.record(false));
        assert_eq!(lifecycle.phase(), CriterionPhase::Active);

        assert!(lifecycle.record(true));
        assert!(lifecycle.is_stopped());

        lifecycle.activate();
        assert_eq!(lifecycle.phase(), CriterionPhase::Active);
    }
}
