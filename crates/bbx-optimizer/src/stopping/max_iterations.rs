use tracing::warn;

use super::{CriterionPhase, Lifecycle, OptimizerState, StoppingCriterion};

/// Default iteration bound.
pub const DEFAULT_MAX_ITERATIONS: u64 = 10_000_000;

/// Stops once the iteration counter reaches the bound.
#[derive(Debug, Clone)]
pub struct MaxIterations {
    num_iterations: u64,
    lifecycle: Lifecycle,
}

impl MaxIterations {
    pub fn new() -> Self {
        Self {
            num_iterations: DEFAULT_MAX_ITERATIONS,
            lifecycle: Lifecycle::new(),
        }
    }

    /// Builds a criterion with `num_iterations`; an invalid bound keeps the default.
    pub fn with_bound(num_iterations: u64) -> Self {
        let mut criterion = Self::new();
        criterion.set_num_iterations(num_iterations);
        criterion
    }

    pub fn num_iterations(&self) -> u64 {
        self.num_iterations
    }

    /// Rejects bounds below 1, keeping the previous value.
    pub fn set_num_iterations(&mut self, value: u64) -> bool {
        if value < 1 {
            warn!(
                "Rejected max iterations {}: must be >= 1, keeping {}",
                value, self.num_iterations
            );
            return false;
        }
        self.num_iterations = value;
        true
    }
}

impl Default for MaxIterations {
    fn default() -> Self {
        Self::new()
    }
}

impl StoppingCriterion for MaxIterations {
    fn name(&self) -> &'static str {
        "max_iterations"
    }

    fn start(&mut self) {
        self.lifecycle.activate();
    }

    fn check_stopping(&mut self, state: &dyn OptimizerState) -> bool {
        if self.lifecycle.is_stopped() {
            return true;
        }
        if self.lifecycle.needs_start(self.name()) {
            self.start();
        }
        let stop = state.current_iteration() >= self.num_iterations;
        self.lifecycle.record(stop)
    }

    fn phase(&self) -> CriterionPhase {
        self.lifecycle.phase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stopping::IterationSnapshot;

    #[test]
    fn stops_at_bound() {
        let mut criterion = MaxIterations::with_bound(5);
        criterion.start();
        for i in 0..5 {
            assert!(!criterion.check_stopping(&IterationSnapshot::new(i, 0.0)));
        }
        assert!(criterion.check_stopping(&IterationSnapshot::new(5, 0.0)));
        assert_eq!(criterion.phase(), CriterionPhase::Stopped);
    }

    #[test]
    fn bound_of_one_stops_at_first_iteration() {
        let mut criterion = MaxIterations::with_bound(1);
        criterion.start();
        assert!(!criterion.check_stopping(&IterationSnapshot::new(0, 0.0)));
        assert!(criterion.check_stopping(&IterationSnapshot::new(1, 0.0)));
    }

    #[test]
    fn stays_stopped_until_restarted() {
        let mut criterion = MaxIterations::with_bound(2);
        criterion.start();
        assert!(criterion.check_stopping(&IterationSnapshot::new(3, 0.0)));
        assert!(criterion.check_stopping(&IterationSnapshot::new(0, 0.0)));

        criterion.start();
        assert_eq!(criterion.phase(), CriterionPhase::Active);
        assert!(!criterion.check_stopping(&IterationSnapshot::new(0, 0.0)));
    }

    #[test]
    fn rejects_zero_bound() {
        let mut criterion = MaxIterations::new();
        assert!(!criterion.set_num_iterations(0));
        assert_eq!(criterion.num_iterations(), DEFAULT_MAX_ITERATIONS);
        assert_eq!(MaxIterations::with_bound(0).num_iterations(), DEFAULT_MAX_ITERATIONS);
    }

    #[test]
    fn implicit_start_on_first_check() {
        let mut criterion = MaxIterations::with_bound(3);
        assert_eq!(criterion.phase(), CriterionPhase::Created);
        assert!(!criterion.check_stopping(&IterationSnapshot::new(1, 0.0)));
        assert_eq!(criterion.phase(), CriterionPhase::Active);
    }
}
