use tracing::{debug, warn};

use super::{CriterionPhase, Lifecycle, OptimizerState, StoppingCriterion};

/// Default patience.
pub const DEFAULT_PATIENCE: u64 = 10;

/// Stops after more than `num_iterations` consecutive iterations whose
/// relative fitness change stays below `minimum_improvement`.
///
/// The relative change is `|last - current| / last`, measured against the
/// fitness recorded at the last improvement. The change is not directional:
/// a large enough worsening also counts as improvement. An infinite baseline
/// always counts as improvement.
#[derive(Debug, Clone)]
pub struct MaxIterationsWithoutImprovement {
    num_iterations: u64,
    minimum_improvement: f64,
    last_fitness: Option<f64>,
    no_improvement: u64,
    lifecycle: Lifecycle,
}

impl MaxIterationsWithoutImprovement {
    pub fn new() -> Self {
        Self {
            num_iterations: DEFAULT_PATIENCE,
            minimum_improvement: 0.0,
            last_fitness: None,
            no_improvement: 0,
            lifecycle: Lifecycle::new(),
        }
    }

    /// Builds a criterion from patience and threshold; invalid values keep
    /// their defaults.
    pub fn with_settings(num_iterations: u64, minimum_improvement: f64) -> Self {
        let mut criterion = Self::new();
        criterion.set_num_iterations(num_iterations);
        criterion.set_minimum_improvement(minimum_improvement);
        criterion
    }

    pub fn num_iterations(&self) -> u64 {
        self.num_iterations
    }

    /// Rejects a patience below 1, keeping the previous value.
    pub fn set_num_iterations(&mut self, value: u64) -> bool {
        if value < 1 {
            warn!(
                "Rejected patience {}: must be >= 1, keeping {}",
                value, self.num_iterations
            );
            return false;
        }
        self.num_iterations = value;
        true
    }

    pub fn minimum_improvement(&self) -> f64 {
        self.minimum_improvement
    }

    /// Rejects thresholds outside `[0, 1]`, keeping the previous value.
    pub fn set_minimum_improvement(&mut self, value: f64) -> bool {
        if !(0.0..=1.0).contains(&value) {
            warn!(
                "Rejected minimum improvement {}: must be within [0, 1], keeping {}",
                value, self.minimum_improvement
            );
            return false;
        }
        self.minimum_improvement = value;
        true
    }

    /// Consecutive non-improving iterations seen so far.
    pub fn iterations_without_improvement(&self) -> u64 {
        self.no_improvement
    }

    fn evaluate(&mut self, current: f64) -> bool {
        let last = match self.last_fitness {
            Some(last) => last,
            None => {
                self.last_fitness = Some(current);
                self.no_improvement = 0;
                return false;
            }
        };

        let improvement = if last == 0.0 {
            warn!("Last fitness is 0, cannot compute relative improvement; assuming 0");
            0.0
        } else {
            (last - current).abs() / last
        };

        if improvement >= self.minimum_improvement || last.is_infinite() {
            self.last_fitness = Some(current);
            self.no_improvement = 0;
            return false;
        }

        self.no_improvement += 1;
        debug!(
            "No improvement for {} iterations (relative change {})",
            self.no_improvement, improvement
        );
        self.no_improvement > self.num_iterations
    }
}

impl Default for MaxIterationsWithoutImprovement {
    fn default() -> Self {
        Self::new()
    }
}

impl StoppingCriterion for MaxIterationsWithoutImprovement {
    fn name(&self) -> &'static str {
        "max_iterations_without_improvement"
    }

    fn start(&mut self) {
        self.last_fitness = None;
        self.no_improvement = 0;
        self.lifecycle.activate();
    }

    fn check_stopping(&mut self, state: &dyn OptimizerState) -> bool {
        if self.lifecycle.is_stopped() {
            return true;
        }
        if self.lifecycle.needs_start(self.name()) {
            self.start();
        }
        let stop = self.evaluate(state.current_fitness());
        self.lifecycle.record(stop)
    }

    fn phase(&self) -> CriterionPhase {
        self.lifecycle.phase()
    }
}
