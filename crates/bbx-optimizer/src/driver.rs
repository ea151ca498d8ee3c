//! A minimal iterative loop governed by a stopping criterion.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::stopping::{IterationSnapshot, StoppingCriterion};

/// Cloneable cancellation flag for a running loop.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Why a driven loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    Criterion,
    Cancelled,
}

/// Result of [`drive`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriveOutcome {
    pub iterations: u64,
    pub last_fitness: f64,
    pub reason: StopReason,
}

/// Runs `step` until `criterion` or `handle` ends the loop.
///
/// The criterion is started once, then checked before every iteration
/// against the iteration counter and the most recent fitness, beginning
/// with `initial_fitness`. `step` receives the current iteration number and
/// returns the fitness it reached.
pub fn drive<F>(
    criterion: &mut dyn StoppingCriterion,
    handle: &StopHandle,
    initial_fitness: f64,
    mut step: F,
) -> DriveOutcome
where
    F: FnMut(u64) -> f64,
{
    criterion.start();
    let mut snapshot = IterationSnapshot::new(0, initial_fitness);

    let reason = loop {
        if criterion.check_stopping(&snapshot) {
            break StopReason::Criterion;
        }
        if handle.is_stopped() {
            warn!("Interrupted after {} iterations", snapshot.iteration);
            break StopReason::Cancelled;
        }

        snapshot.fitness = step(snapshot.iteration);
        debug!("iteration {}\tfitness {}", snapshot.iteration, snapshot.fitness);
        snapshot.iteration += 1;
    };

    info!(
        "Loop finished after {} iterations ({:?}), fitness {}",
        snapshot.iteration, reason, snapshot.fitness
    );

    DriveOutcome {
        iterations: snapshot.iteration,
        last_fitness: snapshot.fitness,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stopping::{
        MaxIterations, MaxIterationsWithoutImprovement, MaxTrainTime, StoppingSet,
    };

    #[test]
    fn runs_until_iteration_bound() {
        let mut criterion = MaxIterations::with_bound(25);
        let outcome = drive(&mut criterion, &StopHandle::new(), 0.0, |i| i as f64);
        assert_eq!(outcome.iterations, 25);
        assert_eq!(outcome.last_fitness, 24.0);
        assert_eq!(outcome.reason, StopReason::Criterion);
    }

    #[test]
    fn plateau_triggers_patience() {
        let mut criterion = MaxIterationsWithoutImprovement::with_settings(3, 0.01);
        // converges to 1.0 after a few iterations
        let outcome = drive(&mut criterion, &StopHandle::new(), 100.0, |i| {
            if i < 4 {
                100.0 / 2f64.powi(i as i32 + 1)
            } else {
                1.0
            }
        });
        assert_eq!(outcome.reason, StopReason::Criterion);
        assert_eq!(outcome.last_fitness, 1.0);
        assert!(outcome.iterations < 20);
    }

    #[test]
    fn cancellation_ends_loop() {
        let handle = StopHandle::new();
        let inner = handle.clone();
        let mut criterion = MaxIterations::new();
        let outcome = drive(&mut criterion, &handle, 0.0, |i| {
            if i == 9 {
                inner.stop();
            }
            1.0
        });
        assert_eq!(outcome.iterations, 10);
        assert_eq!(outcome.reason, StopReason::Cancelled);
    }

    #[test]
    fn criterion_set_drives_loop() {
        let mut set = StoppingSet::new()
            .with(MaxIterations::with_bound(5))
            .with(MaxIterationsWithoutImprovement::new());
        let outcome = drive(&mut set, &StopHandle::new(), 1.0, |_| 1.0);
        assert_eq!(outcome.iterations, 5);
        assert_eq!(set.stopped_by(), vec!["max_iterations"]);
    }

    #[test]
    fn iteration_cap_ends_otherwise_unbounded_run() {
        // unlimited train time and a zero threshold never ask to stop
        let mut set = StoppingSet::new()
            .with(MaxTrainTime::new())
            .with(MaxIterationsWithoutImprovement::with_settings(10, 0.0))
            .with(MaxIterations::with_bound(200));
        let outcome = drive(&mut set, &StopHandle::new(), 1.0, |i| 1.0 / (1.0 + i as f64));
        assert_eq!(outcome.iterations, 200);
        assert_eq!(outcome.reason, StopReason::Criterion);
        assert_eq!(set.stopped_by(), vec!["max_iterations"]);
    }
}
