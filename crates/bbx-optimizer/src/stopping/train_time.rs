use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};

use super::{CriterionPhase, Lifecycle, OptimizerState, StoppingCriterion};

/// Stops once the run has lasted at least `max_train_time` seconds.
///
/// A bound of 0 means unlimited. Elapsed time is measured on a monotonic
/// clock; the wall-clock start is kept only for reporting.
#[derive(Debug, Clone)]
pub struct MaxTrainTime {
    max_train_time: u64,
    started: Option<Instant>,
    started_at: Option<DateTime<Utc>>,
    lifecycle: Lifecycle,
}

impl MaxTrainTime {
    pub fn new() -> Self {
        Self {
            max_train_time: 0,
            started: None,
            started_at: None,
            lifecycle: Lifecycle::new(),
        }
    }

    pub fn with_bound(max_train_time: u64) -> Self {
        let mut criterion = Self::new();
        criterion.set_max_train_time(max_train_time);
        criterion
    }

    pub fn max_train_time(&self) -> u64 {
        self.max_train_time
    }

    /// Any non-negative number of seconds is valid, so this always accepts.
    pub fn set_max_train_time(&mut self, seconds: u64) -> bool {
        self.max_train_time = seconds;
        true
    }

    /// Wall-clock time of the last `start()`.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Time since the last `start()`, zero if never started.
    pub fn elapsed(&self) -> Duration {
        self.started.map(|s| s.elapsed()).unwrap_or_default()
    }
}

impl Default for MaxTrainTime {
    fn default() -> Self {
        Self::new()
    }
}

impl StoppingCriterion for MaxTrainTime {
    fn name(&self) -> &'static str {
        "max_train_time"
    }

    fn start(&mut self) {
        self.started = Some(Instant::now());
        self.started_at = Some(Utc::now());
        self.lifecycle.activate();
    }

    fn check_stopping(&mut self, _state: &dyn OptimizerState) -> bool {
        if self.lifecycle.is_stopped() {
            return true;
        }
        if self.lifecycle.needs_start(self.name()) {
            self.start();
        }
        if self.max_train_time == 0 {
            return false;
        }
        let stop = self.elapsed().as_secs() >= self.max_train_time;
        self.lifecycle.record(stop)
    }

    fn phase(&self) -> CriterionPhase {
        self.lifecycle.phase()
    }
}
