//! Run bookkeeping for completed grid searches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique optimization run identifier.
pub type RunId = Uuid;

/// Summary of one `GridSearch::optimise` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRunReport {
    pub run_id: RunId,
    /// Fitness evaluations performed during the run, corners included.
    pub evaluations: usize,
    /// Best fitness held by the optimizer when the run finished. This is
    /// cumulative over every run on the same optimizer.
    pub best_fitness: f64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl GridRunReport {
    /// Wall-clock duration of the run.
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Whether any evaluation produced a finite best.
    pub fn found_finite_best(&self) -> bool {
        self.best_fitness.is_finite()
    }
}
