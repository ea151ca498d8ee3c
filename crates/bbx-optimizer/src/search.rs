//! Exhaustive grid search over the discretized Cartesian product of all
//! variable domains.

use bbx_types::{BbxResult, FitnessFunction, ParameterVector};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, trace, warn};
use uuid::Uuid;

use crate::best::{BestSolution, OptimizerBase};
use crate::report::GridRunReport;

/// Default number of discretization points requested per variable.
pub const DEFAULT_SPLITS: usize = 3;

/// Relative distance from an axis maximum within which a grid point is
/// taken to be the maximum.
const SNAP_TOLERANCE: f64 = 1e-9;

/// Configuration for [`GridSearch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSearchConfig {
    /// Discretization points requested per variable (>= 1).
    #[serde(default = "default_splits")]
    pub splits: usize,
}

fn default_splits() -> usize {
    DEFAULT_SPLITS
}

impl Default for GridSearchConfig {
    fn default() -> Self {
        Self {
            splits: DEFAULT_SPLITS,
        }
    }
}

impl GridSearchConfig {
    /// Strict check, for configurations loaded from files.
    pub fn validate(&self) -> BbxResult<()> {
        if self.splits < 1 {
            return Err(bbx_types::config_error!(
                "grid splits must be >= 1, got {}",
                self.splits
            ));
        }
        Ok(())
    }
}

/// Grid search driven by an odometer-style traversal.
///
/// The first variable moves fastest; when it runs past its maximum it wraps
/// back to its minimum and carries into the next variable, exactly like a
/// mixed-radix counter. Best tracking persists across `optimise` calls on
/// the same instance.
#[derive(Debug)]
pub struct GridSearch {
    splits: usize,
    base: OptimizerBase,
    last_report: Option<GridRunReport>,
}

impl GridSearch {
    pub fn new() -> Self {
        Self {
            splits: DEFAULT_SPLITS,
            base: OptimizerBase::new(),
            last_report: None,
        }
    }

    /// Builds a search from `config`; out-of-range values fall back to the
    /// default with a warning.
    pub fn with_config(config: GridSearchConfig) -> Self {
        let mut search = Self::new();
        search.set_splits(config.splits);
        search
    }

    pub fn splits(&self) -> usize {
        self.splits
    }

    /// Sets the number of splits. Values below 1 are rejected and the
    /// previous value is kept. Returns whether the value was accepted.
    pub fn set_splits(&mut self, splits: usize) -> bool {
        if splits < 1 {
            warn!(
                "Rejected grid splits {}: must be >= 1, keeping {}",
                splits, self.splits
            );
            return false;
        }
        self.splits = splits;
        true
    }

    pub fn config(&self) -> GridSearchConfig {
        GridSearchConfig {
            splits: self.splits,
        }
    }

    /// Accumulated best-solution tracker.
    pub fn base(&self) -> &OptimizerBase {
        &self.base
    }

    pub fn last_report(&self) -> Option<&GridRunReport> {
        self.last_report.as_ref()
    }

    /// Number of evaluations one `optimise` run performs on `vector`: every
    /// grid point (the all-minimum corner being the first) plus the explicit
    /// all-maximum corner.
    pub fn expected_evaluations(&self, vector: &ParameterVector) -> BbxResult<usize> {
        let mut points: usize = 1;
        for name in vector.var_names() {
            points = points.saturating_mul(vector.domain(&name)?.steps(self.splits));
        }
        Ok(points.saturating_add(1))
    }

    /// Runs the full traversal over `vector`, which is consumed and disposed
    /// once the grid is exhausted. Returns the best solution accumulated so
    /// far on this instance.
    pub fn optimise(
        &mut self,
        mut vector: ParameterVector,
        fitness_fn: &dyn FitnessFunction,
    ) -> BbxResult<Option<BestSolution>> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let names = vector.var_names();

        let mut steps = Vec::with_capacity(names.len());
        for name in &names {
            steps.push(vector.domain(name)?.step_size(self.splits));
        }

        info!(
            "Starting grid search {} over {} variables with {} splits",
            run_id,
            names.len(),
            self.splits
        );

        let mut evaluations = 0usize;

        vector.set_all_to_min()?;
        self.evaluate(&vector, fitness_fn, &mut evaluations);

        while Self::advance(&mut vector, &names, &steps)? {
            self.evaluate(&vector, fitness_fn, &mut evaluations);
        }

        // The step arithmetic may not land exactly on every maximum.
        vector.set_all_to_max()?;
        self.evaluate(&vector, fitness_fn, &mut evaluations);

        vector.dispose();

        let report = GridRunReport {
            run_id,
            evaluations,
            best_fitness: self.base.best_fitness(),
            started_at,
            finished_at: Utc::now(),
        };
        info!(
            "Grid search {} finished: {} evaluations, best fitness {}",
            run_id, report.evaluations, report.best_fitness
        );
        self.last_report = Some(report);

        Ok(self.base.best())
    }

    /// One odometer increment. Returns `false` once every variable has
    /// wrapped, i.e. the grid is exhausted.
    ///
    /// Repeated addition of the step drifts, so a point within a small
    /// relative tolerance of `max` is snapped onto it instead of being
    /// carried past the end of the axis.
    fn advance(vector: &mut ParameterVector, names: &[String], steps: &[f64]) -> BbxResult<bool> {
        for (name, &step) in names.iter().zip(steps) {
            let domain = vector.domain(name)?;
            let (min, max) = (domain.min(), domain.max());
            let current = vector.get(name)?;
            let next = current + step;
            let tolerance = max.abs().max(step) * SNAP_TOLERANCE;

            // A step too small to move `current` would never reach `max`.
            if step == 0.0 || current >= max || next == current || next > max + tolerance {
                vector.set(name, min)?;
                continue;
            }
            let next = if next >= max - tolerance { max } else { next };
            vector.set(name, next)?;
            return Ok(true);
        }
        Ok(false)
    }

    fn evaluate(
        &self,
        vector: &ParameterVector,
        fitness_fn: &dyn FitnessFunction,
        evaluations: &mut usize,
    ) {
        let fitness = fitness_fn.evaluate(vector);
        *evaluations += 1;
        trace!("Grid point {} -> {}", vector, fitness);
        self.base.check_best(fitness, vector, fitness_fn);
    }

    /// Releases the recorded best.
    pub fn dispose(&self) {
        self.base.dispose();
    }
}

impl Default for GridSearch {
    fn default() -> Self {
        Self::new()
    }
}
