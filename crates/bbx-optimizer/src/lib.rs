//! # bbx-optimizer
//!
//! Black-box parameter optimization for bbx.
//!
//! Provides best-solution tracking, an exhaustive odometer-style grid search,
//! a family of pluggable stopping criteria for iterative optimizers, and the
//! JSON configuration that ties them together.

mod best;
mod config;
mod driver;
mod report;
mod search;
pub mod stopping;

pub use best::{BestSolution, OptimizerBase};
pub use config::OptimizerConfig;
pub use driver::{drive, DriveOutcome, StopHandle, StopReason};
pub use report::{GridRunReport, RunId};
pub use search::{GridSearch, GridSearchConfig, DEFAULT_SPLITS};
pub use stopping::{
    CriterionPhase, IterationSnapshot, MaxIterations, MaxIterationsWithoutImprovement,
    MaxTrainTime, OptimizerState, StoppingConfig, StoppingCriterion, StoppingSet,
};
