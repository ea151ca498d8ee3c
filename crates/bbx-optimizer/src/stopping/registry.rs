//! Compile-time registry of the known stopping-criterion kinds.

use bbx_types::BbxResult;
use serde::{Deserialize, Serialize};

use super::max_iterations::DEFAULT_MAX_ITERATIONS;
use super::without_improvement::DEFAULT_PATIENCE;
use super::{MaxIterations, MaxIterationsWithoutImprovement, MaxTrainTime, StoppingCriterion};

/// Serializable description of one stopping criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoppingConfig {
    MaxIterations {
        #[serde(default = "default_max_iterations")]
        num_iterations: u64,
    },
    MaxIterationsWithoutImprovement {
        #[serde(default = "default_patience")]
        num_iterations: u64,
        #[serde(default)]
        minimum_improvement: f64,
    },
    MaxTrainTime {
        /// Seconds; 0 means unlimited.
        #[serde(default)]
        max_train_time: u64,
    },
}

fn default_max_iterations() -> u64 {
    DEFAULT_MAX_ITERATIONS
}

fn default_patience() -> u64 {
    DEFAULT_PATIENCE
}

impl StoppingConfig {
    pub const KINDS: [&'static str; 3] = [
        "max_iterations",
        "max_iterations_without_improvement",
        "max_train_time",
    ];

    /// Default configuration for a named kind.
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind {
            "max_iterations" => Some(Self::MaxIterations {
                num_iterations: DEFAULT_MAX_ITERATIONS,
            }),
            "max_iterations_without_improvement" => Some(Self::MaxIterationsWithoutImprovement {
                num_iterations: DEFAULT_PATIENCE,
                minimum_improvement: 0.0,
            }),
            "max_train_time" => Some(Self::MaxTrainTime { max_train_time: 0 }),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::MaxIterations { .. } => "max_iterations",
            Self::MaxIterationsWithoutImprovement { .. } => "max_iterations_without_improvement",
            Self::MaxTrainTime { .. } => "max_train_time",
        }
    }

    /// Strict check, for configurations loaded from files.
    pub fn validate(&self) -> BbxResult<()> {
        match *self {
            Self::MaxIterations { num_iterations } if num_iterations < 1 => Err(
                bbx_types::config_error!("max_iterations.num_iterations must be >= 1"),
            ),
            Self::MaxIterationsWithoutImprovement { num_iterations, .. } if num_iterations < 1 => {
                Err(bbx_types::config_error!(
                    "max_iterations_without_improvement.num_iterations must be >= 1"
                ))
            }
            Self::MaxIterationsWithoutImprovement {
                minimum_improvement,
                ..
            } if !(0.0..=1.0).contains(&minimum_improvement) => Err(bbx_types::config_error!(
                "max_iterations_without_improvement.minimum_improvement must be within [0, 1], got {}",
                minimum_improvement
            )),
            _ => Ok(()),
        }
    }

    /// Instantiates the criterion. Invalid values go through the setters,
    /// which warn and keep the defaults.
    pub fn build(&self) -> Box<dyn StoppingCriterion> {
        match *self {
            Self::MaxIterations { num_iterations } => {
                Box::new(MaxIterations::with_bound(num_iterations))
            }
            Self::MaxIterationsWithoutImprovement {
                num_iterations,
                minimum_improvement,
            } => Box::new(MaxIterationsWithoutImprovement::with_settings(
                num_iterations,
                minimum_improvement,
            )),
            Self::MaxTrainTime { max_train_time } => {
                Box::new(MaxTrainTime::with_bound(max_train_time))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stopping::CriterionPhase;

    #[test]
    fn every_kind_round_trips_through_its_name() {
        for kind in StoppingConfig::KINDS {
            let config = StoppingConfig::from_kind(kind).unwrap();
            assert_eq!(config.kind_name(), kind);
            let criterion = config.build();
            assert_eq!(criterion.name(), kind);
            assert_eq!(criterion.phase(), CriterionPhase::Created);
        }
        assert!(StoppingConfig::from_kind("particle_swarm").is_none());
    }

    #[test]
    fn parses_tagged_json_with_defaults() {
        let configs: Vec<StoppingConfig> = serde_json::from_str(
            r#"[
                {"kind": "max_iterations"},
                {"kind": "max_iterations_without_improvement", "minimum_improvement": 0.05},
                {"kind": "max_train_time", "max_train_time": 30}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            configs,
            vec![
                StoppingConfig::MaxIterations {
                    num_iterations: 10_000_000
                },
                StoppingConfig::MaxIterationsWithoutImprovement {
                    num_iterations: 10,
                    minimum_improvement: 0.05
                },
                StoppingConfig::MaxTrainTime { max_train_time: 30 },
            ]
        );
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        assert!(StoppingConfig::MaxIterations { num_iterations: 0 }
            .validate()
            .is_err());
        assert!(StoppingConfig::MaxIterationsWithoutImprovement {
            num_iterations: 5,
            minimum_improvement: 2.0
        }
        .validate()
        .is_err());
        assert!(StoppingConfig::MaxTrainTime { max_train_time: 0 }
            .validate()
            .is_ok());
    }

    #[test]
    fn build_falls_back_on_invalid_values() {
        let mut criterion = StoppingConfig::MaxIterations { num_iterations: 0 }.build();
        criterion.start();
        // default bound of 10 million still applies
        assert!(!criterion.check_stopping(&crate::stopping::IterationSnapshot::new(1_000, 0.0)));
    }
}
