//! Top-level optimizer configuration loaded from JSON.

use bbx_types::BbxResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::search::{GridSearch, GridSearchConfig};
use crate::stopping::{StoppingConfig, StoppingSet};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    #[serde(default)]
    pub grid: GridSearchConfig,

    /// Criteria for iterative loops; all of them are active together.
    #[serde(default)]
    pub stopping: Vec<StoppingConfig>,
}

impl OptimizerConfig {
    /// Parses and strictly validates a JSON document.
    pub fn from_json_str(json: &str) -> BbxResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> BbxResult<Self> {
        let path = path.as_ref();
        tracing::info!("Loading optimizer configuration from: {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> BbxResult<()> {
        self.grid.validate()?;
        for criterion in &self.stopping {
            criterion.validate()?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> BbxResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn grid_search(&self) -> GridSearch {
        GridSearch::with_config(self.grid)
    }

    pub fn stopping_set(&self) -> StoppingSet {
        self.stopping.iter().map(StoppingConfig::build).collect()
    }
}
