use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, VisitedError},
    sets::visited::DEFAULT_GROWTH_MARGIN,
};

/// The configuration of a [`VisitedPool`](crate::pool::VisitedPool).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Capacity of freshly created sets, usually the node count of the graph.
    pub initial_capacity: usize,
    /// Slots allocated past an out-of-range id when a set grows. Must be positive.
    pub growth_margin: usize,
    /// Maximum number of idle sets kept for reuse. Must be positive.
    pub max_idle: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            initial_capacity: 0,
            growth_margin: DEFAULT_GROWTH_MARGIN,
            max_idle: 64,
        }
    }
}

impl PoolConfig {
    pub fn load_from_toml_file(file_path: impl AsRef<Path>) -> Result<Self> {
        let path = file_path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| VisitedError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: PoolConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.growth_margin == 0 {
            return Err(VisitedError::InvalidConfig(
                "growth_margin must be positive".to_string(),
            ));
        }
        if self.max_idle == 0 {
            return Err(VisitedError::InvalidConfig(
                "max_idle must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
