use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },
}

/// Knobs for a template-guided assignment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StereoConfig {
    /// Cap on candidate trials in the substructure search. `None` searches
    /// until the space is exhausted.
    pub max_search_steps: Option<usize>,
    /// Whether validation also labels each stereocenter R or S.
    pub compute_descriptors: bool,
}

impl StereoConfig {
    pub const DEFAULT_MAX_SEARCH_STEPS: usize = 1_000_000;

    pub fn builder() -> StereoConfigBuilder {
        StereoConfigBuilder::new()
    }
}

impl Default for StereoConfig {
    fn default() -> Self {
        Self {
            max_search_steps: Some(Self::DEFAULT_MAX_SEARCH_STEPS),
            compute_descriptors: true,
        }
    }
}

#[derive(Default)]
pub struct StereoConfigBuilder {
    max_search_steps: Option<Option<usize>>,
    compute_descriptors: Option<bool>,
}

impl StereoConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_search_steps(mut self, steps: usize) -> Self {
        self.max_search_steps = Some(Some(steps));
        self
    }
    pub fn unbounded_search(mut self) -> Self {
        self.max_search_steps = Some(None);
        self
    }
    pub fn compute_descriptors(mut self, enabled: bool) -> Self {
        self.compute_descriptors = Some(enabled);
        self
    }

    pub fn build(self) -> Result<StereoConfig, ConfigError> {
        let defaults = StereoConfig::default();
        let max_search_steps = self.max_search_steps.unwrap_or(defaults.max_search_steps);
        if max_search_steps == Some(0) {
            return Err(ConfigError::InvalidParameter {
                name: "max_search_steps",
                reason: "must be at least 1",
            });
        }
        Ok(StereoConfig {
            max_search_steps,
            compute_descriptors: self
                .compute_descriptors
                .unwrap_or(defaults.compute_descriptors),
        })
    }
}
