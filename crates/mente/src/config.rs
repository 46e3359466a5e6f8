//! Solver configuration types.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// What to do when a goal reappears among its own ancestors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Abort the search with a cycle error naming the goal path
    #[default]
    Error,
    /// Treat the repeated goal as a failed branch and keep searching
    Prune,
}

/// Limits and policies for the backward-chaining search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum number of ancestor goals along one proof branch
    pub max_depth: Option<usize>,
    /// Maximum number of head unification attempts
    pub max_steps: Option<usize>,
    /// Wall-clock limit in milliseconds
    pub timeout_ms: Option<u64>,
    pub cycle_policy: CyclePolicy,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            max_depth: Some(1024),
            max_steps: None,
            timeout_ms: None,
            cycle_policy: CyclePolicy::Error,
        }
    }
}

impl SolverConfig {
    /// No depth, step or time limit
    pub fn unbounded() -> Self {
        SolverConfig {
            max_depth: None,
            ..SolverConfig::default()
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        SolverConfig::from_json(&content)
    }
}
