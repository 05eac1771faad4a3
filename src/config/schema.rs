use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::ScoringConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Portfolio JSON file; a generated portfolio is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringConfig>,

    #[serde(default)]
    pub comparison: ComparisonConfig,
}

impl Config {
    /// Scoring config in effect: the configured one or the built-in catalog
    pub fn effective_scoring(&self) -> ScoringConfig {
        self.scoring.clone().unwrap_or_default()
    }
}

/// Initial selection of a new comparison.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ComparisonConfig {
    /// First N projects selected by default
    #[serde(default = "default_projects")]
    pub default_projects: usize,

    /// First N metrics selected by default
    #[serde(default = "default_metrics")]
    pub default_metrics: usize,
}

fn default_projects() -> usize {
    3
}

fn default_metrics() -> usize {
    8
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            default_projects: default_projects(),
            default_metrics: default_metrics(),
        }
    }
}
