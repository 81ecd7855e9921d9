//! Configuration models for linkoscope.
//!
//! Every simulation parameter has a default matching the CLI defaults, so a
//! config file only needs to name what it changes. CLI flags override the
//! file.

use crate::models::{LinkoscopeError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::PathBuf;

/// Top-level configuration for linkoscope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Simulation settings
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[simulation]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Smallest linkograph size (inclusive)
    #[serde(default = "default_minimum")]
    pub minimum: usize,

    /// Largest linkograph size (exclusive)
    #[serde(default = "default_maximum")]
    pub maximum: usize,

    /// Step between consecutive sizes
    #[serde(default = "default_step")]
    pub step: usize,

    /// Number of generating models
    #[serde(default = "default_models")]
    pub models: usize,

    /// Runs per model per size
    #[serde(default = "default_runs")]
    pub runs: usize,

    /// Decimal places of transition probabilities
    #[serde(default = "default_precision")]
    pub precision: u32,

    /// Fixed per-model seeds; wall-clock seeding when absent
    #[serde(default)]
    pub seeds: Option<Vec<u64>>,

    /// Run models of one size in parallel
    #[serde(default)]
    pub parallel: bool,
}

fn default_minimum() -> usize {
    2
}

fn default_maximum() -> usize {
    100
}

fn default_step() -> usize {
    1
}

fn default_models() -> usize {
    100
}

fn default_runs() -> usize {
    100
}

fn default_precision() -> u32 {
    2
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            minimum: default_minimum(),
            maximum: default_maximum(),
            step: default_step(),
            models: default_models(),
            runs: default_runs(),
            precision: default_precision(),
            seeds: None,
            parallel: false,
        }
    }
}

impl SimulationConfig {
    /// Numeric parameters of a simulation run.
    pub fn params(&self) -> SimulationParams {
        SimulationParams {
            min_size: self.minimum,
            max_size: self.maximum,
            step_size: self.step,
            model_count: self.models,
            run_count: self.runs,
            precision: self.precision,
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Results file (`.csv` for CSV, anything else for JSON)
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Show a progress bar over sizes
    #[serde(default = "default_true")]
    pub progress: bool,
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: None,
            progress: default_true(),
        }
    }
}

/// Parameters of one entropy-distribution study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationParams {
    pub min_size: usize,
    /// Exclusive upper bound.
    pub max_size: usize,
    pub step_size: usize,
    pub model_count: usize,
    pub run_count: usize,
    pub precision: u32,
}

impl SimulationParams {
    /// The half-open size range `min_size..max_size`.
    pub fn range(&self) -> Range<usize> {
        self.min_size..self.max_size
    }

    /// Linkograph sizes in ascending order, `max_size` excluded.
    ///
    /// A zero step yields no sizes.
    pub fn sizes(&self) -> Vec<usize> {
        if self.step_size == 0 {
            return Vec::new();
        }
        self.range().step_by(self.step_size).collect()
    }

    /// Reject parameters that cannot produce a result matrix.
    pub fn validate(&self) -> Result<()> {
        if self.step_size == 0 {
            return Err(LinkoscopeError::Configuration(
                "step size must be at least 1".to_string(),
            ));
        }
        if self.sizes().is_empty() {
            return Err(LinkoscopeError::Configuration(format!(
                "size range {}..{} step {} yields no sizes",
                self.min_size, self.max_size, self.step_size
            )));
        }
        if self.model_count == 0 {
            return Err(LinkoscopeError::Configuration(
                "model count must be at least 1".to_string(),
            ));
        }
        if self.run_count == 0 {
            return Err(LinkoscopeError::Configuration(
                "run count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> std::result::Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_owned(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_owned(),
            source: e,
        })
    }

    /// Load from `path` if given, otherwise use defaults.
    pub fn load_or_default(
        path: Option<&std::path::Path>,
    ) -> std::result::Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }
}

/// Configuration file errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
