use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ArgumentError;

/// Feature columns consumed by the classifier, in model order.
pub const FEATURE_COLUMNS: [&str; 4] = ["x_1", "x_2", "x_3", "x_4"];

/// Binary label column.
pub const TARGET_COLUMN: &str = "target";

/// Hyper-parameters of the logistic classifier.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    /// Inverse of the L2 regularization strength (`C`).
    pub inverse_regularization: f64,
    pub max_iterations: usize,
    /// Convergence threshold on the largest absolute gradient component.
    pub tolerance: f64,
    pub fit_intercept: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            inverse_regularization: 0.1,
            max_iterations: 100,
            tolerance: 1e-4,
            fit_intercept: true,
        }
    }
}

/// Missing-value policy shared by training, evaluation and inference.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ImputationPolicy {
    /// Per-feature fill constants. Features without an entry must not have missing values.
    pub feature_fills: BTreeMap<String, f64>,
    /// Label assigned to rows whose target is missing.
    pub target_fill: u8,
}

impl Default for ImputationPolicy {
    fn default() -> Self {
        Self {
            feature_fills: BTreeMap::from([("x_1".to_string(), 425.0)]),
            target_fill: 0,
        }
    }
}

impl ImputationPolicy {
    pub fn fill_for(&self, column: &str) -> Option<f64> {
        self.feature_fills.get(column).copied()
    }
}

/// Everything a training run needs, passed explicitly into [`crate::pipeline::train`].
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory that receives model artifacts.
    pub artifact_root: PathBuf,
    pub validation_fraction: f64,
    pub seed: u64,
    pub imputation: ImputationPolicy,
    pub model: ModelConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            artifact_root: PathBuf::from("models"),
            validation_fraction: 0.25,
            seed: 1,
            imputation: ImputationPolicy::default(),
            model: ModelConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file. Absent fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ArgumentError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ArgumentError::InvalidConfig(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: PipelineConfig = serde_json::from_str(&content).map_err(|e| {
            ArgumentError::InvalidConfig(format!("failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ArgumentError> {
        if !(self.validation_fraction > 0.0 && self.validation_fraction < 1.0) {
            return Err(ArgumentError::InvalidFraction(self.validation_fraction));
        }
        if !(self.model.inverse_regularization > 0.0) {
            return Err(ArgumentError::InvalidConfig(format!(
                "inverse_regularization must be positive, got {}",
                self.model.inverse_regularization
            )));
        }
        if self.model.max_iterations == 0 {
            return Err(ArgumentError::InvalidConfig(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if self.imputation.target_fill > 1 {
            return Err(ArgumentError::InvalidConfig(format!(
                "target_fill must be 0 or 1, got {}",
                self.imputation.target_fill
            )));
        }
        for (column, fill) in &self.imputation.feature_fills {
            if !FEATURE_COLUMNS.contains(&column.as_str()) {
                return Err(ArgumentError::InvalidConfig(format!(
                    "imputation constant given for unknown column '{}'",
                    column
                )));
            }
            if !fill.is_finite() {
                return Err(ArgumentError::InvalidConfig(format!(
                    "imputation constant for '{}' must be finite",
                    column
                )));
            }
        }
        Ok(())
    }
}
