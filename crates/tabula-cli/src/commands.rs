use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use tabula_classifiers::config::PipelineConfig;
use tabula_classifiers::predictor::{Prediction, Predictor};
use tabula_classifiers::validation::ValidatedRecord;
use tabula_classifiers::{train, validate, TrainingReport, VersionId};

use crate::util::parse_record;

/// Command line values that take precedence over the configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub artifact_root: Option<PathBuf>,
    pub seed: Option<u64>,
    pub validation_fraction: Option<f64>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut PipelineConfig) {
        if let Some(root) = &self.artifact_root {
            config.artifact_root = root.clone();
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(fraction) = self.validation_fraction {
            config.validation_fraction = fraction;
        }
    }
}

/// Read the configuration file, or fall back to defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => {
            log::debug!("No config file provided; using defaults.");
            Ok(PipelineConfig::default())
        }
    }
}

pub fn run_train(
    config: &PipelineConfig,
    dataset: &Path,
    version_id: &VersionId,
) -> Result<TrainingReport> {
    let report = train(config, dataset, version_id)
        .with_context(|| format!("training of model {} failed", version_id))?;
    log::info!(
        "[Tabula::Train] Model {} saved to {} (AUC {:.4})",
        report.version_id,
        report.artifact_path.display(),
        report.auc
    );
    Ok(report)
}

pub fn run_validate(schema: &str, raw_record: &str) -> Result<ValidatedRecord> {
    let record = parse_record(raw_record)?;
    let validated = validate(schema, &record)?;
    Ok(validated)
}

pub fn run_predict(config: &PipelineConfig, model: &Path, raw_record: &str) -> Result<Prediction> {
    let record = parse_record(raw_record)?;
    let predictor = Predictor::from_artifact(model, config.imputation.clone())
        .with_context(|| format!("failed to load model from {}", model.display()))?;
    let prediction = predictor.predict(&record)?;
    Ok(prediction)
}
