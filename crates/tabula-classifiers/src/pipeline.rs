//! End-to-end training run: read, split, fit, evaluate, persist.
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::PipelineConfig;
use crate::error::{ArgumentError, PersistError, Result};
use crate::evaluator::Evaluator;
use crate::io::{artifact_path, read_dataset, ArtifactFs, Persister};
use crate::split::split;
use crate::trainer::Trainer;
use crate::version::VersionId;

/// Summary of a completed training run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingReport {
    pub version_id: VersionId,
    pub training_rows: usize,
    pub validation_rows: usize,
    pub auc: f64,
    pub iterations: usize,
    pub artifact_path: PathBuf,
}

/// Reject a dataset path that is not an existing regular file.
pub fn check_dataset_path(path: &Path) -> std::result::Result<(), ArgumentError> {
    if fs::metadata(path).map(|m| m.is_file()).unwrap_or(false) {
        Ok(())
    } else {
        Err(ArgumentError::InvalidPath(path.to_path_buf()))
    }
}

/// Train, evaluate and persist a model for `version_id` on the local filesystem.
pub fn train(
    config: &PipelineConfig,
    dataset_path: &Path,
    version_id: &VersionId,
) -> Result<TrainingReport> {
    train_with(config, dataset_path, version_id, &Persister::new())
}

/// [`train`] with an explicit persister.
///
/// Arguments are checked before the dataset is read: the configuration must be
/// valid, the dataset must be a regular file, and no artifact may exist yet for
/// `version_id`. Nothing is written unless fitting and evaluation succeed.
pub fn train_with<F: ArtifactFs>(
    config: &PipelineConfig,
    dataset_path: &Path,
    version_id: &VersionId,
    persister: &Persister<F>,
) -> Result<TrainingReport> {
    config.validate()?;
    check_dataset_path(dataset_path)?;

    let target = artifact_path(&config.artifact_root, version_id);
    if persister.exists(&target) {
        return Err(ArgumentError::ArtifactExists {
            version: version_id.to_string(),
            path: target,
        }
        .into());
    }

    log::info!(
        "Will train model {} using the file at: {}",
        version_id,
        dataset_path.display()
    );

    let dataset = read_dataset(dataset_path)?;
    let split = split(&dataset, config.validation_fraction, config.seed)?;
    split.training_set.log_summary("training");
    split.validation_set.log_summary("validation");

    let trainer = Trainer::new(config.imputation.clone(), config.model.clone());
    let (model, summary) = trainer.fit(&split.training_set)?;

    let evaluator = Evaluator::new(config.imputation.clone());
    let auc = evaluator.evaluate(&model, &split.validation_set)?;

    fs::create_dir_all(&config.artifact_root).map_err(|source| PersistError::Io {
        path: config.artifact_root.clone(),
        source,
    })?;
    let saved = persister.persist(&model, &target)?;

    Ok(TrainingReport {
        version_id: version_id.clone(),
        training_rows: split.training_set.len(),
        validation_rows: split.validation_set.len(),
        auc,
        iterations: summary.iterations,
        artifact_path: saved,
    })
}
