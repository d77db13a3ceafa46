//! tabula-classifiers: lifecycle of a tabular binary classifier.
//!
//! This crate covers a deterministic train/validation split, fitting an
//! L2-regularized logistic regression, ROC AUC evaluation, versioned model
//! artifacts with write verification, and schema validation of inference
//! requests.
//!
//! The pipeline is synchronous. Configuration, including the artifact
//! directory, is passed in explicitly through [`config::PipelineConfig`].
pub mod config;
pub mod data_handling;
pub mod error;
pub mod evaluator;
pub mod io;
pub mod math;
pub mod models;
pub mod pipeline;
pub mod predictor;
pub mod split;
pub mod stats;
pub mod trainer;
pub mod validation;
pub mod version;

pub use error::{PipelineError, Result};
pub use pipeline::{train, TrainingReport};
pub use validation::validate;
pub use version::VersionId;
