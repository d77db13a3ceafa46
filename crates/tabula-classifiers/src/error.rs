//! Error families for the model lifecycle.
//!
//! Each stage owns its error type so callers can tell a bad model from a bad
//! disk from a bad request. `PipelineError` wraps them at the entry point.
use std::path::PathBuf;

use thiserror::Error;

use crate::math::ShapeError;

/// Result alias for the pipeline entry point.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Rejected inputs, detected before any heavy work starts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ArgumentError {
    #[error("{0} is not a valid path")]
    InvalidPath(PathBuf),

    #[error("{0} is not a valid version id. Valid values: v0, v1, v2, etc.")]
    InvalidVersionId(String),

    #[error("validation fraction must lie strictly between 0 and 1, got {0}")]
    InvalidFraction(f64),

    #[error("artifact for version {version} already exists at {}", .path.display())]
    ArtifactExists { version: String, path: PathBuf },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Fatal failures while fitting or scoring a model.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrainingError {
    #[error("the {0} subset is empty")]
    EmptySubset(&'static str),

    #[error("the {subset} subset contains a single class ({class}); at least two are required")]
    SingleClass { subset: &'static str, class: u8 },

    #[error("missing value in column '{column}' at row {row} and no imputation constant is configured")]
    MissingValue { column: String, row: usize },

    #[error("solver did not converge within {iterations} iterations (max |gradient| = {gradient_norm:.3e})")]
    NotConverged { iterations: usize, gradient_norm: f64 },

    #[error("solver hit a singular Hessian at iteration {0}")]
    SingularHessian(usize),

    #[error("feature matrix has {rows} rows but {labels} labels were given")]
    LabelMismatch { rows: usize, labels: usize },

    #[error("model expects {expected} features, got {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("model has not been fitted")]
    NotFitted,
}

/// Failures writing or reading a model artifact.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("refusing to overwrite existing artifact at {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("failed to persist the trained classifier to {}: write did not materialize", .0.display())]
    NotMaterialized(PathBuf),

    #[error("failed to encode model: {0}")]
    Encode(#[source] bincode::Error),

    #[error("failed to decode model from {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures reading a dataset file.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to open dataset {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("missing column '{0}' in dataset header")]
    MissingColumn(String),

    #[error("invalid value '{value}' in column '{column}' at row {row}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error("dataset has {features} feature rows but {targets} targets")]
    LengthMismatch { features: usize, targets: usize },

    #[error("dataset must have {expected} feature columns, got {actual}")]
    ColumnCount { expected: usize, actual: usize },

    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// Rejection of an inbound inference record.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Unknown schema name. A configuration problem, not a data problem.
    #[error("Schema name: '{0}' not found.")]
    SchemaNotFound(String),

    #[error("record must be a JSON object, got {0}")]
    NotAnObject(String),

    #[error("missing key: '{0}'")]
    MissingField(String),

    #[error("wrong key '{0}' in record")]
    UnexpectedField(String),

    #[error("key '{field}' error: cannot coerce {value} to {expected}")]
    Coercion {
        field: String,
        value: String,
        expected: &'static str,
    },
}

impl ValidationError {
    /// True for schema lookup failures, false for record-level failures.
    pub fn is_schema_error(&self) -> bool {
        matches!(self, ValidationError::SchemaNotFound(_))
    }

    /// Name of the offending field for record-level failures.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::MissingField(field)
            | ValidationError::UnexpectedField(field)
            | ValidationError::Coercion { field, .. } => Some(field),
            ValidationError::SchemaNotFound(_) | ValidationError::NotAnObject(_) => None,
        }
    }
}

/// Umbrella error for a full training run or a prediction.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error("dataset error: {0}")]
    Data(#[from] DataError),

    #[error("training failed: {0}")]
    Training(#[from] TrainingError),

    #[error("persistence failed: {0}")]
    Persist(#[from] PersistError),

    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),
}
