//! IO utilities for loading datasets and persisting model artifacts.

pub mod artifact;
pub mod dataset_csv;

pub use artifact::{
    artifact_file_name, artifact_path, load_model, ArtifactFs, LocalFs, Persister,
};
pub use dataset_csv::read_dataset;
