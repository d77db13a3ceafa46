//! Versioned model artifacts on durable storage.
//!
//! Artifacts are written with create-new semantics and confirmed by a second
//! filesystem lookup, since an encoder can return without error on a partial
//! or dropped write.
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::PersistError;
use crate::version::VersionId;

/// File name of the artifact for `version`. Distinct versions never collide.
pub fn artifact_file_name(version: &VersionId) -> String {
    format!("model_{}.bin", version)
}

/// Full artifact path under `root`.
pub fn artifact_path(root: &Path, version: &VersionId) -> PathBuf {
    root.join(artifact_file_name(version))
}

/// Filesystem operations the persister depends on.
pub trait ArtifactFs {
    /// Write `bytes` to a file that must not exist yet.
    fn write_new(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;

    fn is_file(&self, path: &Path) -> bool;

    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// The local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl ArtifactFs for LocalFs {
    fn write_new(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let file = OpenOptions::new().write(true).create_new(true).open(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(bytes)?;
        writer.flush()?;
        writer.get_ref().sync_all()
    }

    fn is_file(&self, path: &Path) -> bool {
        fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }
}

/// Serializes fitted models and verifies the artifact landed.
#[derive(Debug, Default, Clone)]
pub struct Persister<F = LocalFs> {
    fs: F,
}

impl Persister<LocalFs> {
    pub fn new() -> Self {
        Persister { fs: LocalFs }
    }
}

impl<F: ArtifactFs> Persister<F> {
    pub fn with_fs(fs: F) -> Self {
        Persister { fs }
    }

    pub fn exists(&self, path: &Path) -> bool {
        self.fs.is_file(path)
    }

    /// Write `model` to `path` and confirm the file exists afterwards.
    ///
    /// Returns the artifact path on success. An existing file at `path` is
    /// left untouched and reported as [`PersistError::AlreadyExists`].
    pub fn persist<M: Serialize>(&self, model: &M, path: &Path) -> Result<PathBuf, PersistError> {
        if self.fs.is_file(path) {
            return Err(PersistError::AlreadyExists(path.to_path_buf()));
        }

        let bytes = bincode::serialize(model).map_err(PersistError::Encode)?;

        self.fs.write_new(path, &bytes).map_err(|source| {
            if source.kind() == io::ErrorKind::AlreadyExists {
                PersistError::AlreadyExists(path.to_path_buf())
            } else {
                PersistError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        if self.fs.is_file(path) {
            log::info!("Successfully saved model at {}", path.display());
            Ok(path.to_path_buf())
        } else {
            log::error!(
                "Something went wrong; failed to persist the trained classifier to {}",
                path.display()
            );
            Err(PersistError::NotMaterialized(path.to_path_buf()))
        }
    }

    pub fn load<M: DeserializeOwned>(&self, path: &Path) -> Result<M, PersistError> {
        let bytes = self.fs.read(path).map_err(|source| PersistError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        bincode::deserialize(&bytes).map_err(|source| PersistError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Load a model artifact from the local filesystem.
pub fn load_model<M: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<M, PersistError> {
    Persister::new().load(path.as_ref())
}
