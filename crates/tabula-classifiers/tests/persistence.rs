//! Integration tests for versioned artifact persistence.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use tabula_classifiers::config::ModelConfig;
use tabula_classifiers::error::PersistError;
use tabula_classifiers::io::{artifact_path, load_model, ArtifactFs, Persister};
use tabula_classifiers::math::Array2;
use tabula_classifiers::models::{ClassifierModel, LogisticRegression};
use tabula_classifiers::VersionId;

fn fitted_model() -> LogisticRegression {
    let x = Array2::from_shape_vec(
        (6, 4),
        vec![
            -2.0, 0.5, 0.0, 1.0, //
            -1.0, 0.0, 1.0, 0.0, //
            -0.5, 1.0, 0.0, 0.0, //
            0.5, 0.0, 0.0, 1.0, //
            1.0, 1.0, 1.0, 0.0, //
            2.0, 0.0, 0.5, 1.0,
        ],
    )
    .unwrap();
    let y = [0, 0, 1, 0, 1, 1];
    let mut model = LogisticRegression::new(ModelConfig::default());
    model.fit(&x, &y).unwrap();
    model
}

/// Accepts writes without error but never makes the file visible, like a
/// network mount that silently drops the data.
#[derive(Default)]
struct VanishingFs {
    writes: RefCell<Vec<PathBuf>>,
}

impl ArtifactFs for VanishingFs {
    fn write_new(&self, path: &Path, _bytes: &[u8]) -> io::Result<()> {
        self.writes.borrow_mut().push(path.to_path_buf());
        Ok(())
    }

    fn is_file(&self, _path: &Path) -> bool {
        false
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} vanished", path.display()),
        ))
    }
}

/// In-memory store, used to check the persister only goes through its trait.
#[derive(Default)]
struct MemoryFs {
    files: RefCell<BTreeMap<PathBuf, Vec<u8>>>,
}

impl ArtifactFs for MemoryFs {
    fn write_new(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut files = self.files.borrow_mut();
        if files.contains_key(path) {
            return Err(io::Error::from(io::ErrorKind::AlreadyExists));
        }
        files.insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }
}

// ---------------------------------------------------------------------------
// Local filesystem
// ---------------------------------------------------------------------------

#[test]
fn persist_to_fresh_path_succeeds_and_reloads() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let version: VersionId = "v1".parse().unwrap();
    let path = artifact_path(dir.path(), &version);
    let model = fitted_model();

    let saved = Persister::new().persist(&model, &path).unwrap();
    assert_eq!(saved, dir.path().join("model_v1.bin"));
    assert!(saved.is_file());

    let loaded: LogisticRegression = load_model(&saved).unwrap();
    assert_eq!(loaded, model);
}

#[test]
fn existing_artifact_is_never_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model_v3.bin");
    std::fs::write(&path, b"previous artifact").unwrap();

    let err = Persister::new().persist(&fitted_model(), &path).unwrap_err();
    assert!(matches!(err, PersistError::AlreadyExists(ref p) if p == &path));
    assert_eq!(std::fs::read(&path).unwrap(), b"previous artifact");
}

#[test]
fn distinct_versions_land_in_distinct_files() {
    let dir = tempfile::tempdir().unwrap();
    let persister = Persister::new();
    let model = fitted_model();
    for version in ["v2", "v20", "v0"] {
        let version: VersionId = version.parse().unwrap();
        persister
            .persist(&model, &artifact_path(dir.path(), &version))
            .unwrap();
    }
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
}

#[test]
fn missing_parent_directory_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent").join("model_v1.bin");
    let err = Persister::new().persist(&fitted_model(), &path).unwrap_err();
    assert!(matches!(err, PersistError::Io { .. }));
}

#[test]
fn corrupt_artifact_fails_to_decode() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model_v1.bin");
    std::fs::write(&path, [0u8; 3]).unwrap();
    let err = load_model::<LogisticRegression, _>(&path).unwrap_err();
    assert!(matches!(err, PersistError::Decode { .. }));
}

// ---------------------------------------------------------------------------
// Write verification
// ---------------------------------------------------------------------------

#[test]
fn silently_dropped_write_is_reported() {
    let _ = env_logger::builder().is_test(true).try_init();
    let fs = VanishingFs::default();
    let persister = Persister::with_fs(fs);
    let path = PathBuf::from("/mnt/models/model_v1.bin");

    let err = persister.persist(&fitted_model(), &path).unwrap_err();
    assert!(matches!(err, PersistError::NotMaterialized(ref p) if p == &path));
    assert!(err.to_string().contains("failed to persist the trained classifier"));
}

#[test]
fn persister_goes_through_its_filesystem() {
    let persister = Persister::with_fs(MemoryFs::default());
    let path = PathBuf::from("memory/model_v7.bin");
    let model = fitted_model();

    assert!(!persister.exists(&path));
    persister.persist(&model, &path).unwrap();
    assert!(persister.exists(&path));

    let again = persister.persist(&model, &path).unwrap_err();
    assert!(matches!(again, PersistError::AlreadyExists(_)));

    let loaded: LogisticRegression = persister.load(&path).unwrap();
    assert_eq!(loaded.coefficients(), model.coefficients());
}
