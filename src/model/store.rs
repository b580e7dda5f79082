//! On-disk model store
//!
//! Fitted artifacts are kept as named JSON files under a single
//! directory: the training binary writes them, the service loads them
//! once at startup.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// Artifact name of the fitted feature scaler.
pub const SCALER_ARTIFACT: &str = "scaler";

/// Artifact name of the fitted anomaly detector.
pub const DETECTOR_ARTIFACT: &str = "anomaly_model";

/// Directory of named JSON artifacts.
#[derive(Debug, Clone)]
pub struct ModelStore {
    root: PathBuf,
}

impl ModelStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path backing a named artifact.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.json"))
    }

    /// Persist an artifact under the given name, creating the store
    /// directory if needed.
    pub fn save<T: Serialize>(&self, name: &str, artifact: &T) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("creating model store at {}", self.root.display()))?;

        let path = self.path_for(name);
        let file = File::create(&path)
            .with_context(|| format!("creating artifact file {}", path.display()))?;
        let writer = BufWriter::new(file);

        serde_json::to_writer_pretty(writer, artifact)
            .with_context(|| format!("serializing artifact '{name}'"))?;
        Ok(())
    }

    /// Load a named artifact.
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.path_for(name);
        let file = File::open(&path)
            .with_context(|| format!("opening artifact file {}", path.display()))?;
        let reader = BufReader::new(file);

        serde_json::from_reader(reader)
            .with_context(|| format!("deserializing artifact '{name}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IsolationForest, StandardScaler};
    use ndarray::array;

    #[test]
    fn test_scaler_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path());

        let mut scaler = StandardScaler::new();
        scaler.fit(&array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
        store.save(SCALER_ARTIFACT, &scaler).unwrap();

        let restored: StandardScaler = store.load(SCALER_ARTIFACT).unwrap();
        assert_eq!(restored.dim(), Some(2));
    }

    #[test]
    fn test_detector_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path());

        let data = array![[0.0, 0.1], [0.2, 0.0], [0.1, 0.1], [5.0, 5.0]];
        let mut forest = IsolationForest::new(10, 0.25);
        forest.fit(&data).unwrap();
        store.save(DETECTOR_ARTIFACT, &forest).unwrap();

        let restored: IsolationForest = store.load(DETECTOR_ARTIFACT).unwrap();
        assert_eq!(
            forest.score_samples(&data).unwrap(),
            restored.score_samples(&data).unwrap()
        );
    }

    #[test]
    fn test_missing_artifact_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        let result: Result<StandardScaler> = store.load("nope");
        assert!(result.is_err());
    }
}
