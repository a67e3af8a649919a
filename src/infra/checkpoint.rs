// ============================================================
// Layer 6 — Model Store
// ============================================================
// Owns the two copies of "the current model":
//
//   1. the artifact file on disk (MODEL_PATH)
//   2. the Live Model Slot in memory, read by every prediction
//
// and keeps them in step.
//
// save(model):
//   1. create the artifact's parent directory
//   2. write the artifact to a temp file in that directory, fsync
//   3. read the temp file back (this is the instance served)
//   4. rename the temp file over MODEL_PATH
//   5. replace the slot pointer with the read-back instance
//
// Steps 1–5 run under `save_lock`, so concurrent saves cannot
// interleave and the last writer wins on disk and in memory
// alike. The slot's RwLock is only held for the pointer copy
// or pointer replacement, never across I/O.
//
// Artifact format (JSON, floats round-trip exactly):
//   {
//     "format": "humidity-linear/1",
//     "model": { "coefficients": {...}, "quality": {...}, "trained_at": "..." }
//   }

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::domain::errors::StoreError;
use crate::ml::model::LinearModel;

const ARTIFACT_FORMAT: &str = "humidity-linear/1";

#[derive(Serialize)]
struct ArtifactOut<'a> {
    format: &'a str,
    model:  &'a LinearModel,
}

#[derive(Deserialize)]
struct ArtifactIn {
    format: String,
    model:  serde_json::Value,
}

pub struct ModelStore {
    /// Where `save` writes the artifact.
    path:      PathBuf,
    /// Live Model Slot. Held only for a pointer clone or swap.
    live:      RwLock<Option<Arc<LinearModel>>>,
    /// Serializes writers across the whole save sequence.
    save_lock: Mutex<()>,
}

impl ModelStore {
    /// A store with an empty slot. Nothing is read from disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path:      path.into(),
            live:      RwLock::new(None),
            save_lock: Mutex::new(()),
        }
    }

    /// A store whose slot starts with the artifact already at `path`.
    /// A missing or unreadable artifact is logged and leaves the slot empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let store = Self::new(path);

        if !store.path.exists() {
            tracing::warn!("Model file does not exist at path: {}", store.path.display());
            return store;
        }

        match Self::load_artifact(&store.path) {
            Ok(model) => {
                tracing::info!("Model loaded successfully: {}", model.summary());
                *store.live.write() = Some(Arc::new(model));
            }
            Err(e) => tracing::error!("Failed to load model: {e}"),
        }
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The model predictions should use right now, if any.
    pub fn current(&self) -> Option<Arc<LinearModel>> {
        self.live.read().clone()
    }

    /// Persist `model` to the store's path, then make it the live model.
    /// On error the file at the path and the slot are both unchanged.
    pub fn save(&self, model: &LinearModel) -> Result<Arc<LinearModel>, StoreError> {
        let _guard = self.save_lock.lock();

        let tmp       = write_temp(&self.path, model)?;
        let persisted = Arc::new(Self::load_artifact(tmp.path())?);
        tmp.persist(&self.path).map_err(|e| StoreError::Io {
            path:   self.path.clone(),
            source: e.error,
        })?;

        let previous = self.live.write().replace(Arc::clone(&persisted));
        tracing::info!(
            "Model saved to '{}' ({})",
            self.path.display(),
            if previous.is_some() { "replaced previous model" } else { "first model" }
        );
        Ok(persisted)
    }

    /// Write `model` to an arbitrary path without touching the slot.
    pub fn save_to(model: &LinearModel, path: &Path) -> Result<(), StoreError> {
        write_temp(path, model)?
            .persist(path)
            .map_err(|e| StoreError::Io { path: path.to_path_buf(), source: e.error })?;
        Ok(())
    }

    pub fn load_artifact(path: &Path) -> Result<LinearModel, StoreError> {
        let io_err    = |source| StoreError::Io { path: path.to_path_buf(), source };
        let serde_err = |source| StoreError::Serde { path: path.to_path_buf(), source };

        let bytes = fs::read(path).map_err(io_err)?;
        let artifact: ArtifactIn = serde_json::from_slice(&bytes).map_err(serde_err)?;
        if artifact.format != ARTIFACT_FORMAT {
            return Err(StoreError::Format {
                path:  path.to_path_buf(),
                found: artifact.format,
            });
        }
        serde_json::from_value(artifact.model).map_err(serde_err)
    }
}

/// Serialize into a synced temp file next to `path`.
fn write_temp(path: &Path, model: &LinearModel) -> Result<NamedTempFile, StoreError> {
    let io_err = |source| StoreError::Io { path: path.to_path_buf(), source };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(io_err)?;

    let bytes = serde_json::to_vec_pretty(&ArtifactOut { format: ARTIFACT_FORMAT, model })
        .map_err(|source| StoreError::Serde { path: path.to_path_buf(), source })?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(&bytes).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    Ok(tmp)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::observation::Features;
    use crate::ml::model::{Coefficients, FitQuality};
    use chrono::Utc;
    use tempfile::tempdir;

    fn model(intercept: f64) -> LinearModel {
        LinearModel::new(
            Coefficients {
                intercept,
                temp_max:       -1.234_567_890_123_456_7,
                temp_afternoon: 0.1 + 0.2,
            },
            FitQuality { r2_train: 0.812_345_678_9, r2_holdout: Some(0.7), n_train: 40, n_holdout: 10 },
            Utc::now(),
        )
    }

    #[test]
    fn test_new_store_is_empty() {
        let dir = tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("model.json"));
        assert!(store.current().is_none());
    }

    #[test]
    fn test_save_creates_directory_and_swaps_slot() {
        let dir   = tempdir().unwrap();
        let path  = dir.path().join("modelo").join("model.json");
        let store = ModelStore::new(&path);

        let original = model(88.0);
        let saved    = store.save(&original).unwrap();
        assert!(path.exists());
        let current = store.current().unwrap();
        assert!(Arc::ptr_eq(&saved, &current));
        assert_eq!(*current, original);
    }

    #[test]
    fn test_round_trip_is_bit_exact() {
        let dir   = tempdir().unwrap();
        let path  = dir.path().join("model.json");
        let store = ModelStore::new(&path);
        let original = model(77.123_456_789_012_34);

        store.save(&original).unwrap();
        let reloaded = ModelStore::load_artifact(&path).unwrap();
        assert_eq!(reloaded, original);

        let f = Features::new(31.7, 27.3);
        assert_eq!(reloaded.predict(f).to_bits(), original.predict(f).to_bits());
    }

    #[test]
    fn test_open_loads_existing_artifact() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("model.json");
        ModelStore::save_to(&model(60.0), &path).unwrap();

        let store = ModelStore::open(&path);
        assert_eq!(store.current().unwrap().coefficients().intercept, 60.0);
    }

    #[test]
    fn test_open_tolerates_missing_and_corrupt_artifacts() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("model.json");
        assert!(ModelStore::open(&path).current().is_none());

        fs::write(&path, b"not json").unwrap();
        assert!(ModelStore::open(&path).current().is_none());
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, br#"{"format": "pickle", "model": {}}"#).unwrap();
        let err = ModelStore::load_artifact(&path).unwrap_err();
        assert!(matches!(err, StoreError::Format { found, .. } if found == "pickle"));
    }

    #[test]
    fn test_failed_save_keeps_previous_model() {
        let dir   = tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("model.json"));
        store.save(&model(10.0)).unwrap();
        let before = store.current().unwrap();

        // A regular file where the parent directory should be.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();
        let bad = ModelStore::new(blocker.join("model.json"));
        assert!(bad.save(&model(20.0)).is_err());
        assert!(bad.current().is_none());

        assert!(Arc::ptr_eq(&before, &store.current().unwrap()));
    }

    #[test]
    fn test_second_save_replaces_first() {
        let dir   = tempdir().unwrap();
        let path  = dir.path().join("model.json");
        let store = ModelStore::new(&path);
        store.save(&model(1.0)).unwrap();
        store.save(&model(2.0)).unwrap();
        assert_eq!(store.current().unwrap().coefficients().intercept, 2.0);
        assert_eq!(ModelStore::load_artifact(&path).unwrap().coefficients().intercept, 2.0);
    }
}
