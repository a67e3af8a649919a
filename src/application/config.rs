// ============================================================
// Layer 2 — Service Configuration
// ============================================================
// Where data comes from and where the model goes. The CLI
// builds this from flags / environment; the application layer
// never sees clap types.

use std::{path::PathBuf, sync::Arc};

use crate::domain::traits::{RawDataFetcher, RemoteSource};
use crate::infra::fetcher::{LocalMirrorFetcher, StagedDataOnly};

pub const DEFAULT_BUCKET: &str        = "openweather-tc3";
pub const DEFAULT_REMOTE_FOLDER: &str = "Silver";
pub const DEFAULT_STAGING_DIR: &str   = "data";
pub const DEFAULT_MODEL_PATH: &str    = "modelo/modelo_regressao_linear.json";

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Object-store bucket the raw files live in.
    pub bucket:        String,
    /// Folder (key prefix) inside the bucket.
    pub remote_folder: String,
    /// Local directory the fetcher fills and the loader scans.
    pub staging_dir:   PathBuf,
    /// Model artifact location; the run log sits beside it.
    pub model_path:    PathBuf,
    /// Root of a local mirror of the object store. None means the
    /// staging directory is filled by something else.
    pub source_root:   Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bucket:        DEFAULT_BUCKET.to_string(),
            remote_folder: DEFAULT_REMOTE_FOLDER.to_string(),
            staging_dir:   PathBuf::from(DEFAULT_STAGING_DIR),
            model_path:    PathBuf::from(DEFAULT_MODEL_PATH),
            source_root:   None,
        }
    }
}

impl ServiceConfig {
    pub fn remote_source(&self) -> RemoteSource {
        RemoteSource::new(&self.bucket, &self.remote_folder)
    }

    /// The fetcher this configuration calls for.
    pub fn fetcher(&self) -> Arc<dyn RawDataFetcher> {
        match &self.source_root {
            Some(root) => Arc::new(LocalMirrorFetcher::new(root)),
            None       => Arc::new(StagedDataOnly),
        }
    }
}
