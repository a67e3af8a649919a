// ============================================================
// Layer 6 — Raw Data Fetchers
// ============================================================
// Implementations of `RawDataFetcher`.
//
// LocalMirrorFetcher treats `<root>/<bucket>/<folder>` as the
// remote prefix and copies its top-level files into the staging
// directory, the same layout the object-store download step
// leaves behind. Errors are classified the way the trainer
// needs them:
//
//   io NotFound          → FetchError::NotFound         (404)
//   io PermissionDenied  → FetchError::AuthUnavailable  (403)
//   anything else        → FetchError::Other            (500)
//
// StagedDataOnly is used when something else fills the staging
// directory; it only makes sure the directory exists.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::domain::errors::FetchError;
use crate::domain::traits::{RawDataFetcher, RemoteSource};

pub struct LocalMirrorFetcher {
    root: PathBuf,
}

impl LocalMirrorFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

fn classify(e: io::Error, what: &str) -> FetchError {
    match e.kind() {
        io::ErrorKind::NotFound         => FetchError::NotFound(what.to_string()),
        io::ErrorKind::PermissionDenied => FetchError::AuthUnavailable(format!("access denied to {what}")),
        _                               => FetchError::Other(format!("{what}: {e}")),
    }
}

impl RawDataFetcher for LocalMirrorFetcher {
    fn fetch(&self, source: &RemoteSource, staging_dir: &Path) -> Result<(), FetchError> {
        let bucket_dir = self.root.join(&source.bucket);
        let remote_dir = bucket_dir.join(&source.folder);
        let bucket     = format!("bucket '{}'", source.bucket);
        let remote     = format!("'{}/{}'", source.bucket, source.folder);

        fs::metadata(&bucket_dir).map_err(|e| classify(e, &bucket))?;
        let entries = fs::read_dir(&remote_dir).map_err(|e| classify(e, &remote))?;

        fs::create_dir_all(staging_dir)
            .map_err(|e| FetchError::Other(format!("staging dir '{}': {e}", staging_dir.display())))?;

        let mut copied = 0usize;
        for entry in entries {
            let entry = entry.map_err(|e| classify(e, &remote))?;
            let path  = entry.path();
            if !path.is_file() {
                tracing::debug!("Not fetching '{}': not a regular file", path.display());
                continue;
            }
            let target = staging_dir.join(entry.file_name());
            fs::copy(&path, &target).map_err(|e| classify(e, &path.display().to_string()))?;
            tracing::debug!("Downloaded '{}' to '{}'", path.display(), target.display());
            copied += 1;
        }

        if copied == 0 {
            tracing::warn!("No objects found in {}", remote);
        } else {
            tracing::info!("Fetched {} files from {} into '{}'", copied, remote, staging_dir.display());
        }
        Ok(())
    }
}

/// Fetcher for deployments where the staging directory is filled
/// by an external job.
pub struct StagedDataOnly;

impl RawDataFetcher for StagedDataOnly {
    fn fetch(&self, _source: &RemoteSource, staging_dir: &Path) -> Result<(), FetchError> {
        fs::create_dir_all(staging_dir)
            .map_err(|e| FetchError::Other(format!("staging dir '{}': {e}", staging_dir.display())))
    }
}
