// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The trainer never talks to object storage directly. It asks
// a `RawDataFetcher` to populate the staging directory with
// line-delimited JSON records, then scans that directory.
//
// Implementations:
//   - LocalMirrorFetcher → copies from a local mirror of the bucket
//   - StagedDataOnly     → does nothing; data is staged externally
//   - test doubles       → return a chosen FetchError

use std::path::Path;

use crate::domain::errors::FetchError;

/// Where raw data lives upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSource {
    /// Bucket (or other top-level container) name.
    pub bucket: String,

    /// Folder / key prefix inside the bucket.
    pub folder: String,
}

impl RemoteSource {
    pub fn new(bucket: impl Into<String>, folder: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            folder: folder.into(),
        }
    }
}

// ─── RawDataFetcher ───────────────────────────────────────────────────────────
/// Anything that can pull raw observation files into a local
/// staging directory before the dataset loader runs.
///
/// Failures must keep "source missing" and "credentials missing"
/// apart so the trainer can answer 404 and 403 respectively.
pub trait RawDataFetcher: Send + Sync {
    fn fetch(&self, source: &RemoteSource, staging_dir: &Path) -> Result<(), FetchError>;
}
