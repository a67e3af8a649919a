// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that touches the filesystem on behalf of the
// other layers:
//
//   checkpoint.rs — Model Store
//                   Writes the model artifact atomically and
//                   owns the Live Model Slot predictions read.
//
//   fetcher.rs    — Raw data fetchers
//                   Fill the staging directory before the
//                   dataset loader scans it.
//
//   metrics.rs    — Training run log
//                   One CSV row of fit quality per run.

/// Model artifact persistence and the live model slot
pub mod checkpoint;

/// Staging-directory fetchers
pub mod fetcher;

/// Training run CSV log
pub mod metrics;
