// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the staging directory and the rows the
// regression is fitted on:
//
//   staging dir (*.json, line-delimited records)
//       │
//       ▼
//   DatasetLoader     → lists files, parses records
//       │
//       ▼
//   RecordValidator   → drops records with missing / non-numeric fields
//       │
//       ▼
//   TrainingCorpus    → validated rows + load counters
//       │
//       ▼
//   splitter          → seeded 80/20 train/holdout split

/// Scans the staging directory into a corpus
pub mod loader;

/// Required-field and numeric checks for a single record
pub mod validator;

/// The in-memory training corpus
pub mod dataset;

/// Seeded shuffle and train/holdout split
pub mod splitter;
