// ============================================================
// Layer 4 — Dataset Loader
// ============================================================
// Scans the staging directory the fetcher populated and turns
// every parseable, valid record into a row of the corpus.
//
// Accepted file layouts (extension .json / .jsonl / .ndjson):
//   {"temp_max": ..., ...}                 one object
//   [{"temp_max": ...}, {...}]              array of objects
//   {"temp_max": ...}\n{"temp_max": ...}    one object per line
//
// The last form is what the upstream converter writes.
//
// Nothing inside the directory can abort the scan: unknown
// entries, unreadable files, malformed lines and invalid
// records are skipped with a log line. Only failing to list
// the directory itself is an error.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::Value;

use crate::data::dataset::{CorpusBuilder, LoadStats, TrainingCorpus};
use crate::data::validator::RecordValidator;
use crate::domain::errors::LoadError;
use crate::domain::observation::Record;

const DATA_EXTENSIONS: [&str; 3] = ["json", "jsonl", "ndjson"];

pub struct DatasetLoader {
    /// Staging directory to scan (not recursed into).
    dir:       PathBuf,
    /// Training field set: predictors and target.
    validator: RecordValidator,
}

impl DatasetLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir:       dir.into(),
            validator: RecordValidator::training(),
        }
    }

    pub fn load(&self) -> Result<TrainingCorpus, LoadError> {
        let read_err = |source| LoadError { dir: self.dir.clone(), source };

        // Sorted so the corpus order, and with it the seeded split,
        // does not depend on the filesystem's listing order.
        let mut paths: Vec<PathBuf> = fs::read_dir(&self.dir)
            .map_err(read_err)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<_, _>>()
            .map_err(read_err)?;
        paths.sort();

        let mut stats   = LoadStats::default();
        let mut corpus  = CorpusBuilder::default();

        for path in paths {
            if !is_data_file(&path) {
                tracing::debug!("Skipping '{}': not a data file", path.display());
                stats.entries_skipped += 1;
                continue;
            }

            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Skipping '{}': cannot read: {}", path.display(), e);
                    stats.entries_skipped += 1;
                    continue;
                }
            };

            let parsed = parse_records(&text, &path);
            if parsed.is_empty() {
                tracing::warn!("Skipping '{}': no parseable records", path.display());
                stats.entries_skipped += 1;
                continue;
            }

            stats.files_read     += 1;
            stats.records_parsed += parsed.len();

            for (origin, record) in parsed {
                let valid = self.validator.validate(&record, &origin);
                if !corpus.push(&record, valid) {
                    stats.records_rejected += 1;
                }
            }
        }

        tracing::info!(
            "Loaded {} records from '{}' ({} files, {} entries skipped, {} records rejected)",
            stats.records_parsed - stats.records_rejected,
            self.dir.display(),
            stats.files_read,
            stats.entries_skipped,
            stats.records_rejected,
        );

        Ok(corpus.finish(stats))
    }
}

fn is_data_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| DATA_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Parse a file body into (origin, record) pairs.
/// Non-object values are dropped with a note.
fn parse_records(text: &str, path: &Path) -> Vec<(String, Record)> {
    let name = path.display();

    // Whole-document forms first: a single object or an array.
    if let Ok(doc) = serde_json::from_str::<Value>(text) {
        return match doc {
            Value::Object(record) => vec![(format!("{name}"), record)],
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .filter_map(|(i, item)| object_or_note(item, || format!("{name}[{i}]")))
                .collect(),
            _ => {
                tracing::debug!("'{}' holds a JSON scalar, not records", name);
                Vec::new()
            }
        };
    }

    // Line-delimited records.
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(i, line)| {
            let origin = || format!("{name}:{}", i + 1);
            match serde_json::from_str::<Value>(line) {
                Ok(value) => object_or_note(value, origin),
                Err(e) => {
                    tracing::warn!("Skipping malformed line {}: {}", origin(), e);
                    None
                }
            }
        })
        .collect()
}

fn object_or_note(value: Value, origin: impl Fn() -> String) -> Option<(String, Record)> {
    match value {
        Value::Object(record) => Some((origin(), record)),
        other => {
            tracing::warn!("Skipping {}: expected an object, found {}", origin(), other);
            None
        }
    }
}
