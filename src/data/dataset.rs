// ============================================================
// Layer 4 — Training Corpus
// ============================================================
// What one scan of the staging directory produced:
//
//   rows     — typed observations that passed validation
//   columns  — every column name seen on a parsed record,
//              including records the validator later dropped
//   stats    — file / record counters for the log
//
// `columns` is what the missing-column check reads. A column
// absent from every record makes every record invalid, so the
// surviving rows alone could never show it.

use std::collections::BTreeSet;

use crate::domain::observation::{Observation, Record};

/// Counters collected while scanning the staging directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Data files that yielded at least one parseable record.
    pub files_read:       usize,
    /// Directory entries ignored: wrong extension, unreadable, no records.
    pub entries_skipped:  usize,
    /// JSON objects parsed, valid or not.
    pub records_parsed:   usize,
    /// Parsed records the validator dropped.
    pub records_rejected: usize,
}

/// Validated rows from one training run, in load order.
#[derive(Debug, Clone, Default)]
pub struct TrainingCorpus {
    rows:    Vec<Observation>,
    columns: BTreeSet<String>,
    stats:   LoadStats,
}

impl TrainingCorpus {
    pub fn new(rows: Vec<Observation>, columns: BTreeSet<String>, stats: LoadStats) -> Self {
        Self { rows, columns, stats }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.rows
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    /// Required columns that no parsed record carried, in the given order.
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|c| !self.columns.contains(**c))
            .map(|c| c.to_string())
            .collect()
    }
}

/// Accumulates a corpus record by record.
#[derive(Debug, Default)]
pub struct CorpusBuilder {
    rows:    Vec<Observation>,
    columns: BTreeSet<String>,
}

impl CorpusBuilder {
    /// Note the record's columns; keep it as a row only if `valid`.
    pub fn push(&mut self, record: &Record, valid: bool) -> bool {
        for key in record.keys() {
            if !self.columns.contains(key) {
                self.columns.insert(key.clone());
            }
        }
        if !valid {
            return false;
        }
        match Observation::from_record(record) {
            Ok(row) => {
                self.rows.push(row);
                true
            }
            Err(_) => false,
        }
    }

    pub fn finish(self, stats: LoadStats) -> TrainingCorpus {
        TrainingCorpus::new(self.rows, self.columns, stats)
    }
}
