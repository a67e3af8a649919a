// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates one training run in order:
//
//   Step 1: Fetch raw files into staging   (Layer 6 - infra)
//   Step 2: Load + validate records        (Layer 4 - data)
//   Step 3: Reject a staging dir with no records at all
//   Step 4: Reject columns no record carries
//   Step 4b: Reject a corpus where no record survived validation
//   Step 5: Seeded 80/20 split             (Layer 4 - data)
//   Step 6: Fit + score                    (Layer 5 - ml)
//   Step 7: Persist + swap live model      (Layer 6 - infra)
//
// Any failure returns before Step 7, so a failed run never
// touches the live model.

use std::sync::Arc;

use crate::data::{
    dataset::LoadStats,
    loader::DatasetLoader,
    splitter::{split_train_holdout, HOLDOUT_FRACTION, SPLIT_SEED},
};
use crate::application::config::ServiceConfig;
use crate::domain::errors::TrainError;
use crate::domain::observation::TRAINING_FIELDS;
use crate::domain::traits::RawDataFetcher;
use crate::infra::{checkpoint::ModelStore, metrics::TrainingRunLog};
use crate::ml::{model::LinearModel, trainer::train_model};

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct TrainReport {
    /// The model now in the live slot.
    pub model:        Arc<LinearModel>,
    /// Rows that passed validation, before the split.
    pub corpus_size:  usize,
    /// Counters from the staging-directory scan.
    pub load_stats:   LoadStats,
}

pub struct TrainUseCase {
    config:  ServiceConfig,
    fetcher: Arc<dyn RawDataFetcher>,
    store:   Arc<ModelStore>,
}

impl TrainUseCase {
    pub fn new(config: ServiceConfig, fetcher: Arc<dyn RawDataFetcher>, store: Arc<ModelStore>) -> Self {
        Self { config, fetcher, store }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainReport, TrainError> {
        let cfg = &self.config;

        // ── Step 1: Fetch ─────────────────────────────────────────────────────
        let source = cfg.remote_source();
        tracing::info!(
            "Fetching raw data from '{}/{}' into '{}'",
            source.bucket,
            source.folder,
            cfg.staging_dir.display()
        );
        self.fetcher.fetch(&source, &cfg.staging_dir)?;

        // ── Step 2: Load ──────────────────────────────────────────────────────
        let corpus = DatasetLoader::new(&cfg.staging_dir).load()?;

        // ── Step 3: Nothing parsed ────────────────────────────────────────────
        let load_stats = corpus.stats();
        if load_stats.records_parsed == 0 {
            return Err(TrainError::NoData);
        }

        // ── Step 4: Required columns ──────────────────────────────────────────
        let missing = corpus.missing_columns(&TRAINING_FIELDS);
        if !missing.is_empty() {
            return Err(TrainError::MissingColumns(missing));
        }
        if corpus.is_empty() {
            return Err(TrainError::NoData);
        }
        let corpus_size = corpus.len();
        let rows        = corpus.observations().to_vec();

        // ── Step 5: Train / holdout split (80/20, fixed seed) ─────────────────
        let (train, holdout) = split_train_holdout(rows, HOLDOUT_FRACTION, SPLIT_SEED);
        tracing::info!("Split: {} train, {} holdout", train.len(), holdout.len());

        // ── Step 6: Fit ───────────────────────────────────────────────────────
        let model = train_model(&train, &holdout)?;

        // ── Step 7: Persist, then swap ────────────────────────────────────────
        let live = self.store.save(&model)?;

        let run_log = TrainingRunLog::beside(self.store.path());
        if let Err(e) = run_log.record(&live) {
            tracing::warn!("Could not append to '{}': {}", run_log.csv_path().display(), e);
        }

        Ok(TrainReport {
            model:       live,
            corpus_size,
            load_stats,
        })
    }
}
