// ============================================================
// Layer 2 — ModelService (request facade)
// ============================================================
// The three calls a request layer makes, each answering with a
// JSON payload and a status:
//
//   train_model()  → {"message": "Model trained successfully"} | {"error": ...}
//   predict(body)  → {"humidity": 61.8}                        | {"error": ...}
//   status()       → {"message": <model summary>}              | {"error": ...}
//   export_model() → {"message": "Model exported to '<path>'"} | {"error": ...}
//
// Training and prediction share only the ModelStore. Training
// is admitted one run at a time through `training_gate`; a
// second trigger while a run is in flight gets 409 instead of
// racing the first one on the staging directory. Predictions
// never touch the gate.

use std::{path::Path, sync::Arc};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::config::ServiceConfig;
use crate::application::train_use_case::{TrainReport, TrainUseCase};
use crate::domain::errors::{PredictError, Status, TrainError};
use crate::domain::traits::RawDataFetcher;
use crate::infra::checkpoint::ModelStore;
use crate::ml::inferencer::Predictor;

pub const TRAINED_MESSAGE: &str = "Model trained successfully";

/// Response body shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Message { message: String },
    Humidity { humidity: f64 },
    Error { error: String },
}

impl Payload {
    pub fn message(m: impl Into<String>) -> Self {
        Payload::Message { message: m.into() }
    }

    pub fn error(e: impl ToString) -> Self {
        Payload::Error { error: e.to_string() }
    }
}

pub struct ModelService {
    trainer:       TrainUseCase,
    predictor:     Predictor,
    store:         Arc<ModelStore>,
    training_gate: Mutex<()>,
}

impl ModelService {
    /// Build from configuration: load any model already on disk and
    /// pick the fetcher the configuration names.
    pub fn new(config: ServiceConfig) -> Self {
        let store   = Arc::new(ModelStore::open(&config.model_path));
        let fetcher = config.fetcher();
        Self::with_parts(config, fetcher, store)
    }

    pub fn with_parts(
        config:  ServiceConfig,
        fetcher: Arc<dyn RawDataFetcher>,
        store:   Arc<ModelStore>,
    ) -> Self {
        Self {
            trainer:       TrainUseCase::new(config, fetcher, Arc::clone(&store)),
            predictor:     Predictor::new(Arc::clone(&store)),
            store,
            training_gate: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<ModelStore> {
        &self.store
    }

    /// Run one training pipeline unless another is already in flight.
    pub fn train(&self) -> Result<TrainReport, TrainError> {
        let _gate = self.training_gate.try_lock().ok_or(TrainError::AlreadyRunning)?;
        self.trainer.execute()
    }

    pub fn train_model(&self) -> (Payload, Status) {
        match self.train() {
            Ok(report) => {
                let stats = report.load_stats;
                tracing::info!(
                    "Training finished on {} records ({} files, {} rejected): {}",
                    report.corpus_size,
                    stats.files_read,
                    stats.records_rejected,
                    report.model.summary()
                );
                (Payload::message(TRAINED_MESSAGE), Status::Ok)
            }
            Err(e) => {
                let status = e.status();
                tracing::error!(
                    "Training aborted ({}, retryable={}): {}",
                    status,
                    e.is_retryable(),
                    e
                );
                (Payload::error(&e), status)
            }
        }
    }

    pub fn predict(&self, body: &Value) -> (Payload, Status) {
        match self.predictor.predict(body) {
            Ok(humidity) => (Payload::Humidity { humidity }, Status::Ok),
            Err(e) => {
                tracing::warn!("Prediction rejected: {}", e);
                let status = e.status();
                (Payload::error(&e), status)
            }
        }
    }

    /// Copy the live model to `out` in artifact format. The slot and
    /// the store's own artifact are left alone.
    pub fn export_model(&self, out: &Path) -> (Payload, Status) {
        let Some(model) = self.store.current() else {
            let e = PredictError::NotTrained;
            return (Payload::error(&e), e.status());
        };
        match ModelStore::save_to(&model, out) {
            Ok(()) => {
                tracing::info!("Exported model to '{}'", out.display());
                (Payload::message(format!("Model exported to '{}'", out.display())), Status::Ok)
            }
            Err(e) => {
                tracing::error!("Export failed: {}", e);
                (Payload::error(&e), Status::InternalError)
            }
        }
    }

    pub fn status(&self) -> (Payload, Status) {
        match self.store.current() {
            Some(model) => (Payload::message(model.summary()), Status::Ok),
            None => {
                let e = PredictError::NotTrained;
                (Payload::error(&e), e.status())
            }
        }
    }
}
