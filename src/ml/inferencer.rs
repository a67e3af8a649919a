// ============================================================
// Layer 5 — Predictor
// ============================================================
// Turns one request body into a humidity prediction:
//
//   1. the body must be a non-empty JSON object holding exactly
//      temp_max and temp_afternoon, both numeric
//   2. the model store's live slot must hold a model
//   3. the affine formula is evaluated and rounded to 0.1,
//      half to even; a result that overflows is refused
//
// The predictor only ever reads the slot.

use std::sync::Arc;

use serde_json::Value;

use crate::data::validator::{Rejection, RecordValidator};
use crate::domain::errors::PredictError;
use crate::domain::observation::{numeric_field, Features, TEMP_AFTERNOON, TEMP_MAX};
use crate::infra::checkpoint::ModelStore;

pub struct Predictor {
    store: Arc<ModelStore>,
}

impl Predictor {
    pub fn new(store: Arc<ModelStore>) -> Self {
        Self { store }
    }

    pub fn predict(&self, body: &Value) -> Result<f64, PredictError> {
        let features = parse_features(body)?;
        let model    = self.store.current().ok_or(PredictError::NotTrained)?;
        let humidity = round_to_tenth(model.predict(features));
        if !humidity.is_finite() {
            return Err(PredictError::NonFinite);
        }
        tracing::debug!(
            "Predicted humidity {} for temp_max={} temp_afternoon={}",
            humidity,
            features.temp_max,
            features.temp_afternoon
        );
        Ok(humidity)
    }
}

/// Validate a request body into a feature tuple.
pub fn parse_features(body: &Value) -> Result<Features, PredictError> {
    let record = match body {
        Value::Object(map) if !map.is_empty() => map,
        _ => return Err(PredictError::NoInput),
    };

    let validator = RecordValidator::inference();
    validator.check(record).map_err(|rejection| match rejection {
        Rejection::MissingField(f) => PredictError::MissingField(f.to_string()),
        Rejection::NotNumeric(f)   => PredictError::InvalidType(f.to_string()),
    })?;

    if let Some(extra) = record.keys().find(|k| !validator.required().contains(&k.as_str())) {
        return Err(PredictError::UnexpectedField(extra.clone()));
    }

    // check() above guarantees both reads succeed
    match (numeric_field(record, TEMP_MAX), numeric_field(record, TEMP_AFTERNOON)) {
        (Some(temp_max), Some(temp_afternoon)) => Ok(Features::new(temp_max, temp_afternoon)),
        _ => Err(PredictError::NoInput),
    }
}

/// Round to one decimal place, ties to even (61.25 → 61.2).
pub fn round_to_tenth(x: f64) -> f64 {
    (x * 10.0).round_ties_even() / 10.0
}
