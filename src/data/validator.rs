// ============================================================
// Layer 4 — Record Validator
// ============================================================
// Decides whether one raw record may enter the corpus.
// A record passes when every required field is present and
// holds a finite JSON number. Strings, booleans and `null`
// (which is how the upstream converter writes NaN) fail.
//
// Validation is a filter: a failing record is logged and
// dropped, never raised.

use std::fmt;

use crate::domain::observation::{Record, PREDICTOR_FIELDS, TRAINING_FIELDS};

/// Why a record was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    MissingField(&'static str),
    NotNumeric(&'static str),
}

impl Rejection {
    pub fn field(&self) -> &'static str {
        match self {
            Rejection::MissingField(f) | Rejection::NotNumeric(f) => f,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::MissingField(field) => write!(f, "missing field '{field}'"),
            Rejection::NotNumeric(field)   => write!(f, "field '{field}' is not numeric"),
        }
    }
}

/// Checks records against a fixed list of required numeric fields.
#[derive(Debug, Clone, Copy)]
pub struct RecordValidator {
    required: &'static [&'static str],
}

impl RecordValidator {
    /// Predictors and target: what a training row needs.
    pub fn training() -> Self {
        Self { required: &TRAINING_FIELDS }
    }

    /// Predictors only: what an inference request needs.
    pub fn inference() -> Self {
        Self { required: &PREDICTOR_FIELDS }
    }

    pub fn required(&self) -> &'static [&'static str] {
        self.required
    }

    /// First reason the record fails, in required-field order.
    pub fn check(&self, record: &Record) -> Result<(), Rejection> {
        for &field in self.required {
            match record.get(field) {
                None => return Err(Rejection::MissingField(field)),
                Some(value) => {
                    let finite = value.as_f64().is_some_and(f64::is_finite);
                    if !value.is_number() || !finite {
                        return Err(Rejection::NotNumeric(field));
                    }
                }
            }
        }
        Ok(())
    }

    /// Filter form of `check`. `origin` names the record in the log
    /// (file and line, or request id).
    pub fn validate(&self, record: &Record, origin: &str) -> bool {
        match self.check(record) {
            Ok(()) => true,
            Err(rejection) => {
                tracing::warn!(
                    "Rejected record {}: {} (field '{}')",
                    origin,
                    rejection,
                    rejection.field()
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn record(v: Value) -> Record {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_valid_record_passes() {
        let v = RecordValidator::training();
        let r = record(json!({"temp_max": 30.5, "temp_afternoon": 25.3, "humidity_afternoon": 80}));
        assert!(v.validate(&r, "test"));
    }

    #[test]
    fn test_missing_field_fails() {
        let v = RecordValidator::training();
        let r = record(json!({"temp_max": 30.5, "temp_afternoon": 25.3}));
        assert!(!v.validate(&r, "test"));
        assert_eq!(v.check(&r), Err(Rejection::MissingField("humidity_afternoon")));
    }

    #[test]
    fn test_non_numeric_field_fails() {
        let v = RecordValidator::training();
        let r = record(json!({"temp_max": "thirty", "temp_afternoon": 25.3, "humidity_afternoon": 80}));
        assert!(!v.validate(&r, "test"));
        assert_eq!(v.check(&r), Err(Rejection::NotNumeric("temp_max")));

        let r = record(json!({"temp_max": 30, "temp_afternoon": null, "humidity_afternoon": 80}));
        assert_eq!(v.check(&r), Err(Rejection::NotNumeric("temp_afternoon")));

        let r = record(json!({"temp_max": 30, "temp_afternoon": 20, "humidity_afternoon": true}));
        assert_eq!(v.check(&r), Err(Rejection::NotNumeric("humidity_afternoon")));
    }

    #[test]
    fn test_extra_fields_are_ignored_for_training() {
        let v = RecordValidator::training();
        let r = record(json!({
            "temp_max": 30, "temp_afternoon": 25, "humidity_afternoon": 80, "city": "Recife"
        }));
        assert!(v.validate(&r, "test"));
    }

    #[test]
    fn test_inference_schema_needs_only_predictors() {
        let v = RecordValidator::inference();
        let r = record(json!({"temp_max": 30, "temp_afternoon": 25}));
        assert!(v.validate(&r, "request"));
        assert_eq!(v.required().len(), 2);
    }
}
