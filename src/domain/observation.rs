// ============================================================
// Layer 3 — Observation Domain Types
// ============================================================
// One weather reading as it arrives from the staging area is
// an untyped JSON object (`Record`). Once validated it becomes
// an `Observation` (training) or `Features` (inference).
//
// Field names are the column names produced by the upstream
// fetcher, so they are kept verbatim.

use serde_json::{Map, Value};

/// Maximum temperature of the day (predictor).
pub const TEMP_MAX: &str = "temp_max";

/// Afternoon temperature (predictor).
pub const TEMP_AFTERNOON: &str = "temp_afternoon";

/// Afternoon relative humidity (training target).
pub const HUMIDITY_AFTERNOON: &str = "humidity_afternoon";

/// The two predictors, in coefficient order.
pub const PREDICTOR_FIELDS: [&str; 2] = [TEMP_MAX, TEMP_AFTERNOON];

/// Every column a training record must carry.
pub const TRAINING_FIELDS: [&str; 3] = [TEMP_MAX, TEMP_AFTERNOON, HUMIDITY_AFTERNOON];

/// A raw observation record, exactly as parsed from a staged file.
pub type Record = Map<String, Value>;

/// Read a field as a finite float, if it is present and numeric.
pub fn numeric_field(record: &Record, field: &str) -> Option<f64> {
    match record.get(field) {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// A fully typed training row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Maximum temperature of the day, °C.
    pub temp_max:           f64,
    /// Temperature at the afternoon reading, °C.
    pub temp_afternoon:     f64,
    /// Relative humidity at the afternoon reading, %.
    pub humidity_afternoon: f64,
}

impl Observation {
    /// The predictor part of this row.
    pub fn features(&self) -> Features {
        Features {
            temp_max:       self.temp_max,
            temp_afternoon: self.temp_afternoon,
        }
    }

    /// Extract a typed row from a record.
    /// Returns the name of the first field that is missing or not numeric.
    pub fn from_record(record: &Record) -> Result<Self, &'static str> {
        let get = |field: &'static str| numeric_field(record, field).ok_or(field);
        Ok(Self {
            temp_max:           get(TEMP_MAX)?,
            temp_afternoon:     get(TEMP_AFTERNOON)?,
            humidity_afternoon: get(HUMIDITY_AFTERNOON)?,
        })
    }
}

/// The feature tuple a prediction is computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Features {
    pub temp_max:       f64,
    pub temp_afternoon: f64,
}

impl Features {
    pub fn new(temp_max: f64, temp_afternoon: f64) -> Self {
        Self { temp_max, temp_afternoon }
    }
}
