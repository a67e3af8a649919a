// ============================================================
// Layer 5 — Linear Humidity Model
// ============================================================
// The trained artifact:
//
//   humidity_afternoon ≈ intercept
//                        + coef_temp_max       * temp_max
//                        + coef_temp_afternoon * temp_afternoon
//
// plus the fit quality measured when it was trained.
//
// A LinearModel is never mutated after construction. A new
// training run builds a new one and the model store swaps the
// shared pointer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::observation::Features;

/// Fitted coefficients of the affine model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    /// Humidity when both temperatures are zero.
    pub intercept:      f64,
    /// Slope on the day's maximum temperature.
    pub temp_max:       f64,
    /// Slope on the afternoon temperature.
    pub temp_afternoon: f64,
}

impl Coefficients {
    /// Evaluate the affine formula, unrounded.
    pub fn apply(&self, f: Features) -> f64 {
        self.intercept + self.temp_max * f.temp_max + self.temp_afternoon * f.temp_afternoon
    }
}

/// Coefficient of determination on each subset, with subset sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    /// R² on the rows the coefficients were fitted on.
    pub r2_train:   f64,
    /// None when the holdout subset was empty.
    pub r2_holdout: Option<f64>,
    /// Rows in the training subset.
    pub n_train:    usize,
    /// Rows in the holdout subset.
    pub n_holdout:  usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    coefficients: Coefficients,
    quality:      FitQuality,
    trained_at:   DateTime<Utc>,
}

impl LinearModel {
    pub fn new(coefficients: Coefficients, quality: FitQuality, trained_at: DateTime<Utc>) -> Self {
        Self { coefficients, quality, trained_at }
    }

    pub fn coefficients(&self) -> Coefficients {
        self.coefficients
    }

    pub fn quality(&self) -> FitQuality {
        self.quality
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    /// Raw (unrounded) prediction.
    pub fn predict(&self, features: Features) -> f64 {
        self.coefficients.apply(features)
    }

    /// One-line description for logs and the `status` request.
    pub fn summary(&self) -> String {
        let c = &self.coefficients;
        let q = &self.quality;
        let holdout = q
            .r2_holdout
            .map(|r2| format!("{r2:.4}"))
            .unwrap_or_else(|| "n/a".to_string());
        format!(
            "humidity = {:.4} + {:.4}*temp_max + {:.4}*temp_afternoon \
             (r2_train={:.4}, r2_holdout={}, n_train={}, n_holdout={}, trained_at={})",
            c.intercept,
            c.temp_max,
            c.temp_afternoon,
            q.r2_train,
            holdout,
            q.n_train,
            q.n_holdout,
            self.trained_at.to_rfc3339(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> LinearModel {
        LinearModel::new(
            Coefficients { intercept: 100.0, temp_max: -1.5, temp_afternoon: -0.5 },
            FitQuality { r2_train: 0.9, r2_holdout: None, n_train: 8, n_holdout: 0 },
            Utc::now(),
        )
    }

    #[test]
    fn test_predict_applies_affine_formula() {
        let m = model();
        assert_eq!(m.predict(Features::new(30.0, 20.0)), 100.0 - 45.0 - 10.0);
    }

    #[test]
    fn test_summary_mentions_missing_holdout() {
        let s = model().summary();
        assert!(s.contains("r2_holdout=n/a"));
        assert!(s.contains("n_train=8"));
    }
}
