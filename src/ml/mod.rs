// ============================================================
// Layer 5 — ML / Model Layer
// ============================================================
// All regression code lives here:
//
//   model.rs      — the immutable LinearModel artifact
//                   (coefficients, fit quality, timestamp)
//
//   trainer.rs    — ordinary least squares on two predictors
//                   and the coefficient of determination
//
//   inferencer.rs — the Predictor: request validation, live
//                   model lookup, rounding

/// Linear humidity model
pub mod model;

/// Least squares fit and R²
pub mod trainer;

/// Request-to-prediction path
pub mod inferencer;
