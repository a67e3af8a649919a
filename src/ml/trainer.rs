// ============================================================
// Layer 5 — Least Squares Fit
// ============================================================
// Ordinary least squares for two predictors, solved on
// mean-centered data:
//
//   Sij = Σ (xi - x̄i)(xj - x̄j)      Siy = Σ (xi - x̄i)(y - ȳ)
//
//   | S11 S12 | |b1|   |S1y|
//   | S12 S22 | |b2| = |S2y|          b0 = ȳ - b1·x̄1 - b2·x̄2
//
// When the predictors are collinear or one is constant the
// system has a line of minimisers. The minimum-norm one is taken:
// S is then rank one, S = λ·v·vᵀ with λ = trace(S), so its
// pseudo-inverse is S / λ² and b = S·s_y / λ². A constant
// predictor gets a zero slope; collinear ones share the slope
// in proportion to their spread. Both predictors constant gives
// b = 0 and the intercept is the mean target.
//
// R² follows the usual convention for a constant target:
// 1.0 when the residuals are zero, 0.0 otherwise.

use chrono::Utc;

use crate::domain::errors::FitError;
use crate::domain::observation::Observation;
use crate::ml::model::{Coefficients, FitQuality, LinearModel};

/// One row per coefficient is the minimum for a determined fit.
pub const MIN_TRAINING_ROWS: usize = 3;

/// Relative determinant below which S is treated as rank one.
const SINGULAR_TOLERANCE: f64 = 1e-10;

pub fn fit_ols(rows: &[Observation]) -> Result<Coefficients, FitError> {
    if rows.len() < MIN_TRAINING_ROWS {
        return Err(FitError::TooFewObservations {
            got:      rows.len(),
            required: MIN_TRAINING_ROWS,
        });
    }

    let n  = rows.len() as f64;
    let m1 = rows.iter().map(|r| r.temp_max).sum::<f64>() / n;
    let m2 = rows.iter().map(|r| r.temp_afternoon).sum::<f64>() / n;
    let my = rows.iter().map(|r| r.humidity_afternoon).sum::<f64>() / n;

    let (mut s11, mut s22, mut s12, mut s1y, mut s2y) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for r in rows {
        let d1 = r.temp_max - m1;
        let d2 = r.temp_afternoon - m2;
        let dy = r.humidity_afternoon - my;
        s11 += d1 * d1;
        s22 += d2 * d2;
        s12 += d1 * d2;
        s1y += d1 * dy;
        s2y += d2 * dy;
    }

    let det   = s11 * s22 - s12 * s12;
    let trace = s11 + s22;

    let (b1, b2) = if trace <= 0.0 {
        tracing::warn!("Both predictors are constant; fitting the mean humidity only");
        (0.0, 0.0)
    } else if det <= SINGULAR_TOLERANCE * s11 * s22 {
        tracing::warn!("Predictors are collinear or constant; using the minimum-norm fit");
        let l2 = trace * trace;
        ((s11 * s1y + s12 * s2y) / l2, (s12 * s1y + s22 * s2y) / l2)
    } else {
        ((s22 * s1y - s12 * s2y) / det, (s11 * s2y - s12 * s1y) / det)
    };

    let coefficients = Coefficients {
        intercept:      my - b1 * m1 - b2 * m2,
        temp_max:       b1,
        temp_afternoon: b2,
    };
    let finite = [coefficients.intercept, b1, b2].iter().all(|v| v.is_finite());
    if !finite {
        return Err(FitError::NumericOverflow);
    }
    Ok(coefficients)
}

/// Coefficient of determination of `coef` on `rows`; None for no rows.
pub fn r_squared(coef: &Coefficients, rows: &[Observation]) -> Option<f64> {
    if rows.is_empty() {
        return None;
    }
    let mean = rows.iter().map(|r| r.humidity_afternoon).sum::<f64>() / rows.len() as f64;

    let (ss_res, ss_tot) = rows.iter().fold((0.0, 0.0), |(res, tot), r| {
        let residual = r.humidity_afternoon - coef.apply(r.features());
        let spread   = r.humidity_afternoon - mean;
        (res + residual * residual, tot + spread * spread)
    });

    Some(if ss_res == 0.0 {
        1.0
    } else if ss_tot == 0.0 {
        0.0
    } else {
        1.0 - ss_res / ss_tot
    })
}

/// Fit on `train`, score on both subsets and package the result.
pub fn train_model(train: &[Observation], holdout: &[Observation]) -> Result<LinearModel, FitError> {
    let coefficients = fit_ols(train)?;

    // fit_ols guarantees train is non-empty
    let r2_train   = r_squared(&coefficients, train).unwrap_or(0.0);
    let r2_holdout = r_squared(&coefficients, holdout);

    tracing::info!(
        "Fitted humidity = {:.4} + {:.4}*temp_max + {:.4}*temp_afternoon",
        coefficients.intercept,
        coefficients.temp_max,
        coefficients.temp_afternoon,
    );
    match r2_holdout {
        Some(r2) => tracing::info!("R² train={:.4} holdout={:.4}", r2_train, r2),
        None     => tracing::info!("R² train={:.4} (empty holdout)", r2_train),
    }

    let quality = FitQuality {
        r2_train,
        r2_holdout,
        n_train:   train.len(),
        n_holdout: holdout.len(),
    };
    Ok(LinearModel::new(coefficients, quality, Utc::now()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(t1: f64, t2: f64, y: f64) -> Observation {
        Observation { temp_max: t1, temp_afternoon: t2, humidity_afternoon: y }
    }

    fn plane(t1: f64, t2: f64) -> f64 {
        95.0 - 1.2 * t1 - 0.8 * t2
    }

    fn exact_rows() -> Vec<Observation> {
        [(30.0, 25.0), (32.0, 24.0), (28.0, 27.0), (35.0, 30.0), (25.0, 21.0), (31.0, 29.0)]
            .iter()
            .map(|&(a, b)| obs(a, b, plane(a, b)))
            .collect()
    }

    #[test]
    fn test_recovers_exact_plane() {
        let c = fit_ols(&exact_rows()).unwrap();
        assert!((c.intercept - 95.0).abs() < 1e-8);
        assert!((c.temp_max + 1.2).abs() < 1e-9);
        assert!((c.temp_afternoon + 0.8).abs() < 1e-9);
        let r2 = r_squared(&c, &exact_rows()).unwrap();
        assert!((r2 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_residuals_are_orthogonal_to_predictors() {
        let rows = vec![
            obs(30.0, 25.0, 70.0),
            obs(32.0, 24.0, 61.0),
            obs(28.0, 27.0, 75.0),
            obs(35.0, 30.0, 52.0),
            obs(25.0, 21.0, 88.0),
        ];
        let c = fit_ols(&rows).unwrap();
        let (mut sum, mut dot1, mut dot2) = (0.0, 0.0, 0.0);
        for r in &rows {
            let e = r.humidity_afternoon - c.apply(r.features());
            sum  += e;
            dot1 += e * r.temp_max;
            dot2 += e * r.temp_afternoon;
        }
        assert!(sum.abs() < 1e-8);
        assert!(dot1.abs() < 1e-6);
        assert!(dot2.abs() < 1e-6);
    }

    #[test]
    fn test_too_few_rows() {
        let rows = vec![obs(1.0, 2.0, 3.0), obs(2.0, 1.0, 3.0)];
        assert_eq!(
            fit_ols(&rows),
            Err(FitError::TooFewObservations { got: 2, required: 3 })
        );
    }

    fn max_abs_residual(c: &Coefficients, rows: &[Observation]) -> f64 {
        rows.iter()
            .map(|r| (r.humidity_afternoon - c.apply(r.features())).abs())
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_collinear_predictors_take_minimum_norm_fit() {
        // temp_afternoon = 2 * temp_max, humidity = temp_max + 30
        let rows: Vec<_> = (0..6).map(|i| {
            let t = 20.0 + i as f64;
            obs(t, 2.0 * t, t + 30.0)
        }).collect();
        let c = fit_ols(&rows).unwrap();
        assert!(max_abs_residual(&c, &rows) < 1e-9);
        // slope 1 along t shared as (1, 2) / 5
        assert!((c.temp_max - 0.2).abs() < 1e-12);
        assert!((c.temp_afternoon - 0.4).abs() < 1e-12);
        assert!((c.intercept - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_predictor_gets_zero_slope() {
        let rows: Vec<_> = (0..5).map(|i| {
            let t2 = 20.0 + i as f64;
            obs(30.0, t2, 100.0 - 2.0 * t2)
        }).collect();
        let c = fit_ols(&rows).unwrap();
        assert_eq!(c.temp_max, 0.0);
        assert!((c.temp_afternoon + 2.0).abs() < 1e-12);
        assert!((c.intercept - 100.0).abs() < 1e-9);
        assert!(max_abs_residual(&c, &rows) < 1e-9);
    }

    #[test]
    fn test_both_predictors_constant_fits_the_mean() {
        let rows = vec![obs(30.0, 25.0, 60.0), obs(30.0, 25.0, 70.0), obs(30.0, 25.0, 80.0)];
        let c = fit_ols(&rows).unwrap();
        assert_eq!(c, Coefficients { intercept: 70.0, temp_max: 0.0, temp_afternoon: 0.0 });
    }

    #[test]
    fn test_overflowing_predictors_are_reported() {
        let rows: Vec<_> = (0..4).map(|i| obs(1e200 * i as f64, 1e200 * (i % 2) as f64, 50.0)).collect();
        assert_eq!(fit_ols(&rows), Err(FitError::NumericOverflow));
    }

    #[test]
    fn test_r_squared_conventions() {
        let c = Coefficients { intercept: 50.0, temp_max: 0.0, temp_afternoon: 0.0 };
        assert_eq!(r_squared(&c, &[]), None);
        assert_eq!(r_squared(&c, &[obs(1.0, 1.0, 50.0), obs(2.0, 3.0, 50.0)]), Some(1.0));
        assert_eq!(r_squared(&c, &[obs(1.0, 1.0, 40.0), obs(2.0, 3.0, 40.0)]), Some(0.0));
    }

    #[test]
    fn test_train_model_records_quality() {
        let rows  = exact_rows();
        let model = train_model(&rows[..4], &rows[4..]).unwrap();
        let q = model.quality();
        assert_eq!(q.n_train, 4);
        assert_eq!(q.n_holdout, 2);
        assert!(q.r2_holdout.unwrap() > 0.999);
    }
}
