// ============================================================
// Layer 6 — Training Run Log
// ============================================================
// Appends one CSV row per successful training run, next to the
// model artifact, so fit quality can be compared across runs.
//
// Output file: <model dir>/training_runs.csv
//
//   trained_at,n_train,n_holdout,r2_train,r2_holdout,intercept,coef_temp_max,coef_temp_afternoon
//   2026-10-16T10:00:00+00:00,80,20,0.812345,0.790112,101.2,-1.1,-0.4
//
// r2_holdout is left blank when the holdout subset was empty.

use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::ml::model::LinearModel;

const HEADER: &str =
    "trained_at,n_train,n_holdout,r2_train,r2_holdout,intercept,coef_temp_max,coef_temp_afternoon";

pub const RUN_LOG_FILE: &str = "training_runs.csv";

pub struct TrainingRunLog {
    csv_path: PathBuf,
}

impl TrainingRunLog {
    pub fn new(csv_path: impl Into<PathBuf>) -> Self {
        Self { csv_path: csv_path.into() }
    }

    /// The log that lives in the same directory as the model artifact.
    pub fn beside(model_path: &Path) -> Self {
        let dir = model_path.parent().unwrap_or_else(|| Path::new(""));
        Self::new(dir.join(RUN_LOG_FILE))
    }

    /// Append one row, writing the header first if the file is new.
    pub fn record(&self, model: &LinearModel) -> io::Result<()> {
        if let Some(dir) = self.csv_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let is_new = !self.csv_path.exists();
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.csv_path)?;
        if is_new {
            writeln!(f, "{HEADER}")?;
        }

        let c = model.coefficients();
        let q = model.quality();
        writeln!(
            f,
            "{},{},{},{:.6},{},{},{},{}",
            model.trained_at().to_rfc3339(),
            q.n_train,
            q.n_holdout,
            q.r2_train,
            q.r2_holdout.map(|r2| format!("{r2:.6}")).unwrap_or_default(),
            c.intercept,
            c.temp_max,
            c.temp_afternoon,
        )?;

        tracing::debug!("Logged training run to '{}'", self.csv_path.display());
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
