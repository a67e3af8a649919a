// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Every component reports failures through one of the enums
// below. The request facade turns them into a `Status` and an
// `{"error": ...}` payload, so each variant carries a message
// fit to show a caller.
//
//   FetchError   — the outside data fetcher
//   LoadError    — staging directory as a whole
//   FitError     — regression math
//   StoreError   — model artifact persistence
//   TrainError   — a whole training run
//   PredictError — a single prediction request
//
// A malformed record is NOT an error: the loader filters it.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

/// Status codes the request layer answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    BadRequest,
    Forbidden,
    NotFound,
    Conflict,
    InternalError,
}

impl Status {
    /// Numeric HTTP-style code.
    pub fn code(self) -> u16 {
        match self {
            Status::Ok            => 200,
            Status::BadRequest    => 400,
            Status::Forbidden     => 403,
            Status::NotFound      => 404,
            Status::Conflict      => 409,
            Status::InternalError => 500,
        }
    }

    pub fn is_success(self) -> bool {
        self == Status::Ok
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ─── Fetcher ──────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Credentials not available: {0}")]
    AuthUnavailable(String),

    #[error("Failed to fetch raw data: {0}")]
    Other(String),
}

impl FetchError {
    pub fn status(&self) -> Status {
        match self {
            FetchError::NotFound(_)        => Status::NotFound,
            FetchError::AuthUnavailable(_) => Status::Forbidden,
            FetchError::Other(_)           => Status::InternalError,
        }
    }
}

// ─── Dataset loader ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
#[error("Cannot read staging directory '{}': {source}", .dir.display())]
pub struct LoadError {
    pub dir:    PathBuf,
    #[source]
    pub source: io::Error,
}

// ─── Regression fit ───────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq)]
pub enum FitError {
    #[error("Need at least {required} observations to fit, got {got}")]
    TooFewObservations { got: usize, required: usize },

    #[error("Least squares solution is not finite; predictor values are too large")]
    NumericOverflow,
}

// ─── Model store ──────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on model artifact '{}': {source}", .path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Model artifact '{}' is not valid: {source}", .path.display())]
    Serde {
        path:   PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Model artifact '{}' has unsupported format '{found}'", .path.display())]
    Format { path: PathBuf, found: String },
}

// ─── Training run ─────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum TrainError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("No data available for training")]
    NoData,

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Not enough data to train: {got} training rows, need at least {required}")]
    InsufficientData { got: usize, required: usize },

    #[error("Model fit failed: {0}")]
    Fit(FitError),

    #[error("Failed to persist model: {0}")]
    Store(#[from] StoreError),

    #[error("A training run is already in progress")]
    AlreadyRunning,
}

impl TrainError {
    pub fn status(&self) -> Status {
        match self {
            TrainError::Fetch(e) => e.status(),
            TrainError::NoData
            | TrainError::MissingColumns(_)
            | TrainError::InsufficientData { .. } => Status::BadRequest,
            TrainError::AlreadyRunning => Status::Conflict,
            TrainError::Load(_) | TrainError::Fit(_) | TrainError::Store(_) => {
                Status::InternalError
            }
        }
    }

    /// True when the same trigger may succeed later without any change
    /// to the input data layout (data not there yet, run in flight).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TrainError::Fetch(FetchError::NotFound(_))
                | TrainError::NoData
                | TrainError::InsufficientData { .. }
                | TrainError::AlreadyRunning
        )
    }
}

impl From<FitError> for TrainError {
    fn from(e: FitError) -> Self {
        match e {
            FitError::TooFewObservations { got, required } => {
                TrainError::InsufficientData { got, required }
            }
            other => TrainError::Fit(other),
        }
    }
}

// ─── Prediction request ───────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq)]
pub enum PredictError {
    #[error("No data provided")]
    NoInput,

    #[error("Missing field '{0}'")]
    MissingField(String),

    #[error("Invalid type for field '{0}'")]
    InvalidType(String),

    #[error("Unexpected field '{0}'")]
    UnexpectedField(String),

    #[error("Model not trained")]
    NotTrained,

    #[error("Prediction is not a finite number for these inputs")]
    NonFinite,
}

impl PredictError {
    pub fn status(&self) -> Status {
        match self {
            PredictError::NotTrained => Status::InternalError,
            _                        => Status::BadRequest,
        }
    }
}
