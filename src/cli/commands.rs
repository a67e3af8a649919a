// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Subcommands: `train`, `predict`, `export` and `serve`.
// Every command shares the same data/model location flags,
// each of which falls back to an environment variable and then
// to a built-in default.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::application::config::{
    ServiceConfig, DEFAULT_BUCKET, DEFAULT_MODEL_PATH, DEFAULT_REMOTE_FOLDER, DEFAULT_STAGING_DIR,
};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the raw data, fit a new model and make it live
    Train,

    /// Predict afternoon humidity with the persisted model
    Predict(PredictArgs),

    /// Write a copy of the persisted model to another path
    Export(ExportArgs),

    /// Answer JSON requests on stdin, one per line
    Serve,
}

/// Data and model locations.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Object-store bucket holding the raw files
    #[arg(long, env = "BUCKET_NAME", default_value = DEFAULT_BUCKET, global = true)]
    pub bucket: String,

    /// Folder inside the bucket
    #[arg(long, env = "S3_FOLDER", default_value = DEFAULT_REMOTE_FOLDER, global = true)]
    pub remote_folder: String,

    /// Local directory the raw files are staged in
    #[arg(long, env = "LOCAL_FOLDER", default_value = DEFAULT_STAGING_DIR, global = true)]
    pub staging_dir: PathBuf,

    /// Where the model artifact is written and read
    #[arg(long, env = "MODEL_PATH", default_value = DEFAULT_MODEL_PATH, global = true)]
    pub model_path: PathBuf,

    /// Local mirror of the object store (<root>/<bucket>/<folder>).
    /// Without it the staging directory must already be populated.
    #[arg(long, env = "SOURCE_ROOT", global = true)]
    pub source_root: Option<PathBuf>,
}

/// The application layer never sees clap types.
impl From<ConfigArgs> for ServiceConfig {
    fn from(a: ConfigArgs) -> Self {
        ServiceConfig {
            bucket:        a.bucket,
            remote_folder: a.remote_folder,
            staging_dir:   a.staging_dir,
            model_path:    a.model_path,
            source_root:   a.source_root,
        }
    }
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Request body, e.g. '{"temp_max": 30, "temp_afternoon": 25}'
    #[arg(long)]
    pub input: String,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Destination file; parent directories are created
    #[arg(long)]
    pub out: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_defaults_build_default_config() {
        let cli = Cli::try_parse_from(["humidity-service", "train"]).unwrap();
        assert!(matches!(cli.command, Commands::Train));
        let cfg: ServiceConfig = cli.config.into();
        // env vars could override these in a dirty shell; compare only when unset
        if std::env::var_os("MODEL_PATH").is_none() {
            assert_eq!(cfg.model_path, ServiceConfig::default().model_path);
        }
        if std::env::var_os("SOURCE_ROOT").is_none() {
            assert_eq!(cfg.source_root, None);
        }
    }

    #[test]
    fn test_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "humidity-service",
            "predict",
            "--input",
            "{}",
            "--model-path",
            "/tmp/m.json",
            "--staging-dir",
            "/tmp/stage",
        ])
        .unwrap();
        let Commands::Predict(args) = &cli.command else { panic!("expected predict") };
        assert_eq!(args.input, "{}");
        let cfg: ServiceConfig = cli.config.into();
        assert_eq!(cfg.model_path, PathBuf::from("/tmp/m.json"));
        assert_eq!(cfg.staging_dir, PathBuf::from("/tmp/stage"));
    }

    #[test]
    fn test_export_takes_destination() {
        let cli = Cli::try_parse_from(["humidity-service", "export", "--out", "/tmp/copy.json"]).unwrap();
        let Commands::Export(args) = &cli.command else { panic!("expected export") };
        assert_eq!(args.out, PathBuf::from("/tmp/copy.json"));
        assert!(Cli::try_parse_from(["humidity-service", "export"]).is_err());
    }

    #[test]
    fn test_predict_requires_input() {
        assert!(Cli::try_parse_from(["humidity-service", "predict"]).is_err());
    }
}
