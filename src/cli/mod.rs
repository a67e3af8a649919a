// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// `clap` and hands every request to Layer 2's ModelService.
//
//   1. `train`   — run the training pipeline once
//   2. `predict` — one prediction from the persisted model
//   3. `export`  — copy the persisted model to another path
//   4. `serve`   — line-delimited JSON requests on stdin,
//                  responses on stdout
//
// Every response is the service payload as one JSON line.

pub mod commands;

use std::{
    io::{self, BufRead, Write},
    sync::Arc,
    thread,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::service::{ModelService, Payload};
use crate::domain::errors::Status;
use commands::{Commands, ConfigArgs, ExportArgs, PredictArgs};

#[derive(Parser, Debug)]
#[command(
    name = "humidity-service",
    version,
    about = "Train and serve a linear model of afternoon humidity from temperatures."
)]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let service = ModelService::new(self.config.into());
        match self.command {
            Commands::Train         => run_train(&service),
            Commands::Predict(args) => run_predict(&service, args),
            Commands::Export(args)  => run_export(&service, args),
            Commands::Serve         => run_serve(Arc::new(service)),
        }
    }
}

fn run_train(service: &ModelService) -> Result<()> {
    let (payload, status) = service.train_model();
    println!("{}", serde_json::to_string(&payload)?);
    if !status.is_success() {
        bail!("training failed with status {}", status);
    }
    Ok(())
}

fn run_predict(service: &ModelService, args: PredictArgs) -> Result<()> {
    let body: Value = serde_json::from_str(&args.input).context("--input is not valid JSON")?;
    let (payload, status) = service.predict(&body);
    println!("{}", serde_json::to_string(&payload)?);
    if !status.is_success() {
        bail!("prediction failed with status {}", status);
    }
    Ok(())
}

fn run_export(service: &ModelService, args: ExportArgs) -> Result<()> {
    let (payload, status) = service.export_model(&args.out);
    println!("{}", serde_json::to_string(&payload)?);
    if !status.is_success() {
        bail!("export failed with status {}", status);
    }
    Ok(())
}

fn run_serve(service: Arc<ModelService>) -> Result<()> {
    tracing::info!("Serving requests on stdin");
    let out = Arc::new(Mutex::new(io::stdout()));
    serve_lines(service, io::stdin().lock(), out)
}

// ─── Serve loop ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    id: Option<Value>,
    #[serde(flatten)]
    op: Op,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
enum Op {
    Train,
    Predict {
        #[serde(default)]
        features: Value,
    },
    Status,
}

#[derive(Debug, Serialize)]
struct Response<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a Value>,
    status: u16,
    #[serde(flatten)]
    payload: &'a Payload,
}

fn respond<W: Write>(out: &Mutex<W>, id: Option<&Value>, payload: &Payload, status: Status) {
    let response = Response { id, status: status.code(), payload };
    if let Err(e) = write_line(&mut *out.lock(), &response) {
        tracing::error!("Could not write response: {}", e);
    }
}

fn write_line<W: Write>(out: &mut W, response: &Response<'_>) -> io::Result<()> {
    serde_json::to_writer(&mut *out, response)?;
    writeln!(out)?;
    out.flush()
}

/// Answer one request per input line until EOF. Training runs on its
/// own thread so predictions keep flowing; pending runs are joined
/// before returning.
pub fn serve_lines<R, W>(service: Arc<ModelService>, input: R, out: Arc<Mutex<W>>) -> Result<()>
where
    R: BufRead,
    W: Write + Send + 'static,
{
    let mut running = Vec::new();

    for line in input.lines() {
        let line = line.context("reading request")?;
        if line.trim().is_empty() {
            continue;
        }

        let request: Request = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Malformed request: {}", e);
                respond(&out, None, &Payload::error(format!("Malformed request: {e}")), Status::BadRequest);
                continue;
            }
        };

        match request.op {
            Op::Train => {
                let service = Arc::clone(&service);
                let out     = Arc::clone(&out);
                let id      = request.id;
                running.push(thread::spawn(move || {
                    let (payload, status) = service.train_model();
                    respond(&out, id.as_ref(), &payload, status);
                }));
            }
            Op::Predict { features } => {
                let (payload, status) = service.predict(&features);
                respond(&out, request.id.as_ref(), &payload, status);
            }
            Op::Status => {
                let (payload, status) = service.status();
                respond(&out, request.id.as_ref(), &payload, status);
            }
        }

        running.retain(|h| !h.is_finished());
    }

    for handle in running {
        if handle.join().is_err() {
            tracing::error!("Training thread panicked");
        }
    }
    Ok(())
}
