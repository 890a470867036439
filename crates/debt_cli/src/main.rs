// crates/debt_cli/src/main.rs
//
// Exit codes, typed error mapping, logging setup, the validate-only path and
// the full run (load plan → overrides → pipeline → artifacts → payoff table).

mod args;
mod table;

mod exitcodes {
    pub const OK: i32 = 0;
    pub const VALIDATION: i32 = 2;
    pub const IO: i32 = 4;
}

use std::path::Path;
use std::process::ExitCode;

use args::{parse_and_validate as parse_cli, Args};
use chrono::Utc;
use debt_core::{StrategyId, YearMonth};
use debt_io::{canonical_json, loader, IoError};
use debt_pipeline::{run, PipelineError, PipelineOutputs, PlanRequest};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    /// Plan shape, domain and ordering failures
    Validation(String),
    /// Read/write/path/limit failures
    Io(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) => write!(f, "validation: {m}"),
            MainError::Io(m) => write!(f, "io: {m}"),
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("debtplan: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION as u8);
        }
    };
    init_tracing(args.quiet);

    let outcome = if args.validate_only { validate_only(&args) } else { run_once(&args) };
    let rc = match outcome {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            error!("{e}");
            eprintln!("debtplan: error: {e}");
            map_error(&e)
        }
    };
    ExitCode::from(rc as u8)
}

/// stderr subscriber; `RUST_LOG` wins over the default level.
fn init_tracing(quiet: bool) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

/// Load the plan, merge flag overrides, resolve defaults.
fn load_request(args: &Args) -> Result<PlanRequest, MainError> {
    let loaded = loader::load_plan(&args.plan).map_err(map_io_err)?;
    info!(plan = %args.plan.display(), sha256 = %loaded.inputs_sha256, debts = loaded.plan.debts.len(), "plan loaded");

    let mut plan = loaded.plan;
    if let Some(budget) = args.budget {
        plan.total_monthly_payment = Some(budget);
    }
    if let Some(strategy) = args.strategy {
        plan.strategy = Some(strategy);
    }
    if !args.order.is_empty() {
        // A flag order replaces the plan's strategy. --order next to a
        // built-in --strategy is refused at parse time.
        plan.custom_order = Some(args.order.clone());
        plan.strategy = Some(StrategyId::Custom);
    }
    if let Some(h) = args.horizon {
        plan.horizon_months = Some(h);
    }
    if let Some(start) = args.start {
        plan.start = Some(start);
    }

    // The clock is read here and only here.
    let default_start = YearMonth::from_date(Utc::now().date_naive());
    PlanRequest::from_plan(plan, default_start).map_err(map_pipeline_err)
}

/// Validate-only path (no projection, no artifacts).
fn validate_only(args: &Args) -> Result<(), MainError> {
    let req = load_request(args)?;
    req.check().map_err(|e| map_pipeline_err(e.into()))?;
    info!(debts = req.debts.len(), strategy = %req.strategy.id(), "validate-only: plan OK");
    Ok(())
}

fn run_once(args: &Args) -> Result<(), MainError> {
    let req = load_request(args)?;
    let outs = run(&req, args.schedule).map_err(map_pipeline_err)?;

    write_artifacts(&args.out, &outs)?;
    println!("{}", table::render(&req.debts, &outs.result));

    info!(out = %args.out.display(), id = %outs.result.id, "artifacts written");
    Ok(())
}

fn write_artifacts(out_dir: &Path, outs: &PipelineOutputs) -> Result<(), MainError> {
    let res_path = out_dir.join("result.json");
    canonical_json::write_canonical_file(&outs.result, &res_path)
        .map_err(|e| MainError::Io(format!("write result.json: {e}")))?;

    if let Some(schedule) = &outs.schedule {
        let sched_path = out_dir.join("schedule.json");
        canonical_json::write_canonical_file(schedule, &sched_path)
            .map_err(|e| MainError::Io(format!("write schedule.json: {e}")))?;
    }
    Ok(())
}

fn map_error(e: &MainError) -> i32 {
    match e {
        MainError::Validation(_) => exitcodes::VALIDATION,
        MainError::Io(_) => exitcodes::IO,
    }
}

/// Plan shape problems are validation failures; filesystem problems are I/O.
fn map_io_err(e: IoError) -> MainError {
    match e {
        IoError::Json { pointer, msg } => MainError::Validation(format!("json {pointer}: {msg}")),
        IoError::Path(m) => MainError::Io(format!("path: {m}")),
        IoError::Limit(m) => MainError::Io(format!("limit: {m}")),
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    match e {
        PipelineError::Validation(v) => MainError::Validation(format!("{} ({})", v, v.code())),
        PipelineError::Io(e) => map_io_err(e),
    }
}
