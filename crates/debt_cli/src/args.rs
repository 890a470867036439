// crates/debt_cli/src/args.rs
//
// Offline CLI argument surface (types + validation helpers).
//
// Rules:
// - Plan input is a local JSON file; any scheme:// path is rejected.
// - Flags override the plan's own fields: --budget, --strategy, --order,
//   --horizon, --start.
// - --order without --strategy implies the custom strategy.
// - --validate-only loads and validates the plan without projecting.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use clap::Parser;
use debt_core::{DebtId, StrategyId, YearMonth};
use rust_decimal::Decimal;

/// Parsed CLI arguments.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "debtplan",
    disable_help_subcommand = true,
    about = "Offline debt payoff planner: allocate a monthly budget and project payoff dates"
)]
pub struct Args {
    /// Plan JSON path (debts + budget + strategy), or a bare JSON array of debts.
    #[arg(long)]
    pub plan: PathBuf,

    /// Total monthly payment override.
    #[arg(long, value_parser = parse_money)]
    pub budget: Option<Decimal>,

    /// Strategy override: avalanche | snowball | custom.
    #[arg(long, value_parser = parse_strategy)]
    pub strategy: Option<StrategyId>,

    /// Custom priority order, comma-separated debt ids (highest first).
    #[arg(long, value_delimiter = ',', value_parser = parse_debt_id)]
    pub order: Vec<DebtId>,

    /// Horizon cap in months (1..=1200).
    #[arg(long)]
    pub horizon: Option<u32>,

    /// Start month, YYYY-MM (default: the plan's `start`, else the current UTC month).
    #[arg(long, value_parser = parse_year_month)]
    pub start: Option<YearMonth>,

    /// Output directory for result.json (and schedule.json).
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// Also write the month-by-month schedule.
    #[arg(long)]
    pub schedule: bool,

    /// Validate the plan only; do not project or write artifacts.
    #[arg(long)]
    pub validate_only: bool,

    /// Only log warnings and errors.
    #[arg(long)]
    pub quiet: bool,
}

/// Errors surfaced by argument validation.
/// Keep messages short/stable (handy for scripts/tests).
#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
    BadCombo(&'static str),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CliError::*;
        match self {
            NonLocalPath(p) => write!(f, "path must be a local file (no scheme): {p}"),
            BadCombo(s) => write!(f, "invalid flag combination: {s}"),
        }
    }
}
impl std::error::Error for CliError {}

/// Entry point used by main.rs
pub fn parse_and_validate() -> Result<Args, CliError> {
    validate(Args::parse())
}

/// Post-parse checks and path normalization.
pub fn validate(mut args: Args) -> Result<Args, CliError> {
    ensure_local_path(&args.plan)?;
    ensure_local_path(&args.out)?;

    if !args.order.is_empty() && matches!(args.strategy, Some(StrategyId::Avalanche | StrategyId::Snowball)) {
        return Err(CliError::BadCombo("--order only applies to --strategy custom"));
    }

    args.plan = normalize_path(&args.plan);
    args.out = normalize_path(&args.out);
    Ok(args)
}

pub fn parse_money(s: &str) -> Result<Decimal, String> {
    s.trim().parse::<Decimal>().map_err(|e| format!("invalid amount {s:?}: {e}"))
}

pub fn parse_strategy(s: &str) -> Result<StrategyId, String> {
    s.parse::<StrategyId>().map_err(|e| format!("{e}: {s:?} (expected avalanche | snowball | custom)"))
}

pub fn parse_debt_id(s: &str) -> Result<DebtId, String> {
    s.trim().parse::<DebtId>().map_err(|e| format!("{e}: {s:?}"))
}

pub fn parse_year_month(s: &str) -> Result<YearMonth, String> {
    s.parse::<YearMonth>().map_err(|e| format!("{e}: {s:?}"))
}

/// Reject any explicit URI scheme (e.g., http://, https://, file://).
#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://") || lower.starts_with("http:") || lower.starts_with("https:") || lower.starts_with("file:")
}

#[inline]
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if has_scheme(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}

/// Best-effort absolute path; falls back to CWD-relative when the path does not exist yet.
fn normalize_path(p: &Path) -> PathBuf {
    fs::canonicalize(p).unwrap_or_else(|_| {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join(p)
        }
    })
}
