//! Loader: read a local plan file (debt snapshot + budget + strategy) and
//! return a typed `LoadedPlan`. No network I/O.
//!
//! Accepted shapes:
//! - a plan object (see `PlanInput`), or
//! - a bare array of debts, as exported by the persistence layer; budget and
//!   strategy must then come from the caller.
//!
//! Debt rows may carry extra persistence columns (`user_id`, `created_at`, …);
//! those are ignored. The plan object itself is strict.

#![forbid(unsafe_code)]

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use debt_core::{Debt, DebtId, Money, StrategyId, YearMonth};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{hasher, IoError};

/// Hard cap on plan file size.
pub const MAX_PLAN_BYTES: u64 = 8 * 1024 * 1024;

/// Wire-facing plan (the engine's input contract).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlanInput {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_monthly_payment: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<StrategyId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_order: Option<Vec<DebtId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon_months: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<YearMonth>,
    pub debts: Vec<Debt>,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl PlanInput {
    /// A plan carrying only debts; everything else left to the caller.
    pub fn from_debts(debts: Vec<Debt>) -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            total_monthly_payment: None,
            strategy: None,
            custom_order: None,
            horizon_months: None,
            start: None,
            debts,
        }
    }
}

/// Plan plus provenance.
#[derive(Debug, Clone)]
pub struct LoadedPlan {
    pub plan: PlanInput,
    /// SHA-256 over the canonical JSON of the parsed plan.
    pub inputs_sha256: String,
    pub source: Option<PathBuf>,
}

/// Load and parse a plan file.
pub fn load_plan(path: &Path) -> Result<LoadedPlan, IoError> {
    let text = read_text_with_limit(path, MAX_PLAN_BYTES)?;
    let mut loaded = parse_plan_str(&text)?;
    loaded.source = Some(path.to_path_buf());
    Ok(loaded)
}

/// Parse plan JSON from memory (object or bare debt array).
pub fn parse_plan_str(text: &str) -> Result<LoadedPlan, IoError> {
    let v: Value = serde_json::from_str(text)?;
    let plan = match v {
        Value::Array(_) => {
            let debts: Vec<Debt> = serde_json::from_value(v).map_err(|e| json_err("/", e))?;
            PlanInput::from_debts(debts)
        }
        Value::Object(_) => serde_json::from_value(v).map_err(|e| json_err("/", e))?,
        _ => {
            return Err(IoError::Json {
                pointer: "/".into(),
                msg: "expected a plan object or an array of debts".into(),
            })
        }
    };
    let inputs_sha256 = hasher::sha256_canonical(&plan)?;
    Ok(LoadedPlan { plan, inputs_sha256, source: None })
}

fn json_err(pointer: &str, e: serde_json::Error) -> IoError {
    IoError::Json { pointer: pointer.to_string(), msg: e.to_string() }
}

fn read_text_with_limit(path: &Path, limit: u64) -> Result<String, IoError> {
    let f = File::open(path).map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    let mut buf = String::new();
    let n = f.take(limit + 1).read_to_string(&mut buf)?;
    if n as u64 > limit {
        return Err(IoError::Limit(format!("{} exceeds {limit} bytes", path.display())));
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    const PLAN: &str = r#"{
        "currency_symbol": "€",
        "total_monthly_payment": 200,
        "strategy": "avalanche",
        "start": "2026-10",
        "debts": [
            {"id": "A", "name": "Visa", "banker_name": "First Bank",
             "balance": 1000, "interest_rate": 20, "minimum_payment": 50,
             "created_at": "2024-01-01T00:00:00Z"},
            {"id": "B", "balance": "2000", "interest_rate": 10, "minimum_payment": 80}
        ]
    }"#;

    #[test]
    fn parses_plan_object() {
        let loaded = parse_plan_str(PLAN).unwrap();
        let p = &loaded.plan;
        assert_eq!(p.currency_symbol, "€");
        assert_eq!(p.total_monthly_payment, Some(dec!(200)));
        assert_eq!(p.strategy, Some(StrategyId::Avalanche));
        assert_eq!(p.start, Some("2026-10".parse().unwrap()));
        assert_eq!(p.debts.len(), 2);
        assert_eq!(p.debts[0].banker_name, "First Bank");
        assert_eq!(p.debts[1].balance, dec!(2000));
        assert_eq!(loaded.inputs_sha256.len(), 64);
    }

    #[test]
    fn parses_bare_debt_array() {
        let loaded = parse_plan_str(r#"[{"id":"A","balance":10,"interest_rate":0,"minimum_payment":5}]"#).unwrap();
        assert_eq!(loaded.plan.debts.len(), 1);
        assert!(loaded.plan.total_monthly_payment.is_none());
        assert_eq!(loaded.plan.currency_symbol, "$");
    }

    #[test]
    fn rejects_unknown_plan_fields_and_bad_ids() {
        let typo = r#"{"stratgy":"avalanche","debts":[]}"#;
        assert!(matches!(parse_plan_str(typo), Err(IoError::Json { .. })));
        let bad_id = r#"[{"id":"has space","balance":1,"interest_rate":0,"minimum_payment":1}]"#;
        assert!(parse_plan_str(bad_id).is_err());
        assert!(parse_plan_str("42").is_err());
    }

    #[test]
    fn digest_is_stable_across_formatting() {
        let compact: String = PLAN.split_whitespace().collect::<Vec<_>>().join(" ");
        let a = parse_plan_str(PLAN).unwrap().inputs_sha256;
        let b = parse_plan_str(&compact).unwrap().inputs_sha256;
        assert_eq!(a, b);
    }

    #[test]
    fn load_from_file_and_enforce_limit() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(PLAN.as_bytes()).unwrap();
        let loaded = load_plan(f.path()).unwrap();
        assert_eq!(loaded.source.as_deref(), Some(f.path()));

        assert!(matches!(read_text_with_limit(f.path(), 10), Err(IoError::Limit(_))));
        assert!(matches!(load_plan(Path::new("/definitely/not/here.json")), Err(IoError::Path(_))));
    }
}
