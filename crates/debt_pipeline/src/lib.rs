//! debt_pipeline: deterministic pipeline surface
//! (resolve → validate → order → project → aggregate → build result).
//!
//! This crate stays I/O-free: plan loading, canonical JSON and hashing are
//! delegated to `debt_io`, the math to `debt_algo`. The caller supplies the
//! start month; nothing here reads the clock.

#![forbid(unsafe_code)]

use debt_algo::Strategy;
use debt_core::{Debt, Money, ProjectionParams, StrategyId, YearMonth};
use debt_io::{hasher, loader::PlanInput, IoError};
use thiserror::Error;
use tracing::info;

pub mod validate;
pub mod project;
pub mod aggregate;
pub mod build_result;

pub use aggregate::{totals, Totals};
pub use build_result::{build_result, PlanResult, ResultHeader};
pub use project::{
    project, project_with_schedule, snapshots, AllocationResult, MonthSnapshot, PayoffDetails,
    PayoffStatus, Projection, ScheduleEntry,
};
pub use validate::{validate_inputs, ValidationError};

/// Single error surface for the pipeline orchestration.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),
    #[error("io: {0}")]
    Io(#[from] IoError),
}

/// Fully resolved projection request (defaults applied, overrides merged).
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub debts: Vec<Debt>,
    pub total_monthly_payment: Money,
    pub strategy: Strategy,
    pub params: ProjectionParams,
    pub currency_symbol: String,
    /// Digest of the effective plan these values were resolved from.
    pub inputs_sha256: String,
}

impl PlanRequest {
    /// Resolve a wire plan. Missing `strategy` defaults to avalanche, missing
    /// `start` to `default_start`, missing horizon to the engine default.
    pub fn from_plan(plan: PlanInput, default_start: YearMonth) -> Result<Self, PipelineError> {
        let inputs_sha256 = hasher::sha256_canonical(&plan)?;
        let total_monthly_payment = plan.total_monthly_payment.ok_or(ValidationError::MissingBudget)?;
        let strategy = Strategy::from_id(plan.strategy.unwrap_or(StrategyId::Avalanche), plan.custom_order)
            .map_err(ValidationError::from)?;

        let mut params = ProjectionParams::new(plan.start.unwrap_or(default_start));
        if let Some(h) = plan.horizon_months {
            params = params.with_horizon(h);
        }

        Ok(Self {
            debts: plan.debts,
            total_monthly_payment,
            strategy,
            params,
            currency_symbol: plan.currency_symbol,
            inputs_sha256,
        })
    }

    /// Validate and order without simulating.
    pub fn check(&self) -> Result<(), ValidationError> {
        validate_inputs(&self.debts, self.total_monthly_payment, &self.params)?;
        self.strategy.order(&self.debts)?;
        Ok(())
    }
}

/// Top-level pipeline outputs.
#[derive(Debug, Clone)]
pub struct PipelineOutputs {
    pub result: PlanResult,
    /// Present when requested.
    pub schedule: Option<Vec<MonthSnapshot>>,
}

/// Run the whole pipeline over a resolved request.
pub fn run(req: &PlanRequest, with_schedule: bool) -> Result<PipelineOutputs, PipelineError> {
    let (projection, schedule) = if with_schedule {
        let (r, s) = project_with_schedule(&req.debts, req.total_monthly_payment, &req.strategy, req.params)?;
        (r, Some(s))
    } else {
        (project(&req.debts, req.total_monthly_payment, &req.strategy, req.params)?, None)
    };

    let totals = totals(&req.debts, &projection.payoff_details);
    let custom_order = match &req.strategy {
        Strategy::Custom(order) => Some(order.clone()),
        _ => None,
    };
    let header = ResultHeader {
        inputs_sha256: req.inputs_sha256.clone(),
        strategy: req.strategy.id(),
        custom_order,
        currency_symbol: req.currency_symbol.clone(),
        total_monthly_payment: req.total_monthly_payment,
        start: req.params.start,
        horizon_months: req.params.horizon_months,
    };
    let result = build_result(header, projection, totals)?;

    info!(
        id = %result.id,
        total_interest = %result.totals.total_interest,
        months_to_debt_free = ?result.totals.months_to_debt_free,
        "plan projected"
    );
    Ok(PipelineOutputs { result, schedule })
}
