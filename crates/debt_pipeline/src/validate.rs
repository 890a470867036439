//! crates/debt_pipeline/src/validate.rs
//! Structural & domain validation before any simulation.
//!
//! Fail-fast: the first offending condition is returned and nothing is
//! computed. Checks run in a fixed order (params, budget, then debts in
//! input order), so the same bad input always reports the same error.

use std::collections::BTreeSet;

use debt_algo::StrategyError;
use debt_core::variables::{validate_domains, MAX_AMOUNT, MAX_RATE_PCT};
use debt_core::{Debt, DebtId, Money, ProjectionParams, YearMonth};
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("debt {0}: balance must be >= 0")]
    NegativeBalance(DebtId),
    #[error("debt {0}: interest_rate must be >= 0")]
    NegativeRate(DebtId),
    #[error("debt {0}: minimum_payment must be >= 0")]
    NegativeMinimum(DebtId),
    #[error("debt {0}: balance and minimum_payment must be <= {max}", max = MAX_AMOUNT)]
    AmountOutOfRange(DebtId),
    #[error("debt {0}: interest_rate must be <= {max}", max = MAX_RATE_PCT)]
    RateOutOfRange(DebtId),
    #[error("debt {0}: duplicate id")]
    DuplicateId(DebtId),
    #[error("total_monthly_payment must be >= 0 (got {0})")]
    NegativeBudget(Money),
    #[error("total_monthly_payment must be <= {max} (got {0})", max = MAX_AMOUNT)]
    BudgetOutOfRange(Money),
    #[error("total_monthly_payment is required")]
    MissingBudget,
    #[error("no debts supplied for a positive budget")]
    EmptyDebtsWithBudget,
    #[error("horizon_months {0} out of range (1..={max})", max = debt_core::variables::MAX_HORIZON_MONTHS)]
    HorizonOutOfRange(u32),
    #[error("start {start} plus {horizon} months runs past {max}", max = YearMonth::MAX)]
    HorizonPastCalendar { start: YearMonth, horizon: u32 },
    #[error(transparent)]
    InvalidOrdering(#[from] StrategyError),
}

impl ValidationError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::NegativeBalance(_) => "Debt.NegativeBalance",
            ValidationError::NegativeRate(_) => "Debt.NegativeRate",
            ValidationError::NegativeMinimum(_) => "Debt.NegativeMinimum",
            ValidationError::AmountOutOfRange(_) => "Debt.AmountOutOfRange",
            ValidationError::RateOutOfRange(_) => "Debt.RateOutOfRange",
            ValidationError::DuplicateId(_) => "Debt.DuplicateId",
            ValidationError::NegativeBudget(_) => "Plan.NegativeBudget",
            ValidationError::BudgetOutOfRange(_) => "Plan.BudgetOutOfRange",
            ValidationError::MissingBudget => "Plan.MissingBudget",
            ValidationError::EmptyDebtsWithBudget => "Plan.EmptyDebtsWithBudget",
            ValidationError::HorizonOutOfRange(_) => "Params.HorizonOutOfRange",
            ValidationError::HorizonPastCalendar { .. } => "Params.HorizonPastCalendar",
            ValidationError::InvalidOrdering(_) => "Strategy.InvalidOrdering",
        }
    }

    /// Offending debt, when the error is about one.
    pub fn debt_id(&self) -> Option<&DebtId> {
        match self {
            ValidationError::NegativeBalance(id)
            | ValidationError::NegativeRate(id)
            | ValidationError::NegativeMinimum(id)
            | ValidationError::AmountOutOfRange(id)
            | ValidationError::RateOutOfRange(id)
            | ValidationError::DuplicateId(id) => Some(id),
            _ => None,
        }
    }
}

/// Top-level entry point. Strategy permutation checks happen when the
/// strategy orders the snapshot; everything else is checked here.
pub fn validate_inputs(
    debts: &[Debt],
    total_monthly_payment: Money,
    params: &ProjectionParams,
) -> Result<(), ValidationError> {
    validate_domains(params).map_err(|_| ValidationError::HorizonOutOfRange(params.horizon_months))?;
    if params.start.checked_add_months(params.horizon_months).is_none() {
        return Err(ValidationError::HorizonPastCalendar {
            start: params.start,
            horizon: params.horizon_months,
        });
    }

    if total_monthly_payment < Decimal::ZERO {
        return Err(ValidationError::NegativeBudget(total_monthly_payment));
    }
    if total_monthly_payment > MAX_AMOUNT {
        return Err(ValidationError::BudgetOutOfRange(total_monthly_payment));
    }
    if debts.is_empty() && total_monthly_payment > Decimal::ZERO {
        return Err(ValidationError::EmptyDebtsWithBudget);
    }

    let mut seen: BTreeSet<&DebtId> = BTreeSet::new();
    for d in debts {
        check_debt(d)?;
        if !seen.insert(&d.id) {
            return Err(ValidationError::DuplicateId(d.id.clone()));
        }
    }
    Ok(())
}

fn check_debt(d: &Debt) -> Result<(), ValidationError> {
    if d.balance < Decimal::ZERO {
        return Err(ValidationError::NegativeBalance(d.id.clone()));
    }
    if d.interest_rate < Decimal::ZERO {
        return Err(ValidationError::NegativeRate(d.id.clone()));
    }
    if d.minimum_payment < Decimal::ZERO {
        return Err(ValidationError::NegativeMinimum(d.id.clone()));
    }
    if d.balance > MAX_AMOUNT || d.minimum_payment > MAX_AMOUNT {
        return Err(ValidationError::AmountOutOfRange(d.id.clone()));
    }
    if d.interest_rate > MAX_RATE_PCT {
        return Err(ValidationError::RateOutOfRange(d.id.clone()));
    }
    Ok(())
}
