//! BUILD_RESULT: assemble the plan result document and its content id.
//!
//! The id is `PLAN:<sha256>` over the canonical JSON of the document
//! **without** its `id` field, so two runs over identical inputs produce
//! byte-identical artifacts with the same id.

use std::collections::BTreeMap;

use debt_core::{DebtId, Money, StrategyId, YearMonth};
use debt_io::{hasher, IoError};
use serde::Serialize;

use crate::aggregate::Totals;
use crate::project::{AllocationResult, PayoffDetails};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanResult {
    pub id: String, // "PLAN:<hex64>"
    pub inputs_sha256: String,
    pub strategy: StrategyId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_order: Option<Vec<DebtId>>,
    pub currency_symbol: String,
    pub total_monthly_payment: Money,
    pub start: YearMonth,
    pub horizon_months: u32,
    pub allocations: BTreeMap<DebtId, Money>,
    pub payoff_details: BTreeMap<DebtId, PayoffDetails>,
    pub totals: Totals,
}

/// Echo of the effective inputs carried into the result.
#[derive(Debug, Clone)]
pub struct ResultHeader {
    pub inputs_sha256: String,
    pub strategy: StrategyId,
    pub custom_order: Option<Vec<DebtId>>,
    pub currency_symbol: String,
    pub total_monthly_payment: Money,
    pub start: YearMonth,
    pub horizon_months: u32,
}

pub fn build_result(
    header: ResultHeader,
    projection: AllocationResult,
    totals: Totals,
) -> Result<PlanResult, IoError> {
    #[derive(Serialize)]
    struct ResultNoId<'a> {
        inputs_sha256: &'a str,
        strategy: StrategyId,
        #[serde(skip_serializing_if = "Option::is_none")]
        custom_order: Option<&'a [DebtId]>,
        currency_symbol: &'a str,
        total_monthly_payment: Money,
        start: YearMonth,
        horizon_months: u32,
        allocations: &'a BTreeMap<DebtId, Money>,
        payoff_details: &'a BTreeMap<DebtId, PayoffDetails>,
        totals: &'a Totals,
    }

    let no_id = ResultNoId {
        inputs_sha256: &header.inputs_sha256,
        strategy: header.strategy,
        custom_order: header.custom_order.as_deref(),
        currency_symbol: &header.currency_symbol,
        total_monthly_payment: header.total_monthly_payment,
        start: header.start,
        horizon_months: header.horizon_months,
        allocations: &projection.allocations,
        payoff_details: &projection.payoff_details,
        totals: &totals,
    };
    let id = hasher::plan_id_from_canonical(&no_id)?;

    Ok(PlanResult {
        id,
        inputs_sha256: header.inputs_sha256,
        strategy: header.strategy,
        custom_order: header.custom_order,
        currency_symbol: header.currency_symbol,
        total_monthly_payment: header.total_monthly_payment,
        start: header.start,
        horizon_months: header.horizon_months,
        allocations: projection.allocations,
        payoff_details: projection.payoff_details,
        totals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::totals;
    use crate::project::project;
    use debt_algo::Strategy;
    use debt_core::{Debt, ProjectionParams};
    use rust_decimal_macros::dec;

    fn header() -> ResultHeader {
        ResultHeader {
            inputs_sha256: "0".repeat(64),
            strategy: StrategyId::Avalanche,
            custom_order: None,
            currency_symbol: "$".into(),
            total_monthly_payment: dec!(200),
            start: "2026-10".parse().unwrap(),
            horizon_months: 600,
        }
    }

    fn run() -> PlanResult {
        let debts = vec![
            Debt::new("A".parse().unwrap(), dec!(1000), dec!(20), dec!(50)),
            Debt::new("B".parse().unwrap(), dec!(2000), dec!(10), dec!(80)),
        ];
        let params = ProjectionParams::new("2026-10".parse().unwrap());
        let r = project(&debts, dec!(200), &Strategy::Avalanche, params).unwrap();
        let t = totals(&debts, &r.payoff_details);
        build_result(header(), r, t).unwrap()
    }

    #[test]
    fn id_is_content_addressed_and_stable() {
        let a = run();
        let b = run();
        assert!(hasher::is_plan_id(&a.id));
        assert_eq!(a.id, b.id);

        let mut h = header();
        h.currency_symbol = "€".into();
        let debts = vec![Debt::new("A".parse().unwrap(), dec!(10), dec!(0), dec!(10))];
        let params = ProjectionParams::new("2026-10".parse().unwrap());
        let r = project(&debts, dec!(10), &Strategy::Avalanche, params).unwrap();
        let t = totals(&debts, &r.payoff_details);
        assert_ne!(build_result(h, r, t).unwrap().id, a.id);
    }

    #[test]
    fn document_shape() {
        let v = serde_json::to_value(run()).unwrap();
        assert_eq!(v["strategy"], "avalanche");
        assert_eq!(v["start"], "2026-10");
        assert_eq!(v["allocations"]["A"], "120");
        assert_eq!(v["allocations"]["B"], "80");
        assert_eq!(v["payoff_details"]["A"]["status"], "paid_off");
        assert!(v.get("custom_order").is_none());
    }
}
