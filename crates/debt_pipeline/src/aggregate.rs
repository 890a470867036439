//! AGGREGATE stage: totals row derived from the per-debt records.
//!
//! Totals are computed by summation over the same per-debt values that are
//! surfaced to the caller, so the aggregate row and the per-debt rows always
//! agree. Amounts are exact decimals; order of summation does not matter.

use std::collections::BTreeMap;

use debt_core::{determinism::sum_money, Debt, DebtId, Money, YearMonth};
use serde::Serialize;

use crate::project::PayoffDetails;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub balance: Money,
    pub minimum_payment: Money,
    pub total_interest: Money,
    /// Months until every debt is closed; `None` if any debt never pays off.
    pub months_to_debt_free: Option<u32>,
    pub debt_free_date: Option<YearMonth>,
}

/// Sum balances and minimums over the input snapshot, and interest over the
/// per-debt projections.
pub fn totals(debts: &[Debt], details: &BTreeMap<DebtId, PayoffDetails>) -> Totals {
    let balance = sum_money(debts.iter().map(|d| &d.balance));
    let minimum_payment = sum_money(debts.iter().map(|d| &d.minimum_payment));
    let total_interest = sum_money(details.values().map(|d| &d.total_interest_paid));

    // All-or-nothing: one open debt leaves the whole plan unresolved.
    let months_to_debt_free = details
        .values()
        .map(|d| d.months_to_payoff)
        .try_fold(0u32, |acc, m| m.map(|m| acc.max(m)));
    let debt_free_date = details
        .values()
        .map(|d| d.payoff_date)
        .try_fold(None::<YearMonth>, |acc, ym| ym.map(|ym| acc.max(Some(ym))))
        .flatten();

    Totals { balance, minimum_payment, total_interest, months_to_debt_free, debt_free_date }
}
