//! PROJECT stage: drive Allocator + Amortization month by month across the
//! whole debt set.
//!
//! Contract:
//! - Priority order is computed once, before month 1, and never re-ranked.
//! - Each month the budget is re-allocated over the debts still open; a debt
//!   closed in an earlier month takes no part, so its freed payment rolls over
//!   to the others (surplus lands on the highest-priority open debt).
//! - Overpayment in a debt's payoff month is not redistributed within that
//!   month; it is available from the next month on.
//! - The run is bounded by `horizon_months`. It also stops early once a month
//!   passes in which no open debt's balance decreased: from then on the open
//!   set, and therefore every allocation, is frozen while balances can only
//!   hold or grow.
//! - Non-convergence is a per-debt status, never an error. The reason is
//!   decided per debt from its last simulated month.
//! - A debt whose balance compounds past the representable ceiling is frozen
//!   there as `BalanceOverflow`. It keeps its place in the allocation, so the
//!   other debts are funded exactly as before, but it is no longer stepped
//!   and drops out of the snapshots.
//!
//! `Projection` is a lazy iterator of `MonthSnapshot`s. It is finite and not
//! resumable: to replay, build a new one from the same inputs.

use std::collections::BTreeMap;

use debt_algo::{allocate, allocate_in_order, step, NonConvergence, Strategy};
use debt_core::{Debt, DebtId, Money, ProjectionParams, Rate, YearMonth};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use tracing::{debug, info_span, warn, Span};

use crate::validate::{validate_inputs, ValidationError};

// ---------------------------- Output records ----------------------------

/// Terminal state of one debt in a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PayoffStatus {
    PaidOff,
    NeverPaysOff {
        #[serde(serialize_with = "ser_reason")]
        reason: NonConvergence,
    },
}

fn ser_reason<S: Serializer>(r: &NonConvergence, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(r.code())
}

/// Per-debt projection record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayoffDetails {
    /// `None` when the debt never reaches zero within the run.
    pub months_to_payoff: Option<u32>,
    pub total_interest_paid: Money,
    pub payoff_date: Option<YearMonth>,
    #[serde(flatten)]
    pub status: PayoffStatus,
    /// Balance left when the run ended (zero for paid-off debts).
    pub remaining_balance: Money,
}

/// Month-1 allocation plus per-debt outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationResult {
    /// Keys are exactly the debts open at the start.
    pub allocations: BTreeMap<DebtId, Money>,
    /// Keys are every input debt (terminal ones included, paid off in 0 months).
    pub payoff_details: BTreeMap<DebtId, PayoffDetails>,
}

/// One line of a monthly snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    pub debt_id: DebtId,
    /// Allocated payment for the month.
    pub payment: Money,
    pub interest: Money,
    /// Principal actually retired; negative when the balance grew.
    pub principal: Money,
    pub balance_after: Money,
}

/// State of every open debt after one elapsed month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthSnapshot {
    /// 1-based month index.
    pub month: u32,
    pub date: YearMonth,
    /// Priority order.
    pub entries: Vec<ScheduleEntry>,
    /// Debts that reached zero this month.
    pub paid_off: Vec<DebtId>,
}

// ---------------------------- Projection ----------------------------

#[derive(Debug, Clone)]
struct Slot {
    id: DebtId,
    rate: Rate,
    minimum: Money,
    balance: Money,
    interest_paid: Money,
    closed_in: Option<u32>,
    overflowed: bool,
    /// Balance went down in the debt's most recent simulated month.
    shrinking: bool,
}

impl Slot {
    fn is_open(&self) -> bool {
        self.closed_in.is_none()
    }

    fn non_convergence(&self, stalled: bool) -> NonConvergence {
        if self.overflowed {
            NonConvergence::BalanceOverflow
        } else if stalled || !self.shrinking {
            NonConvergence::PaymentBelowInterest
        } else {
            NonConvergence::HorizonExceeded
        }
    }
}

/// Lazy month-by-month projection over a validated, ordered snapshot.
#[derive(Debug, Clone)]
pub struct Projection {
    slots: Vec<Slot>, // priority order
    first_allocations: BTreeMap<DebtId, Money>,
    total: Money,
    params: ProjectionParams,
    month: u32,
    stalled: bool,
    finished: bool,
}

impl Projection {
    /// Validate, order once, and compute the month-1 allocation.
    pub fn new(
        debts: &[Debt],
        total_monthly_payment: Money,
        strategy: &Strategy,
        params: ProjectionParams,
    ) -> Result<Self, ValidationError> {
        validate_inputs(debts, total_monthly_payment, &params)?;
        let ordered = strategy.order(debts)?;
        let first_allocations = allocate(&ordered, total_monthly_payment);

        let slots = ordered
            .into_iter()
            .map(|d| Slot {
                closed_in: d.is_terminal().then_some(0),
                id: d.id,
                rate: d.interest_rate,
                minimum: d.minimum_payment,
                balance: d.balance.max(Decimal::ZERO),
                interest_paid: Decimal::ZERO,
                overflowed: false,
                shrinking: true,
            })
            .collect();

        Ok(Self {
            slots,
            first_allocations,
            total: total_monthly_payment,
            params,
            month: 0,
            stalled: false,
            finished: false,
        })
    }

    /// Months elapsed so far.
    pub fn months_elapsed(&self) -> u32 {
        self.month
    }

    /// Drain any remaining months and produce per-debt outcomes.
    pub fn into_result(mut self) -> AllocationResult {
        self.by_ref().for_each(drop);

        let start = self.params.start;
        let payoff_details = self
            .slots
            .iter()
            .map(|s| {
                let details = match s.closed_in {
                    Some(m) => PayoffDetails {
                        months_to_payoff: Some(m),
                        total_interest_paid: s.interest_paid,
                        payoff_date: Some(start.add_months(m)),
                        status: PayoffStatus::PaidOff,
                        remaining_balance: Decimal::ZERO,
                    },
                    None => {
                        let reason = s.non_convergence(self.stalled);
                        warn!(
                            debt = %s.id,
                            reason = reason.code(),
                            months = self.month,
                            balance = %s.balance,
                            "debt does not pay off"
                        );
                        PayoffDetails {
                            months_to_payoff: None,
                            total_interest_paid: s.interest_paid,
                            payoff_date: None,
                            status: PayoffStatus::NeverPaysOff { reason },
                            remaining_balance: s.balance,
                        }
                    }
                };
                (s.id.clone(), details)
            })
            .collect();

        AllocationResult { allocations: self.first_allocations, payoff_details }
    }
}

impl Iterator for Projection {
    type Item = MonthSnapshot;

    fn next(&mut self) -> Option<MonthSnapshot> {
        if self.finished {
            return None;
        }
        let open: Vec<usize> = (0..self.slots.len()).filter(|&i| self.slots[i].is_open()).collect();
        if open.is_empty() || self.month >= self.params.horizon_months {
            self.finished = true;
            return None;
        }

        self.month += 1;
        let month = self.month;

        // 1) Allocation over still-open debts, priority order preserved.
        let payments = allocate_in_order(
            open.iter().map(|&i| (&self.slots[i].id, self.slots[i].minimum)),
            self.total,
        );

        // 2) One amortization step per open debt.
        let mut entries = Vec::with_capacity(open.len());
        let mut paid_off = Vec::new();
        let mut progressed = false;
        for (&i, (_, payment)) in open.iter().zip(payments) {
            let slot = &mut self.slots[i];
            if slot.overflowed {
                continue;
            }
            let Some(s) = step(slot.balance, slot.rate, payment) else {
                slot.overflowed = true;
                warn!(debt = %slot.id, month, balance = %slot.balance, "balance out of range; simulation of this debt stopped");
                continue;
            };
            slot.interest_paid += s.interest_accrued;
            slot.shrinking = s.new_balance < slot.balance;
            progressed |= slot.shrinking;
            slot.balance = s.new_balance;
            if s.new_balance.is_zero() {
                slot.closed_in = Some(month);
                paid_off.push(slot.id.clone());
                debug!(debt = %slot.id, month, interest = %slot.interest_paid, "debt paid off");
            }
            entries.push(ScheduleEntry {
                debt_id: slot.id.clone(),
                payment,
                interest: s.interest_accrued,
                principal: s.principal_paid,
                balance_after: s.new_balance,
            });
        }

        // 3) No balance moved down: the remaining set is stuck for good.
        if !progressed {
            self.stalled = true;
            self.finished = true;
        }

        Some(MonthSnapshot {
            month,
            date: self.params.start.add_months(month),
            entries,
            paid_off,
        })
    }
}

// ---------------------------- Public entry points ----------------------------

/// Lazy monthly snapshots for `debts` under `strategy`.
pub fn snapshots(
    debts: &[Debt],
    total_monthly_payment: Money,
    strategy: &Strategy,
    params: ProjectionParams,
) -> Result<Projection, ValidationError> {
    Projection::new(debts, total_monthly_payment, strategy, params)
}

fn project_span(debts: usize, strategy: &Strategy, budget: Money) -> Span {
    info_span!("project", debts, strategy = %strategy.id(), budget = %budget)
}

/// Month-1 allocations and per-debt payoff details.
pub fn project(
    debts: &[Debt],
    total_monthly_payment: Money,
    strategy: &Strategy,
    params: ProjectionParams,
) -> Result<AllocationResult, ValidationError> {
    let span = project_span(debts.len(), strategy, total_monthly_payment);
    let _enter = span.enter();
    Ok(Projection::new(debts, total_monthly_payment, strategy, params)?.into_result())
}

/// Like `project`, also returning every monthly snapshot.
pub fn project_with_schedule(
    debts: &[Debt],
    total_monthly_payment: Money,
    strategy: &Strategy,
    params: ProjectionParams,
) -> Result<(AllocationResult, Vec<MonthSnapshot>), ValidationError> {
    let span = project_span(debts.len(), strategy, total_monthly_payment);
    let _enter = span.enter();
    let mut p = Projection::new(debts, total_monthly_payment, strategy, params)?;
    let schedule: Vec<MonthSnapshot> = p.by_ref().collect();
    Ok((p.into_result(), schedule))
}
