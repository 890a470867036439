//! Amortization of a single debt, one monthly cycle at a time.
//!
//! Contract:
//! - Monthly periodic rate = `interest_rate / 100 / 12`.
//! - Interest posts to the cent (half away from zero), so balances and
//!   running totals stay exact decimals.
//! - `new_balance = max(0, balance + interest - payment)`.
//! - A fixed payment that does not exceed the month's interest can never
//!   retire the debt; `simulate` reports that as `NeverPaysOff` instead of
//!   looping. Every simulation is bounded by the horizon cap.
//! - With `interest_rate == 0` this degrades to `ceil(balance / payment)`
//!   months exactly.
//! - Arithmetic is checked. A step whose result would not fit in a `Decimal`,
//!   or whose balance passes `BALANCE_CEILING`, yields `None`; callers report
//!   that as `NonConvergence::BalanceOverflow` instead of panicking.

use debt_core::{Money, Rate};
use rust_decimal::{Decimal, RoundingStrategy};

const MONTHS_PER_YEAR_PCT: Decimal = Decimal::from_parts(1200, 0, 0, false, 0);

/// Largest balance a step may produce: 10^18, well clear of `Decimal::MAX`
/// so running interest totals can still be summed across a whole plan.
pub const BALANCE_CEILING: Decimal = Decimal::from_parts(0xA764_0000, 0x0DE0_B6B3, 0, false, 0);

/// Result of one monthly step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub new_balance: Money,
    pub interest_accrued: Money,
    /// Portion of the payment actually absorbed (capped at balance + interest).
    pub applied: Money,
    /// `applied - interest_accrued`; negative when the balance grew.
    pub principal_paid: Money,
}

/// Why a debt did not reach zero.
///
/// In a multi-debt projection the reason describes the debt's last simulated
/// month: `PaymentBelowInterest` when its balance did not go down in that
/// month, `HorizonExceeded` when it was still shrinking at the cap. A debt
/// starved while a higher-priority debt pays down may still have been funded
/// later by rollover; the reason records where the run left it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NonConvergence {
    /// The payment does not exceed the interest it must cover.
    PaymentBelowInterest,
    /// Still amortizing, but the horizon cap was reached first.
    HorizonExceeded,
    /// The balance compounded past `BALANCE_CEILING`; simulation of this debt stopped.
    BalanceOverflow,
}

impl NonConvergence {
    pub fn code(self) -> &'static str {
        match self {
            NonConvergence::PaymentBelowInterest => "payment_below_interest",
            NonConvergence::HorizonExceeded => "horizon_exceeded",
            NonConvergence::BalanceOverflow => "balance_overflow",
        }
    }
}

/// Terminal outcome of simulating one debt under a fixed payment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayoffOutcome {
    PaidOff {
        months: u32,
        total_interest: Money,
    },
    NeverPaysOff {
        reason: NonConvergence,
        months_simulated: u32,
        total_interest: Money,
        remaining_balance: Money,
    },
}

impl PayoffOutcome {
    pub fn months(&self) -> Option<u32> {
        match self {
            PayoffOutcome::PaidOff { months, .. } => Some(*months),
            PayoffOutcome::NeverPaysOff { .. } => None,
        }
    }

    pub fn total_interest(&self) -> Money {
        match self {
            PayoffOutcome::PaidOff { total_interest, .. }
            | PayoffOutcome::NeverPaysOff { total_interest, .. } => *total_interest,
        }
    }
}

/// One month of interest on `balance`, rounded to the cent.
/// `None` when the product does not fit in a `Decimal`.
#[inline]
pub fn accrue_interest(balance: Money, interest_rate: Rate) -> Option<Money> {
    if balance <= Decimal::ZERO || interest_rate.is_zero() {
        return Some(Decimal::ZERO);
    }
    // Multiply before dividing to keep every significant digit until rounding.
    let interest = balance.checked_mul(interest_rate)?.checked_div(MONTHS_PER_YEAR_PCT)?;
    Some(interest.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Advance `balance` by one month under `payment`.
/// `None` when the new balance would pass `BALANCE_CEILING`.
pub fn step(balance: Money, interest_rate: Rate, payment: Money) -> Option<Step> {
    let interest_accrued = accrue_interest(balance, interest_rate)?;
    let owed = balance.max(Decimal::ZERO).checked_add(interest_accrued)?;
    let applied = payment.max(Decimal::ZERO).min(owed);
    let new_balance = owed - applied;
    if new_balance > BALANCE_CEILING {
        return None;
    }
    Some(Step {
        new_balance,
        interest_accrued,
        applied,
        principal_paid: applied - interest_accrued,
    })
}

/// Simulate a single debt under a fixed monthly `payment` until payoff,
/// non-amortization, or `horizon_months`.
pub fn simulate(balance: Money, interest_rate: Rate, payment: Money, horizon_months: u32) -> PayoffOutcome {
    if balance <= Decimal::ZERO {
        return PayoffOutcome::PaidOff { months: 0, total_interest: Decimal::ZERO };
    }

    let mut current = balance;
    let mut total_interest = Decimal::ZERO;
    for month in 1..=horizon_months {
        let Some(s) = step(current, interest_rate, payment) else {
            return PayoffOutcome::NeverPaysOff {
                reason: NonConvergence::BalanceOverflow,
                months_simulated: month - 1,
                total_interest,
                remaining_balance: current,
            };
        };
        total_interest += s.interest_accrued;
        if s.new_balance.is_zero() {
            return PayoffOutcome::PaidOff { months: month, total_interest };
        }
        // Fixed payment, non-decreasing balance → interest never shrinks: stuck for good.
        if s.new_balance >= current {
            return PayoffOutcome::NeverPaysOff {
                reason: NonConvergence::PaymentBelowInterest,
                months_simulated: month,
                total_interest,
                remaining_balance: s.new_balance,
            };
        }
        current = s.new_balance;
    }

    PayoffOutcome::NeverPaysOff {
        reason: NonConvergence::HorizonExceeded,
        months_simulated: horizon_months,
        total_interest,
        remaining_balance: current,
    }
}
