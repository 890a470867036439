//! Determinism utilities: stable ordering & canonical maps.
//!
//! Every ordering used by the engine must be **total**: two debts that tie
//! on a strategy's primary key are separated by `DebtId` ascending, so
//! repeated runs over the same snapshot always agree.

use core::cmp::Ordering;

use rust_decimal::Decimal;

use crate::entities::Debt;
use crate::ids::DebtId;

/* -------------------------------------------------------------------------- */
/*                               Stable Ordering                              */
/* -------------------------------------------------------------------------- */

/// Provide a **total**, stable order for values that must sort canonically.
pub trait StableOrd {
    fn stable_cmp(&self, other: &Self) -> Ordering;
}

impl StableOrd for DebtId {
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl StableOrd for Debt {
    /// Canonical debt order is by id.
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        self.id.stable_cmp(&other.id)
    }
}

/// Resolve `primary == Equal` by id ascending.
#[inline]
pub fn then_by_id(primary: Ordering, a: &Debt, b: &Debt) -> Ordering {
    primary.then_with(|| a.stable_cmp(b))
}

/* -------------------------------------------------------------------------- */
/*                                   Sums                                     */
/* -------------------------------------------------------------------------- */

/// Sum decimal amounts. Exact; order-independent for cent-scaled inputs.
#[inline]
pub fn sum_money<'a, I: IntoIterator<Item = &'a Decimal>>(it: I) -> Decimal {
    it.into_iter().fold(Decimal::ZERO, |acc, v| acc + *v)
}

/* ---------------------------------- Tests --------------------------------- */
