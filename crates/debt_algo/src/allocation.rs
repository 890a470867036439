//! Single-month allocation of a fixed budget across prioritized debts.
//!
//! Contract:
//! - Walk debts in priority order; each receives `min(minimum_payment, remaining)`.
//! - Whatever remains after all minimums goes **entirely** to the first
//!   (highest-priority) debt. Surplus is never split.
//! - A budget below the sum of minimums is not an error: low-priority debts
//!   are starved first (they may receive less than their minimum, or zero).
//! - Terminal debts (`balance == 0`) take no part and get no key.
//!
//! Determinism: output keys are `DebtId` (BTreeMap); array position is never
//! meaningful to callers.

use std::collections::BTreeMap;

use debt_core::{Debt, DebtId, Money};
use rust_decimal::Decimal;

/// Allocate `total` across `ordered` (priority order). Terminal debts are skipped.
pub fn allocate(ordered: &[Debt], total: Money) -> BTreeMap<DebtId, Money> {
    let slots = ordered
        .iter()
        .filter(|d| !d.is_terminal())
        .map(|d| (&d.id, d.minimum_payment));
    allocate_in_order(slots, total).into_iter().collect()
}

/// Core pass over `(id, minimum_payment)` slots in priority order.
///
/// Returns payments in the same priority order. Negative inputs are clamped
/// to zero; validation upstream rejects them before this point.
pub fn allocate_in_order<'a, I>(slots: I, total: Money) -> Vec<(DebtId, Money)>
where
    I: IntoIterator<Item = (&'a DebtId, Money)>,
{
    let mut remaining = total.max(Decimal::ZERO);
    let mut out: Vec<(DebtId, Money)> = Vec::new();

    // 1) Minimums, clamped to what is left.
    for (id, minimum) in slots {
        let pay = minimum.max(Decimal::ZERO).min(remaining);
        remaining -= pay;
        out.push((id.clone(), pay));
    }

    // 2) Surplus → priority one.
    if remaining > Decimal::ZERO {
        if let Some((_, first)) = out.first_mut() {
            *first += remaining;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::Strategy;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn id(s: &str) -> DebtId { s.parse().unwrap() }

    #[test]
    fn surplus_goes_to_priority_one() {
        // Avalanche: A (20%) before B (10%). Minimums 50 + 80 = 130, surplus 70 → A.
        let debts = vec![
            Debt::new(id("A"), dec!(1000), dec!(20), dec!(50)),
            Debt::new(id("B"), dec!(2000), dec!(10), dec!(80)),
        ];
        let ordered = Strategy::Avalanche.order(&debts).unwrap();
        let got = allocate(&ordered, dec!(200));
        assert_eq!(got.get(&id("A")), Some(&dec!(120)));
        assert_eq!(got.get(&id("B")), Some(&dec!(80)));
    }

    #[test]
    fn short_budget_starves_low_priority_first() {
        let ordered = vec![
            Debt::new(id("A"), dec!(100), dec!(0), dec!(50)),
            Debt::new(id("B"), dec!(100), dec!(0), dec!(50)),
            Debt::new(id("C"), dec!(100), dec!(0), dec!(50)),
        ];
        let got = allocate(&ordered, dec!(70));
        assert_eq!(got[&id("A")], dec!(50));
        assert_eq!(got[&id("B")], dec!(20));
        assert_eq!(got[&id("C")], dec!(0));
    }

    #[test]
    fn terminal_debts_get_no_key() {
        let ordered = vec![
            Debt::new(id("A"), dec!(0), dec!(10), dec!(50)),
            Debt::new(id("B"), dec!(300), dec!(10), dec!(50)),
        ];
        let got = allocate(&ordered, dec!(100));
        assert!(!got.contains_key(&id("A")));
        // B is now priority one among open debts and takes the surplus.
        assert_eq!(got[&id("B")], dec!(100));
    }

    #[test]
    fn empty_input_allocates_nothing() {
        assert!(allocate(&[], dec!(100)).is_empty());
    }

    fn cents(c: u32) -> Decimal { Decimal::new(i64::from(c), 2) }

    proptest! {
        #[test]
        fn sum_is_min_of_budget_and_minimums_or_full_budget(
            mins in proptest::collection::vec(0u32..50_000, 1..8),
            budget in 0u32..400_000,
        ) {
            let debts: Vec<Debt> = mins.iter().enumerate()
                .map(|(i, m)| Debt::new(id(&format!("D{i:02}")), dec!(1000), dec!(5), cents(*m)))
                .collect();
            let total = cents(budget);
            let got = allocate(&debts, total);
            let sum: Decimal = got.values().copied().sum();
            let sum_min: Decimal = debts.iter().map(|d| d.minimum_payment).sum();

            prop_assert_eq!(got.len(), debts.len());
            if total >= sum_min {
                // Every cent is handed out; surplus lands on priority one.
                prop_assert_eq!(sum, total);
                prop_assert_eq!(got[&debts[0].id] - debts[0].minimum_payment, total - sum_min);
                for d in &debts[1..] {
                    prop_assert_eq!(got[&d.id], d.minimum_payment);
                }
            } else {
                prop_assert_eq!(sum, total);
                // Priority order decides who is short-paid.
                let mut short_seen = false;
                for d in &debts {
                    let paid = got[&d.id];
                    prop_assert!(paid <= d.minimum_payment);
                    if short_seen { prop_assert_eq!(paid, Decimal::ZERO); }
                    if paid < d.minimum_payment { short_seen = true; }
                }
            }
        }
    }
}
