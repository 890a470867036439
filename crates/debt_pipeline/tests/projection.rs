//! End-to-end projection behavior over small debt snapshots.

use debt_algo::{NonConvergence, Strategy, StrategyError, BALANCE_CEILING};
use debt_core::{Debt, DebtId, Money, ProjectionParams};
use debt_pipeline::{
    project, project_with_schedule, snapshots, totals, MonthSnapshot, PayoffStatus, ValidationError,
};
use proptest::prelude::*;
use proptest::strategy::Strategy as _;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn id(s: &str) -> DebtId {
    s.parse().unwrap()
}

fn params() -> ProjectionParams {
    ProjectionParams::new("2026-10".parse().unwrap())
}

fn payment(m: &MonthSnapshot, debt: &str) -> Option<Money> {
    m.entries.iter().find(|e| e.debt_id.as_str() == debt).map(|e| e.payment)
}

#[test]
fn example_scenario_month_one_allocation() {
    let debts = vec![
        Debt::new(id("A"), dec!(1000), dec!(20), dec!(50)),
        Debt::new(id("B"), dec!(2000), dec!(10), dec!(80)),
    ];
    let r = project(&debts, dec!(200), &Strategy::Avalanche, params()).unwrap();
    assert_eq!(r.allocations.len(), 2);
    assert_eq!(r.allocations[&id("A")], dec!(120));
    assert_eq!(r.allocations[&id("B")], dec!(80));

    // Both close; the higher-rate debt closes first.
    let a = &r.payoff_details[&id("A")];
    let b = &r.payoff_details[&id("B")];
    assert_eq!(a.status, PayoffStatus::PaidOff);
    assert_eq!(b.status, PayoffStatus::PaidOff);
    assert!(a.months_to_payoff < b.months_to_payoff);
    assert_eq!(r.payoff_details.len(), 2);
}

#[test]
fn rollover_frees_minimum_for_next_debt() {
    let debts = vec![
        Debt::new(id("A"), dec!(100), dec!(0), dec!(50)),
        Debt::new(id("B"), dec!(1000), dec!(0), dec!(50)),
    ];
    let (r, schedule) = project_with_schedule(&debts, dec!(150), &Strategy::Snowball, params()).unwrap();

    // Month 1: A takes its minimum plus the surplus and closes; B gets its minimum.
    assert_eq!(payment(&schedule[0], "A"), Some(dec!(100)));
    assert_eq!(payment(&schedule[0], "B"), Some(dec!(50)));
    assert_eq!(schedule[0].paid_off, vec![id("A")]);

    // Month 2: A is gone and the whole budget flows to B.
    assert_eq!(payment(&schedule[1], "A"), None);
    assert_eq!(payment(&schedule[1], "B"), Some(dec!(150)));

    // 1000 = 50 + 150 * 6 + 50 → closes in month 8.
    assert_eq!(r.payoff_details[&id("A")].months_to_payoff, Some(1));
    assert_eq!(r.payoff_details[&id("B")].months_to_payoff, Some(8));
    assert_eq!(schedule.len(), 8);
}

#[test]
fn rollover_with_interest_starts_the_month_after_payoff() {
    let debts = vec![
        Debt::new(id("A"), dec!(100), dec!(12), dec!(50)),
        Debt::new(id("B"), dec!(1000), dec!(12), dec!(50)),
    ];
    let schedule: Vec<MonthSnapshot> =
        snapshots(&debts, dec!(150), &Strategy::Snowball, params()).unwrap().collect();

    let closed = schedule
        .iter()
        .find(|m| m.paid_off.contains(&id("A")))
        .map(|m| m.month)
        .unwrap();
    let after = &schedule[closed as usize];
    assert_eq!(after.month, closed + 1);
    assert_eq!(payment(after, "A"), None);
    assert_eq!(payment(after, "B"), Some(dec!(150)));
}

#[test]
fn non_convergent_debt_is_reported_not_looped() {
    let debts = vec![Debt::new(id("A"), dec!(1000), dec!(24), dec!(1))];
    let r = project(&debts, dec!(1), &Strategy::Avalanche, params()).unwrap();
    let a = &r.payoff_details[&id("A")];
    assert_eq!(a.months_to_payoff, None);
    assert_eq!(a.payoff_date, None);
    assert_eq!(a.status, PayoffStatus::NeverPaysOff { reason: NonConvergence::PaymentBelowInterest });
    assert!(a.remaining_balance > dec!(1000));
}

#[test]
fn one_stuck_debt_does_not_spoil_the_rest() {
    // A outranks B but its payment never covers interest, even after B's rollover.
    let debts = vec![
        Debt::new(id("A"), dec!(1000), dec!(24), dec!(1)),
        Debt::new(id("B"), dec!(100), dec!(0), dec!(10)),
    ];
    let r = project(&debts, dec!(11), &Strategy::Avalanche, params()).unwrap();
    assert_eq!(r.payoff_details[&id("B")].months_to_payoff, Some(10));
    assert_eq!(r.payoff_details[&id("B")].status, PayoffStatus::PaidOff);
    assert_eq!(
        r.payoff_details[&id("A")].status,
        PayoffStatus::NeverPaysOff { reason: NonConvergence::PaymentBelowInterest }
    );
}

#[test]
fn runaway_balance_stops_without_halting_the_plan() {
    // B gets nothing while A pays down, and compounds at 400% a year.
    let debts = vec![
        Debt::new(id("A"), dec!(1000000), dec!(0), dec!(100)),
        Debt::new(id("B"), dec!(1000), dec!(400), dec!(0)),
    ];
    let order = Strategy::Custom(vec![id("A"), id("B")]);
    let (r, schedule) = project_with_schedule(&debts, dec!(100), &order, params()).unwrap();
    assert_eq!(schedule.len(), 600);

    let a = &r.payoff_details[&id("A")];
    assert_eq!(a.status, PayoffStatus::NeverPaysOff { reason: NonConvergence::HorizonExceeded });
    assert_eq!(a.remaining_balance, dec!(940000));

    let b = &r.payoff_details[&id("B")];
    assert_eq!(b.status, PayoffStatus::NeverPaysOff { reason: NonConvergence::BalanceOverflow });
    assert!(b.remaining_balance <= BALANCE_CEILING);
    assert!(b.remaining_balance > dec!(1000));
    // B leaves the schedule once it stops.
    assert!(schedule.last().unwrap().entries.iter().all(|e| e.debt_id == id("A")));

    let t = totals(&debts, &r.payoff_details);
    assert_eq!(t.total_interest, b.total_interest_paid);
    assert_eq!(t.months_to_debt_free, None);
}

#[test]
fn oversized_balance_is_rejected_up_front() {
    let huge = Decimal::from_i128_with_scale(10_i128.pow(28), 0);
    let debts = vec![Debt::new(id("A"), huge, dec!(100), dec!(1))];
    assert_eq!(
        project(&debts, dec!(1), &Strategy::Avalanche, params()),
        Err(ValidationError::AmountOutOfRange(id("A")))
    );
}

#[test]
fn aggregate_interest_matches_the_driven_simulation() {
    let debts = vec![
        Debt::new(id("card"), dec!(4200.17), dec!(22.9), dec!(95)),
        Debt::new(id("car"), dec!(9800), dec!(6.5), dec!(310)),
        Debt::new(id("loan"), dec!(1500.50), dec!(11), dec!(60)),
    ];
    let (r, schedule) = project_with_schedule(&debts, dec!(700), &Strategy::Avalanche, params()).unwrap();
    let t = totals(&debts, &r.payoff_details);

    let driven: Decimal = schedule.iter().flat_map(|m| &m.entries).map(|e| e.interest).sum();
    let per_debt: Decimal = r.payoff_details.values().map(|d| d.total_interest_paid).sum();
    assert_eq!(t.total_interest, driven);
    assert_eq!(t.total_interest, per_debt);
    assert_eq!(t.balance, dec!(15500.67));
    assert_eq!(t.minimum_payment, dec!(465));
    assert!(t.months_to_debt_free.is_some());
}

#[test]
fn custom_order_directs_the_surplus() {
    let debts = vec![
        Debt::new(id("A"), dec!(1000), dec!(20), dec!(50)),
        Debt::new(id("B"), dec!(2000), dec!(10), dec!(80)),
    ];
    let custom = Strategy::Custom(vec![id("B"), id("A")]);
    let r = project(&debts, dec!(200), &custom, params()).unwrap();
    assert_eq!(r.allocations[&id("A")], dec!(50));
    assert_eq!(r.allocations[&id("B")], dec!(150));

    let bad = Strategy::Custom(vec![id("B")]);
    let err = project(&debts, dec!(200), &bad, params()).unwrap_err();
    assert_eq!(
        err,
        ValidationError::InvalidOrdering(StrategyError::InvalidOrdering {
            missing: vec![id("A")],
            duplicated: vec![],
            unknown: vec![],
        })
    );
}

#[test]
fn invalid_input_fails_before_simulating() {
    let debts = vec![Debt::new(id("A"), dec!(-5), dec!(20), dec!(50))];
    assert_eq!(
        project(&debts, dec!(200), &Strategy::Avalanche, params()).unwrap_err(),
        ValidationError::NegativeBalance(id("A"))
    );
    assert_eq!(
        snapshots(&[], dec!(200), &Strategy::Snowball, params()).unwrap_err(),
        ValidationError::EmptyDebtsWithBudget
    );
}

#[test]
fn replay_requires_a_fresh_projection() {
    let debts = vec![
        Debt::new(id("A"), dec!(500), dec!(18), dec!(25)),
        Debt::new(id("B"), dec!(300), dec!(5), dec!(25)),
    ];
    let first: Vec<MonthSnapshot> = snapshots(&debts, dec!(90), &Strategy::Snowball, params()).unwrap().collect();
    let mut again = snapshots(&debts, dec!(90), &Strategy::Snowball, params()).unwrap();
    let second: Vec<MonthSnapshot> = again.by_ref().collect();
    assert_eq!(first, second);
    assert!(again.next().is_none());
}

fn cents(c: u32) -> Decimal {
    Decimal::new(i64::from(c), 2)
}

fn arb_debts() -> impl proptest::strategy::Strategy<Value = Vec<Debt>> {
    proptest::collection::vec((1u32..500_000, 0u32..3_000, 0u32..20_000), 1..5).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (bal, rate_bp, min))| Debt::new(id(&format!("D{i}")), cents(bal), cents(rate_bp), cents(min)))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn larger_budget_never_slows_a_payoff(
        debts in arb_debts(),
        budget in 0u32..100_000,
        extra in 0u32..50_000,
        snowball in any::<bool>(),
    ) {
        let strategy = if snowball { Strategy::Snowball } else { Strategy::Avalanche };
        let lo = project(&debts, cents(budget), &strategy, params()).unwrap();
        let hi = project(&debts, cents(budget + extra), &strategy, params()).unwrap();

        for (debt, lo_d) in &lo.payoff_details {
            let hi_d = &hi.payoff_details[debt];
            if let Some(m_lo) = lo_d.months_to_payoff {
                let m_hi = hi_d.months_to_payoff;
                prop_assert!(m_hi.is_some(), "{debt} paid off at {m_lo} but not with a larger budget");
                prop_assert!(m_hi.unwrap_or(u32::MAX) <= m_lo);
                prop_assert!(hi_d.total_interest_paid <= lo_d.total_interest_paid);
            }
        }
    }
}
