//! Priority strategies (pure ordering over a debt snapshot).
//!
//! Contract:
//! - `order` never mutates its input; it returns a fresh sequence.
//! - The result is a **total** order: primary key per variant, then `DebtId`
//!   ascending. Two calls on the same input always agree.
//! - Variants:
//!     * Avalanche → descending `interest_rate`
//!     * Snowball  → ascending `balance`
//!     * Custom    → caller-supplied id sequence, which must be a permutation
//!                   of the input ids
//!
//! Priority is computed once per projection; callers do not re-rank monthly.

use std::collections::{BTreeMap, BTreeSet};

use debt_core::{
    determinism::then_by_id,
    variables::StrategyId,
    Debt, DebtId,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    Avalanche,
    Snowball,
    Custom(Vec<DebtId>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrategyError {
    /// Custom order is not a permutation of the input ids.
    #[error("invalid ordering: missing {missing:?}, duplicated {duplicated:?}, unknown {unknown:?}")]
    InvalidOrdering {
        missing: Vec<DebtId>,
        duplicated: Vec<DebtId>,
        unknown: Vec<DebtId>,
    },
    /// `custom` was selected without an explicit order.
    #[error("custom strategy requires an explicit order")]
    MissingCustomOrder,
}

impl Strategy {
    /// Build a strategy from its wire id. `custom_order` is required for
    /// `custom` and ignored otherwise.
    pub fn from_id(id: StrategyId, custom_order: Option<Vec<DebtId>>) -> Result<Self, StrategyError> {
        match id {
            StrategyId::Avalanche => Ok(Strategy::Avalanche),
            StrategyId::Snowball => Ok(Strategy::Snowball),
            StrategyId::Custom => custom_order
                .map(Strategy::Custom)
                .ok_or(StrategyError::MissingCustomOrder),
        }
    }

    pub fn id(&self) -> StrategyId {
        match self {
            Strategy::Avalanche => StrategyId::Avalanche,
            Strategy::Snowball => StrategyId::Snowball,
            Strategy::Custom(_) => StrategyId::Custom,
        }
    }

    /// Return `debts` in priority order (highest priority first).
    pub fn order(&self, debts: &[Debt]) -> Result<Vec<Debt>, StrategyError> {
        let mut out = debts.to_vec();
        match self {
            Strategy::Avalanche => {
                out.sort_by(|a, b| then_by_id(b.interest_rate.cmp(&a.interest_rate), a, b));
            }
            Strategy::Snowball => {
                out.sort_by(|a, b| then_by_id(a.balance.cmp(&b.balance), a, b));
            }
            Strategy::Custom(order) => {
                check_permutation(order, debts)?;
                let rank: BTreeMap<&DebtId, usize> =
                    order.iter().enumerate().map(|(i, id)| (id, i)).collect();
                // Every id has a rank once the permutation check passed.
                out.sort_by_key(|d| rank.get(&d.id).copied().unwrap_or(usize::MAX));
            }
        }
        Ok(out)
    }
}

/// Fail with `InvalidOrdering` unless `order` names every input id exactly once.
fn check_permutation(order: &[DebtId], debts: &[Debt]) -> Result<(), StrategyError> {
    let known: BTreeSet<&DebtId> = debts.iter().map(|d| &d.id).collect();

    let mut seen: BTreeSet<&DebtId> = BTreeSet::new();
    let mut duplicated: BTreeSet<DebtId> = BTreeSet::new();
    let mut unknown: BTreeSet<DebtId> = BTreeSet::new();
    for id in order {
        if !known.contains(id) {
            unknown.insert(id.clone());
        } else if !seen.insert(id) {
            duplicated.insert(id.clone());
        }
    }
    let missing: Vec<DebtId> = known.difference(&seen).map(|id| (*id).clone()).collect();

    if missing.is_empty() && duplicated.is_empty() && unknown.is_empty() {
        Ok(())
    } else {
        Err(StrategyError::InvalidOrdering {
            missing,
            duplicated: duplicated.into_iter().collect(),
            unknown: unknown.into_iter().collect(),
        })
    }
}
