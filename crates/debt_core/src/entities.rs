//! Debt records as supplied by the persistence layer.
//!
//! The engine treats a `Debt` as a read-only snapshot: projections produce
//! separate output records and never write back into these values.

use rust_decimal::Decimal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ids::DebtId;

/// Monetary amount in the plan's (implied) currency. Exact decimal.
pub type Money = Decimal;

/// Nominal annual percentage rate, e.g. `20` for 20% APR.
pub type Rate = Decimal;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Debt {
    pub id: DebtId,
    /// Display label; not used in computation.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    /// Lending institution; not used in computation.
    #[cfg_attr(feature = "serde", serde(default))]
    pub banker_name: String,
    pub balance: Money,
    pub interest_rate: Rate,
    pub minimum_payment: Money,
    /// Currency metadata only; no conversion is ever performed.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub currency_symbol: Option<String>,
}

impl Debt {
    /// Build a debt with empty display labels.
    pub fn new(id: DebtId, balance: Money, interest_rate: Rate, minimum_payment: Money) -> Self {
        Self {
            id,
            name: String::new(),
            banker_name: String::new(),
            balance,
            interest_rate,
            minimum_payment,
            currency_symbol: None,
        }
    }

    /// A debt with nothing owed is terminal: no allocation, no simulation.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.balance <= Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn id(s: &str) -> DebtId { s.parse().unwrap() }

    #[test]
    fn zero_balance_is_terminal() {
        assert!(Debt::new(id("A"), dec!(0), dec!(5), dec!(10)).is_terminal());
        assert!(!Debt::new(id("A"), dec!(0.01), dec!(5), dec!(10)).is_terminal());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn wire_shape_accepts_numbers_and_optional_labels() {
        let d: Debt = serde_json::from_str(
            r#"{"id":"A","balance":1000.5,"interest_rate":20,"minimum_payment":"50"}"#,
        )
        .unwrap();
        assert_eq!(d.balance, dec!(1000.5));
        assert_eq!(d.interest_rate, dec!(20));
        assert_eq!(d.minimum_payment, dec!(50));
        assert!(d.name.is_empty());
        assert!(d.currency_symbol.is_none());
    }
}
