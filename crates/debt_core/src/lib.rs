//! debt_core: Core types, domains, and ordering helpers for the debt planner.
//!
//! This crate is **I/O-free** and never reads the clock. It defines stable
//! types/APIs used across the engine (`debt_algo`, `debt_pipeline`,
//! `debt_io`, `debt_cli`).
//!
//! - Identifiers: `DebtId`
//! - Entities: `Debt`, `Money`, `Rate`
//! - Calendar: `YearMonth` (month/year granularity only)
//! - Domains: `StrategyId`, `ProjectionParams`
//! - Deterministic ordering helpers
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain validation & parsing.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum CoreError {
        InvalidId,
        InvalidYearMonth,
        UnknownStrategy,
        DomainOutOfRange(&'static str),
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidId => write!(f, "invalid id"),
                CoreError::InvalidYearMonth => write!(f, "invalid year-month (expected YYYY-MM)"),
                CoreError::UnknownStrategy => write!(f, "unknown strategy id"),
                CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
            }
        }
    }

    impl std::error::Error for CoreError {}
}

pub mod ids;
pub mod entities;
pub mod calendar;
pub mod variables;
pub mod determinism;

pub use calendar::YearMonth;
pub use entities::{Debt, Money, Rate};
pub use errors::CoreError;
pub use ids::DebtId;
pub use variables::{ProjectionParams, StrategyId};
