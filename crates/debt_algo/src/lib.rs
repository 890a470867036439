// crates/debt_algo/src/lib.rs
#![forbid(unsafe_code)]

//! Pure algorithm layer. No I/O, no logging, no clock.
//!
//! - `strategy`    : priority ordering over a debt snapshot
//! - `allocation`  : split one month's budget into per-debt payments
//! - `amortization`: advance a single debt's balance month by month

pub use debt_core::{Debt, DebtId, Money, Rate};

pub mod strategy;
pub mod allocation;
pub mod amortization;

// Tight, explicit re-exports (avoid wildcard export drift).
pub use allocation::{allocate, allocate_in_order};
pub use amortization::{
    accrue_interest, simulate, step, NonConvergence, PayoffOutcome, Step, BALANCE_CEILING,
};
pub use strategy::{Strategy, StrategyError};
