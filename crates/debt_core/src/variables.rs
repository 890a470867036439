//! variables.rs: canonical projection knobs with safe defaults.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::calendar::YearMonth;
use crate::errors::CoreError;

/// Default horizon cap: 50 years of monthly cycles.
pub const DEFAULT_HORIZON_MONTHS: u32 = 600;
/// Upper bound accepted for the horizon cap.
pub const MAX_HORIZON_MONTHS: u32 = 1200;
/// Largest balance, minimum payment or budget accepted (10^15).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);
/// Largest annual percentage rate accepted.
pub const MAX_RATE_PCT: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Define an enum with explicit wire tokens (serde + FromStr + Display agree).
macro_rules! token_enum {
    ($name:ident => { $($variant:ident = $token:expr),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub enum $name {
            $(
                #[cfg_attr(feature = "serde", serde(rename = $token))]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self { $($name::$variant => $token,)+ }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
        }
    };
}

token_enum!(StrategyId => {
    Avalanche = "avalanche",
    Snowball  = "snowball",
    Custom    = "custom",
});

impl FromStr for StrategyId {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "avalanche" => Ok(StrategyId::Avalanche),
            "snowball" => Ok(StrategyId::Snowball),
            "custom" => Ok(StrategyId::Custom),
            _ => Err(CoreError::UnknownStrategy),
        }
    }
}

/// Projection parameters. The engine never reads the clock; `start` is
/// supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProjectionParams {
    /// Maximum simulated months before an open debt is declared non-convergent.
    pub horizon_months: u32,
    /// Calendar month the projection starts from (month 0).
    pub start: YearMonth,
}

impl ProjectionParams {
    pub fn new(start: YearMonth) -> Self {
        Self { horizon_months: DEFAULT_HORIZON_MONTHS, start }
    }

    pub fn with_horizon(mut self, horizon_months: u32) -> Self {
        self.horizon_months = horizon_months;
        self
    }
}

/// Domain checks for params (cheap; run before any simulation).
pub fn validate_domains(p: &ProjectionParams) -> Result<(), CoreError> {
    if !(1..=MAX_HORIZON_MONTHS).contains(&p.horizon_months) {
        return Err(CoreError::DomainOutOfRange("horizon_months"));
    }
    Ok(())
}
