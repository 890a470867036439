//! Month/year calendar arithmetic for payoff dates.
//!
//! Projections advance one billing cycle at a time, so the only calendar
//! granularity the engine needs is the month. Days never enter the math.

use core::fmt;
use core::str::FromStr;

use chrono::{Datelike, Month, NaiveDate};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A calendar month, e.g. `2026-10`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct YearMonth {
    year: i32,
    month: u32, // 1..=12
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        if !(1..=12).contains(&month) || !(1..=9999).contains(&year) {
            return Err(CoreError::InvalidYearMonth);
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self { year: date.year(), month: date.month() }
    }

    pub fn year(self) -> i32 { self.year }
    pub fn month(self) -> u32 { self.month }

    /// Latest representable month.
    pub const MAX: YearMonth = YearMonth { year: 9999, month: 12 };

    /// Advance by `n` months; `None` past `YearMonth::MAX`.
    pub fn checked_add_months(self, n: u32) -> Option<Self> {
        let idx = i64::from(self.year) * 12 + i64::from(self.month - 1) + i64::from(n);
        let year = i32::try_from(idx.div_euclid(12)).ok()?;
        let month = u32::try_from(idx.rem_euclid(12)).ok()? + 1;
        Self::new(year, month).ok()
    }

    /// Advance by `n` months, saturating at `YearMonth::MAX`.
    pub fn add_months(self, n: u32) -> Self {
        self.checked_add_months(n).unwrap_or(Self::MAX)
    }

    /// Human label, e.g. "October 2026".
    pub fn long_label(self) -> String {
        let name = u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("?");
        format!("{name} {}", self.year)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (y, m) = s.trim().split_once('-').ok_or(CoreError::InvalidYearMonth)?;
        if y.len() != 4 || m.len() != 2 {
            return Err(CoreError::InvalidYearMonth);
        }
        let year = y.parse::<i32>().map_err(|_| CoreError::InvalidYearMonth)?;
        let month = m.parse::<u32>().map_err(|_| CoreError::InvalidYearMonth)?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = CoreError;
    fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

impl From<YearMonth> for String {
    fn from(ym: YearMonth) -> Self { ym.to_string() }
}
