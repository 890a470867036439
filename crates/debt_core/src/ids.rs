//! Newtype and parser for debt identifiers.
//!
//! Ids come from the persistence layer (UUIDs, row keys, short labels). The
//! engine only needs them to be stable, comparable, and safe to echo into
//! artifacts, so the accepted charset is a conservative token set.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

fn is_token(s: &str) -> bool {
    let len = s.len();
    if !(1..=64).contains(&len) { return false; }
    s.bytes().all(|b| matches!(b,
        b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' |
        b'_' | b'-' | b':' | b'.'
    ))
}

/// Unique debt identifier, stable across a projection.
///
/// `Ord` is lexicographic on the token and is the secondary key every
/// strategy uses to break ties.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct DebtId(String);

impl DebtId {
    pub fn new(s: impl Into<String>) -> Result<Self, CoreError> {
        let s = s.into();
        if is_token(&s) { Ok(Self(s)) } else { Err(CoreError::InvalidId) }
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for DebtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DebtId {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DebtId {
    type Error = CoreError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<DebtId> for String {
    fn from(id: DebtId) -> Self { id.0 }
}
