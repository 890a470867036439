//! crates/debt_io/src/hasher.rs
//!
//! Deterministic hashing and ID builders for canonical artifacts.
//!
//! - Use `sha256_canonical(..)` for JSON **values/structs** (goes through canonical_json).
//! - Use `sha256_hex(..)` for **raw bytes**.
//! - Hex digests are **lowercase**.

#![forbid(unsafe_code)]

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::canonical_json::to_canonical_bytes;
use crate::IoError;

/// Prefix for content-addressed plan results.
pub const PLAN_ID_PREFIX: &str = "PLAN:";

/// SHA-256 over raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// SHA-256 over **canonical JSON bytes** of any serializable value.
pub fn sha256_canonical<T: Serialize + ?Sized>(value: &T) -> Result<String, IoError> {
    let bytes = to_canonical_bytes(value)?;
    Ok(sha256_hex(&bytes))
}

/// `PLAN:<hex64>`: id of a plan result, computed over the result payload
/// **without** its id field.
pub fn plan_id_from_canonical<T: Serialize + ?Sized>(payload: &T) -> Result<String, IoError> {
    let hex = sha256_canonical(payload)?;
    Ok(format!("{PLAN_ID_PREFIX}{hex}"))
}

/// Check the `PLAN:<hex64>` shape.
pub fn is_plan_id(s: &str) -> bool {
    s.strip_prefix(PLAN_ID_PREFIX)
        .map(|h| h.len() == 64 && h.bytes().all(|c| matches!(c, b'0'..=b'9' | b'a'..=b'f')))
        .unwrap_or(false)
}

/* ------------------------------------ Tests ------------------------------------ */
