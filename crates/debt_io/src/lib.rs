//! crates/debt_io/src/lib.rs
//! Minimal, single-source-of-truth I/O crate.
//!
//! - Plan loading (JSON → typed `PlanInput`) with size limits.
//! - Canonical JSON bytes + atomic artifact writes.
//! - SHA-256 digests and content-addressed plan ids.
//!
//! The engine crates never touch the filesystem; everything disk-shaped
//! lives here.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for debt_io.
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem / path errors (open, create_dir_all, rename, fsync, etc.)
    #[error("io/path error: {0}")]
    Path(String),

    /// JSON serialization/deserialization errors with a location hint.
    #[error("json error at {pointer}: {msg}")]
    Json {
        pointer: String,
        msg: String,
    },

    /// Input exceeded a configured limit.
    #[error("limit exceeded: {0}")]
    Limit(String),
}

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Path(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json keeps line/column rather than a pointer; surface those.
        let pointer = if e.line() > 0 {
            format!("line {} column {}", e.line(), e.column())
        } else {
            "/".to_string()
        };
        IoError::Json { pointer, msg: e.to_string() }
    }
}

pub mod canonical_json;
pub mod hasher;
pub mod loader;

pub use loader::{load_plan, parse_plan_str, LoadedPlan, PlanInput};
