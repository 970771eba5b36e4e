//! CLI command implementations
//!
//! Each command loads a store snapshot, runs the relevant engine operation,
//! and prints a machine-readable JSON report on stdout. Human-oriented
//! one-liners go to stderr so scripted callers can pipe stdout untouched.
//! Commands return the process exit code: 0 for a consistent project,
//! non-zero when a cycle, gate failure, violation, or drift was found.

pub mod check_edge;
pub mod drift;
pub mod gate;
pub mod lifecycle;
pub mod override_cmd;
pub mod progress;
pub mod validate;
pub mod waves;

use anyhow::Result;
use serde::Serialize;

/// Pretty-print a report value on stdout.
pub(crate) fn emit<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
