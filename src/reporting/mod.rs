// src/reporting/mod.rs
//! Human-readable and JSON output for command results.

pub mod console;
pub(crate) mod shared;

use anyhow::Result;
use serde::Serialize;

/// Prints any report as pretty JSON on stdout.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn print_json<T: Serialize>(report: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
