//! Check command - Classify values as integer-like.

use anyhow::Result;
use serde_json::Value;
use std::io::{self, Write};

use crate::integer::isinteger;

pub fn cmd_check(values: &[String]) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for raw in values {
        writeln!(out, "{}\t{}", raw, isinteger(&parse_value(raw)))?;
    }
    Ok(())
}

/// Read `raw` as JSON if it parses, otherwise as plain text.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
