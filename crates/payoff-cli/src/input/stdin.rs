use serde_json::Value;
use std::io::{self, Read};

/// Read a piped planner record from stdin, if any. Piped records are
/// always JSON; YAML is only accepted via `--input` files.
/// Returns None if stdin is a TTY so flag-driven invocations fall through.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(trimmed)?;
    Ok(Some(value))
}
