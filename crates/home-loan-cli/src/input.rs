//! JSON input loading: scenario files and piped stdin.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::io::{self, Read};

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    Ok(serde_json::from_value(read_json_value(path)?)?)
}

/// Read a JSON file as a generic `serde_json::Value`. Reference tables go
/// through this path; the engine's normalizer deals with their shape.
pub fn read_json_value(path: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let contents =
        fs::read_to_string(path).map_err(|e| format!("Failed to read '{path}': {e}"))?;
    let value =
        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse '{path}': {e}"))?;
    Ok(value)
}

/// Attempt to read JSON from stdin if data is being piped.
/// Returns None if stdin is a TTY (interactive).
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

    Ok(Some(serde_json::from_str(trimmed)?))
}
