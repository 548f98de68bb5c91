//! Output formatting utilities.

use serde_json::Value;
use std::io::{self, Read};

/// Formats a value as pretty-printed JSON.
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Reads JSON from a file path, or from stdin when no path is given.
pub fn read_json_input(path: Option<String>) -> Result<Value, Box<dyn std::error::Error>> {
    let text = if let Some(path) = path {
        std::fs::read_to_string(&path).map_err(|e| format!("Failed to read file {}: {}", path, e))?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    };
    let value: Value = serde_json::from_str(&text).map_err(|e| format!("Invalid JSON: {}", e))?;
    Ok(value)
}
