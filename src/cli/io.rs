//! JSON I/O handling for CLI
//!
//! - Input: a data file holding one JSON object of id -> field record
//! - Output: one JSON object per response on stdout, UTF-8

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde_json::{Map, Value};

use super::errors::{CliError, CliResult};

/// Reads a data file of the form `{"walter": {"firstname": "Walter"}, ...}`
pub fn read_data_file(path: &Path) -> CliResult<Map<String, Value>> {
    let content = fs::read_to_string(path).map_err(|e| {
        CliError::io_error(format!("Failed to read data file '{}': {}", path.display(), e))
    })?;
    parse_data(&content)
}

pub fn parse_data(content: &str) -> CliResult<Map<String, Value>> {
    match serde_json::from_str::<Value>(content)? {
        Value::Object(entries) => {
            if let Some((id, _)) = entries.iter().find(|(_, fields)| !fields.is_object()) {
                return Err(CliError::invalid_data(format!(
                    "entry '{}' must be an object of fields",
                    id
                )));
            }
            Ok(entries)
        }
        _ => Err(CliError::invalid_data(
            "data file must be a JSON object keyed by id",
        )),
    }
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_json_line(&serde_json::json!({
        "status": "ok",
        "data": data
    }))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_json_line(&serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    }))
}

/// Write plain text to stdout
pub fn write_text(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn write_json_line(response: &Value) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}
