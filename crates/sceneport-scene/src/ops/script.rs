//! Line-oriented scripts executed atomically against the document.
//!
//! ```text
//! # comments and blank lines are skipped
//! print building the frame
//! create_object {"type": "BOX", "params": {"width": 1, "length": 1, "height": 1}}
//! select_objects
//! ```
//!
//! Lines run against a staged copy; the copy replaces the document only when
//! every line succeeds.

use serde_json::{Map, Value, json};

use super::lookup;
use crate::document::Document;
use crate::errors::SceneError;
use crate::params::require_str;

enum Step {
    Print(String),
    Result(Value),
}

fn parse_params(text: &str) -> Result<Map<String, Value>, String> {
    if text.is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(params)) => Ok(params),
        Ok(_) => Err("parameters must be a JSON object".to_owned()),
        Err(error) => Err(format!("invalid JSON parameters: {error}")),
    }
}

fn run_line(document: &mut Document, line: &str) -> Result<Step, String> {
    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(command, rest)| (command, rest.trim()));
    if command == "print" {
        return Ok(Step::Print(rest.to_owned()));
    }
    let operation = Some(command)
        .filter(|command| *command != "execute_script")
        .and_then(lookup)
        .ok_or_else(|| format!("Unknown command type: {command}"))?;
    let params = parse_params(rest)?;
    operation(document, &params)
        .map(Step::Result)
        .map_err(|error| error.to_string())
}

/// Runs `code` line by line. Any failure restores the document to its
/// state before the script and reports the failing line.
///
/// # Errors
///
/// Returns [`SceneError::Script`] naming the first failing line, or a
/// missing parameter error when `code` is absent.
pub fn execute_script(
    document: &mut Document,
    params: &Map<String, Value>,
) -> Result<Value, SceneError> {
    let code = require_str(params, "code")?;
    let base_revision = document.revision();
    let mut staged = document.clone();
    let mut output = Vec::new();
    let mut results = Vec::new();

    for (index, line) in code.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match run_line(&mut staged, line) {
            Ok(Step::Print(text)) => output.push(text),
            Ok(Step::Result(value)) => results.push(value),
            Err(reason) => {
                return Err(SceneError::Script {
                    line: index.saturating_add(1),
                    reason,
                });
            }
        }
    }

    if staged.revision() != base_revision {
        staged.set_revision(base_revision.saturating_add(1));
        *document = staged;
    }
    Ok(json!({"success": true, "output": output, "results": results}))
}
