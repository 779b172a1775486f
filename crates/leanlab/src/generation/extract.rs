//! Response-shape tolerance and JSON recovery for generated text

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::{Error, Result};

static FENCED_BLOCK: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)```").expect("valid fence pattern"));

/// Pull the generated text out of a service response body.
///
/// Tried in order: `response` string, non-empty `output` array, non-empty
/// `results` array, `result` string, and finally the whole body stringified.
pub fn response_text(body: &Value) -> String {
  if let Some(text) = body.get("response").and_then(Value::as_str) {
    return text.to_string();
  }

  if let Some(output) = body.get("output").and_then(Value::as_array).filter(|a| !a.is_empty()) {
    return join_output(output);
  }

  if let Some(results) = body.get("results").and_then(Value::as_array).filter(|a| !a.is_empty()) {
    let mut entries = Vec::new();
    for item in results {
      let picked = ["content", "text", "output"]
        .iter()
        .filter_map(|key| item.get(*key))
        .find(|value| is_present(value));
      match picked {
        Some(Value::Array(inner)) => entries.extend(inner.iter().cloned()),
        Some(value) => entries.push(value.clone()),
        None => {}
      }
    }
    return join_output(&entries);
  }

  if let Some(text) = body.get("result").and_then(Value::as_str) {
    return text.to_string();
  }

  body.to_string()
}

fn is_present(value: &Value) -> bool {
  match value {
    Value::Null => false,
    Value::String(s) => !s.is_empty(),
    Value::Bool(b) => *b,
    _ => true,
  }
}

/// Displayable text of each entry, one per line.
fn join_output(entries: &[Value]) -> String {
  entries
    .iter()
    .map(|entry| match entry {
      Value::String(s) => s.clone(),
      Value::Object(_) => ["content", "text"]
        .iter()
        .filter_map(|key| entry.get(*key))
        .find(|value| is_present(value))
        .map(|value| match value {
          Value::String(s) => s.clone(),
          other => other.to_string(),
        })
        .unwrap_or_else(|| entry.to_string()),
      other => other.to_string(),
    })
    .collect::<Vec<_>>()
    .join("\n")
}

/// Recover a JSON value from generated text.
///
/// Candidates are tried in order: the first fenced code block, the span from
/// the first `{` to the last `}`, then the whole text. `context` names the
/// artifact being produced and appears in every error.
pub fn parse_json_response(raw: Option<&str>, context: &'static str) -> Result<Value> {
  let raw = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or(Error::EmptyResponse { context })?;

  let fenced = FENCED_BLOCK.captures(raw).and_then(|c| c.get(1)).map(|m| m.as_str().trim());
  let mut first_error = None;
  for candidate in [fenced, brace_span(raw), Some(raw)].into_iter().flatten() {
    match serde_json::from_str(candidate) {
      Ok(value) => return Ok(value),
      Err(e) => {
        first_error.get_or_insert(e);
      }
    }
  }

  let message = first_error.map(|e| e.to_string()).unwrap_or_default();
  Err(Error::Parse { context, message })
}

fn brace_span(text: &str) -> Option<&str> {
  let start = text.find('{')?;
  let end = text.rfind('}')?;
  (end > start).then(|| &text[start..=end])
}
