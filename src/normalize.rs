//! Mapping loosely-shaped model objects onto the corpus schema.

use serde_json::Value;

use crate::domain::NormalizedRecord;

/// Accepted key names per semantic field, most preferred first.
const INPUT_KEYS: &[&str] = &["input", "text"];
const OUTPUT_KEYS: &[&str] = &["output", "pronunciation"];

/// First non-empty string under any of `keys`. Non-objects resolve to nothing.
fn resolve<'a>(candidate: &'a Value, keys: &[&str]) -> Option<&'a str> {
  let obj = candidate.as_object()?;
  keys
    .iter()
    .filter_map(|k| obj.get(*k).and_then(Value::as_str))
    .find(|s| !s.is_empty())
}

/// Build a record when both `input` and `output` resolve; drop the candidate otherwise.
pub fn normalize_candidate(candidate: &Value, instruction: &str) -> Option<NormalizedRecord> {
  let input = resolve(candidate, INPUT_KEYS)?;
  let output = resolve(candidate, OUTPUT_KEYS)?;
  Some(NormalizedRecord {
    instruction: instruction.to_string(),
    input: input.to_string(),
    output: output.to_string(),
  })
}

/// Order-preserving normalization of a recovered batch.
pub fn normalize_all(candidates: &[Value], instruction: &str) -> Vec<NormalizedRecord> {
  candidates
    .iter()
    .filter_map(|c| normalize_candidate(c, instruction))
    .collect()
}
