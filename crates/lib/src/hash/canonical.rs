//! Canonical JSON encoding for deterministic hashing.
//!
//! Two textual serializations of the same logical mapping must produce the
//! same bytes here, so the key sort is an explicit, tested step rather than
//! a side effect of whichever JSON encoder is in use.

use serde_json::{Map, Value as JsonValue};
use serde_yaml::{Mapping, Value as YamlValue};

use super::HashError;
use crate::resource::value_kind;

/// Project a YAML value to compact JSON text with every mapping's keys
/// sorted lexicographically ascending.
pub fn to_canonical_json(value: &YamlValue) -> Result<String, HashError> {
  let canonical = canonicalize(value)?;
  Ok(serde_json::to_string(&canonical)?)
}

/// Recursively convert to a JSON value, sorting mapping keys.
///
/// Arrays keep their order; scalars keep their YAML type (numbers stay
/// numbers). Tagged values are canonicalized through their inner value.
pub(crate) fn canonicalize(value: &YamlValue) -> Result<JsonValue, HashError> {
  match value {
    YamlValue::Null => Ok(JsonValue::Null),
    YamlValue::Bool(b) => Ok(JsonValue::Bool(*b)),
    YamlValue::Number(n) => number_to_json(n),
    YamlValue::String(s) => Ok(JsonValue::String(s.clone())),
    YamlValue::Sequence(items) => items
      .iter()
      .map(canonicalize)
      .collect::<Result<Vec<_>, _>>()
      .map(JsonValue::Array),
    YamlValue::Mapping(mapping) => canonicalize_mapping(mapping),
    YamlValue::Tagged(tagged) => canonicalize(&tagged.value),
  }
}

/// Canonicalize a mapping: collect entries, sort by key, rebuild.
pub(crate) fn canonicalize_mapping(mapping: &Mapping) -> Result<JsonValue, HashError> {
  let mut entries: Vec<(&str, &YamlValue)> = Vec::with_capacity(mapping.len());
  for (key, value) in mapping {
    let key = key.as_str().ok_or_else(|| HashError::NonStringKey {
      found: value_kind(key),
    })?;
    entries.push((key, value));
  }
  entries.sort_by(|a, b| a.0.cmp(b.0));

  let mut object = Map::new();
  for (key, value) in entries {
    object.insert(key.to_string(), canonicalize(value)?);
  }
  Ok(JsonValue::Object(object))
}

fn number_to_json(n: &serde_yaml::Number) -> Result<JsonValue, HashError> {
  if let Some(v) = n.as_u64() {
    return Ok(JsonValue::from(v));
  }
  if let Some(v) = n.as_i64() {
    return Ok(JsonValue::from(v));
  }
  // Remaining case is a float; .nan and .inf have no JSON projection.
  n.as_f64()
    .and_then(serde_json::Number::from_f64)
    .map(JsonValue::Number)
    .ok_or(HashError::UnencodableNumber)
}
