//! Content-addressed name tokens for generated resources.
//!
//! A generated ConfigMap or Secret gets a short suffix derived from its
//! content, so any change to the content produces a new resource name and
//! rolls referencing workloads without manual cache busting. The pipeline
//! is:
//!
//! 1. project the document into a kind-specific [`EncodableRecord`]
//! 2. marshal it to canonical JSON (sorted keys, no whitespace)
//! 3. SHA-256 the bytes
//! 4. re-encode the digest into a 10-character lowercase token
//!
//! The token alphabet replaces the hex runes `0`, `1`, `3`, `a`, `e` with
//! `g`, `h`, `k`, `m`, `t`: no vowels, nothing that reads like another
//! glyph. Changing the alphabet or the grouping silently renames every
//! generated resource downstream, so both are pinned by golden tests.
//!
//! Everything here is a pure function of its input: no state, no I/O, no
//! logging. Calls are safe from any number of threads.

mod canonical;

use serde_json::{Map, Value as JsonValue};
use serde_yaml::Value as YamlValue;
use sha2::{Digest, Sha256};

pub use canonical::to_canonical_json;

use crate::resource::{Resource, value_kind};

/// Length of the generated name-suffix token.
pub const TOKEN_LEN: usize = 10;

/// Errors from projecting or encoding a document for hashing.
#[derive(Debug, thiserror::Error)]
pub enum HashError {
  /// The canonical encoding could not be serialized to JSON.
  #[error("failed to marshal canonical encoding: {0}")]
  Marshal(#[from] serde_json::Error),

  /// A mapping key is not a string and has no JSON projection.
  #[error("mapping key must be a string (found {found})")]
  NonStringKey { found: &'static str },

  /// A number (`.nan`, `.inf`) with no JSON projection.
  #[error("number has no json representation")]
  UnencodableNumber,

  /// A data-carrying field does not have the expected shape.
  #[error("field '{field}' of {kind} '{name}' must be a mapping of scalar values (found {found})")]
  FieldType {
    kind: &'static str,
    name: String,
    field: &'static str,
    found: &'static str,
  },

  /// The digest is shorter than the token. Cannot happen with SHA-256,
  /// but checked rather than sliced blindly.
  #[error("digest too short to encode a name token")]
  DigestTooShort,
}

/// Kind-specific projection of a document, used only for hashing.
///
/// ConfigMaps and Secrets hash a filtered record of their identity-bearing
/// fields; everything else hashes the full document. The variants carry
/// different field sets, so two documents of different kinds can never
/// produce the same canonical encoding even with identical data.
enum EncodableRecord {
  ConfigMap {
    name: String,
    data: FieldValue,
    binary_data: Option<FieldValue>,
  },
  Secret {
    name: String,
    secret_type: String,
    data: FieldValue,
    string_data: Option<FieldValue>,
  },
  Generic(JsonValue),
}

/// A projected data field.
///
/// Absent, null and `{}` all collapse to `Empty`, which encodes as the
/// literal empty string `""` rather than `{}` or `null`. That quirk is
/// load-bearing: the canonical encoding of an empty ConfigMap is
/// `{"data":"","kind":"ConfigMap","name":""}` and has to stay bit-for-bit
/// stable across versions.
enum FieldValue {
  Empty,
  Map(Map<String, JsonValue>),
}

impl FieldValue {
  fn to_json(&self) -> JsonValue {
    match self {
      FieldValue::Empty => JsonValue::String(String::new()),
      FieldValue::Map(map) => JsonValue::Object(map.clone()),
    }
  }
}

/// Hash a resource into its name-suffix token.
///
/// The result is deterministic across processes and machines, invariant to
/// mapping key order, and sensitive to any change in hashed content.
pub fn hash_resource(resource: &Resource) -> Result<String, HashError> {
  let encoded = canonical_encoding(resource)?;
  encode_token(&sha256_hex(&encoded))
}

/// The canonical encoding a resource's token is computed over.
///
/// Exposed for tests and for callers that want to key caches by content;
/// `hash_resource` is `sha256` + token encoding over exactly these bytes.
pub fn canonical_encoding(resource: &Resource) -> Result<String, HashError> {
  let record = project(resource)?;
  encode_record(&record)
}

/// Full lowercase hex SHA-256 of a string.
pub fn sha256_hex(data: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(data.as_bytes());
  hex::encode(hasher.finalize())
}

/// Sort a list of strings and hash the sorted list.
///
/// Used for list-shaped fields where order is not meaningful. The input is
/// copied, never mutated. Items are encoded as a JSON array before hashing
/// so `["a","b"]` and `["ab"]` cannot collide.
///
/// Returns the full 64-character hex digest, not the short token: this
/// doubles as a plain "compute a hash" utility independent of naming.
pub fn sort_and_hash(items: &[String]) -> Result<String, HashError> {
  let mut sorted = items.to_vec();
  sorted.sort();
  let encoded = serde_json::to_string(&sorted)?;
  Ok(sha256_hex(&encoded))
}

/// Re-encode a hex digest into the fixed-length name token.
///
/// Takes the first [`TOKEN_LEN`] hex characters and substitutes
/// `0→g 1→h 3→k a→m e→t`. Total on its domain: every digest maps to
/// exactly one token.
fn encode_token(hex_digest: &str) -> Result<String, HashError> {
  if hex_digest.len() < TOKEN_LEN {
    return Err(HashError::DigestTooShort);
  }
  Ok(
    hex_digest[..TOKEN_LEN]
      .chars()
      .map(|c| match c {
        '0' => 'g',
        '1' => 'h',
        '3' => 'k',
        'a' => 'm',
        'e' => 't',
        other => other,
      })
      .collect(),
  )
}

/// Dispatch on `kind` (case-sensitive, exact) and build the record.
fn project(resource: &Resource) -> Result<EncodableRecord, HashError> {
  match resource.kind() {
    "ConfigMap" => Ok(EncodableRecord::ConfigMap {
      name: resource.name().to_string(),
      data: data_field(resource, "ConfigMap", "data")?,
      binary_data: sticky_field(resource, "ConfigMap", "binaryData")?,
    }),
    "Secret" => Ok(EncodableRecord::Secret {
      name: resource.name().to_string(),
      secret_type: resource
        .field("type")
        .and_then(YamlValue::as_str)
        .unwrap_or("")
        .to_string(),
      data: data_field(resource, "Secret", "data")?,
      string_data: sticky_field(resource, "Secret", "stringData")?,
    }),
    // Any other kind, including none at all: hash the whole document.
    _ => Ok(EncodableRecord::Generic(canonical::canonicalize_mapping(
      resource.root(),
    )?)),
  }
}

/// Project a data-carrying field, applying the empty-string rule.
fn data_field(resource: &Resource, kind: &'static str, field: &'static str) -> Result<FieldValue, HashError> {
  match resource.field(field) {
    None | Some(YamlValue::Null) => Ok(FieldValue::Empty),
    Some(YamlValue::Mapping(mapping)) if mapping.is_empty() => Ok(FieldValue::Empty),
    Some(YamlValue::Mapping(mapping)) => {
      let mut entries: Vec<(&str, &YamlValue)> = Vec::with_capacity(mapping.len());
      for (key, value) in mapping {
        let key = key.as_str().ok_or_else(|| HashError::NonStringKey {
          found: value_kind(key),
        })?;
        if matches!(value, YamlValue::Mapping(_) | YamlValue::Sequence(_)) {
          return Err(HashError::FieldType {
            kind,
            name: resource.name().to_string(),
            field,
            found: value_kind(value),
          });
        }
        entries.push((key, value));
      }
      entries.sort_by(|a, b| a.0.cmp(b.0));
      let mut map = Map::new();
      for (key, value) in entries {
        map.insert(key.to_string(), canonical::canonicalize(value)?);
      }
      Ok(FieldValue::Map(map))
    }
    Some(other) => Err(HashError::FieldType {
      kind,
      name: resource.name().to_string(),
      field,
      found: value_kind(other),
    }),
  }
}

/// Project a presence-sticky field: present in the output iff the key is
/// present in the source, even when its value is empty.
fn sticky_field(
  resource: &Resource,
  kind: &'static str,
  field: &'static str,
) -> Result<Option<FieldValue>, HashError> {
  if !resource.has_field(field) {
    return Ok(None);
  }
  data_field(resource, kind, field).map(Some)
}

/// Marshal a record with its fields in alphabetical order.
fn encode_record(record: &EncodableRecord) -> Result<String, HashError> {
  let value = match record {
    EncodableRecord::ConfigMap {
      name,
      data,
      binary_data,
    } => {
      let mut object = Map::new();
      if let Some(binary) = binary_data {
        object.insert("binaryData".to_string(), binary.to_json());
      }
      object.insert("data".to_string(), data.to_json());
      object.insert("kind".to_string(), JsonValue::from("ConfigMap"));
      object.insert("name".to_string(), JsonValue::from(name.as_str()));
      JsonValue::Object(object)
    }
    EncodableRecord::Secret {
      name,
      secret_type,
      data,
      string_data,
    } => {
      let mut object = Map::new();
      object.insert("data".to_string(), data.to_json());
      object.insert("kind".to_string(), JsonValue::from("Secret"));
      object.insert("name".to_string(), JsonValue::from(name.as_str()));
      if let Some(string_data) = string_data {
        object.insert("stringData".to_string(), string_data.to_json());
      }
      object.insert("type".to_string(), JsonValue::from(secret_type.as_str()));
      JsonValue::Object(object)
    }
    EncodableRecord::Generic(value) => value.clone(),
  };
  Ok(serde_json::to_string(&value)?)
}
