//! Key/value source parsing for generators.

use std::fs;
use std::path::Path;

use super::{GenerateError, GeneratorArgs};

/// A loaded key/value pair.
///
/// Text and binary payloads are kept apart: a ConfigMap routes them to
/// `data` and `binaryData` respectively, a Secret base64-encodes both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvValue {
  Text(String),
  Binary(Vec<u8>),
}

/// Load all sources of a generator in declaration order.
///
/// Duplicate keys across sources are an error; silently keeping one of two
/// conflicting values would change the content hash underfoot.
pub fn load_all(args: &GeneratorArgs, base_dir: &Path) -> Result<Vec<(String, KvValue)>, GenerateError> {
  let mut pairs: Vec<(String, KvValue)> = Vec::new();

  for spec in &args.literals {
    let (key, value) = parse_literal(spec)?;
    push_pair(&mut pairs, &args.name, key, KvValue::Text(value))?;
  }
  for spec in &args.files {
    let (key, value) = load_file(spec, base_dir)?;
    push_pair(&mut pairs, &args.name, key, value)?;
  }
  for spec in &args.envs {
    for (key, value) in load_env_file(spec, base_dir)? {
      push_pair(&mut pairs, &args.name, key, KvValue::Text(value))?;
    }
  }

  Ok(pairs)
}

/// Parse a `key=value` literal. The value may itself contain `=`.
pub fn parse_literal(spec: &str) -> Result<(String, String), GenerateError> {
  let (key, value) = spec.split_once('=').ok_or_else(|| GenerateError::InvalidLiteral {
    spec: spec.to_string(),
  })?;
  validate_key(key)?;
  Ok((key.to_string(), value.to_string()))
}

/// Load a file source. `key=path` picks an explicit key; otherwise the
/// key is the file name. UTF-8 content is text, anything else is binary.
pub fn load_file(spec: &str, base_dir: &Path) -> Result<(String, KvValue), GenerateError> {
  let (key, path) = match spec.split_once('=') {
    Some((key, path)) => (key.to_string(), path.to_string()),
    None => {
      let name = Path::new(spec)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| spec.to_string());
      (name, spec.to_string())
    }
  };
  validate_key(&key)?;

  let full = base_dir.join(&path);
  let bytes = fs::read(&full).map_err(|source| GenerateError::ReadSource {
    path: full.display().to_string(),
    source,
  })?;

  let value = match String::from_utf8(bytes) {
    Ok(text) => KvValue::Text(text),
    Err(err) => KvValue::Binary(err.into_bytes()),
  };
  Ok((key, value))
}

/// Load an env file: one `KEY=VALUE` per line, `#` comments and blank
/// lines skipped.
pub fn load_env_file(spec: &str, base_dir: &Path) -> Result<Vec<(String, String)>, GenerateError> {
  let full = base_dir.join(spec);
  let content = fs::read_to_string(&full).map_err(|source| GenerateError::ReadSource {
    path: full.display().to_string(),
    source,
  })?;

  let mut pairs = Vec::new();
  for line in content.lines() {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
      continue;
    }
    let (key, value) = trimmed.split_once('=').ok_or_else(|| GenerateError::InvalidEnvLine {
      line: line.to_string(),
    })?;
    validate_key(key)?;
    pairs.push((key.to_string(), value.to_string()));
  }
  Ok(pairs)
}

/// Keys become YAML map keys and file names when mounted, so the charset
/// is restricted to `[-._a-zA-Z0-9]`.
pub fn validate_key(key: &str) -> Result<(), GenerateError> {
  let valid = !key.is_empty()
    && key
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
  if valid {
    Ok(())
  } else {
    Err(GenerateError::InvalidKey { key: key.to_string() })
  }
}

fn push_pair(
  pairs: &mut Vec<(String, KvValue)>,
  generator: &str,
  key: String,
  value: KvValue,
) -> Result<(), GenerateError> {
  if pairs.iter().any(|(existing, _)| *existing == key) {
    return Err(GenerateError::DuplicateKey {
      key,
      name: generator.to_string(),
    });
  }
  pairs.push((key, value));
  Ok(())
}
