//! Secret assembly.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_yaml::{Mapping, Value};

use super::kv::{self, KvValue};
use super::{GenerateError, GeneratorOptions, SecretArgs};
use crate::resource::Resource;

/// Default Secret `type` when the generator does not set one.
pub const DEFAULT_SECRET_TYPE: &str = "Opaque";

/// Generate a Secret resource from a generator's sources.
///
/// Every value, text or binary, is base64-encoded into `data`, matching
/// the wire form of a live Secret.
pub fn make_secret(
  args: &SecretArgs,
  options: &GeneratorOptions,
  base_dir: &Path,
) -> Result<Resource, GenerateError> {
  if args.generator.name.is_empty() {
    return Err(GenerateError::MissingName);
  }
  let pairs = kv::load_all(&args.generator, base_dir)?;

  let mut data = Mapping::new();
  for (key, value) in pairs {
    let bytes = match value {
      KvValue::Text(text) => text.into_bytes(),
      KvValue::Binary(bytes) => bytes,
    };
    data.insert(Value::from(key), Value::from(STANDARD.encode(bytes)));
  }

  let mut root = Mapping::new();
  root.insert(Value::from("apiVersion"), Value::from("v1"));
  root.insert(Value::from("kind"), Value::from("Secret"));
  let mut metadata = Mapping::new();
  metadata.insert(Value::from("name"), Value::from(args.generator.name.as_str()));
  root.insert(Value::from("metadata"), Value::Mapping(metadata));
  root.insert(
    Value::from("type"),
    Value::from(args.secret_type.as_deref().unwrap_or(DEFAULT_SECRET_TYPE)),
  );
  if !data.is_empty() {
    root.insert(Value::from("data"), Value::Mapping(data));
  }

  let mut resource = Resource::new(root);
  resource.merge_metadata_map("labels", &options.labels);
  resource.merge_metadata_map("annotations", &options.annotations);
  Ok(resource)
}
