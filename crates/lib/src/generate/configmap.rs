//! ConfigMap assembly.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_yaml::{Mapping, Value};

use super::kv::{self, KvValue};
use super::{GenerateError, GeneratorArgs, GeneratorOptions};
use crate::resource::Resource;

/// Generate a ConfigMap resource from a generator's sources.
///
/// Text values land in `data`, binary values are base64-encoded into
/// `binaryData`. Either section is omitted entirely when it has no
/// entries, which matters to the content hash: an omitted section and an
/// empty one hash differently.
pub fn make_configmap(
  args: &GeneratorArgs,
  options: &GeneratorOptions,
  base_dir: &Path,
) -> Result<Resource, GenerateError> {
  if args.name.is_empty() {
    return Err(GenerateError::MissingName);
  }
  let pairs = kv::load_all(args, base_dir)?;

  let mut data = Mapping::new();
  let mut binary_data = Mapping::new();
  for (key, value) in pairs {
    match value {
      KvValue::Text(text) => data.insert(Value::from(key), Value::from(text)),
      KvValue::Binary(bytes) => binary_data.insert(Value::from(key), Value::from(STANDARD.encode(bytes))),
    };
  }

  let mut root = Mapping::new();
  root.insert(Value::from("apiVersion"), Value::from("v1"));
  root.insert(Value::from("kind"), Value::from("ConfigMap"));
  let mut metadata = Mapping::new();
  metadata.insert(Value::from("name"), Value::from(args.name.as_str()));
  root.insert(Value::from("metadata"), Value::Mapping(metadata));
  if !data.is_empty() {
    root.insert(Value::from("data"), Value::Mapping(data));
  }
  if !binary_data.is_empty() {
    root.insert(Value::from("binaryData"), Value::Mapping(binary_data));
  }

  let mut resource = Resource::new(root);
  resource.merge_metadata_map("labels", &options.labels);
  resource.merge_metadata_map("annotations", &options.annotations);
  Ok(resource)
}
