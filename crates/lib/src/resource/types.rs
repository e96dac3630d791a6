//! The `Resource` type and its accessors.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

/// Errors that can occur while parsing or serializing resources.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
  /// The document is not valid YAML.
  #[error("yaml error: {0}")]
  Yaml(#[from] serde_yaml::Error),

  /// The document parsed, but its root is not a mapping.
  #[error("document root must be a mapping (found {found})")]
  NotAMapping { found: &'static str },
}

/// A single Kubernetes-style resource document.
///
/// The root is always a mapping. Field order is preserved as parsed; the
/// hashing core canonicalizes independently, so order never affects
/// generated names.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
  root: Mapping,
}

impl Resource {
  pub fn new(root: Mapping) -> Self {
    Self { root }
  }

  /// Wrap a parsed YAML value, rejecting non-mapping roots.
  pub fn from_value(value: Value) -> Result<Self, ResourceError> {
    match value {
      Value::Mapping(root) => Ok(Self { root }),
      other => Err(ResourceError::NotAMapping {
        found: value_kind(&other),
      }),
    }
  }

  /// Parse a single YAML document.
  pub fn from_yaml(text: &str) -> Result<Self, ResourceError> {
    Self::from_value(serde_yaml::from_str(text)?)
  }

  /// Parse a multi-document YAML stream, skipping empty documents.
  pub fn parse_documents(text: &str) -> Result<Vec<Self>, ResourceError> {
    let mut resources = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
      let value = Value::deserialize(document)?;
      if value.is_null() {
        continue;
      }
      resources.push(Self::from_value(value)?);
    }
    Ok(resources)
  }

  pub fn root(&self) -> &Mapping {
    &self.root
  }

  pub fn root_mut(&mut self) -> &mut Mapping {
    &mut self.root
  }

  /// The `kind` field, or `""` when absent or not a string.
  pub fn kind(&self) -> &str {
    self.str_field("kind")
  }

  /// The `apiVersion` field, or `""` when absent.
  pub fn api_version(&self) -> &str {
    self.str_field("apiVersion")
  }

  /// The `metadata.name` field, or `""` when absent.
  pub fn name(&self) -> &str {
    self
      .root
      .get("metadata")
      .and_then(Value::as_mapping)
      .and_then(|metadata| metadata.get("name"))
      .and_then(Value::as_str)
      .unwrap_or("")
  }

  /// Set `metadata.name`, creating the metadata mapping if needed.
  pub fn set_name(&mut self, name: &str) {
    let metadata = self.metadata_mut();
    metadata.insert(Value::from("name"), Value::from(name));
  }

  /// The `metadata.namespace` field, or `""` when absent.
  pub fn namespace(&self) -> &str {
    self
      .root
      .get("metadata")
      .and_then(Value::as_mapping)
      .and_then(|metadata| metadata.get("namespace"))
      .and_then(Value::as_str)
      .unwrap_or("")
  }

  /// Set `metadata.namespace`, creating the metadata mapping if needed.
  pub fn set_namespace(&mut self, namespace: &str) {
    let metadata = self.metadata_mut();
    metadata.insert(Value::from("namespace"), Value::from(namespace));
  }

  /// A top-level field by key.
  pub fn field(&self, key: &str) -> Option<&Value> {
    self.root.get(key)
  }

  /// Whether a top-level field exists, regardless of its value.
  ///
  /// Distinguishes `binaryData: {}` from no `binaryData` at all, which the
  /// hashing core treats differently.
  pub fn has_field(&self, key: &str) -> bool {
    self.root.contains_key(key)
  }

  /// Merge entries into `metadata.labels` or `metadata.annotations`.
  ///
  /// Overlay entries win over existing keys.
  pub fn merge_metadata_map(&mut self, section: &str, entries: &BTreeMap<String, String>) {
    if entries.is_empty() {
      return;
    }
    let metadata = self.metadata_mut();
    if !metadata.contains_key(section) {
      metadata.insert(Value::from(section), Value::Mapping(Mapping::new()));
    }
    if let Some(map) = metadata.get_mut(section).and_then(Value::as_mapping_mut) {
      for (key, value) in entries {
        map.insert(Value::from(key.as_str()), Value::from(value.as_str()));
      }
    }
  }

  /// Serialize back to YAML.
  pub fn to_yaml(&self) -> Result<String, ResourceError> {
    Ok(serde_yaml::to_string(&self.root)?)
  }

  fn str_field(&self, key: &str) -> &str {
    self.root.get(key).and_then(Value::as_str).unwrap_or("")
  }

  fn metadata_mut(&mut self) -> &mut Mapping {
    // Missing or non-mapping metadata is replaced with an empty mapping.
    if !matches!(self.root.get("metadata"), Some(Value::Mapping(_))) {
      self
        .root
        .insert(Value::from("metadata"), Value::Mapping(Mapping::new()));
    }
    self
      .root
      .get_mut("metadata")
      .and_then(Value::as_mapping_mut)
      .unwrap()
  }
}

/// Human-readable name for a YAML value's shape, used in errors.
pub(crate) fn value_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "bool",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Sequence(_) => "sequence",
    Value::Mapping(_) => "mapping",
    Value::Tagged(_) => "tagged value",
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_basic_resource() {
    let res = Resource::from_yaml("apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: app\n").unwrap();
    assert_eq!(res.kind(), "ConfigMap");
    assert_eq!(res.api_version(), "v1");
    assert_eq!(res.name(), "app");
  }

  #[test]
  fn missing_fields_default_to_empty() {
    let res = Resource::from_yaml("data:\n  one: \"1\"\n").unwrap();
    assert_eq!(res.kind(), "");
    assert_eq!(res.name(), "");
  }

  #[test]
  fn rejects_non_mapping_root() {
    let err = Resource::from_yaml("- just\n- a\n- list\n").unwrap_err();
    assert!(matches!(err, ResourceError::NotAMapping { found: "sequence" }));
  }

  #[test]
  fn parses_multi_document_stream() {
    let text = "kind: ConfigMap\n---\nkind: Secret\n---\n";
    let docs = Resource::parse_documents(text).unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].kind(), "ConfigMap");
    assert_eq!(docs[1].kind(), "Secret");
  }

  #[test]
  fn set_name_creates_metadata() {
    let mut res = Resource::from_yaml("kind: ConfigMap\n").unwrap();
    res.set_name("generated");
    assert_eq!(res.name(), "generated");
  }

  #[test]
  fn set_namespace_creates_metadata() {
    let mut res = Resource::from_yaml("kind: ConfigMap\n").unwrap();
    assert_eq!(res.namespace(), "");
    res.set_namespace("staging");
    assert_eq!(res.namespace(), "staging");
  }

  #[test]
  fn merge_metadata_map_overwrites_existing() {
    let mut res =
      Resource::from_yaml("kind: Service\nmetadata:\n  name: svc\n  labels:\n    app: old\n").unwrap();
    let mut labels = BTreeMap::new();
    labels.insert("app".to_string(), "new".to_string());
    labels.insert("tier".to_string(), "web".to_string());
    res.merge_metadata_map("labels", &labels);

    let yaml = res.to_yaml().unwrap();
    assert!(yaml.contains("app: new"));
    assert!(yaml.contains("tier: web"));
  }

  #[test]
  fn field_presence_is_tracked() {
    let res = Resource::from_yaml("kind: ConfigMap\nbinaryData: {}\n").unwrap();
    assert!(res.has_field("binaryData"));
    assert!(!res.has_field("data"));
  }
}
